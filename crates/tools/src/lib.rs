//! shogiban-core の検証ツール群

pub mod suite;
