//! ビットボードモジュール
//!
//! 81升の盤面を128bitで表現する。
//!
//! - `Bitboard`: 128bit の升集合
//! - `Bitboard256`: 角の4方向同時計算用
//! - 近接駒の利き・2升間の関係のテーブル
//! - 飛び駒の利き（Qugiy）

mod bitboard256;
mod core;
mod sliders;
mod tables;
mod utils;

pub use bitboard256::Bitboard256;
pub use self::core::{Bitboard, BitboardIter};
pub use sliders::*;
pub use tables::*;
pub use utils::msb64;
