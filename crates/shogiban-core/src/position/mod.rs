//! 局面モジュール
//!
//! - `Board`: 手番・盤上の駒・手駒のスナップショット
//! - `Position`: `Board` と派生情報（利き・王手・ピン）、履歴
//! - SFEN の入出力、千日手判定、入玉宣言、JSON 表現

mod board;
mod declaration;
mod json;
mod pos;
mod repetition;
mod sfen;

pub use board::Board;
pub use json::{BoardStateJson, CellJson, HandJson, HandsJson, PieceJson};
pub use pos::{HistoryEntry, Position};
pub use sfen::SFEN_HIRATE;
