//! # shogiban-core
//!
//! 将棋のルールコア。局面の表現・更新と合法手生成を提供する。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, Piece, Hand, Move など）
//! - `bitboard`: 81升のビットボードと利き計算
//! - `position`: 局面表現、SFEN、do_move/undo_move、千日手・入玉宣言
//! - `movegen`: 合法手生成と perft
//! - `error`: エラー型
//!
//! ## 例
//!
//! ```
//! use shogiban_core::movegen::perft;
//! use shogiban_core::position::Position;
//!
//! let mut pos = Position::startpos();
//! assert_eq!(perft(&mut pos, 2), 900);
//! ```

pub mod error;
pub mod types;

pub mod bitboard;
pub mod position;

pub mod movegen;

pub use error::{FormatError, IllegalMoveError, InvalidOperationError, ShogiError};
pub use movegen::{MAX_MOVES, MoveList, generate_legal};
pub use position::{Board, Position};
