//! 基本型モジュール
//!
//! # 型の依存関係
//!
//! ```text
//! Color
//!   ↓
//! File, Rank, Direction
//!   ↓
//! Square
//!   ↓
//! PieceType
//!   ↓
//! Piece ← Move
//!   ↓
//! Hand
//!
//! RepetitionState は独立
//! ```

mod color;
mod direction;
mod file;
mod hand;
mod moves;
mod piece;
mod piece_type;
mod rank;
mod repetition;
mod square;

pub use color::Color;
pub use direction::Direction;
pub use file::File;
pub use hand::Hand;
pub use moves::Move;
pub use piece::Piece;
pub use piece_type::PieceType;
pub use rank::Rank;
pub use repetition::RepetitionState;
pub use square::Square;
