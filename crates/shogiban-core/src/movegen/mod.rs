//! 指し手生成モジュール
//!
//! - `generate_legal`: 呼び出し側のバッファに合法手を書き込む
//! - `MoveList`: 固定長バッファと個数の組
//! - `perft` / `perft_divide`: 生成器の検証用の数え上げ

mod generator;
mod movelist;
mod perft;

pub use generator::generate_legal;
pub use movelist::{MAX_MOVES, MoveList};
pub use perft::{perft, perft_divide};
