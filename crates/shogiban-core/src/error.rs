//! エラー型
//!
//! - `FormatError`: 局面・指し手・駒の文字列表現が不正
//! - `IllegalMoveError`: 合法手でない指し手を `Position::do_move` に渡した
//! - `InvalidOperationError`: 履歴が空なのに巻き戻し・直前手の参照をした

use crate::types::{Color, Move};

/// 文字列表現の解析エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// SFEN のフィールド数が不正
    #[error("SFEN must have 3 or 4 space-separated fields, got {0}")]
    FieldCount(usize),

    /// 盤面に不正な駒文字
    #[error("Invalid piece character '{0}' in board")]
    InvalidPiece(char),

    /// 成れない駒に '+'
    #[error("Piece '{0}' cannot be promoted")]
    InvalidPromotion(char),

    /// 1段の升の数が9でない
    #[error("Rank {rank} has {files} squares (expected 9)")]
    RankLength { rank: usize, files: usize },

    /// 段の数が9でない
    #[error("Board has {0} ranks (expected 9)")]
    RankCount(usize),

    /// 手番が不正
    #[error("Invalid side to move: {0}")]
    SideToMove(String),

    /// 手駒が不正
    #[error("Invalid hand: {0}")]
    Hand(String),

    /// 手数が不正
    #[error("Invalid ply: {0}")]
    Ply(String),

    /// 玉の数が1でない
    #[error("{color:?} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },

    /// 手番でない側の玉に王手がかかっている
    #[error("{0:?} king is already in check with the opponent to move")]
    OpponentInCheck(Color),

    /// 指し手の文字列が不正
    #[error("Invalid move: {0}")]
    Move(String),

    /// 升の文字列が不正
    #[error("Invalid square: {0}")]
    Square(String),
}

/// 合法でない指し手を適用しようとした
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Illegal move: {mv}")]
pub struct IllegalMoveError {
    pub mv: Move,
}

/// 呼び出し順序の誤り
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOperationError {
    /// 指し手の履歴が空
    #[error("Move history is empty")]
    EmptyHistory,
}

/// ライブラリ全体のエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShogiError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),

    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperationError),
}

/// `ShogiError` を返す Result
pub type Result<T> = std::result::Result<T, ShogiError>;
