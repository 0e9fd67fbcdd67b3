//! 千日手の判定結果（RepetitionState）

/// 千日手の判定結果（手番側から見た勝敗）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepetitionState {
    /// 千日手ではない
    #[default]
    None,
    /// 通常の千日手（引き分け）
    Draw,
    /// 相手の連続王手による千日手。手番側の勝ち
    Win,
    /// 手番側の連続王手による千日手。手番側の負け
    Lose,
}

impl RepetitionState {
    /// 千日手が成立しているか
    #[inline]
    pub const fn is_repetition(self) -> bool {
        !matches!(self, RepetitionState::None)
    }

    /// 勝敗が決まる千日手か
    #[inline]
    pub const fn is_decisive(self) -> bool {
        matches!(self, RepetitionState::Win | RepetitionState::Lose)
    }
}
