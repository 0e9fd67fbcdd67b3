//! 千日手の判定

use crate::types::{Move, RepetitionState};

use super::Position;

/// 同一局面がこの回数だけ過去に現れたら千日手（現局面と合わせて4回）
const PRIOR_OCCURRENCES: usize = 3;

impl Position {
    /// 千日手かどうかを手番側から見て判定する
    ///
    /// 履歴を1手ずつ戻しながら現局面と同じ `Board` を数え、3回見つかるか
    /// 履歴が尽きたところで止めて、戻した手を指し直す。戻り値を返す時点では
    /// 局面は呼び出し前と同じ。
    ///
    /// 同一局面どうしの間（現局面を含む）で
    /// - 手番側が指す局面がすべて王手されていれば、相手の連続王手なので `Win`
    /// - 相手が指す局面がすべて王手されていれば、手番側の連続王手なので `Lose`
    /// - どちらでもなければ `Draw`
    pub fn check_repetition(&mut self) -> RepetitionState {
        let current = self.board.clone();
        let mut undone: Vec<Move> = Vec::new();
        let mut found = 0;
        // 手番側が指す局面（偶数手前）・相手が指す局面（奇数手前）がすべて王手か
        let mut us_always_checked = self.in_check();
        let mut them_always_checked = true;

        while found < PRIOR_OCCURRENCES {
            let Ok(mv) = self.last_move() else {
                break;
            };
            if self.undo_move().is_err() {
                break;
            }
            undone.push(mv);

            if undone.len() % 2 == 0 {
                us_always_checked &= self.in_check();
                if self.board == current {
                    found += 1;
                }
            } else {
                them_always_checked &= self.in_check();
            }
        }

        let plies = undone.len();
        for mv in undone.into_iter().rev() {
            self.do_move_pseudo_legal(mv);
        }

        log::trace!("repetition scan: {found} earlier occurrences within {plies} plies");

        if found < PRIOR_OCCURRENCES {
            RepetitionState::None
        } else if us_always_checked {
            RepetitionState::Win
        } else if them_always_checked {
            RepetitionState::Lose
        } else {
            RepetitionState::Draw
        }
    }
}
