//! 指し手リスト

use crate::types::Move;

/// 1局面の合法手の最大数（既知の最大は593）
pub const MAX_MOVES: usize = 600;

/// 固定長の指し手リスト
///
/// 生成器は `[Move; MAX_MOVES]` に書き込んで個数を返す。`MoveList` はその
/// バッファと個数をまとめて持つだけの入れ物。
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[inline]
    pub const fn new() -> MoveList {
        MoveList {
            moves: [Move::NONE; MAX_MOVES],
            len: 0,
        }
    }

    /// 書き込み用のバッファ（`set_len` と組で使う）
    #[inline]
    pub(crate) fn buffer_mut(&mut self) -> &mut [Move; MAX_MOVES] {
        &mut self.moves
    }

    #[inline]
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= MAX_MOVES);
        self.len = len.min(MAX_MOVES);
    }

    /// 末尾に追加（満杯なら捨てて false）
    #[inline]
    pub fn push(&mut self, mv: Move) -> bool {
        match self.moves.get_mut(self.len) {
            Some(slot) => {
                *slot = mv;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|m| m.to_usi())).finish()
    }
}

impl std::ops::Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceType, Square};

    #[test]
    fn test_push_and_contains() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let mv = Move::new_drop(PieceType::Gold, Square::SQ_55);
        assert!(list.push(mv));
        assert_eq!(list.len(), 1);
        assert!(list.contains(mv));
        assert!(!list.contains(Move::new_move(Square::SQ_11, Square::SQ_55, false)));
        assert_eq!(list.as_slice(), &[mv]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_push_when_full() {
        let mut list = MoveList::new();
        let mv = Move::new_drop(PieceType::Pawn, Square::SQ_55);
        for _ in 0..MAX_MOVES {
            assert!(list.push(mv));
        }
        assert!(!list.push(mv));
        assert_eq!(list.len(), MAX_MOVES);
    }
}
