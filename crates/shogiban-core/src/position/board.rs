//! 盤面スナップショット（Board）

use crate::types::{Color, Hand, Piece, PieceType, Square};

/// 手番・81升の駒・両者の手駒だけを持つ最小の局面表現
///
/// 千日手の同一局面判定は、この値同士の比較で行う。
/// 利きやピンなどの派生情報は `Position` 側が持つ。
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    side_to_move: Color,
    squares: [Piece; Square::NUM],
    hands: [Hand; Color::NUM],
}

impl Board {
    /// 駒のない盤（先手番）
    pub const fn empty() -> Self {
        Board {
            side_to_move: Color::Black,
            squares: [Piece::NONE; Square::NUM],
            hands: [Hand::EMPTY; Color::NUM],
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.squares[sq.index()]
    }

    /// 升に駒を置く（`Piece::NONE` で空にする）
    #[inline]
    pub fn set_piece(&mut self, sq: Square, pc: Piece) {
        self.squares[sq.index()] = pc;
    }

    #[inline]
    pub fn hand(&self, color: Color) -> Hand {
        self.hands[color.index()]
    }

    #[inline]
    pub fn set_hand(&mut self, color: Color, hand: Hand) {
        self.hands[color.index()] = hand;
    }

    #[inline]
    pub(crate) fn hand_mut(&mut self, color: Color) -> &mut Hand {
        &mut self.hands[color.index()]
    }

    /// 盤上の駒（升, 駒）を升の昇順に列挙
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all()
            .map(|sq| (sq, self.piece_on(sq)))
            .filter(|(_, pc)| pc.is_some())
    }

    /// 指定手番の玉の升。玉がちょうど1枚でなければ None
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        let mut kings = self.pieces().filter(|&(_, pc)| pc == king);
        let (sq, _) = kings.next()?;
        if kings.next().is_some() { None } else { Some(sq) }
    }

    /// 指定手番の玉の枚数
    pub fn king_count(&self, color: Color) -> u32 {
        let king = Piece::new(color, PieceType::King);
        self.squares.iter().filter(|&&pc| pc == king).count() as u32
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_empty() {
        let board = Board::empty();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.pieces().count(), 0);
        assert_eq!(board.king_square(Color::Black), None);
        assert!(board.hand(Color::White).is_empty());
    }

    #[test]
    fn test_board_equality_covers_all_fields() {
        let mut a = Board::empty();
        a.set_piece(Square::SQ_55, Piece::B_KING);
        let mut b = a.clone();
        assert_eq!(a, b);

        b.set_side_to_move(Color::White);
        assert_ne!(a, b);
        b.set_side_to_move(Color::Black);

        b.set_hand(Color::Black, Hand::EMPTY.add(PieceType::Pawn));
        assert_ne!(a, b);
        b.set_hand(Color::Black, Hand::EMPTY);

        b.set_piece(Square::SQ_11, Piece::W_PAWN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_board_king_square() {
        let mut board = Board::empty();
        board.set_piece(Square::SQ_99, Piece::W_KING);
        assert_eq!(board.king_square(Color::White), Some(Square::SQ_99));
        board.set_piece(Square::SQ_11, Piece::W_KING);
        assert_eq!(board.king_square(Color::White), None);
        assert_eq!(board.king_count(Color::White), 2);
    }
}
