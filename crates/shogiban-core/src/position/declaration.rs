//! 入玉宣言

use crate::bitboard::enemy_camp_bb;
use crate::types::{Color, PieceType};

use super::Position;
use super::pos::Family;

impl Position {
    /// 手番側が入玉宣言で勝てるか
    ///
    /// 条件:
    /// - 玉が敵陣（相手側の3段）にいて、王手されていない
    /// - 玉以外に10枚以上の自駒が敵陣にある
    /// - 敵陣の自駒（玉を除く）と手駒を大駒5点・小駒1点で数え、先手28点・後手27点以上
    pub fn can_declare_win(&self) -> bool {
        let us = self.side_to_move();
        let ksq = self.king_square(us);
        if !ksq.is_enemy_camp(us) || self.in_check() {
            return false;
        }

        let in_camp = self
            .pieces_c(us)
            .and_not(self.pieces_pt(PieceType::King))
            & enemy_camp_bb(us);
        if in_camp.count() < 10 {
            return false;
        }

        let majors = in_camp & (self.family(us, Family::Bishop) | self.family(us, Family::Rook));
        let hand = self.hand(us);
        let hand_majors = hand.count(PieceType::Bishop) + hand.count(PieceType::Rook);
        let points = in_camp.count() + 4 * majors.count() + hand.total() + 4 * hand_majors;

        let required = match us {
            Color::Black => 28,
            Color::White => 27,
        };
        points >= required
    }
}
