//! 合法手生成器
//!
//! 疑似合法手を作ってから篩にかけるのではなく、最初から合法手だけを書き出す。
//!
//! - ピンされた駒の移動先は玉とその駒を通る直線に制限する
//! - 玉の移動先は玉を取り除いた占有で相手の利きを調べる
//! - 王手されているときは、王手駒を取るか間に入る手と玉の移動だけを作る
//!   （両王手なら玉の移動だけ）
//! - 打ち歩詰めになる歩打ちは除く

use crate::bitboard::{
    Bitboard, between_bb, effect, enemy_camp_bb, king_effect, line_bb, pawn_effect, rank_bb,
};
use crate::position::Position;
use crate::types::{Color, Move, PieceType, Rank, Square};

use super::movelist::{MAX_MOVES, MoveList};

/// 行き所のない歩・香が進めない段
#[inline]
fn rank1_bb(us: Color) -> Bitboard {
    rank_bb(Rank::Rank1.relative(us))
}

/// 行き所のない桂が進めない段
#[inline]
fn rank12_bb(us: Color) -> Bitboard {
    rank_bb(Rank::Rank1.relative(us)) | rank_bb(Rank::Rank2.relative(us))
}

/// 成らなければ行き所がなくなる移動先
#[inline]
fn must_promote(pt: PieceType, us: Color, to: Square) -> bool {
    match pt {
        PieceType::Pawn | PieceType::Lance => rank1_bb(us).contains(to),
        PieceType::Knight => rank12_bb(us).contains(to),
        _ => false,
    }
}

/// 呼び出し側のバッファに書き込む生成器
struct Generator<'a> {
    pos: &'a Position,
    us: Color,
    king_sq: Square,
    occupied: Bitboard,
    buffer: &'a mut [Move; MAX_MOVES],
    len: usize,
}

impl<'a> Generator<'a> {
    fn new(pos: &'a Position, buffer: &'a mut [Move; MAX_MOVES]) -> Generator<'a> {
        let us = pos.side_to_move();
        Generator {
            pos,
            us,
            king_sq: pos.king_square(us),
            occupied: pos.occupied(),
            buffer,
            len: 0,
        }
    }

    #[inline]
    fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move buffer overflow");
        if let Some(slot) = self.buffer.get_mut(self.len) {
            *slot = mv;
            self.len += 1;
        }
    }

    fn generate(mut self) -> usize {
        let checkers = self.pos.checkers();
        if checkers.is_empty() {
            let target = !self.pos.pieces_c(self.us);
            self.generate_piece_moves(target);
            self.generate_king_moves();
            self.generate_drops(!self.occupied);
        } else {
            self.generate_king_moves();
            if !checkers.more_than_one() {
                let Some(checker) = checkers.lsb() else {
                    return self.len;
                };
                let between = between_bb(self.king_sq, checker);
                self.generate_piece_moves(between | Bitboard::from_square(checker));
                if between.is_not_empty() {
                    self.generate_drops(between);
                }
            }
        }
        self.len
    }

    // ========== 盤上の駒の移動 ==========

    /// 玉以外の駒の移動（移動先は `target` に限る）
    fn generate_piece_moves(&mut self, target: Bitboard) {
        let us = self.us;
        let pinned = self.pos.pinned(us);
        let camp = enemy_camp_bb(us);
        let movers = self.pos.pieces_c(us).and_not(self.pos.pieces(us, PieceType::King));

        for from in movers {
            let pt = self.pos.piece_on(from).piece_type();
            let mut targets = effect(pt, us, from, self.occupied) & target;
            if pinned.contains(from) {
                targets &= line_bb(self.king_sq, from);
            }
            if targets.is_empty() {
                continue;
            }

            if !pt.can_promote() {
                for to in targets {
                    self.push(Move::new_move(from, to, false));
                }
                continue;
            }

            let from_in_camp = camp.contains(from);
            for to in targets {
                if from_in_camp || camp.contains(to) {
                    self.push(Move::new_move(from, to, true));
                    if !must_promote(pt, us, to) {
                        self.push(Move::new_move(from, to, false));
                    }
                } else {
                    self.push(Move::new_move(from, to, false));
                }
            }
        }
    }

    /// 玉の移動
    fn generate_king_moves(&mut self) {
        let them = self.us.opponent();
        let ksq = self.king_sq;
        let occ_without_king = self.occupied.and_not(Bitboard::from_square(ksq));
        let targets = king_effect(ksq).and_not(self.pos.pieces_c(self.us));

        for to in targets {
            if !self.pos.is_attacked(them, to, occ_without_king) {
                self.push(Move::new_move(ksq, to, false));
            }
        }
    }

    // ========== 駒打ち ==========

    /// 駒打ち（打てる升は `target` に限る。`target` は空き升であること）
    fn generate_drops(&mut self, target: Bitboard) {
        let us = self.us;
        let hand = self.pos.hand(us);
        if hand.is_empty() {
            return;
        }

        if hand.has(PieceType::Pawn) {
            let mut pawn_target = target.and_not(rank1_bb(us))
                & Bitboard::pawn_drop_mask(self.pos.pieces(us, PieceType::Pawn));

            // 相手玉の正面への歩打ちだけが打ち歩詰めになりうる
            let their_king = self.pos.king_square(us.opponent());
            let checking = pawn_effect(us.opponent(), their_king);
            if let Some(to) = (pawn_target & checking).lsb() {
                if is_drop_pawn_mate(self.pos, us, to) {
                    pawn_target.clear(to);
                }
            }

            for to in pawn_target {
                self.push(Move::new_drop(PieceType::Pawn, to));
            }
        }

        for pt in [
            PieceType::Lance,
            PieceType::Knight,
            PieceType::Silver,
            PieceType::Gold,
            PieceType::Bishop,
            PieceType::Rook,
        ] {
            if !hand.has(pt) {
                continue;
            }
            let drop_target = match pt {
                PieceType::Lance => target.and_not(rank1_bb(us)),
                PieceType::Knight => target.and_not(rank12_bb(us)),
                _ => target,
            };
            for to in drop_target {
                self.push(Move::new_drop(pt, to));
            }
        }
    }
}

/// `us` が `to` に歩を打つと打ち歩詰めになるか
///
/// `to` は相手玉の正面で、歩を打てば王手になることが前提。次のいずれもできなければ詰み。
///
/// - 玉以外の駒で歩を取る（歩を置いた占有でピンされていない駒に限る）
/// - 玉で歩を取る（その升に `us` の利きがない）
/// - 玉が歩の升以外へ逃げる
pub(crate) fn is_drop_pawn_mate(pos: &Position, us: Color, to: Square) -> bool {
    let them = us.opponent();
    let their_king = pos.king_square(them);
    debug_assert!(pawn_effect(us, to).contains(their_king));

    let to_bb = Bitboard::from_square(to);
    let occupied = pos.occupied() | to_bb;

    let capturers = pos
        .attackers_to(them, to, occupied)
        .and_not(Bitboard::from_square(their_king))
        .and_not(pos.pinned_with(them, occupied));
    if capturers.is_not_empty() {
        return false;
    }

    let occ_without_king = occupied.and_not(Bitboard::from_square(their_king));
    if !pos.is_attacked(us, to, occ_without_king) {
        return false;
    }

    let escapes = king_effect(their_king).and_not(pos.pieces_c(them) | to_bb);
    escapes
        .iter()
        .all(|sq| pos.is_attacked(us, sq, occ_without_king))
}

/// 合法手を `buffer` の先頭から書き込み、その個数を返す
pub fn generate_legal(pos: &Position, buffer: &mut [Move; MAX_MOVES]) -> usize {
    Generator::new(pos, buffer).generate()
}

impl Position {
    /// 合法手の一覧
    pub fn legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        let n = generate_legal(self, list.buffer_mut());
        list.set_len(n);
        list
    }

    /// 合法手か
    ///
    /// 投了・宣言勝ちなどの特殊手は盤上の手ではないので false。
    pub fn is_legal(&self, mv: Move) -> bool {
        mv.is_ok() && self.legal_moves().contains(mv)
    }

    /// 詰んでいるか（王手されていて合法手がない）
    pub fn is_mated(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::File;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(
            File::from_u8(file - 1).unwrap(),
            Rank::from_u8(rank - 1).unwrap(),
        )
    }

    fn legal(sfen: &str) -> MoveList {
        Position::from_sfen(sfen).unwrap().legal_moves()
    }

    #[test]
    fn test_generate_legal_hirate() {
        let pos = Position::startpos();
        let mut buffer = [Move::NONE; MAX_MOVES];
        let n = generate_legal(&pos, &mut buffer);
        assert_eq!(n, 30);
        assert!(buffer[..n].contains(&Move::new_move(sq(7, 7), sq(7, 6), false)));
        assert!(buffer[..n].contains(&Move::new_move(sq(5, 9), sq(4, 8), false)));
        assert!(buffer[n..].iter().all(|m| m.is_none()));
    }

    #[test]
    fn test_rank1_bb() {
        assert!(rank1_bb(Color::Black).contains(sq(5, 1)));
        assert!(rank1_bb(Color::White).contains(sq(5, 9)));
        assert!(rank12_bb(Color::Black).contains(sq(5, 2)));
        assert!(rank12_bb(Color::White).contains(sq(5, 8)));
        assert!(!rank12_bb(Color::White).contains(sq(5, 7)));
    }

    #[test]
    fn test_promotion_policy() {
        // 5四の歩が5三へ: 成り・不成の両方
        let moves = legal("4k4/9/9/4P4/9/9/9/9/4K4 b - 1");
        assert!(moves.contains(Move::new_move(sq(5, 4), sq(5, 3), true)));
        assert!(moves.contains(Move::new_move(sq(5, 4), sq(5, 3), false)));

        // 1段目への歩は成りのみ
        let moves = legal("k8/9/9/9/9/9/9/9/4K4 b - 1");
        assert_eq!(moves.len(), 5);
        let moves = legal("k8/4P4/9/9/9/9/9/9/4K4 b - 1");
        assert!(moves.contains(Move::new_move(sq(5, 2), sq(5, 1), true)));
        assert!(!moves.contains(Move::new_move(sq(5, 2), sq(5, 1), false)));

        // 桂は2段目まで成りのみ、3段目は両方
        let moves = legal("k8/9/9/9/4N4/9/9/9/4K4 b - 1");
        assert!(moves.contains(Move::new_move(sq(5, 5), sq(4, 3), true)));
        assert!(moves.contains(Move::new_move(sq(5, 5), sq(4, 3), false)));
        let moves = legal("k8/9/9/4N4/9/9/9/9/4K4 b - 1");
        assert!(moves.contains(Move::new_move(sq(5, 4), sq(6, 2), true)));
        assert!(!moves.contains(Move::new_move(sq(5, 4), sq(6, 2), false)));

        // 敵陣から出る手も成れる
        let moves = legal("k8/9/4S4/9/9/9/9/9/4K4 b - 1");
        assert!(moves.contains(Move::new_move(sq(5, 3), sq(4, 4), true)));
        assert!(moves.contains(Move::new_move(sq(5, 3), sq(4, 4), false)));

        // 後手の香は9段目へ成りのみ
        let moves = legal("k3l4/9/9/9/9/9/9/9/8K w - 1");
        assert!(moves.contains(Move::new_move(sq(5, 1), sq(5, 9), true)));
        assert!(!moves.contains(Move::new_move(sq(5, 1), sq(5, 9), false)));
        assert!(moves.contains(Move::new_move(sq(5, 1), sq(5, 7), true)));
        assert!(moves.contains(Move::new_move(sq(5, 1), sq(5, 7), false)));
        assert!(!moves.contains(Move::new_move(sq(5, 1), sq(5, 6), true)));
    }

    #[test]
    fn test_gold_never_promotes() {
        let moves = legal("k8/9/4G4/9/9/9/9/9/4K4 b - 1");
        assert!(moves.iter().all(|m| !m.is_promotion()));
    }

    #[test]
    fn test_pinned_piece_moves_along_line() {
        // 5九玉・5七飛・5一飛（後手）: 飛は5筋の上下だけ
        let moves = legal("4r4/9/9/9/9/9/4R4/9/4K3k b - 1");
        let rook_moves: Vec<_> = moves
            .iter()
            .filter(|m| !m.is_drop() && m.from() == sq(5, 7))
            .collect();
        assert!(!rook_moves.is_empty());
        assert!(rook_moves.iter().all(|m| m.to().file() == File::File5));
        assert!(moves.contains(Move::new_move(sq(5, 7), sq(5, 1), true)));
        assert!(moves.contains(Move::new_move(sq(5, 7), sq(5, 8), false)));
        assert!(!moves.contains(Move::new_move(sq(5, 7), sq(4, 7), false)));

        // 斜めのピン: 金は斜線上の4六にだけ動ける
        let moves = legal("k8/9/9/9/4b4/9/6G2/9/8K b - 1");
        let gold_moves: Vec<_> = moves
            .iter()
            .filter(|m| !m.is_drop() && m.from() == sq(3, 7))
            .collect();
        assert_eq!(gold_moves, vec![&Move::new_move(sq(3, 7), sq(4, 6), false)]);
    }

    #[test]
    fn test_king_cannot_step_along_checking_ray() {
        // 5九玉に5一飛で王手: 5八へは逃げられない（玉を除いた占有で判定）
        let moves = legal("4r4/9/9/9/9/9/9/9/4K3k b - 1");
        assert!(!moves.contains(Move::new_move(sq(5, 9), sq(5, 8), false)));
        assert!(moves.contains(Move::new_move(sq(5, 9), sq(4, 8), false)));
        assert!(moves.contains(Move::new_move(sq(5, 9), sq(6, 9), false)));
    }

    #[test]
    fn test_evasion_blocks_and_captures() {
        // 5九玉に5一飛で王手、先手は金を持つ: 合駒は5二〜5八
        let pos = Position::from_sfen("4r4/9/9/9/9/9/9/9/4K3k b G 1").unwrap();
        let moves = pos.legal_moves();
        let drops: Vec<_> = moves.iter().filter(|m| m.is_drop()).collect();
        assert_eq!(drops.len(), 7);
        assert!(drops.iter().all(|m| m.to().file() == File::File5));

        // 9一角で飛を取れる
        let moves = legal("4r4/9/9/9/B8/9/9/9/4K3k b - 1");
        assert!(moves.contains(Move::new_move(sq(9, 5), sq(5, 1), true)));
        assert!(moves.contains(Move::new_move(sq(9, 5), sq(5, 1), false)));
        assert!(!moves.contains(Move::new_move(sq(9, 5), sq(7, 3), false)));
    }

    #[test]
    fn test_double_check_only_king_moves() {
        // 5九玉に5一飛と1五角の両王手
        let pos = Position::from_sfen("4r3k/9/9/9/8b/9/9/9/4K4 b G 1").unwrap();
        assert_eq!(pos.checkers().count(), 2);
        let moves = pos.legal_moves();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| !m.is_drop() && m.from() == sq(5, 9)));
    }

    #[test]
    fn test_nifu_and_dead_drops() {
        // 先手の歩が5筋にある: 5筋には打てない。1段目にも打てない
        let pos = Position::from_sfen("k8/9/9/9/4P4/9/9/9/4K4 b PLN 1").unwrap();
        let moves = pos.legal_moves();
        let pawn_drops: Vec<_> = moves
            .iter()
            .filter(|m| m.is_drop() && m.drop_piece_type() == PieceType::Pawn)
            .collect();
        assert!(pawn_drops.iter().all(|m| m.to().file() != File::File5));
        assert!(pawn_drops.iter().all(|m| m.to().rank() != Rank::Rank1));
        // 5筋以外の8筋×2〜9段
        assert_eq!(pawn_drops.len(), 8 * 8);

        assert!(!moves.contains(Move::new_drop(PieceType::Lance, sq(3, 1))));
        assert!(moves.contains(Move::new_drop(PieceType::Lance, sq(3, 2))));
        assert!(!moves.contains(Move::new_drop(PieceType::Knight, sq(3, 2))));
        assert!(moves.contains(Move::new_drop(PieceType::Knight, sq(3, 3))));
    }

    #[test]
    fn test_drop_pawn_mate_excluded() {
        // 1一玉・2一香・1二への歩打ちを2三金が支える: 打ち歩詰め
        let pos = Position::from_sfen("7lk/9/7G1/9/9/9/9/9/4K4 b P 1").unwrap();
        let mate = Move::new_drop(PieceType::Pawn, sq(1, 2));
        assert!(is_drop_pawn_mate(&pos, Color::Black, sq(1, 2)));
        assert!(!pos.is_legal(mate));
        assert!(pos.is_legal(Move::new_drop(PieceType::Pawn, sq(1, 3))));
    }

    #[test]
    fn test_drop_pawn_check_not_mate() {
        // 支えがなければ玉で取れる
        let pos = Position::from_sfen("7lk/9/9/9/9/9/9/9/4K4 b P 1").unwrap();
        assert!(!is_drop_pawn_mate(&pos, Color::Black, sq(1, 2)));
        assert!(pos.is_legal(Move::new_drop(PieceType::Pawn, sq(1, 2))));

        // 逃げ道（2二）があれば詰みではない
        let pos = Position::from_sfen("8k/9/7G1/9/9/9/9/9/4K4 b P 1").unwrap();
        assert!(!is_drop_pawn_mate(&pos, Color::Black, sq(1, 2)));
    }

    #[test]
    fn test_drop_pawn_mate_pinned_defender() {
        // 2二金は1二の歩を取れるが、3三の角にピンされている
        let pos = Position::from_sfen("7nk/7g1/6B1G/9/9/9/9/9/4K4 b P 1").unwrap();
        assert!(pos.pinned(Color::White).contains(sq(2, 2)));
        assert!(is_drop_pawn_mate(&pos, Color::Black, sq(1, 2)));
        assert!(!pos.is_legal(Move::new_drop(PieceType::Pawn, sq(1, 2))));
    }

    #[test]
    fn test_is_mated() {
        // 頭金
        let pos = Position::from_sfen("4k4/4G4/4P4/9/9/9/9/9/4K4 w - 2").unwrap();
        assert!(pos.in_check());
        assert!(pos.is_mated());
        assert!(!Position::startpos().is_mated());
    }

    #[test]
    fn test_special_moves_are_not_legal() {
        let pos = Position::startpos();
        assert!(!pos.is_legal(Move::RESIGN));
        assert!(!pos.is_legal(Move::WIN));
        assert!(!pos.is_legal(Move::NONE));
    }
}
