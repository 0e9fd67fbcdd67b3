//! 局面（Position）

use crate::bitboard::{
    Bitboard, between_bb, bishop_effect, bishop_step_effect, gold_effect, knight_effect,
    lance_effect, lance_step_effect, pawn_effect, rook_effect, rook_step_effect, silver_effect,
};
use crate::error::{FormatError, IllegalMoveError, InvalidOperationError};
use crate::types::{Color, Hand, Move, Piece, PieceType, Square};

use super::Board;

/// 動きが共通する駒のまとまり
///
/// 成駒は生駒の動きを引き継ぐので、利きを逆引きするときは駒種ではなくこの単位で見る。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Family {
    /// 銀の利きを持つ駒（銀・玉・馬・龍）
    Silver = 0,
    /// 金の利きを持つ駒（金・と・成香・成桂・成銀・玉・馬・龍）
    Gold = 1,
    /// 斜めに飛ぶ駒（角・馬）
    Bishop = 2,
    /// 縦横に飛ぶ駒（飛・龍）
    Rook = 3,
}

impl Family {
    const NUM: usize = 4;

    const ALL: [Family; 4] = [Family::Silver, Family::Gold, Family::Bishop, Family::Rook];

    const fn members(self) -> &'static [PieceType] {
        match self {
            Family::Silver => &[
                PieceType::Silver,
                PieceType::King,
                PieceType::Horse,
                PieceType::Dragon,
            ],
            Family::Gold => &[
                PieceType::Gold,
                PieceType::ProPawn,
                PieceType::ProLance,
                PieceType::ProKnight,
                PieceType::ProSilver,
                PieceType::King,
                PieceType::Horse,
                PieceType::Dragon,
            ],
            Family::Bishop => &[PieceType::Bishop, PieceType::Horse],
            Family::Rook => &[PieceType::Rook, PieceType::Dragon],
        }
    }
}

/// 履歴の1要素（指し手と、その手で取った駒）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    /// 取った駒（取らなければ `Piece::NONE`）
    pub captured: Piece,
}

/// 将棋の局面
///
/// `Board` に加えて次の派生情報を持ち、公開メソッドから戻った時点では常に
/// `Board` と一致している。
///
/// - 手番別・駒種別の Bitboard
/// - 動きのまとまりごとの Bitboard（`Family`）
/// - 王手している駒、両者のピンされている駒
///
/// 履歴はスタックで、`undo_move` は `do_move` / `do_move_pseudo_legal` と逆順に
/// 1回ずつだけ呼べる。複数スレッドからの同時変更は想定しない。
#[derive(Clone, Debug)]
pub struct Position {
    pub(super) board: Board,
    /// 手番別 [Color]
    by_color: [Bitboard; Color::NUM],
    /// 駒種別 [PieceType]
    by_type: [Bitboard; PieceType::NUM],
    /// 動きのまとまり別 [Color][Family]
    family: [[Bitboard; Family::NUM]; Color::NUM],
    /// 玉の位置 [Color]
    king_square: [Square; Color::NUM],
    /// 手番側の玉に王手している駒
    checkers: Bitboard,
    /// 各手番の玉に対してピンされている、その手番の駒 [Color]
    pinned: [Bitboard; Color::NUM],
    history: Vec<HistoryEntry>,
    pub(super) ply: u32,
}

impl Position {
    /// `Board` から局面を作り、派生情報をすべて計算する
    ///
    /// 両者の玉がちょうど1枚ずつあることは呼び出し側で確認しておく。
    pub(super) fn from_board_unchecked(board: Board, ply: u32) -> Position {
        let mut pos = Position {
            board: Board::empty(),
            by_color: [Bitboard::EMPTY; Color::NUM],
            by_type: [Bitboard::EMPTY; PieceType::NUM],
            family: [[Bitboard::EMPTY; Family::NUM]; Color::NUM],
            king_square: [Square::SQ_11; Color::NUM],
            checkers: Bitboard::EMPTY,
            pinned: [Bitboard::EMPTY; Color::NUM],
            history: Vec::with_capacity(256),
            ply,
        };
        pos.board.set_side_to_move(board.side_to_move());
        for color in Color::ALL {
            pos.board.set_hand(color, board.hand(color));
        }
        for (sq, pc) in board.pieces() {
            pos.put_piece(pc, sq);
        }
        for color in Color::ALL {
            pos.update_family(color);
        }
        pos.update_checks_and_pins();
        pos
    }

    // ========== 盤面アクセス ==========

    /// 局面のスナップショット
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board.piece_on(sq)
    }

    #[inline]
    pub fn hand(&self, color: Color) -> Hand {
        self.board.hand(color)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// 手数（SFEN の4番目の値。1手ごとに1増える）
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline]
    pub fn pieces_c(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    pub fn pieces_pt(&self, pt: PieceType) -> Bitboard {
        self.by_type[pt.index()]
    }

    #[inline]
    pub fn pieces(&self, color: Color, pt: PieceType) -> Bitboard {
        self.by_color[color.index()] & self.by_type[pt.index()]
    }

    #[inline]
    pub(crate) fn family(&self, color: Color, family: Family) -> Bitboard {
        self.family[color.index()][family as usize]
    }

    /// 手番側の玉に王手している駒
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers.is_not_empty()
    }

    /// `color` の玉に対してピンされている `color` の駒
    #[inline]
    pub fn pinned(&self, color: Color) -> Bitboard {
        self.pinned[color.index()]
    }

    /// 指し手の履歴（古い順）
    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// 直前の指し手
    pub fn last_move(&self) -> Result<Move, InvalidOperationError> {
        self.history
            .last()
            .map(|e| e.mv)
            .ok_or(InvalidOperationError::EmptyHistory)
    }

    /// 直前の指し手で取った駒（取っていなければ `Piece::NONE`）
    pub fn last_captured(&self) -> Result<Piece, InvalidOperationError> {
        self.history
            .last()
            .map(|e| e.captured)
            .ok_or(InvalidOperationError::EmptyHistory)
    }

    /// USI 形式の指し手を読み、移動元の駒・手駒が手番側のものか確かめる
    ///
    /// 合法かどうかまでは確かめない（`do_move` が確かめる）。
    pub fn parse_move(&self, text: &str) -> Result<Move, FormatError> {
        let mv = Move::from_usi(text)?;
        if mv.is_special() {
            return Ok(mv);
        }
        let us = self.side_to_move();
        let consistent = if mv.is_drop() {
            self.hand(us).has(mv.drop_piece_type())
        } else {
            let pc = self.piece_on(mv.from());
            pc.is_some() && pc.color() == us
        };
        if consistent {
            Ok(mv)
        } else {
            Err(FormatError::Move(text.to_string()))
        }
    }

    // ========== 利き ==========

    /// `sq` に利いている `color` の駒（占有指定）
    ///
    /// 各駒の利きを `sq` から逆向きに引いて求める。
    pub fn attackers_to(&self, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        let them = color.opponent();
        (pawn_effect(them, sq) & self.pieces(color, PieceType::Pawn))
            | (knight_effect(them, sq) & self.pieces(color, PieceType::Knight))
            | (silver_effect(them, sq) & self.family(color, Family::Silver))
            | (gold_effect(them, sq) & self.family(color, Family::Gold))
            | (lance_effect(them, sq, occupied) & self.pieces(color, PieceType::Lance))
            | (bishop_effect(sq, occupied) & self.family(color, Family::Bishop))
            | (rook_effect(sq, occupied) & self.family(color, Family::Rook))
    }

    /// `sq` に `color` の駒が利いているか（占有指定）
    #[inline]
    pub fn is_attacked(&self, color: Color, sq: Square, occupied: Bitboard) -> bool {
        self.attackers_to(color, sq, occupied).is_not_empty()
    }

    /// `color` の玉に対してピンされている `color` の駒（占有指定）
    ///
    /// 玉から空き盤で見通せる相手の飛び駒について、間にある駒がちょうど1枚で、
    /// それが `color` の駒ならピンされている。
    pub(crate) fn pinned_with(&self, color: Color, occupied: Bitboard) -> Bitboard {
        let them = color.opponent();
        let ksq = self.king_square(color);
        let snipers = (lance_step_effect(color, ksq) & self.pieces(them, PieceType::Lance))
            | (bishop_step_effect(ksq) & self.family(them, Family::Bishop))
            | (rook_step_effect(ksq) & self.family(them, Family::Rook));

        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = between_bb(ksq, sniper) & occupied;
            if blockers.is_not_empty() && !blockers.more_than_one() {
                pinned |= blockers & self.pieces_c(color);
            }
        }
        pinned
    }

    // ========== 指し手の適用 ==========

    /// 合法手であることを確かめてから指す
    pub fn do_move(&mut self, mv: Move) -> Result<(), IllegalMoveError> {
        if !self.is_legal(mv) {
            log::debug!("rejected illegal move {} in {}", mv, self.to_sfen());
            return Err(IllegalMoveError { mv });
        }
        self.do_move_pseudo_legal(mv);
        Ok(())
    }

    /// 指し手を確かめずに指す
    ///
    /// 盤上の駒を動かす手なら移動元に手番側の駒があり、移動先に手番側の駒がないこと、
    /// 駒打ちならその駒を持っていて移動先が空いていることを呼び出し側が保証する。
    /// 満たさない手を渡すと局面が壊れる（検出はしない）。
    pub fn do_move_pseudo_legal(&mut self, mv: Move) {
        let us = self.side_to_move();
        let them = us.opponent();
        let to = mv.to();

        let captured = if mv.is_drop() {
            let pt = mv.drop_piece_type();
            let hand = self.board.hand_mut(us);
            *hand = hand.sub(pt);
            self.put_piece(Piece::new(us, pt), to);
            Piece::NONE
        } else {
            let from = mv.from();
            let pc = self.piece_on(from);
            let captured = self.piece_on(to);
            if captured.is_some() {
                self.remove_piece(to);
                let hand = self.board.hand_mut(us);
                *hand = hand.add(captured.piece_type().unpromote());
            }
            self.remove_piece(from);
            let moved = if mv.is_promotion() { pc.promote().unwrap_or(pc) } else { pc };
            self.put_piece(moved, to);
            captured
        };

        self.update_family(us);
        if captured.is_some() {
            self.update_family(them);
        }

        self.board.set_side_to_move(them);
        self.history.push(HistoryEntry { mv, captured });
        self.ply += 1;
        self.update_checks_and_pins();
    }

    /// 直前の指し手を戻す
    pub fn undo_move(&mut self) -> Result<(), InvalidOperationError> {
        let HistoryEntry { mv, captured } =
            self.history.pop().ok_or(InvalidOperationError::EmptyHistory)?;

        let us = self.side_to_move().opponent();
        self.board.set_side_to_move(us);
        let to = mv.to();

        if mv.is_drop() {
            self.remove_piece(to);
            let hand = self.board.hand_mut(us);
            *hand = hand.add(mv.drop_piece_type());
        } else {
            let moved = self.piece_on(to);
            let original = if mv.is_promotion() { moved.unpromote() } else { moved };
            self.remove_piece(to);
            self.put_piece(original, mv.from());
            if captured.is_some() {
                self.put_piece(captured, to);
                let hand = self.board.hand_mut(us);
                *hand = hand.sub(captured.piece_type().unpromote());
            }
        }

        self.update_family(us);
        if captured.is_some() {
            self.update_family(us.opponent());
        }

        self.ply = self.ply.saturating_sub(1);
        self.update_checks_and_pins();
        Ok(())
    }

    // ========== 内部操作 ==========

    fn put_piece(&mut self, pc: Piece, sq: Square) {
        debug_assert!(self.piece_on(sq).is_none());
        self.board.set_piece(sq, pc);
        self.by_type[pc.piece_type().index()].set(sq);
        self.by_color[pc.color().index()].set(sq);
        if pc.piece_type() == PieceType::King {
            self.king_square[pc.color().index()] = sq;
        }
    }

    fn remove_piece(&mut self, sq: Square) {
        let pc = self.piece_on(sq);
        debug_assert!(pc.is_some());
        self.board.set_piece(sq, Piece::NONE);
        self.by_type[pc.piece_type().index()].clear(sq);
        self.by_color[pc.color().index()].clear(sq);
    }

    /// 指定手番の `Family` を駒種別 Bitboard から作り直す
    fn update_family(&mut self, color: Color) {
        let ours = self.by_color[color.index()];
        for family in Family::ALL {
            let bb = family
                .members()
                .iter()
                .fold(Bitboard::EMPTY, |acc, &pt| acc | self.by_type[pt.index()]);
            self.family[color.index()][family as usize] = bb & ours;
        }
    }

    /// 王手とピンを作り直す
    fn update_checks_and_pins(&mut self) {
        let us = self.side_to_move();
        let occupied = self.occupied();
        self.checkers = self.attackers_to(us.opponent(), self.king_square(us), occupied);
        for color in Color::ALL {
            self.pinned[color.index()] = self.pinned_with(color, occupied);
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl PartialEq for Position {
    /// 盤面・手番・手駒・手数が等しければ等しい（履歴は比べない）
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.ply == other.ply
    }
}

impl Eq for Position {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(
            File::from_u8(file - 1).unwrap(),
            Rank::from_u8(rank - 1).unwrap(),
        )
    }

    #[test]
    fn test_startpos_caches() {
        let pos = Position::startpos();
        assert_eq!(pos.occupied().count(), 40);
        assert_eq!(pos.pieces_c(Color::Black).count(), 20);
        assert_eq!(pos.pieces(Color::White, PieceType::Pawn).count(), 9);
        assert_eq!(pos.king_square(Color::Black), sq(5, 9));
        assert_eq!(pos.king_square(Color::White), sq(5, 1));
        assert!(!pos.in_check());
        assert!(pos.pinned(Color::Black).is_empty());
        // 銀のまとまりは銀2枚と玉
        assert_eq!(pos.family(Color::Black, Family::Silver).count(), 3);
        // 金のまとまりは金2枚と玉
        assert_eq!(pos.family(Color::Black, Family::Gold).count(), 3);
    }

    #[test]
    fn test_attackers_to() {
        let pos = Position::startpos();
        let occ = pos.occupied();
        // 7六には先手の7七歩だけが利く
        let a = pos.attackers_to(Color::Black, sq(7, 6), occ);
        assert_eq!(a, Bitboard::from_square(sq(7, 7)));
        // 5八には金2枚と玉、3八・4八を素通しで2八の飛車が利く
        let a = pos.attackers_to(Color::Black, sq(5, 8), occ);
        assert_eq!(a.count(), 4);
        assert!(a.contains(sq(2, 8)));
        assert!(!pos.is_attacked(Color::White, sq(5, 5), occ));
    }

    #[test]
    fn test_do_and_undo_capture() {
        let mut pos = Position::from_sfen("4k4/9/9/9/4p4/9/9/4R4/4K4 b - 1").unwrap();
        let before = pos.board().clone();
        let mv = Move::new_move(sq(5, 8), sq(5, 5), false);
        pos.do_move(mv).unwrap();
        assert_eq!(pos.piece_on(sq(5, 5)), Piece::B_ROOK);
        assert_eq!(pos.hand(Color::Black).count(PieceType::Pawn), 1);
        assert_eq!(pos.last_captured(), Ok(Piece::W_PAWN));
        assert_eq!(pos.ply(), 2);
        assert!(pos.in_check());

        pos.undo_move().unwrap();
        assert_eq!(pos.board(), &before);
        assert_eq!(pos.ply(), 1);
        assert_eq!(pos.undo_move(), Err(InvalidOperationError::EmptyHistory));
        assert_eq!(pos.last_move(), Err(InvalidOperationError::EmptyHistory));
    }

    #[test]
    fn test_promotion_capture_returns_unpromoted_piece() {
        let mut pos = Position::from_sfen("4k4/9/4+r4/9/9/9/4B4/9/4K4 b - 1").unwrap();
        let mv = Move::new_move(sq(5, 7), sq(5, 3), true);
        // 角は縦に動けないので不正
        assert_eq!(pos.do_move(mv), Err(IllegalMoveError { mv }));

        let mut pos = Position::from_sfen("4k4/9/3+r5/9/9/B8/9/9/4K4 b - 1").unwrap();
        let mv = Move::new_move(sq(9, 6), sq(6, 3), true);
        pos.do_move(mv).unwrap();
        assert_eq!(pos.piece_on(sq(6, 3)), Piece::new(Color::Black, PieceType::Horse));
        assert_eq!(pos.hand(Color::Black).count(PieceType::Rook), 1);
        pos.undo_move().unwrap();
        assert_eq!(pos.piece_on(sq(6, 3)), Piece::new(Color::White, PieceType::Dragon));
        assert_eq!(pos.piece_on(sq(9, 6)), Piece::B_BISHOP);
        assert!(pos.hand(Color::Black).is_empty());
    }

    #[test]
    fn test_drop_and_undo() {
        let mut pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b G 1").unwrap();
        let mv = Move::new_drop(PieceType::Gold, sq(5, 2));
        pos.do_move(mv).unwrap();
        assert!(pos.in_check());
        assert_eq!(pos.checkers(), Bitboard::from_square(sq(5, 2)));
        assert!(pos.hand(Color::Black).is_empty());
        pos.undo_move().unwrap();
        assert_eq!(pos.hand(Color::Black).count(PieceType::Gold), 1);
        assert!(pos.piece_on(sq(5, 2)).is_none());
    }

    #[test]
    fn test_pinned_pieces() {
        // 5九玉・5七金・5一飛（後手）: 金がピンされている
        let pos = Position::from_sfen("4r4/9/9/9/9/9/4G4/9/4K3k b - 1").unwrap();
        assert_eq!(pos.pinned(Color::Black), Bitboard::from_square(sq(5, 7)));
        assert!(pos.pinned(Color::White).is_empty());

        // 間に2枚あればピンではない
        let pos = Position::from_sfen("4r4/9/9/9/4P4/9/4G4/9/4K3k b - 1").unwrap();
        assert!(pos.pinned(Color::Black).is_empty());
    }
}
