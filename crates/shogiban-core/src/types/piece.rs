//! 駒（Piece）
//!
//! 5bit 表現:
//! - bit 0-2: 基本の種類（`PieceType` の下位3bit）
//! - bit 3:   成りフラグ
//! - bit 4:   `Color`（0 = 先手, 1 = 後手）
//!
//! 空き升は `Piece::NONE`（bit 5）で表し、`piece_type()` / `color()` は
//! `is_some()` のときだけ意味を持つ。

use super::{Color, PieceType};

/// 駒（先後の区別あり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// 駒なし
    pub const NONE: Piece = Piece(0x20);

    const COLOR_SHIFT: u8 = 4;

    pub const B_PAWN: Piece = Piece::new(Color::Black, PieceType::Pawn);
    pub const B_LANCE: Piece = Piece::new(Color::Black, PieceType::Lance);
    pub const B_KNIGHT: Piece = Piece::new(Color::Black, PieceType::Knight);
    pub const B_SILVER: Piece = Piece::new(Color::Black, PieceType::Silver);
    pub const B_GOLD: Piece = Piece::new(Color::Black, PieceType::Gold);
    pub const B_BISHOP: Piece = Piece::new(Color::Black, PieceType::Bishop);
    pub const B_ROOK: Piece = Piece::new(Color::Black, PieceType::Rook);
    pub const B_KING: Piece = Piece::new(Color::Black, PieceType::King);
    pub const W_PAWN: Piece = Piece::new(Color::White, PieceType::Pawn);
    pub const W_LANCE: Piece = Piece::new(Color::White, PieceType::Lance);
    pub const W_KNIGHT: Piece = Piece::new(Color::White, PieceType::Knight);
    pub const W_SILVER: Piece = Piece::new(Color::White, PieceType::Silver);
    pub const W_GOLD: Piece = Piece::new(Color::White, PieceType::Gold);
    pub const W_BISHOP: Piece = Piece::new(Color::White, PieceType::Bishop);
    pub const W_ROOK: Piece = Piece::new(Color::White, PieceType::Rook);
    pub const W_KING: Piece = Piece::new(Color::White, PieceType::King);

    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece(piece_type as u8 | ((color as u8) << Self::COLOR_SHIFT))
    }

    /// 駒種（`is_some()` が前提）
    #[inline]
    pub const fn piece_type(self) -> PieceType {
        debug_assert!(self.is_some());
        // SAFETY: NONE 以外は new() で作られ、下位4bitは有効な PieceType
        unsafe { std::mem::transmute::<u8, PieceType>(self.0 & 0x0F) }
    }

    /// 手番（`is_some()` が前提）
    #[inline]
    pub const fn color(self) -> Color {
        // SAFETY: (self.0 >> 4) & 1 は 0 か 1
        unsafe { std::mem::transmute::<u8, Color>((self.0 >> Self::COLOR_SHIFT) & 1) }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// 成駒か
    #[inline]
    pub const fn is_promoted(self) -> bool {
        self.is_some() && self.0 & PieceType::PROMOTED != 0
    }

    /// 成った駒（成れなければ None）
    #[inline]
    pub const fn promote(self) -> Option<Piece> {
        match self.piece_type().promote() {
            Some(pt) => Some(Piece::new(self.color(), pt)),
            None => None,
        }
    }

    /// 生駒に戻す
    #[inline]
    pub const fn unpromote(self) -> Piece {
        Piece::new(self.color(), self.piece_type().unpromote())
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// SFEN表記（"P", "+r" 等）
    pub fn to_sfen(self) -> String {
        if self.is_none() {
            return String::new();
        }
        let pt = self.piece_type();
        let c = match self.color() {
            Color::Black => pt.to_sfen_char(),
            Color::White => pt.to_sfen_char().to_ascii_lowercase(),
        };
        if pt.is_promoted() { format!("+{c}") } else { c.to_string() }
    }

    /// SFENの駒文字（'+' を除く1文字）から生駒を得る。大文字が先手
    #[inline]
    pub fn from_sfen_char(c: char) -> Option<Piece> {
        let pt = PieceType::from_sfen_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
        Some(Piece::new(color, pt))
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_bits() {
        let p = Piece::new(Color::White, PieceType::Dragon);
        assert_eq!(p.raw(), 0b1_1110);
        assert_eq!(p.color(), Color::White);
        assert_eq!(p.piece_type(), PieceType::Dragon);
        assert!(p.is_promoted());
        assert_eq!(p.unpromote(), Piece::W_ROOK);
    }

    #[test]
    fn test_piece_none() {
        assert!(Piece::NONE.is_none());
        assert!(!Piece::NONE.is_promoted());
        assert!(Piece::B_PAWN.is_some());
        assert_eq!(Piece::default(), Piece::NONE);
        assert_eq!(Piece::NONE.to_sfen(), "");
    }

    #[test]
    fn test_piece_promote() {
        assert_eq!(Piece::B_PAWN.promote(), Some(Piece::new(Color::Black, PieceType::ProPawn)));
        assert_eq!(Piece::W_GOLD.promote(), None);
        assert_eq!(Piece::B_KING.promote(), None);
    }

    #[test]
    fn test_piece_sfen() {
        assert_eq!(Piece::B_KNIGHT.to_sfen(), "N");
        assert_eq!(Piece::W_LANCE.to_sfen(), "l");
        assert_eq!(Piece::new(Color::White, PieceType::Horse).to_sfen(), "+b");
        assert_eq!(Piece::from_sfen_char('s'), Some(Piece::W_SILVER));
        assert_eq!(Piece::from_sfen_char('K'), Some(Piece::B_KING));
        assert_eq!(Piece::from_sfen_char('x'), None);
    }
}
