//! 手駒（Hand）

use super::PieceType;

/// 手駒（64bit packed）
///
/// 手駒になる7種それぞれに 8bit を割り当てる。`PieceType` の内部値 n の枚数は
/// bit `8n .. 8n+8` に入る（歩 = byte 0, …, 飛 = byte 6, byte 7 は常に 0）。
///
/// 各 byte の最上位 bit は使わない（最大でも歩18枚）。比較・合計はこれを
/// 桁借り検出に使う SWAR 演算で行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Hand(u64);

impl Hand {
    /// 空の手駒
    pub const EMPTY: Hand = Hand(0);

    /// 各駒種の byte の最上位 bit
    const BORROW_MASK: u64 = 0x0080_8080_8080_8080;

    /// 歩以外の駒種の byte
    const EXCEPT_PAWN_MASK: u64 = 0x00FF_FFFF_FFFF_FF00;

    /// 各 byte の 1
    const ONES: u64 = 0x0101_0101_0101_0101;

    #[inline]
    const fn shift(pt: PieceType) -> u32 {
        debug_assert!(pt.is_hand_piece());
        (pt as u32) * 8
    }

    /// 指定駒種の枚数
    #[inline]
    pub const fn count(self, pt: PieceType) -> u32 {
        ((self.0 >> Self::shift(pt)) & 0xFF) as u32
    }

    /// 指定駒種を持っているか
    #[inline]
    pub const fn has(self, pt: PieceType) -> bool {
        self.count(pt) > 0
    }

    /// 1枚追加
    #[inline]
    pub const fn add(self, pt: PieceType) -> Hand {
        Hand(self.0 + (1 << Self::shift(pt)))
    }

    /// 1枚減らす
    ///
    /// 枚数の確認はしない。0枚から減らすと上位の駒種まで桁借りが伝播し、
    /// 値全体が壊れる。
    #[inline]
    pub const fn sub(self, pt: PieceType) -> Hand {
        debug_assert!(self.has(pt));
        Hand(self.0.wrapping_sub(1 << Self::shift(pt)))
    }

    /// 指定枚数をセット
    #[inline]
    pub const fn set(self, pt: PieceType, count: u32) -> Hand {
        let shift = Self::shift(pt);
        Hand((self.0 & !(0xFF << shift)) | (((count as u64) & 0x7F) << shift))
    }

    /// 全駒種の合計枚数
    #[inline]
    pub const fn total(self) -> u32 {
        (self.0.wrapping_mul(Self::ONES) >> 56) as u32
    }

    /// 全ての駒種で `other` 以上の枚数を持つか
    #[inline]
    pub const fn is_superior_or_equal(self, other: Hand) -> bool {
        ((self.0 | Self::BORROW_MASK) - other.0) & Self::BORROW_MASK == Self::BORROW_MASK
    }

    /// 歩以外の駒を持っているか
    #[inline]
    pub const fn exists_except_pawn(self) -> bool {
        self.0 & Self::EXCEPT_PAWN_MASK != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Hand {
        Hand(raw)
    }

    /// 1枚以上ある駒種と枚数
    pub fn iter(self) -> impl Iterator<Item = (PieceType, u32)> {
        PieceType::HAND_PIECES
            .into_iter()
            .map(move |pt| (pt, self.count(pt)))
            .filter(|&(_, n)| n > 0)
    }
}
