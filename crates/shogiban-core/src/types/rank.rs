//! 段（Rank）

use super::Color;

/// 段（1段〜9段）。内部値は 0-8 で、1段目が後手陣の最奥
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Rank1 = 0,
    Rank2 = 1,
    Rank3 = 2,
    Rank4 = 3,
    Rank5 = 4,
    Rank6 = 5,
    Rank7 = 6,
    Rank8 = 7,
    Rank9 = 8,
}

impl Rank {
    /// 段の数
    pub const NUM: usize = 9;

    /// 1段から9段の順
    pub const ALL: [Rank; 9] = [
        Rank::Rank1,
        Rank::Rank2,
        Rank::Rank3,
        Rank::Rank4,
        Rank::Rank5,
        Rank::Rank6,
        Rank::Rank7,
        Rank::Rank8,
        Rank::Rank9,
    ];

    /// 9段から1段の順
    pub const ALL_DESC: [Rank; 9] = [
        Rank::Rank9,
        Rank::Rank8,
        Rank::Rank7,
        Rank::Rank6,
        Rank::Rank5,
        Rank::Rank4,
        Rank::Rank3,
        Rank::Rank2,
        Rank::Rank1,
    ];

    /// `color` から見た敵陣（3段）に含まれるか
    #[inline]
    pub const fn is_enemy_camp(self, color: Color) -> bool {
        match color {
            Color::Black => (self as u8) <= (Rank::Rank3 as u8),
            Color::White => (self as u8) >= (Rank::Rank7 as u8),
        }
    }

    /// 手番側から見た段（後手なら上下反転）
    #[inline]
    pub const fn relative(self, color: Color) -> Rank {
        match color {
            Color::Black => self,
            // SAFETY: 8 - n は 0..=8
            Color::White => unsafe { std::mem::transmute::<u8, Rank>(8 - self as u8) },
        }
    }

    #[inline]
    pub const fn from_u8(n: u8) -> Option<Rank> {
        if n < 9 {
            // SAFETY: n < 9
            Some(unsafe { std::mem::transmute::<u8, Rank>(n) })
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// USI形式の文字（'a'-'i'）
    #[inline]
    pub const fn to_usi_char(self) -> char {
        (b'a' + self as u8) as char
    }

    #[inline]
    pub const fn from_usi_char(c: char) -> Option<Rank> {
        if !c.is_ascii() {
            return None;
        }
        Rank::from_u8((c as u8).wrapping_sub(b'a'))
    }
}
