//! 升目（Square）

use super::{Color, Direction, File, Rank};

/// 升目（0-80）
///
/// `index = file * 9 + rank`。1一=0, 1二=1, ..., 1九=8, 2一=9, ..., 9九=80
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 升目の数
    pub const NUM: usize = 81;

    /// 1一
    pub const SQ_11: Square = Square(0);
    /// 5五
    pub const SQ_55: Square = Square(40);
    /// 9九
    pub const SQ_99: Square = Square(80);

    #[inline]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square(file as u8 * 9 + rank as u8)
    }

    #[inline]
    pub const fn file(self) -> File {
        // SAFETY: self.0 / 9 は 0..=8
        unsafe { std::mem::transmute::<u8, File>(self.0 / 9) }
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        // SAFETY: self.0 % 9 は 0..=8
        unsafe { std::mem::transmute::<u8, Rank>(self.0 % 9) }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn from_u8(n: u8) -> Option<Square> {
        if n < 81 { Some(Square(n)) } else { None }
    }

    /// # Safety
    /// `n < 81` であること
    #[inline]
    pub const unsafe fn from_u8_unchecked(n: u8) -> Square {
        debug_assert!(n < 81);
        Square(n)
    }

    /// 筋・段の座標（盤外なら None）
    #[inline]
    pub const fn from_coords(file: i32, rank: i32) -> Option<Square> {
        if file >= 0 && file < 9 && rank >= 0 && rank < 9 {
            Some(Square((file * 9 + rank) as u8))
        } else {
            None
        }
    }

    /// 指定方向に1マス進んだ升（盤外なら None）
    #[inline]
    pub const fn offset(self, dir: Direction) -> Option<Square> {
        let (df, dr) = dir.delta();
        Square::from_coords(self.file() as i32 + df, self.rank() as i32 + dr)
    }

    /// 180度回転
    #[inline]
    pub const fn inverse(self) -> Square {
        Square(80 - self.0)
    }

    /// `color` から見て敵陣か
    #[inline]
    pub const fn is_enemy_camp(self, color: Color) -> bool {
        self.rank().is_enemy_camp(color)
    }

    /// USI形式（"7g" 等）
    pub fn to_usi(self) -> String {
        format!("{}{}", self.file().to_usi_char(), self.rank().to_usi_char())
    }

    /// USI形式から変換（ちょうど2文字であること）
    pub fn from_usi(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::from_usi_char(chars.next()?)?;
        let rank = Rank::from_usi_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    /// 全升（インデックス昇順）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..81).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file().to_usi_char(), self.rank().to_usi_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_layout() {
        assert_eq!(Square::new(File::File1, Rank::Rank1), Square::SQ_11);
        assert_eq!(Square::new(File::File5, Rank::Rank5), Square::SQ_55);
        assert_eq!(Square::new(File::File9, Rank::Rank9), Square::SQ_99);
        assert_eq!(Square::new(File::File2, Rank::Rank1).index(), 9);

        let sq = Square::new(File::File3, Rank::Rank7);
        assert_eq!(sq.file(), File::File3);
        assert_eq!(sq.rank(), Rank::Rank7);
    }

    #[test]
    fn test_square_offset() {
        let sq = Square::SQ_55;
        assert_eq!(sq.offset(Direction::U), Some(Square::new(File::File5, Rank::Rank4)));
        assert_eq!(sq.offset(Direction::L), Some(Square::new(File::File6, Rank::Rank5)));
        assert_eq!(sq.offset(Direction::RD), Some(Square::new(File::File4, Rank::Rank6)));
        assert_eq!(Square::SQ_11.offset(Direction::U), None);
        assert_eq!(Square::SQ_11.offset(Direction::R), None);
        assert_eq!(Square::SQ_99.offset(Direction::LD), None);
        for d in Direction::ALL {
            let to = sq.offset(d).unwrap();
            assert_eq!(to.index() as i32 - sq.index() as i32, d.square_delta());
        }
    }

    #[test]
    fn test_square_usi() {
        assert_eq!(Square::new(File::File7, Rank::Rank7).to_usi(), "7g");
        assert_eq!(Square::from_usi("1a"), Some(Square::SQ_11));
        assert_eq!(Square::from_usi("9i"), Some(Square::SQ_99));
        assert_eq!(Square::from_usi("9"), None);
        assert_eq!(Square::from_usi("0a"), None);
        assert_eq!(Square::from_usi("1a+"), None);
        assert_eq!(format!("{}", Square::SQ_55), "5e");
    }

    #[test]
    fn test_square_inverse() {
        assert_eq!(Square::SQ_11.inverse(), Square::SQ_99);
        assert_eq!(Square::SQ_55.inverse(), Square::SQ_55);
    }

    #[test]
    fn test_square_all() {
        let all: Vec<_> = Square::all().collect();
        assert_eq!(all.len(), 81);
        assert_eq!(all[80], Square::SQ_99);
    }
}
