//! 手番（Color）

/// 手番（先手/後手）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 先手・後手の順
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// 相手番
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// 配列添字
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// SFENの手番文字（'b' / 'w'）
    #[inline]
    pub const fn to_sfen_char(self) -> char {
        match self {
            Color::Black => 'b',
            Color::White => 'w',
        }
    }

    /// SFENの手番文字から変換
    #[inline]
    pub fn from_sfen_str(s: &str) -> Option<Color> {
        match s {
            "b" => Some(Color::Black),
            "w" => Some(Color::White),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}
