//! 8方向（Direction）
//!
//! 「右」は1筋側（筋の番号が減る向き）、「上」は1段目側（段の番号が減る向き）。
//! 先手から見た盤面の向きに合わせている。

/// 8方向。`opposite()` が `7 - self` になるように並べてある
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// 右上
    RU = 0,
    /// 右
    R = 1,
    /// 右下
    RD = 2,
    /// 上
    U = 3,
    /// 下
    D = 4,
    /// 左上
    LU = 5,
    /// 左
    L = 6,
    /// 左下
    LD = 7,
}

impl Direction {
    pub const NUM: usize = 8;

    pub const ALL: [Direction; 8] = [
        Direction::RU,
        Direction::R,
        Direction::RD,
        Direction::U,
        Direction::D,
        Direction::LU,
        Direction::L,
        Direction::LD,
    ];

    #[inline]
    pub const fn from_u8(n: u8) -> Option<Direction> {
        if n < 8 {
            // SAFETY: n < 8
            Some(unsafe { std::mem::transmute::<u8, Direction>(n) })
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 逆方向
    #[inline]
    pub const fn opposite(self) -> Direction {
        // SAFETY: 7 - n は 0..=7
        unsafe { std::mem::transmute::<u8, Direction>(7 - self as u8) }
    }

    /// (筋の増分, 段の増分)
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::RU => (-1, -1),
            Direction::R => (-1, 0),
            Direction::RD => (-1, 1),
            Direction::U => (0, -1),
            Direction::D => (0, 1),
            Direction::LU => (1, -1),
            Direction::L => (1, 0),
            Direction::LD => (1, 1),
        }
    }

    /// 升目インデックスの増分（`file * 9 + rank`）
    #[inline]
    pub const fn square_delta(self) -> i32 {
        let (df, dr) = self.delta();
        df * 9 + dr
    }

    /// 縦横（飛車筋）か
    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        matches!(self, Direction::R | Direction::U | Direction::D | Direction::L)
    }

    /// 升目インデックスが減る向きか
    ///
    /// 引き算による利き計算は下位ビット側にしか伸ばせないので、
    /// この向きはバイト反転してから計算する。
    #[inline]
    pub const fn is_decreasing(self) -> bool {
        self.square_delta() < 0
    }
}
