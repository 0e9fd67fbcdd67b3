//! Bitboard（81升の集合）

use crate::types::Square;

/// Bitboard（128bit、16バイトアライン）
///
/// 縦型配置:
/// - p[0]: 1-7筋 (bit 0-62、bit 63 は常に 0)
/// - p[1]: 8-9筋 (bit 0-17、bit 18 以上は常に 0)
///
/// 盤外の bit が 0 であることは全演算で保たれる。`!` は盤外を再マスクする。
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C, align(16))]
pub struct Bitboard {
    p: [u64; 2],
}

impl Bitboard {
    /// 空集合
    pub const EMPTY: Bitboard = Bitboard { p: [0, 0] };

    /// 全81升
    pub const ALL: Bitboard = Bitboard {
        p: [0x7FFF_FFFF_FFFF_FFFF, 0x0003_FFFF],
    };

    #[inline]
    pub const fn new(p0: u64, p1: u64) -> Bitboard {
        Bitboard { p: [p0, p1] }
    }

    /// 2つの u64 から生成（盤外 bit のマスクはしない。利き計算の中間値用）
    #[inline]
    pub const fn from_u64_pair(p0: u64, p1: u64) -> Bitboard {
        Bitboard { p: [p0, p1] }
    }

    /// 単一升
    #[inline]
    pub const fn from_square(sq: Square) -> Bitboard {
        let idx = sq.index();
        if idx < 63 {
            Bitboard { p: [1u64 << idx, 0] }
        } else {
            Bitboard { p: [0, 1u64 << (idx - 63)] }
        }
    }

    /// 升が p[0] と p[1] のどちらに入るか
    #[inline]
    pub const fn part(sq: Square) -> usize {
        if sq.index() < 63 { 0 } else { 1 }
    }

    #[inline]
    pub const fn extract64<const N: usize>(self) -> u64 {
        self.p[N]
    }

    #[inline]
    pub const fn p0(self) -> u64 {
        self.p[0]
    }

    #[inline]
    pub const fn p1(self) -> u64 {
        self.p[1]
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        (self.p[0] | self.p[1]) == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        !self.is_empty()
    }

    /// 要素数
    #[inline]
    pub const fn count(self) -> u32 {
        self.p[0].count_ones() + self.p[1].count_ones()
    }

    /// 2升以上を含むか
    #[inline]
    pub const fn more_than_one(self) -> bool {
        if self.p[0] & self.p[0].wrapping_sub(1) != 0 {
            return true;
        }
        if self.p[1] & self.p[1].wrapping_sub(1) != 0 {
            return true;
        }
        self.p[0] != 0 && self.p[1] != 0
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        let idx = sq.index();
        if idx < 63 {
            (self.p[0] >> idx) & 1 != 0
        } else {
            (self.p[1] >> (idx - 63)) & 1 != 0
        }
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        *self |= Bitboard::from_square(sq);
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        *self = self.and_not(Bitboard::from_square(sq));
    }

    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        *self ^= Bitboard::from_square(sq);
    }

    /// `self & !rhs`（差集合）
    #[inline]
    pub const fn and_not(self, rhs: Bitboard) -> Bitboard {
        Bitboard {
            p: [self.p[0] & !rhs.p[0], self.p[1] & !rhs.p[1]],
        }
    }

    /// 最小インデックスの升（空なら None）
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.p[0] != 0 {
            Square::from_u8(self.p[0].trailing_zeros() as u8)
        } else if self.p[1] != 0 {
            Square::from_u8(63 + self.p[1].trailing_zeros() as u8)
        } else {
            None
        }
    }

    /// 最小インデックスの升を取り出して消す（空でないことが前提）
    #[inline]
    pub fn pop(&mut self) -> Square {
        debug_assert!(self.is_not_empty(), "pop() called on empty Bitboard");
        if self.p[0] != 0 {
            let idx = self.p[0].trailing_zeros();
            self.p[0] &= self.p[0] - 1;
            // SAFETY: p[0] の有効 bit は 0-62
            unsafe { Square::from_u8_unchecked(idx as u8) }
        } else {
            let idx = self.p[1].trailing_zeros();
            self.p[1] &= self.p[1].wrapping_sub(1);
            // SAFETY: p[1] の有効 bit は 0-17 なので 63 + idx < 81
            unsafe { Square::from_u8_unchecked(63 + idx as u8) }
        }
    }

    /// 要素を昇順に列挙する。値をコピーするので何度でも最初からやり直せる
    #[inline]
    pub const fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }

    // ========== 利き計算用のレーン操作 ==========

    /// 128bit 全体のバイト順を反転（p[0] と p[1] を入れ替え、それぞれ bswap）
    ///
    /// 升目の並びが逆順になるので、インデックスが減る向きの利きを
    /// 引き算で求められるようになる。
    #[inline]
    pub const fn byte_reverse(self) -> Bitboard {
        Bitboard {
            p: [self.p[1].swap_bytes(), self.p[0].swap_bytes()],
        }
    }

    /// SSE2 の unpackhi/unpacklo 相当
    ///
    /// `hi_out = [lo_in.p[1], hi_in.p[1]]`, `lo_out = [lo_in.p[0], hi_in.p[0]]`
    #[inline]
    pub const fn unpack(hi_in: Bitboard, lo_in: Bitboard) -> (Bitboard, Bitboard) {
        (
            Bitboard { p: [lo_in.p[1], hi_in.p[1]] },
            Bitboard { p: [lo_in.p[0], hi_in.p[0]] },
        )
    }

    /// (hi, lo) を各レーンごとの 128bit 整数とみなして 1 を引く
    ///
    /// `lo_out = lo - 1`, `hi_out = hi - (lo == 0 ? 1 : 0)`
    #[inline]
    pub const fn decrement_pair(hi_in: Bitboard, lo_in: Bitboard) -> (Bitboard, Bitboard) {
        let b0 = if lo_in.p[0] == 0 { 1 } else { 0 };
        let b1 = if lo_in.p[1] == 0 { 1 } else { 0 };
        (
            Bitboard {
                p: [hi_in.p[0].wrapping_sub(b0), hi_in.p[1].wrapping_sub(b1)],
            },
            Bitboard {
                p: [lo_in.p[0].wrapping_sub(1), lo_in.p[1].wrapping_sub(1)],
            },
        )
    }

    /// 128bit 整数（p[1]:p[0]）として 1 を引く。p[0] が 0 のとき p[1] へ桁借りする
    #[inline]
    pub const fn decrement(self) -> Bitboard {
        let borrow = if self.p[0] == 0 { 1 } else { 0 };
        Bitboard {
            p: [self.p[0].wrapping_sub(1), self.p[1].wrapping_sub(borrow)],
        }
    }

    /// レーンごとの引き算（レーン間の桁借りなし）
    #[inline]
    pub const fn sub_lanes(self, rhs: Bitboard) -> Bitboard {
        Bitboard {
            p: [self.p[0].wrapping_sub(rhs.p[0]), self.p[1].wrapping_sub(rhs.p[1])],
        }
    }

    /// レーンごとの右シフト
    #[inline]
    pub const fn shr_lanes(self, n: u32) -> Bitboard {
        Bitboard {
            p: [self.p[0] >> n, self.p[1] >> n],
        }
    }

    /// 歩のない筋の全升（二歩にならない筋）
    ///
    /// 各筋の9bitを1つの欄とみなし、欄ごとに「非ゼロなら最上位 bit を立てる」を
    /// 加算1回で求める。欄の外へ桁が漏れないので、1筋に歩が複数あっても正しい。
    #[inline]
    pub const fn pawn_drop_mask(pawns: Bitboard) -> Bitboard {
        // 各筋の9段目（欄の最上位 bit）
        const RANK9: Bitboard = Bitboard::new(0x4020_1008_0402_0100, 0x0002_0100);
        // 各筋の1-8段目
        const LOW8: Bitboard = Bitboard::new(0x3FDF_EFF7_FBFD_FEFF, 0x0001_FEFF);

        let low = Bitboard::new(pawns.p[0] & LOW8.p[0], pawns.p[1] & LOW8.p[1]);
        let carry = Bitboard::new(
            low.p[0].wrapping_add(LOW8.p[0]) | pawns.p[0],
            low.p[1].wrapping_add(LOW8.p[1]) | pawns.p[1],
        );
        // 歩のない筋の9段目
        let empty = Bitboard::new(RANK9.p[0] & !carry.p[0], RANK9.p[1] & !carry.p[1]);
        let low_bits = empty.sub_lanes(empty.shr_lanes(8));
        Bitboard::new(empty.p[0] ^ low_bits.p[0], empty.p[1] ^ low_bits.p[1])
    }
}

impl std::ops::BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard {
            p: [self.p[0] & rhs.p[0], self.p[1] & rhs.p[1]],
        }
    }
}

impl std::ops::BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.p[0] &= rhs.p[0];
        self.p[1] &= rhs.p[1];
    }
}

impl std::ops::BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard {
            p: [self.p[0] | rhs.p[0], self.p[1] | rhs.p[1]],
        }
    }
}

impl std::ops::BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.p[0] |= rhs.p[0];
        self.p[1] |= rhs.p[1];
    }
}

impl std::ops::BitXor for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard {
            p: [self.p[0] ^ rhs.p[0], self.p[1] ^ rhs.p[1]],
        }
    }
}

impl std::ops::BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.p[0] ^= rhs.p[0];
        self.p[1] ^= rhs.p[1];
    }
}

impl std::ops::Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard {
            p: [!self.p[0] & Bitboard::ALL.p[0], !self.p[1] & Bitboard::ALL.p[1]],
        }
    }
}

impl std::fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bitboard {{")?;
        // 1段目から9段目、9筋から1筋の順に表示
        for rank in 0..9 {
            write!(f, "  ")?;
            for file in (0..9).rev() {
                let sq = Square::from_coords(file, rank);
                let on = sq.is_some_and(|sq| self.contains(sq));
                write!(f, "{}", if on { "●" } else { "・" })?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::EMPTY;
        for sq in iter {
            bb.set(sq);
        }
        bb
    }
}

/// Bitboard の升を昇順に返すイテレータ
#[derive(Clone)]
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0.is_empty() { None } else { Some(self.0.pop()) }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl std::iter::FusedIterator for BitboardIter {}
