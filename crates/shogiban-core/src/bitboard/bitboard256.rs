//! Bitboard256（角の4方向を同時に計算するための256bit値）
//!
//! `simd_avx2` feature と `target_feature = "avx2"` が揃ったときだけ AVX2 命令を使う。
//! スカラー版は常にコンパイルされ、テストで AVX2 版と結果が一致することを確認する。

use super::Bitboard;

/// Bitboard256（256bit、32バイトアライン）
///
/// 下位128bitと上位128bitにそれぞれ1つの Bitboard を持つ。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, align(32))]
pub struct Bitboard256 {
    p: [u64; 4],
}

#[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
mod avx2 {
    use std::arch::x86_64::*;

    #[inline(always)]
    fn load(p: [u64; 4]) -> __m256i {
        // SAFETY: [u64; 4] と __m256i はどちらも32バイト
        unsafe { std::mem::transmute::<[u64; 4], __m256i>(p) }
    }

    #[inline(always)]
    fn store(m: __m256i) -> [u64; 4] {
        // SAFETY: 同上
        unsafe { std::mem::transmute::<__m256i, [u64; 4]>(m) }
    }

    #[inline]
    pub(super) fn broadcast(p0: u64, p1: u64) -> [u64; 4] {
        // SAFETY: target_feature = "avx2" のときだけコンパイルされる
        unsafe {
            let m = _mm_set_epi64x(p1 as i64, p0 as i64);
            store(_mm256_broadcastsi128_si256(m))
        }
    }

    #[inline]
    pub(super) fn merge(p: [u64; 4]) -> [u64; 2] {
        // SAFETY: 同上
        unsafe {
            let m = load(p);
            let r = _mm_or_si128(_mm256_castsi256_si128(m), _mm256_extracti128_si256::<1>(m));
            std::mem::transmute::<__m128i, [u64; 2]>(r)
        }
    }

    #[inline]
    pub(super) fn byte_reverse(p: [u64; 4]) -> [u64; 4] {
        // SAFETY: 同上
        unsafe {
            // 各128bitレーン内でバイト順を反転
            let shuffle = _mm256_set_epi8(
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0, 1, 2, 3, 4, 5, 6, 7, 8,
                9, 10, 11, 12, 13, 14, 15,
            );
            store(_mm256_shuffle_epi8(load(p), shuffle))
        }
    }

    #[inline]
    pub(super) fn decrement_pair(hi: [u64; 4], lo: [u64; 4]) -> ([u64; 4], [u64; 4]) {
        // SAFETY: 同上
        unsafe {
            let hi_m = load(hi);
            let lo_m = load(lo);
            let borrow = _mm256_cmpeq_epi64(lo_m, _mm256_setzero_si256());
            (
                store(_mm256_add_epi64(hi_m, borrow)),
                store(_mm256_add_epi64(lo_m, _mm256_set1_epi64x(-1))),
            )
        }
    }

    #[inline]
    pub(super) fn unpack(hi: [u64; 4], lo: [u64; 4]) -> ([u64; 4], [u64; 4]) {
        // SAFETY: 同上
        unsafe {
            let hi_m = load(hi);
            let lo_m = load(lo);
            (
                store(_mm256_unpackhi_epi64(lo_m, hi_m)),
                store(_mm256_unpacklo_epi64(lo_m, hi_m)),
            )
        }
    }

    #[inline]
    pub(super) fn and(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
        // SAFETY: 同上
        unsafe { store(_mm256_and_si256(load(a), load(b))) }
    }

    #[inline]
    pub(super) fn or(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
        // SAFETY: 同上
        unsafe { store(_mm256_or_si256(load(a), load(b))) }
    }

    #[inline]
    pub(super) fn xor(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
        // SAFETY: 同上
        unsafe { store(_mm256_xor_si256(load(a), load(b))) }
    }
}

impl Bitboard256 {
    pub const ZERO: Bitboard256 = Bitboard256 { p: [0; 4] };

    #[inline]
    pub const fn from_u64_array(p: [u64; 4]) -> Bitboard256 {
        Bitboard256 { p }
    }

    #[inline]
    pub const fn to_u64_array(self) -> [u64; 4] {
        self.p
    }

    /// 同じ Bitboard を上下に複製する
    #[inline]
    pub fn new(bb: Bitboard) -> Bitboard256 {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            Bitboard256 {
                p: avx2::broadcast(bb.extract64::<0>(), bb.extract64::<1>()),
            }
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            Bitboard256::new_scalar(bb)
        }
    }

    /// `bb0` を下位、`bb1` を上位に置く
    #[inline]
    pub const fn from_bitboards(bb0: Bitboard, bb1: Bitboard) -> Bitboard256 {
        Bitboard256 {
            p: [
                bb0.extract64::<0>(),
                bb0.extract64::<1>(),
                bb1.extract64::<0>(),
                bb1.extract64::<1>(),
            ],
        }
    }

    /// (下位, 上位)
    #[inline]
    pub const fn to_bitboards(self) -> (Bitboard, Bitboard) {
        (
            Bitboard::from_u64_pair(self.p[0], self.p[1]),
            Bitboard::from_u64_pair(self.p[2], self.p[3]),
        )
    }

    /// 下位と上位の OR
    #[inline]
    pub fn merge(self) -> Bitboard {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            let [p0, p1] = avx2::merge(self.p);
            Bitboard::from_u64_pair(p0, p1)
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            self.merge_scalar()
        }
    }

    /// 下位・上位それぞれの128bit内でバイト順を反転
    #[inline]
    pub fn byte_reverse(self) -> Bitboard256 {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            Bitboard256 {
                p: avx2::byte_reverse(self.p),
            }
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            self.byte_reverse_scalar()
        }
    }

    /// 4つの (hi, lo) 組をそれぞれ128bit整数とみなして 1 を引く
    #[inline]
    pub fn decrement_pair(hi_in: Bitboard256, lo_in: Bitboard256) -> (Bitboard256, Bitboard256) {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            let (hi, lo) = avx2::decrement_pair(hi_in.p, lo_in.p);
            (Bitboard256 { p: hi }, Bitboard256 { p: lo })
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            Bitboard256::decrement_pair_scalar(hi_in, lo_in)
        }
    }

    /// 128bit ごとの unpackhi/unpacklo
    ///
    /// `hi_out = [lo.p1, hi.p1, lo.p3, hi.p3]`, `lo_out = [lo.p0, hi.p0, lo.p2, hi.p2]`
    #[inline]
    pub fn unpack(hi_in: Bitboard256, lo_in: Bitboard256) -> (Bitboard256, Bitboard256) {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            let (hi, lo) = avx2::unpack(hi_in.p, lo_in.p);
            (Bitboard256 { p: hi }, Bitboard256 { p: lo })
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            Bitboard256::unpack_scalar(hi_in, lo_in)
        }
    }
}

// スカラー版。AVX2 版が有効なときはテストからしか呼ばれない
#[cfg_attr(
    all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"),
    allow(dead_code)
)]
impl Bitboard256 {
    #[inline]
    fn new_scalar(bb: Bitboard) -> Bitboard256 {
        Bitboard256::from_bitboards(bb, bb)
    }

    #[inline]
    fn merge_scalar(self) -> Bitboard {
        Bitboard::from_u64_pair(self.p[0] | self.p[2], self.p[1] | self.p[3])
    }

    #[inline]
    fn byte_reverse_scalar(self) -> Bitboard256 {
        let (lo, hi) = self.to_bitboards();
        Bitboard256::from_bitboards(lo.byte_reverse(), hi.byte_reverse())
    }

    #[inline]
    fn decrement_pair_scalar(hi_in: Bitboard256, lo_in: Bitboard256) -> (Bitboard256, Bitboard256) {
        let mut hi = hi_in.p;
        let mut lo = lo_in.p;
        for i in 0..4 {
            if lo[i] == 0 {
                hi[i] = hi[i].wrapping_sub(1);
            }
            lo[i] = lo[i].wrapping_sub(1);
        }
        (Bitboard256 { p: hi }, Bitboard256 { p: lo })
    }

    #[inline]
    fn unpack_scalar(hi_in: Bitboard256, lo_in: Bitboard256) -> (Bitboard256, Bitboard256) {
        (
            Bitboard256 {
                p: [lo_in.p[1], hi_in.p[1], lo_in.p[3], hi_in.p[3]],
            },
            Bitboard256 {
                p: [lo_in.p[0], hi_in.p[0], lo_in.p[2], hi_in.p[2]],
            },
        )
    }

    #[inline]
    fn zip_scalar(a: Bitboard256, b: Bitboard256, f: impl Fn(u64, u64) -> u64) -> Bitboard256 {
        Bitboard256 {
            p: [f(a.p[0], b.p[0]), f(a.p[1], b.p[1]), f(a.p[2], b.p[2]), f(a.p[3], b.p[3])],
        }
    }
}

impl std::ops::BitAnd for Bitboard256 {
    type Output = Bitboard256;

    #[inline]
    fn bitand(self, rhs: Bitboard256) -> Bitboard256 {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            Bitboard256 {
                p: avx2::and(self.p, rhs.p),
            }
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            Bitboard256::zip_scalar(self, rhs, |a, b| a & b)
        }
    }
}

impl std::ops::BitOr for Bitboard256 {
    type Output = Bitboard256;

    #[inline]
    fn bitor(self, rhs: Bitboard256) -> Bitboard256 {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            Bitboard256 {
                p: avx2::or(self.p, rhs.p),
            }
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            Bitboard256::zip_scalar(self, rhs, |a, b| a | b)
        }
    }
}

impl std::ops::BitXor for Bitboard256 {
    type Output = Bitboard256;

    #[inline]
    fn bitxor(self, rhs: Bitboard256) -> Bitboard256 {
        #[cfg(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2"))]
        {
            Bitboard256 {
                p: avx2::xor(self.p, rhs.p),
            }
        }
        #[cfg(not(all(feature = "simd_avx2", target_arch = "x86_64", target_feature = "avx2")))]
        {
            Bitboard256::zip_scalar(self, rhs, |a, b| a ^ b)
        }
    }
}
