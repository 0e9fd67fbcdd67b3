//! ビット演算の補助関数

/// 最上位ビットの位置（`x == 0` のときは 0）
#[inline(always)]
pub fn msb64(x: u64) -> u32 {
    if x == 0 { 0 } else { 63 - x.leading_zeros() }
}
