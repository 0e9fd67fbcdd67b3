//! 飛び駒（香・角・飛）の利き
//!
//! Qugiy のアルゴリズムで計算する。利きが升目インデックスの増える向きに伸びる場合は
//! 「遮る駒のうち最小の bit から 1 を引く」と遮る駒までの升が立つことを使う。
//! 減る向きはバイト順を反転して増える向きに直してから同じ計算をする。
//! 1つのレイ上の升は必ず別々のバイトに入るので、バイト反転でレイ上の順序が逆転する。

use std::sync::OnceLock;

use crate::types::{Color, Direction, PieceType, Square};

use super::utils::msb64;
use super::{Bitboard, Bitboard256, king_effect, ray_bb, step_effect};

struct SliderTable {
    /// 香の利き（空き盤）[Color][Square]
    lance_step_effect: [[Bitboard; Square::NUM]; Color::NUM],
    /// 横利き用マスク。[0] は下位64bit同士、[1] は上位64bit同士を並べたもの
    qugiy_rook_mask: [[Bitboard; 2]; Square::NUM],
    /// 斜め4方向のマスク。並びは rook と同じ
    qugiy_bishop_mask: [[Bitboard256; 2]; Square::NUM],
    /// 方向ごとのレイ。減る向きのものはバイト反転済み [Direction][Square]
    qugiy_step_effect: [[Bitboard; Square::NUM]; Direction::NUM],
}

static SLIDER_TABLE: OnceLock<SliderTable> = OnceLock::new();

#[inline]
fn slider_table() -> &'static SliderTable {
    SLIDER_TABLE.get_or_init(SliderTable::new)
}

impl SliderTable {
    fn new() -> Self {
        let mut lance_step_effect = [[Bitboard::EMPTY; Square::NUM]; Color::NUM];
        let mut qugiy_rook_mask = [[Bitboard::EMPTY; 2]; Square::NUM];
        let mut qugiy_bishop_mask = [[Bitboard256::ZERO; 2]; Square::NUM];
        let mut qugiy_step_effect = [[Bitboard::EMPTY; Square::NUM]; Direction::NUM];

        for sq in Square::all() {
            let i = sq.index();
            lance_step_effect[Color::Black.index()][i] = ray_bb(Direction::U, sq);
            lance_step_effect[Color::White.index()][i] = ray_bb(Direction::D, sq);

            for dir in Direction::ALL {
                let ray = ray_bb(dir, sq);
                qugiy_step_effect[dir.index()][i] =
                    if dir.is_decreasing() { ray.byte_reverse() } else { ray };
            }

            // 左（筋が増える向き）はそのまま、右はバイト反転して並べる
            let left = ray_bb(Direction::L, sq);
            let right_rev = ray_bb(Direction::R, sq).byte_reverse();
            let (hi, lo) = Bitboard::unpack(right_rev, left);
            qugiy_rook_mask[i] = [lo, hi];

            // 左上・左下はそのまま、右上・右下はバイト反転
            let se = [
                ray_bb(Direction::LU, sq),
                ray_bb(Direction::LD, sq),
                ray_bb(Direction::RU, sq).byte_reverse(),
                ray_bb(Direction::RD, sq).byte_reverse(),
            ];
            qugiy_bishop_mask[i] = [
                Bitboard256::from_bitboards(
                    Bitboard::from_u64_pair(se[0].extract64::<0>(), se[2].extract64::<0>()),
                    Bitboard::from_u64_pair(se[1].extract64::<0>(), se[3].extract64::<0>()),
                ),
                Bitboard256::from_bitboards(
                    Bitboard::from_u64_pair(se[0].extract64::<1>(), se[2].extract64::<1>()),
                    Bitboard::from_u64_pair(se[1].extract64::<1>(), se[3].extract64::<1>()),
                ),
            ];
        }

        log::trace!("slider tables initialized");

        SliderTable {
            lance_step_effect,
            qugiy_rook_mask,
            qugiy_bishop_mask,
            qugiy_step_effect,
        }
    }
}

/// 空き盤での香の利き
#[inline]
pub fn lance_step_effect(color: Color, sq: Square) -> Bitboard {
    slider_table().lance_step_effect[color.index()][sq.index()]
}

/// 空き盤での角の利き
#[inline]
pub fn bishop_step_effect(sq: Square) -> Bitboard {
    ray_bb(Direction::RU, sq)
        | ray_bb(Direction::RD, sq)
        | ray_bb(Direction::LU, sq)
        | ray_bb(Direction::LD, sq)
}

/// 空き盤での飛車の利き
#[inline]
pub fn rook_step_effect(sq: Square) -> Bitboard {
    ray_bb(Direction::U, sq)
        | ray_bb(Direction::D, sq)
        | ray_bb(Direction::R, sq)
        | ray_bb(Direction::L, sq)
}

/// 香の利き
///
/// 1つの筋は必ず同じ64bit内に収まるので、その64bitだけで計算する。
#[inline]
pub fn lance_effect(color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    let se = lance_step_effect(color, sq);
    let part = Bitboard::part(sq);
    let (mask, occ) = if part == 0 {
        (se.extract64::<0>(), occupied.extract64::<0>())
    } else {
        (se.extract64::<1>(), occupied.extract64::<1>())
    };

    let bits = match color {
        // 下向き（インデックスが増える）: 最小の遮りまで
        Color::White => {
            let em = occ & mask;
            (em ^ em.wrapping_sub(1)) & mask
        }
        // 上向き（インデックスが減る）: 最大の遮りから上
        Color::Black => (!0u64 << msb64((occ & mask) | 1)) & mask,
    };

    if part == 0 {
        Bitboard::from_u64_pair(bits, 0)
    } else {
        Bitboard::from_u64_pair(0, bits)
    }
}

/// 飛車の縦利き
#[inline]
pub fn rook_file_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    lance_effect(Color::Black, sq, occupied) | lance_effect(Color::White, sq, occupied)
}

/// 飛車の横利き
#[inline]
pub fn rook_rank_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    let [mask_lo, mask_hi] = slider_table().qugiy_rook_mask[sq.index()];

    let rocc = occupied.byte_reverse();
    let (hi, lo) = Bitboard::unpack(rocc, occupied);
    let hi = hi & mask_hi;
    let lo = lo & mask_lo;

    let (t1, t0) = Bitboard::decrement_pair(hi, lo);
    let t1 = (t1 ^ hi) & mask_hi;
    let t0 = (t0 ^ lo) & mask_lo;

    let (hi, lo) = Bitboard::unpack(t1, t0);
    hi.byte_reverse() | lo
}

/// 飛車の利き
#[inline]
pub fn rook_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_rank_effect(sq, occupied) | rook_file_effect(sq, occupied)
}

/// 角の利き（4方向を Bitboard256 でまとめて計算）
#[inline]
pub fn bishop_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    let [mask_lo, mask_hi] = slider_table().qugiy_bishop_mask[sq.index()];

    let occ2 = Bitboard256::new(occupied);
    let rocc2 = Bitboard256::new(occupied.byte_reverse());
    let (hi, lo) = Bitboard256::unpack(rocc2, occ2);
    let hi = hi & mask_hi;
    let lo = lo & mask_lo;

    let (t1, t0) = Bitboard256::decrement_pair(hi, lo);
    let t1 = (t1 ^ hi) & mask_hi;
    let t0 = (t0 ^ lo) & mask_lo;

    let (hi, lo) = Bitboard256::unpack(t1, t0);
    (hi.byte_reverse() | lo).merge()
}

#[inline]
pub fn horse_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_effect(sq, occupied) | king_effect(sq)
}

#[inline]
pub fn dragon_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_effect(sq, occupied) | king_effect(sq)
}

/// 1方向だけの利き（最初に当たる駒の升を含む）
#[inline]
pub fn ray_effect(dir: Direction, sq: Square, occupied: Bitboard) -> Bitboard {
    match dir {
        Direction::U => lance_effect(Color::Black, sq, occupied),
        Direction::D => lance_effect(Color::White, sq, occupied),
        _ => {
            let mask = slider_table().qugiy_step_effect[dir.index()][sq.index()];
            let reverse = dir.is_decreasing();
            let occ = (if reverse { occupied.byte_reverse() } else { occupied }) & mask;
            let bb = (occ ^ occ.decrement()) & mask;
            if reverse { bb.byte_reverse() } else { bb }
        }
    }
}

/// 駒種・手番・升・占有から利きを求める
#[inline]
pub fn effect(pt: PieceType, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match pt {
        PieceType::Lance => lance_effect(color, sq, occupied),
        PieceType::Bishop => bishop_effect(sq, occupied),
        PieceType::Rook => rook_effect(sq, occupied),
        PieceType::Horse => horse_effect(sq, occupied),
        PieceType::Dragon => dragon_effect(sq, occupied),
        _ => step_effect(pt, color, sq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// 1升ずつ辿る素朴な実装
    fn walk(dir: Direction, sq: Square, occupied: Bitboard) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        let mut cur = sq;
        while let Some(next) = cur.offset(dir) {
            bb.set(next);
            if occupied.contains(next) {
                break;
            }
            cur = next;
        }
        bb
    }

    fn walk_all(dirs: &[Direction], sq: Square, occupied: Bitboard) -> Bitboard {
        dirs.iter().fold(Bitboard::EMPTY, |acc, &d| acc | walk(d, sq, occupied))
    }

    const ROOK_DIRS: [Direction; 4] = [Direction::U, Direction::D, Direction::R, Direction::L];
    const BISHOP_DIRS: [Direction; 4] =
        [Direction::RU, Direction::RD, Direction::LU, Direction::LD];

    /// 疎な盤面（各升が約1/4の確率で埋まる）
    fn sparse_bitboard(rng: &mut Xoshiro256PlusPlus) -> Bitboard {
        let a = rng.random::<u64>() & rng.random::<u64>();
        let b = rng.random::<u64>() & rng.random::<u64>();
        Bitboard::new(a, b) & Bitboard::ALL
    }

    fn boards() -> Vec<Bitboard> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5EED_1234);
        let mut v = vec![Bitboard::EMPTY, Bitboard::ALL];
        v.extend((0..64).map(|_| sparse_bitboard(&mut rng)));
        v.extend((0..16).map(|_| Bitboard::new(rng.random(), rng.random()) & Bitboard::ALL));
        v
    }

    #[test]
    fn test_ray_effect_matches_walk() {
        for occ in boards() {
            for sq in Square::all() {
                for dir in Direction::ALL {
                    assert_eq!(ray_effect(dir, sq, occ), walk(dir, sq, occ), "{dir:?} {sq}");
                }
            }
        }
    }

    #[test]
    fn test_lance_effect_matches_walk() {
        for occ in boards() {
            for sq in Square::all() {
                assert_eq!(lance_effect(Color::Black, sq, occ), walk(Direction::U, sq, occ));
                assert_eq!(lance_effect(Color::White, sq, occ), walk(Direction::D, sq, occ));
            }
        }
    }

    #[test]
    fn test_rook_effect_matches_walk() {
        for occ in boards() {
            for sq in Square::all() {
                assert_eq!(rook_effect(sq, occ), walk_all(&ROOK_DIRS, sq, occ), "{sq}");
            }
        }
    }

    #[test]
    fn test_bishop_effect_matches_walk() {
        for occ in boards() {
            for sq in Square::all() {
                assert_eq!(bishop_effect(sq, occ), walk_all(&BISHOP_DIRS, sq, occ), "{sq}");
            }
        }
    }

    #[test]
    fn test_empty_board_effects() {
        for sq in Square::all() {
            assert_eq!(rook_effect(sq, Bitboard::EMPTY), rook_step_effect(sq));
            assert_eq!(rook_effect(sq, Bitboard::EMPTY).count(), 16);
            assert_eq!(bishop_effect(sq, Bitboard::EMPTY), bishop_step_effect(sq));
        }
        assert_eq!(bishop_effect(Square::SQ_55, Bitboard::EMPTY).count(), 16);
        assert_eq!(bishop_effect(Square::SQ_11, Bitboard::EMPTY).count(), 8);
    }

    #[test]
    fn test_horse_and_dragon_include_king_moves() {
        let occ = Bitboard::ALL;
        for sq in Square::all() {
            assert_eq!(horse_effect(sq, occ), king_effect(sq));
            assert_eq!(dragon_effect(sq, occ), king_effect(sq));
        }
    }
}
