//! 利きテーブルと Bitboard マスク
//!
//! 近接駒の利きは const 初期化、2升間の関係（方向・間・直線）は初回参照時に構築する。

use std::sync::OnceLock;

use crate::types::{Color, Direction, File, PieceType, Rank, Square};

use super::Bitboard;

/// 筋の Bitboard
pub static FILE_BB: [Bitboard; File::NUM] = init_file_bb();

/// 段の Bitboard
pub static RANK_BB: [Bitboard; Rank::NUM] = init_rank_bb();

/// 各升の Bitboard
pub static SQUARE_BB: [Bitboard; Square::NUM] = init_square_bb();

/// 歩の利き [Color][Square]
pub static PAWN_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] = init_step_effect(&[(0, -1)]);

/// 桂の利き [Color][Square]
pub static KNIGHT_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] =
    init_step_effect(&[(1, -2), (-1, -2)]);

/// 銀の利き [Color][Square]
pub static SILVER_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] =
    init_step_effect(&[(1, -1), (0, -1), (-1, -1), (1, 1), (-1, 1)]);

/// 金の利き [Color][Square]
pub static GOLD_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] =
    init_step_effect(&[(1, -1), (0, -1), (-1, -1), (1, 0), (-1, 0), (0, 1)]);

/// 玉の利き [Square]
pub static KING_EFFECT: [Bitboard; Square::NUM] = init_step_effect(&[
    (1, -1),
    (0, -1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
])[0];

/// 敵陣（先手なら1-3段目）[Color]
pub static ENEMY_CAMP_BB: [Bitboard; Color::NUM] = init_enemy_camp_bb();

// === const 初期化 ===

const fn init_file_bb() -> [Bitboard; File::NUM] {
    let mut result = [Bitboard::EMPTY; File::NUM];
    let mut sq = 0;
    while sq < 81 {
        result[sq / 9] = bb_or_const(result[sq / 9], square_bb_const(sq));
        sq += 1;
    }
    result
}

const fn init_rank_bb() -> [Bitboard; Rank::NUM] {
    let mut result = [Bitboard::EMPTY; Rank::NUM];
    let mut sq = 0;
    while sq < 81 {
        result[sq % 9] = bb_or_const(result[sq % 9], square_bb_const(sq));
        sq += 1;
    }
    result
}

const fn init_square_bb() -> [Bitboard; Square::NUM] {
    let mut result = [Bitboard::EMPTY; Square::NUM];
    let mut sq = 0;
    while sq < 81 {
        result[sq] = square_bb_const(sq);
        sq += 1;
    }
    result
}

/// 先手から見た (筋, 段) の増分で近接駒の利きを作る。後手は180度回転
const fn init_step_effect(offsets: &[(i32, i32)]) -> [[Bitboard; Square::NUM]; Color::NUM] {
    let mut result = [[Bitboard::EMPTY; Square::NUM]; Color::NUM];
    let mut sq = 0;
    while sq < 81 {
        let file = (sq / 9) as i32;
        let rank = (sq % 9) as i32;
        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            if let Some(to) = coords_to_index(file + df, rank + dr) {
                result[0][sq] = bb_or_const(result[0][sq], square_bb_const(to));
            }
            if let Some(to) = coords_to_index(file - df, rank - dr) {
                result[1][sq] = bb_or_const(result[1][sq], square_bb_const(to));
            }
            i += 1;
        }
        sq += 1;
    }
    result
}

const fn init_enemy_camp_bb() -> [Bitboard; Color::NUM] {
    let ranks = init_rank_bb();
    [
        bb_or_const(bb_or_const(ranks[0], ranks[1]), ranks[2]),
        bb_or_const(bb_or_const(ranks[6], ranks[7]), ranks[8]),
    ]
}

const fn coords_to_index(file: i32, rank: i32) -> Option<usize> {
    if file >= 0 && file < 9 && rank >= 0 && rank < 9 {
        Some((file * 9 + rank) as usize)
    } else {
        None
    }
}

const fn square_bb_const(sq: usize) -> Bitboard {
    if sq < 63 {
        Bitboard::new(1u64 << sq, 0)
    } else {
        Bitboard::new(0, 1u64 << (sq - 63))
    }
}

const fn bb_or_const(a: Bitboard, b: Bitboard) -> Bitboard {
    Bitboard::new(a.p0() | b.p0(), a.p1() | b.p1())
}

// === 2升間の関係 ===

const NO_DIRECTION: u8 = 0xFF;

struct LineTable {
    /// 空き盤での各方向のレイ（起点を含まない）[Direction][Square]
    ray: [[Bitboard; Square::NUM]; Direction::NUM],
    /// a から見た b の方向（同一直線上になければ NO_DIRECTION）[a * 81 + b]
    direction: Vec<u8>,
    /// a と b の間（両端を含まない）[a * 81 + b]
    between: Vec<Bitboard>,
    /// a と b を通る直線（盤端から盤端まで）[a * 81 + b]
    line: Vec<Bitboard>,
}

static LINE_TABLE: OnceLock<LineTable> = OnceLock::new();

fn line_table() -> &'static LineTable {
    LINE_TABLE.get_or_init(LineTable::new)
}

impl LineTable {
    fn new() -> Self {
        let mut ray = [[Bitboard::EMPTY; Square::NUM]; Direction::NUM];
        for dir in Direction::ALL {
            for sq in Square::all() {
                let mut bb = Bitboard::EMPTY;
                let mut cur = sq;
                while let Some(next) = cur.offset(dir) {
                    bb.set(next);
                    cur = next;
                }
                ray[dir.index()][sq.index()] = bb;
            }
        }

        let n = Square::NUM * Square::NUM;
        let mut direction = vec![NO_DIRECTION; n];
        let mut between = vec![Bitboard::EMPTY; n];
        let mut line = vec![Bitboard::EMPTY; n];

        for a in Square::all() {
            for dir in Direction::ALL {
                let opp = dir.opposite();
                let full = ray[dir.index()][a.index()]
                    | ray[opp.index()][a.index()]
                    | Bitboard::from_square(a);
                for b in ray[dir.index()][a.index()] {
                    let idx = a.index() * Square::NUM + b.index();
                    direction[idx] = dir as u8;
                    between[idx] = ray[dir.index()][a.index()] & ray[opp.index()][b.index()];
                    line[idx] = full;
                }
            }
        }

        log::trace!("line tables initialized");

        LineTable {
            ray,
            direction,
            between,
            line,
        }
    }
}

// === 参照関数 ===

#[inline]
pub fn file_bb(file: File) -> Bitboard {
    FILE_BB[file.index()]
}

#[inline]
pub fn rank_bb(rank: Rank) -> Bitboard {
    RANK_BB[rank.index()]
}

#[inline]
pub fn enemy_camp_bb(color: Color) -> Bitboard {
    ENEMY_CAMP_BB[color.index()]
}

#[inline]
pub fn pawn_effect(color: Color, sq: Square) -> Bitboard {
    PAWN_EFFECT[color.index()][sq.index()]
}

#[inline]
pub fn knight_effect(color: Color, sq: Square) -> Bitboard {
    KNIGHT_EFFECT[color.index()][sq.index()]
}

#[inline]
pub fn silver_effect(color: Color, sq: Square) -> Bitboard {
    SILVER_EFFECT[color.index()][sq.index()]
}

#[inline]
pub fn gold_effect(color: Color, sq: Square) -> Bitboard {
    GOLD_EFFECT[color.index()][sq.index()]
}

#[inline]
pub fn king_effect(sq: Square) -> Bitboard {
    KING_EFFECT[sq.index()]
}

/// 空き盤での `dir` 方向のレイ（`sq` を含まない）
#[inline]
pub fn ray_bb(dir: Direction, sq: Square) -> Bitboard {
    line_table().ray[dir.index()][sq.index()]
}

/// `from` から見た `to` の方向（縦横斜めの直線上にないか同じ升なら None）
#[inline]
pub fn direction_of(from: Square, to: Square) -> Option<Direction> {
    Direction::from_u8(line_table().direction[from.index() * Square::NUM + to.index()])
}

/// 2升の間（両端を含まない）。直線上にないときは空
#[inline]
pub fn between_bb(sq1: Square, sq2: Square) -> Bitboard {
    line_table().between[sq1.index() * Square::NUM + sq2.index()]
}

/// 2升を通る盤端から盤端までの直線。直線上にないときは空
#[inline]
pub fn line_bb(sq1: Square, sq2: Square) -> Bitboard {
    line_table().line[sq1.index() * Square::NUM + sq2.index()]
}

/// 3升が同一直線上にあるか
#[inline]
pub fn aligned(sq1: Square, sq2: Square, sq3: Square) -> bool {
    line_bb(sq1, sq2).contains(sq3)
}

/// 近接駒の利き（飛び駒は対象外で空を返す）
#[inline]
pub fn step_effect(pt: PieceType, color: Color, sq: Square) -> Bitboard {
    match pt {
        PieceType::Pawn => pawn_effect(color, sq),
        PieceType::Knight => knight_effect(color, sq),
        PieceType::Silver => silver_effect(color, sq),
        PieceType::Gold
        | PieceType::ProPawn
        | PieceType::ProLance
        | PieceType::ProKnight
        | PieceType::ProSilver => gold_effect(color, sq),
        PieceType::King => king_effect(sq),
        PieceType::Lance
        | PieceType::Bishop
        | PieceType::Rook
        | PieceType::Horse
        | PieceType::Dragon => Bitboard::EMPTY,
    }
}
