//! 指し手（Move）

use super::{PieceType, Square};
use crate::error::FormatError;

/// 指し手（16bit）
///
/// - bit 0-6:  移動先 (to)
/// - bit 7-13: 移動元 (from) / 駒打ちの場合は打つ駒種
/// - bit 14:   駒打ちフラグ
/// - bit 15:   成りフラグ
///
/// 盤上の駒の情報は持たない。同じ局面で生成された指し手同士は値で比較できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    /// 無効な指し手
    pub const NONE: Move = Move(0);
    /// 投了（from = to = 1二）
    pub const RESIGN: Move = Move(0x0081);
    /// 入玉宣言勝ち（from = to = 1三）
    pub const WIN: Move = Move(0x0102);

    const TO_MASK: u16 = 0x007F;
    const FROM_MASK: u16 = 0x3F80;
    const FROM_SHIFT: u32 = 7;
    const DROP_FLAG: u16 = 0x4000;
    const PROMOTE_FLAG: u16 = 0x8000;

    /// 盤上の駒を動かす指し手
    #[inline]
    pub const fn new_move(from: Square, to: Square, promote: bool) -> Move {
        let m = (to.raw() as u16) | ((from.raw() as u16) << Self::FROM_SHIFT);
        if promote { Move(m | Self::PROMOTE_FLAG) } else { Move(m) }
    }

    /// 駒打ち
    #[inline]
    pub const fn new_drop(piece_type: PieceType, to: Square) -> Move {
        debug_assert!(piece_type.is_hand_piece());
        Move((to.raw() as u16) | ((piece_type as u16) << Self::FROM_SHIFT) | Self::DROP_FLAG)
    }

    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: 生成時に 0..81 の値しか入れない
        unsafe { Square::from_u8_unchecked((self.0 & Self::TO_MASK) as u8) }
    }

    /// 移動元（駒打ちでないことが前提）
    #[inline]
    pub const fn from(self) -> Square {
        debug_assert!(!self.is_drop());
        // SAFETY: 生成時に 0..81 の値しか入れない
        unsafe { Square::from_u8_unchecked(((self.0 & Self::FROM_MASK) >> Self::FROM_SHIFT) as u8) }
    }

    /// 打つ駒種（駒打ちであることが前提）
    #[inline]
    pub const fn drop_piece_type(self) -> PieceType {
        debug_assert!(self.is_drop());
        // SAFETY: 駒打ちの from 欄には手駒の駒種（0..7）しか入れない
        unsafe {
            std::mem::transmute::<u8, PieceType>(
                ((self.0 & Self::FROM_MASK) >> Self::FROM_SHIFT) as u8,
            )
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        self.0 & Self::DROP_FLAG != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 & Self::PROMOTE_FLAG != 0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// 投了・宣言勝ちの特殊手か
    #[inline]
    pub const fn is_special(self) -> bool {
        self.0 == Self::RESIGN.0 || self.0 == Self::WIN.0
    }

    /// 盤上で指せる通常の指し手か（NONE・特殊手以外）
    #[inline]
    pub const fn is_ok(self) -> bool {
        !self.is_none() && !self.is_special()
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// USI形式（"7g7f", "8h2b+", "P*5e", "resign", "win"）
    pub fn to_usi(self) -> String {
        if self == Move::RESIGN {
            return "resign".to_string();
        }
        if self == Move::WIN {
            return "win".to_string();
        }
        if self.is_none() {
            return "none".to_string();
        }
        if self.is_drop() {
            format!("{}*{}", self.drop_piece_type().to_sfen_char(), self.to())
        } else if self.is_promotion() {
            format!("{}{}+", self.from(), self.to())
        } else {
            format!("{}{}", self.from(), self.to())
        }
    }

    /// USI形式から変換
    ///
    /// 局面を見ないので、移動元に駒があるかなどは確かめない。
    pub fn from_usi(s: &str) -> Result<Move, FormatError> {
        match s {
            "resign" => return Ok(Move::RESIGN),
            "win" => return Ok(Move::WIN),
            _ => {}
        }
        let invalid = || FormatError::Move(s.to_string());
        if !s.is_ascii() {
            return Err(invalid());
        }

        let bytes = s.as_bytes();
        if bytes.len() == 4 && bytes[1] == b'*' {
            let c = bytes[0] as char;
            if !c.is_ascii_uppercase() {
                return Err(invalid());
            }
            let pt = PieceType::from_sfen_char(c)
                .filter(|pt| pt.is_hand_piece())
                .ok_or_else(invalid)?;
            let to = Square::from_usi(&s[2..4]).ok_or_else(invalid)?;
            return Ok(Move::new_drop(pt, to));
        }

        let promote = match bytes.len() {
            4 => false,
            5 if bytes[4] == b'+' => true,
            _ => return Err(invalid()),
        };
        let from = Square::from_usi(&s[0..2]).ok_or_else(invalid)?;
        let to = Square::from_usi(&s[2..4]).ok_or_else(invalid)?;
        if from == to {
            return Err(invalid());
        }
        Ok(Move::new_move(from, to, promote))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_usi())
    }
}
