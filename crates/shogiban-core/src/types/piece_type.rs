//! 駒種（PieceType）
//!
//! 4bit 表現:
//! - bit 0-2: 基本の種類（歩・香・桂・銀・金・角・飛・玉の8種）
//! - bit 3:   成りフラグ
//!
//! 金と玉に成りフラグが立つことはない。

/// 駒種（先後の区別なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceType {
    // 生駒
    Pawn = 0,
    Lance = 1,
    Knight = 2,
    Silver = 3,
    Gold = 4,
    Bishop = 5,
    Rook = 6,
    King = 7,
    // 成駒（基本種 | 8）
    ProPawn = 8,
    ProLance = 9,
    ProKnight = 10,
    ProSilver = 11,
    Horse = 13,
    Dragon = 14,
}

impl PieceType {
    /// 駒種別配列のサイズ（4bit 全体）
    pub const NUM: usize = 16;

    /// 成りフラグ
    pub const PROMOTED: u8 = 8;

    /// 基本種を取り出すマスク
    pub const KIND_MASK: u8 = 7;

    /// 手駒になる駒種の数
    pub const HAND_NUM: usize = 7;

    /// 手駒になる駒種（内部値の順）
    pub const HAND_PIECES: [PieceType; 7] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Gold,
        PieceType::Bishop,
        PieceType::Rook,
    ];

    /// 盤上に存在しうる全駒種
    pub const ALL: [PieceType; 14] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Gold,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::King,
        PieceType::ProPawn,
        PieceType::ProLance,
        PieceType::ProKnight,
        PieceType::ProSilver,
        PieceType::Horse,
        PieceType::Dragon,
    ];

    #[inline]
    pub const fn from_u8(n: u8) -> Option<PieceType> {
        match n {
            0..=11 | 13 | 14 => {
                // SAFETY: 有効な判別値のみ
                Some(unsafe { std::mem::transmute::<u8, PieceType>(n) })
            }
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// 成れる駒種か
    #[inline]
    pub const fn can_promote(self) -> bool {
        (self as u8) < PieceType::Gold as u8 || matches!(self, PieceType::Bishop | PieceType::Rook)
    }

    /// 成駒か
    #[inline]
    pub const fn is_promoted(self) -> bool {
        (self as u8) & Self::PROMOTED != 0
    }

    /// 成った駒種（成れなければ None）
    #[inline]
    pub const fn promote(self) -> Option<PieceType> {
        if self.can_promote() {
            PieceType::from_u8(self as u8 | Self::PROMOTED)
        } else {
            None
        }
    }

    /// 生駒に戻す
    #[inline]
    pub const fn unpromote(self) -> PieceType {
        // SAFETY: 下位3bitは常に有効な生駒
        unsafe { std::mem::transmute::<u8, PieceType>(self as u8 & Self::KIND_MASK) }
    }

    /// 手駒になれる生駒か（玉以外の生駒）
    #[inline]
    pub const fn is_hand_piece(self) -> bool {
        (self as u8) < PieceType::King as u8
    }

    /// 大駒（角・飛・馬・龍）か
    #[inline]
    pub const fn is_major(self) -> bool {
        matches!(self.unpromote(), PieceType::Bishop | PieceType::Rook)
    }

    /// SFENの駒文字（先手側の大文字、成りは含まない）
    #[inline]
    pub const fn to_sfen_char(self) -> char {
        match self.unpromote() {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Gold => 'G',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            _ => 'K',
        }
    }

    /// SFENの駒文字から生駒を得る（大文字小文字は区別しない）
    #[inline]
    pub const fn from_sfen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'L' => Some(PieceType::Lance),
            'N' => Some(PieceType::Knight),
            'S' => Some(PieceType::Silver),
            'G' => Some(PieceType::Gold),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}
