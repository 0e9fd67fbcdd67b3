//! 局面の JSON 表現

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::types::{Color, File, Hand, Piece, PieceType, Rank, Square};

use super::{Board, Position};

/// 駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceJson {
    /// "sente" | "gote"
    pub owner: String,
    /// "K" | "R" | "B" | "G" | "S" | "N" | "L" | "P"
    #[serde(rename = "type")]
    pub piece_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub promoted: bool,
}

/// 盤面の1升
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellJson {
    /// USI 形式の升（"7g" など）
    pub square: String,
    pub piece: Option<PieceJson>,
}

/// 手駒（持っていない駒種は省略）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HandJson {
    #[serde(rename = "R", default, skip_serializing_if = "is_zero")]
    pub rook: u32,
    #[serde(rename = "B", default, skip_serializing_if = "is_zero")]
    pub bishop: u32,
    #[serde(rename = "G", default, skip_serializing_if = "is_zero")]
    pub gold: u32,
    #[serde(rename = "S", default, skip_serializing_if = "is_zero")]
    pub silver: u32,
    #[serde(rename = "N", default, skip_serializing_if = "is_zero")]
    pub knight: u32,
    #[serde(rename = "L", default, skip_serializing_if = "is_zero")]
    pub lance: u32,
    #[serde(rename = "P", default, skip_serializing_if = "is_zero")]
    pub pawn: u32,
}

/// 両者の手駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HandsJson {
    pub sente: HandJson,
    pub gote: HandJson,
}

/// 局面全体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardStateJson {
    /// 段ごとの行（1段目から）。各行は9筋から1筋の順
    pub cells: Vec<Vec<CellJson>>,
    pub hands: HandsJson,
    /// "sente" | "gote"
    pub turn: String,
    pub ply: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

const fn owner_str(color: Color) -> &'static str {
    match color {
        Color::Black => "sente",
        Color::White => "gote",
    }
}

fn owner_from_str(s: &str) -> Result<Color, FormatError> {
    match s {
        "sente" => Ok(Color::Black),
        "gote" => Ok(Color::White),
        _ => Err(FormatError::SideToMove(s.to_string())),
    }
}

fn piece_to_json(pc: Piece) -> Option<PieceJson> {
    if pc.is_none() {
        return None;
    }
    Some(PieceJson {
        owner: owner_str(pc.color()).to_string(),
        piece_type: pc.piece_type().to_sfen_char().to_string(),
        promoted: pc.is_promoted(),
    })
}

fn piece_from_json(json: &PieceJson) -> Result<Piece, FormatError> {
    let color = owner_from_str(&json.owner)?;
    let mut chars = json.piece_type.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(FormatError::InvalidPiece('?'));
    };
    let pt = PieceType::from_sfen_char(c).ok_or(FormatError::InvalidPiece(c))?;
    let pt = if json.promoted { pt.promote().ok_or(FormatError::InvalidPromotion(c))? } else { pt };
    Ok(Piece::new(color, pt))
}

fn hand_to_json(hand: Hand) -> HandJson {
    HandJson {
        rook: hand.count(PieceType::Rook),
        bishop: hand.count(PieceType::Bishop),
        gold: hand.count(PieceType::Gold),
        silver: hand.count(PieceType::Silver),
        knight: hand.count(PieceType::Knight),
        lance: hand.count(PieceType::Lance),
        pawn: hand.count(PieceType::Pawn),
    }
}

fn hand_from_json(json: &HandJson) -> Result<Hand, FormatError> {
    let counts = [
        (PieceType::Rook, json.rook, 2),
        (PieceType::Bishop, json.bishop, 2),
        (PieceType::Gold, json.gold, 4),
        (PieceType::Silver, json.silver, 4),
        (PieceType::Knight, json.knight, 4),
        (PieceType::Lance, json.lance, 4),
        (PieceType::Pawn, json.pawn, 18),
    ];
    counts.into_iter().try_fold(Hand::EMPTY, |hand, (pt, n, max)| {
        if n > max {
            Err(FormatError::Hand(format!("{n}{}", pt.to_sfen_char())))
        } else {
            Ok(hand.set(pt, n))
        }
    })
}

impl Position {
    /// JSON 表現に変換
    pub fn to_json(&self) -> BoardStateJson {
        let cells = Rank::ALL
            .into_iter()
            .map(|rank| {
                File::ALL_DESC
                    .into_iter()
                    .map(|file| {
                        let sq = Square::new(file, rank);
                        CellJson {
                            square: sq.to_usi(),
                            piece: piece_to_json(self.piece_on(sq)),
                        }
                    })
                    .collect()
            })
            .collect();

        BoardStateJson {
            cells,
            hands: HandsJson {
                sente: hand_to_json(self.hand(Color::Black)),
                gote: hand_to_json(self.hand(Color::White)),
            },
            turn: owner_str(self.side_to_move()).to_string(),
            ply: self.ply(),
        }
    }

    /// JSON 表現から局面を作る
    pub fn from_json(json: &BoardStateJson) -> Result<Position, FormatError> {
        if json.cells.len() != Rank::NUM {
            return Err(FormatError::RankCount(json.cells.len()));
        }

        let mut board = Board::empty();
        for (i, row) in json.cells.iter().enumerate() {
            if row.len() != File::NUM {
                return Err(FormatError::RankLength {
                    rank: i + 1,
                    files: row.len(),
                });
            }
            for cell in row {
                let sq = Square::from_usi(&cell.square)
                    .ok_or_else(|| FormatError::Square(cell.square.clone()))?;
                if let Some(piece) = &cell.piece {
                    board.set_piece(sq, piece_from_json(piece)?);
                }
            }
        }

        board.set_side_to_move(owner_from_str(&json.turn)?);
        board.set_hand(Color::Black, hand_from_json(&json.hands.sente)?);
        board.set_hand(Color::White, hand_from_json(&json.hands.gote)?);

        Position::from_board(board, json.ply)
    }
}
