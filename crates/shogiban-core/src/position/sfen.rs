//! SFEN 形式の解析・出力

use crate::error::FormatError;
use crate::types::{Color, File, Hand, Piece, PieceType, Rank, Square};

use super::{Board, Position};

/// 平手初期局面の SFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// 手駒の出力順（飛角金銀桂香歩）
const HAND_ORDER: [PieceType; 7] = [
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Gold,
    PieceType::Silver,
    PieceType::Knight,
    PieceType::Lance,
    PieceType::Pawn,
];

/// 駒種ごとの総数（手駒の枚数の上限）
const fn max_count(pt: PieceType) -> u32 {
    match pt {
        PieceType::Pawn => 18,
        PieceType::Bishop | PieceType::Rook => 2,
        _ => 4,
    }
}

impl Board {
    /// SFEN から盤面と手数を読む（手数を省略すると 1）
    pub fn from_sfen(sfen: &str) -> Result<(Board, u32), FormatError> {
        let fields: Vec<&str> = sfen.split_whitespace().collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(FormatError::FieldCount(fields.len()));
        }

        let mut board = Board::empty();
        parse_placement(&mut board, fields[0])?;

        let side = Color::from_sfen_str(fields[1])
            .ok_or_else(|| FormatError::SideToMove(fields[1].to_string()))?;
        board.set_side_to_move(side);

        parse_hands(&mut board, fields[2])?;

        let ply = match fields.get(3) {
            Some(s) => s.parse::<u32>().map_err(|_| FormatError::Ply(s.to_string()))?,
            None => 1,
        };

        Ok((board, ply))
    }

    /// 盤面・手番・手駒を SFEN で出力し、手数を付ける
    pub fn to_sfen(&self, ply: u32) -> String {
        let mut out = String::with_capacity(96);

        for rank in Rank::ALL {
            if rank != Rank::Rank1 {
                out.push('/');
            }
            let mut empty = 0;
            for file in File::ALL_DESC {
                let pc = self.piece_on(Square::new(file, rank));
                if pc.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    out.push_str(&empty.to_string());
                    empty = 0;
                }
                out.push_str(&pc.to_sfen());
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }

        out.push(' ');
        out.push(self.side_to_move().to_sfen_char());
        out.push(' ');
        out.push_str(&hands_to_sfen(self));
        out.push(' ');
        out.push_str(&ply.to_string());
        out
    }
}

impl Position {
    /// 平手初期局面
    pub fn startpos() -> Position {
        // 定数文字列なので失敗しない
        match Position::from_sfen(SFEN_HIRATE) {
            Ok(pos) => pos,
            Err(e) => {
                debug_assert!(false, "SFEN_HIRATE must parse: {e}");
                Position::from_board_unchecked(Board::empty(), 1)
            }
        }
    }

    /// SFEN から局面を作る
    pub fn from_sfen(sfen: &str) -> Result<Position, FormatError> {
        let (board, ply) = Board::from_sfen(sfen)?;
        Position::from_board(board, ply)
    }

    /// `Board` と手数から局面を作る
    ///
    /// 両者の玉がちょうど1枚ずつでない局面と、手番でない側の玉に王手がかかっている局面はエラー。
    pub fn from_board(board: Board, ply: u32) -> Result<Position, FormatError> {
        for color in Color::ALL {
            let count = board.king_count(color);
            if count != 1 {
                return Err(FormatError::KingCount { color, count });
            }
        }
        let pos = Position::from_board_unchecked(board, ply);
        let them = !pos.side_to_move();
        if pos.is_attacked(pos.side_to_move(), pos.king_square(them), pos.occupied()) {
            return Err(FormatError::OpponentInCheck(them));
        }
        log::debug!("position imported: {}", pos.to_sfen());
        Ok(pos)
    }

    /// SFEN を読み込んで局面を置き換える（履歴は消える）
    ///
    /// 失敗したときは局面を変更しない。
    pub fn set_sfen(&mut self, sfen: &str) -> Result<(), FormatError> {
        *self = Position::from_sfen(sfen)?;
        Ok(())
    }

    /// 現局面の SFEN
    pub fn to_sfen(&self) -> String {
        self.board.to_sfen(self.ply)
    }
}

impl std::str::FromStr for Position {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_sfen(s)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sfen())
    }
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FormatError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != Rank::NUM {
        return Err(FormatError::RankCount(ranks.len()));
    }

    for (rank, rank_str) in Rank::ALL.into_iter().zip(ranks) {
        // 9筋から1筋へ
        let mut files = 0usize;
        let mut promoted = false;
        let too_long = || FormatError::RankLength {
            rank: rank.index() + 1,
            files: 10,
        };

        for c in rank_str.chars() {
            if c == '+' {
                if promoted {
                    return Err(FormatError::InvalidPiece(c));
                }
                promoted = true;
                continue;
            }

            if let Some(n) = c.to_digit(10) {
                if promoted || n == 0 {
                    return Err(FormatError::InvalidPiece(c));
                }
                files += n as usize;
                if files > File::NUM {
                    return Err(too_long());
                }
                continue;
            }

            let mut pc = Piece::from_sfen_char(c).ok_or(FormatError::InvalidPiece(c))?;
            if promoted {
                pc = pc.promote().ok_or(FormatError::InvalidPromotion(c))?;
                promoted = false;
            }
            if files >= File::NUM {
                return Err(too_long());
            }
            let file = File::ALL_DESC[files];
            board.set_piece(Square::new(file, rank), pc);
            files += 1;
        }

        if promoted {
            return Err(FormatError::InvalidPiece('+'));
        }
        if files != File::NUM {
            return Err(FormatError::RankLength {
                rank: rank.index() + 1,
                files,
            });
        }
    }

    Ok(())
}

fn parse_hands(board: &mut Board, s: &str) -> Result<(), FormatError> {
    if s == "-" {
        return Ok(());
    }
    let invalid = || FormatError::Hand(s.to_string());

    let mut count: Option<u32> = None;
    for c in s.chars() {
        if let Some(d) = c.to_digit(10) {
            let n = count.unwrap_or(0) * 10 + d;
            if n > 18 {
                return Err(invalid());
            }
            count = Some(n);
            continue;
        }

        let pc = Piece::from_sfen_char(c).ok_or_else(invalid)?;
        let pt = pc.piece_type();
        if !pt.is_hand_piece() {
            return Err(invalid());
        }
        let n = count.take().unwrap_or(1);
        if n == 0 {
            return Err(invalid());
        }
        let hand = board.hand(pc.color());
        let total = hand.count(pt) + n;
        if total > max_count(pt) {
            return Err(invalid());
        }
        board.set_hand(pc.color(), hand.set(pt, total));
    }

    if count.is_some() {
        return Err(invalid());
    }
    Ok(())
}

fn hands_to_sfen(board: &Board) -> String {
    let mut out = String::new();
    for color in Color::ALL {
        let hand: Hand = board.hand(color);
        for pt in HAND_ORDER {
            let n = hand.count(pt);
            if n == 0 {
                continue;
            }
            if n > 1 {
                out.push_str(&n.to_string());
            }
            out.push_str(&Piece::new(color, pt).to_sfen());
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}
