//! 打ち歩詰めの判定

use shogiban_core::Position;
use shogiban_core::types::{Color, File, Move, PieceType, Rank, Square};

fn sq(file: u8, rank: u8) -> Square {
    Square::new(
        File::from_u8(file - 1).unwrap(),
        Rank::from_u8(rank - 1).unwrap(),
    )
}

fn pawn_drop(file: u8, rank: u8) -> Move {
    Move::new_drop(PieceType::Pawn, sq(file, rank))
}

#[test]
fn test_drop_pawn_mate_in_corner() {
    // 9一玉・8一桂、8三金が9二を支える。8二も金の利き
    let pos = Position::from_sfen("kn7/9/1G7/9/9/9/9/9/4K4 b P 1").unwrap();
    let moves = pos.legal_moves();
    assert!(!moves.contains(pawn_drop(9, 2)), "P*9b is drop pawn mate");
    assert!(moves.contains(pawn_drop(9, 3)));
    assert!(moves.contains(pawn_drop(9, 9)));
}

#[test]
fn test_drop_pawn_mate_supported_by_dragon() {
    // 2三龍が1二・2二・2一に利いている
    let pos = Position::from_sfen("8k/9/7+R1/9/9/9/9/9/4K4 b P 1").unwrap();
    assert!(!pos.in_check());
    assert!(!pos.legal_moves().contains(pawn_drop(1, 2)));
}

#[test]
fn test_drop_pawn_not_mate_other_piece_can_capture() {
    // 2二金が横から取れる
    let pos = Position::from_sfen("8k/7g1/7+R1/9/9/9/9/9/4K4 b P 1").unwrap();
    assert!(pos.legal_moves().contains(pawn_drop(1, 2)));
}

#[test]
fn test_drop_pawn_mate_defender_pinned() {
    // 6二金は5二の歩を取れるが、7三角にピンされている
    let pos = Position::from_sfen("3nkn3/3g5/2B1G4/9/9/9/9/9/4K4 b P 1").unwrap();
    assert!(!pos.legal_moves().contains(pawn_drop(5, 2)));

    // 角がいなければ取れる
    let pos = Position::from_sfen("3nkn3/3g5/4G4/9/9/9/9/9/4K4 b P 1").unwrap();
    assert!(pos.legal_moves().contains(pawn_drop(5, 2)));
}

#[test]
fn test_drop_pawn_releases_pinned_defender() {
    // 5三金は5五香にピンされているが、5二に歩を打つと香の利きが止まり歩を取れる
    let mut pos = Position::from_sfen("3nkn3/9/3GgG3/9/4L4/9/9/9/K8 b P 1").unwrap();
    assert!(pos.pinned(Color::White).contains(sq(5, 3)));
    assert!(pos.legal_moves().contains(pawn_drop(5, 2)));

    pos.do_move(pawn_drop(5, 2)).unwrap();
    assert!(pos.in_check());
    assert!(pos.pinned(Color::White).is_empty());
    let replies = pos.legal_moves();
    assert_eq!(replies.len(), 1);
    assert!(replies.contains(Move::new_move(sq(5, 3), sq(5, 2), false)));
}

#[test]
fn test_drop_pawn_not_mate_king_can_escape() {
    // 5一玉の周りが空いている
    let pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/8K b P 1").unwrap();
    assert!(pos.legal_moves().contains(pawn_drop(5, 2)));

    // 5三金で支えても4一・6一へ逃げられる
    let pos = Position::from_sfen("4k4/9/4G4/9/9/9/9/9/8K b P 1").unwrap();
    assert!(pos.legal_moves().contains(pawn_drop(5, 2)));
}

#[test]
fn test_drop_pawn_mate_for_white() {
    // 先手の隅の形を180度回した局面で後手が打つ
    let pos = Position::from_sfen("4k4/9/9/9/9/9/7g1/9/7NK w p 1").unwrap();
    let moves = pos.legal_moves();
    assert!(!moves.contains(pawn_drop(1, 8)), "P*1h is drop pawn mate");
    assert!(moves.contains(pawn_drop(1, 7)));
}

#[test]
fn test_pawn_drop_without_check_is_unrestricted() {
    // 1段目以外の空き升すべて（9九の玉を除く）
    let pos = Position::from_sfen("k8/9/9/9/9/9/9/9/K8 b P 1").unwrap();
    let count = pos
        .legal_moves()
        .iter()
        .filter(|m| m.is_drop() && m.drop_piece_type() == PieceType::Pawn)
        .count();
    assert_eq!(count, 71);
}

#[test]
fn test_drop_pawn_mate_rejected_by_do_move() {
    let mut pos = Position::from_sfen("kn7/9/1G7/9/9/9/9/9/4K4 b P 1").unwrap();
    let mv = pos.parse_move("P*9b").unwrap();
    assert!(pos.do_move(mv).is_err());
    assert_eq!(pos.to_sfen(), "kn7/9/1G7/9/9/9/9/9/4K4 b P 1");

    // 盤上の駒で詰ませるのは構わない
    let mut pos = Position::from_sfen("k8/9/1G7/9/9/9/9/9/4K4 b P 1").unwrap();
    let mv = pos.parse_move("8c8b").unwrap();
    pos.do_move(mv).unwrap();
    assert!(pos.in_check());
    assert!(!pos.is_mated());
}
