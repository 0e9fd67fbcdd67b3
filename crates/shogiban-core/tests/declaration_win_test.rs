//! 入玉宣言

use shogiban_core::Position;

#[test]
fn test_promoted_pieces_count_in_camp() {
    // 敵陣に成駒9枚と歩1枚（大駒2枚で18点）、手駒の飛角金2枚で12点
    let pos = Position::from_sfen("+R+B+P+P+P+P+P+P+P/KP7/9/9/9/9/9/9/4k4 b RB2G 1").unwrap();
    assert!(pos.can_declare_win());
}

#[test]
fn test_only_side_to_move_declares() {
    let sfen = "+R+B+P+P+P+P+P+P+P/KP7/9/9/9/9/9/9/4k4";
    assert!(Position::from_sfen(&format!("{sfen} b RB2G 1")).unwrap().can_declare_win());
    // 後手玉は5九にいて敵陣だが、駒が足りない
    assert!(!Position::from_sfen(&format!("{sfen} w RB2G 1")).unwrap().can_declare_win());
}

#[test]
fn test_declaration_requires_king_in_camp() {
    // 9三の玉は敵陣にいる
    let mut pos = Position::from_sfen("+R+B+P+P+P+P+P+P+P/1P7/K8/9/9/9/9/9/4k4 b RB2G 1").unwrap();
    assert!(pos.can_declare_win());

    let mv = pos.parse_move("9c9d").unwrap();
    pos.do_move(mv).unwrap();
    let mv = pos.parse_move("5i5h").unwrap();
    pos.do_move(mv).unwrap();
    // 敵陣から出ると宣言できない
    assert!(!pos.can_declare_win());
}

#[test]
fn test_white_threshold_is_lower() {
    // 後手: 敵陣（7〜9段）に10枚（大駒2枚で18点）、手駒9点で27点
    let pos = Position::from_sfen("4K4/9/9/9/9/9/9/kp7/+r+b+p+p+p+p+p+p+p w g8p 1").unwrap();
    assert!(pos.can_declare_win());

    // 同じ点数でも先手なら足りない
    let pos = Position::from_sfen("+R+B+P+P+P+P+P+P+P/KP7/9/9/9/9/9/9/4k4 b G8P 1").unwrap();
    assert!(!pos.can_declare_win());
}
