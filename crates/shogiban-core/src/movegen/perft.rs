//! Perft（合法手の木の末端数え上げ）

use crate::position::Position;
use crate::types::Move;

use super::generator::generate_legal;
use super::movelist::MAX_MOVES;

/// `depth` 手先までの末端局面数
///
/// 最後の1手は指さずに合法手の数をそのまま足す。指し手は生成器が合法と保証するので
/// `do_move_pseudo_legal` で進める。
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut buffer = [Move::NONE; MAX_MOVES];
    let n = generate_legal(pos, &mut buffer);
    if depth == 1 {
        return n as u64;
    }

    let mut nodes = 0;
    for &mv in &buffer[..n] {
        pos.do_move_pseudo_legal(mv);
        nodes += perft(pos, depth - 1);
        // 直前に指した手なので履歴は空でない
        let _ = pos.undo_move();
    }
    nodes
}

/// ルートの合法手ごとの末端局面数
pub fn perft_divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = pos.legal_moves();
    let mut result = Vec::with_capacity(moves.len());
    for &mv in moves.iter() {
        pos.do_move_pseudo_legal(mv);
        result.push((mv, perft(pos, depth - 1)));
        let _ = pos.undo_move();
    }
    log::debug!(
        "perft_divide depth {depth}: {} moves, {} nodes",
        result.len(),
        result.iter().map(|(_, n)| n).sum::<u64>()
    );
    result
}
