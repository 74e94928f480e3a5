//! Module for counting and printing the number of variations from a given position
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::*;

/// Print the number of variations of the given `depth` for each legal move from `pos`
///
/// # Panics
///
/// Panics if `depth` is greater than `MAX_PLY`.
pub fn print(pos: &Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut lists = MoveLists::new();
    let mut total = 0;

    lists[0].start(pos, 0).generate();
    while let Some(m) = lists[0].next_move() {
        if let Some(next) = play(pos, &m) {
            let count = walk(&next, depth - 1, 1, &mut lists);
            total += count;
            println!("\t{:7}\t{:12}\t{}", m, count, next);
        }
    }

    total
}

/// Count the number of variations of the given `depth` from `pos`
///
/// # Panics
///
/// Panics if `depth` is greater than `MAX_PLY`.
pub fn count(pos: &Position, depth: usize) -> usize {
    walk(pos, depth, 0, &mut MoveLists::new())
}

fn walk(pos: &Position, depth: usize, ply: usize, lists: &mut MoveLists) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    lists[ply].start(pos, ply).generate();
    while let Some(m) = lists[ply].next_move() {
        if let Some(next) = play(pos, &m) {
            total += walk(&next, depth - 1, ply + 1, lists);
        }
    }

    total
}

/// Makes a generated move, returning `None` if it leaves the mover's king capturable.
///
/// # Panics
///
/// Panics if the move fails for any other reason, since the generator produced it.
fn play(pos: &Position, m: &Move) -> Option<Position> {
    match pos.make_move(m) {
        Ok(next) => Some(next),
        Err(Error::KingCapturable) => None,
        Err(err) => panic!("generated move {} failed in {}: {}", m, pos, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_one_variation() {
        assert_eq!(count(&Position::new(), 0), 1);
        assert_eq!(print(&Position::new(), 0), 1);
    }

    #[test]
    fn starting_position_counts() {
        assert_eq!(count(&Position::new(), 1), 20);
        assert_eq!(count(&Position::new(), 2), 400);
        assert_eq!(print(&Position::new(), 2), 400);
    }

    #[test]
    fn pinned_moves_are_skipped() {
        let pos: Position = "4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1".parse().unwrap();
        let pinned = pos.parse_move("e2d3").unwrap();
        assert_eq!(play(&pos, &pinned), None);
        assert_eq!(count(&pos, 1), 4);
        assert_eq!(print(&pos, 1), 4);
    }

    #[test]
    #[should_panic(expected = "illegal move")]
    fn moves_outside_the_targets_panic() {
        let other: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        let m = other.parse_move("a1a8").unwrap();
        play(&Position::new(), &m);
    }
}
