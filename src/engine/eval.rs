//! King-safety evaluation: king placement and pawn shield.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::cmp::min;
use std::convert::TryFrom;
use std::fmt;
use std::ops;
use crate::chess::{Color, File, Piece, Square, Position};
use crate::chess::bitboard::Bitboard;
use super::config::KingSafety;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A pair of midgame and endgame scores, positive when `White` is better
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Score {
    /// Score used while plenty of material is on the board
    pub midgame: i32,
    /// Score used once most of the material is gone
    pub endgame: i32,
}

impl Score {
    /// Creates a score from its midgame and endgame parts
    pub fn new(midgame: i32, endgame: i32) -> Self {
        Score { midgame, endgame }
    }
}

impl ops::Neg for Score {
    type Output = Score;

    fn neg(self) -> Self {
        Score::new(-self.midgame, -self.endgame)
    }
}

impl ops::Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Self {
        Score::new(self.midgame + rhs.midgame, self.endgame + rhs.endgame)
    }
}

impl ops::Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Score) -> Self {
        Score::new(self.midgame - rhs.midgame, self.endgame - rhs.endgame)
    }
}

impl ops::AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl ops::SubAssign for Score {
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.midgame, self.endgame)
    }
}

// Rank 8 is the first row, so White looks up `sq.flip(White)` and Black looks up `sq` directly.
const KING_MIDGAME: [i32; Square::COUNT] = [
    //  a    b    c    d    e    f    g    h
      -70, -70, -70, -70, -70, -70, -70, -70, // 8
      -60, -60, -60, -60, -60, -60, -60, -60, // 7
      -50, -50, -50, -50, -50, -50, -50, -50, // 6
      -40, -40, -40, -40, -40, -40, -40, -40, // 5
      -30, -30, -30, -30, -30, -30, -30, -30, // 4
      -10, -20, -20, -20, -20, -20, -20, -10, // 3
       10,  10,   0, -10, -10,   0,  10,  10, // 2
       20,  30,  10,   0,   0,  10,  40,  20, // 1
];

const KING_ENDGAME: [i32; Square::COUNT] = [
    //  a    b    c    d    e    f    g    h
      -50, -40, -30, -20, -20, -30, -40, -50, // 8
      -40, -30, -20, -10, -10, -20, -30, -40, // 7
      -30, -20,  20,  30,  30,  20, -20, -30, // 6
      -20, -10,  30,  50,  50,  30, -10, -20, // 5
      -20, -10,  30,  50,  50,  30, -10, -20, // 4
      -30, -20,  20,  30,  30,  20, -20, -30, // 3
      -40, -30, -20, -10, -10, -20, -30, -40, // 2
      -50, -40, -30, -20, -20, -30, -40, -50, // 1
];

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Evaluates king safety using configurable shield weights
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Evaluator {
    weights: KingSafety,
}

impl Evaluator {
    /// Creates an evaluator using the given weights
    pub fn new(weights: KingSafety) -> Self {
        Evaluator { weights }
    }

    /// Returns the king-safety score of `pos`: king placement for both phases plus the pawn
    /// shield in the midgame.
    pub fn analyze_king_safety(&self, pos: &Position) -> Score {
        let mut score = Score::default();

        for color in [Color::White, Color::Black].iter().copied() {
            if let Some(king) = pos.king_square(color) {
                let sq = king.flip(color) as usize;
                let placement = Score::new(KING_MIDGAME[sq], KING_ENDGAME[sq]);

                match color {
                    Color::White => score += placement,
                    Color::Black => score -= placement,
                }
            }
        }

        score.midgame += self.shield_score(pos, Color::White) - self.shield_score(pos, Color::Black);
        score
    }

    /// Returns the pawn shield score of `color`, which is never positive
    pub fn shield_score(&self, pos: &Position, color: Color) -> i32 {
        -self.king_shield_penalty(pos, color)
    }

    /// Returns the penalty for holes and gaps in the pawn shield in front of `color`'s king.
    ///
    /// There is no penalty when the king is missing or still on its home square, when it has
    /// left its first three ranks, or when the opponent lacks the material for an attack.
    pub fn king_shield_penalty(&self, pos: &Position, color: Color) -> i32 {
        let king = match pos.king_square(color) {
            Some(king) => king,
            None => return 0,
        };
        if king == Square::E1.relative(color) || !pos.strong_enough(!color) {
            return 0;
        }

        let square = king.relative(color);
        if square > Square::H3 {
            return 0;
        }

        let pawns = pos.occupied_by_piece(color, Piece::Pawn);
        let file = square.file() as usize;
        let mut penalty = 0;

        for f in file.saturating_sub(1)..=min(File::COUNT - 1, file + 1) {
            let on_file = pawns & Bitboard::from(File::try_from(f).expect("INFALLIBLE"));
            let closest = on_file.into_iter().map(|sq| sq.relative(color)).min();

            match closest {
                Some(pawn) => {
                    let distance = (pawn.rank() as i32 - square.rank() as i32).abs();
                    if distance > 1 {
                        penalty += distance * self.weights.shield_distance;
                    }
                },
                None => penalty += self.weights.shield_missing,
            }
        }

        penalty
    }
}

/// Returns the king-safety score of `pos` using the default weights
pub fn evaluate_king_safety(pos: &Position) -> Score {
    Evaluator::default().analyze_king_safety(pos)
}
