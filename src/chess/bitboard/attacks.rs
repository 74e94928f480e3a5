//! Provides data and functions used to compute attacks
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use lazy_static::lazy_static;
use super::*;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

// rays pointing toward higher square numbers come first
const ROOK_DIRECTIONS: [(i8, i8); 4] = [ (0, 1), (1, 0), (0, -1), (-1, 0) ];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [ (1, 1), (-1, 1), (1, -1), (-1, -1) ];

struct Tables {
    knight: [Bitboard; Square::COUNT],
    king: [Bitboard; Square::COUNT],
    pawn: [[Bitboard; Square::COUNT]; Color::COUNT],
    rook_rays: [[Bitboard; Square::COUNT]; 4],
    bishop_rays: [[Bitboard; Square::COUNT]; 4],
}

lazy_static! {
    static ref TABLES: Tables = Tables::new();
}

impl Tables {
    fn new() -> Tables {
        let mut tables = Tables {
            knight: [Bitboard::new(); Square::COUNT],
            king: [Bitboard::new(); Square::COUNT],
            pawn: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            rook_rays: [[Bitboard::new(); Square::COUNT]; 4],
            bishop_rays: [[Bitboard::new(); Square::COUNT]; 4],
        };

        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).expect("INFALLIBLE");

            tables.knight[i] = jumps(sq, &KNIGHT_JUMPS);
            tables.king[i] = jumps(sq, &KING_STEPS);
            tables.pawn[Color::White as usize][i] = jumps(sq, &[(-1, 1), (1, 1)]);
            tables.pawn[Color::Black as usize][i] = jumps(sq, &[(-1, -1), (1, -1)]);

            for (d, &(x, y)) in ROOK_DIRECTIONS.iter().enumerate() {
                tables.rook_rays[d][i] = ray(sq, x, y);
            }
            for (d, &(x, y)) in BISHOP_DIRECTIONS.iter().enumerate() {
                tables.bishop_rays[d][i] = ray(sq, x, y);
            }
        }

        tables
    }
}

fn jumps(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets.iter().filter_map(|&(x, y)| sq.offset(x, y)).collect()
}

fn ray(sq: Square, x: i8, y: i8) -> Bitboard {
    let mut bd = Bitboard::new();
    let mut next = sq.offset(x, y);

    while let Some(sq) = next {
        bd.insert(sq);
        next = sq.offset(x, y);
    }

    bd
}

/// Slides along each ray until the first occupied square, which is included.
///
/// The first two rays of `rays` point toward higher square numbers, the last two toward lower.
fn sliding_attacks(rays: &[[Bitboard; Square::COUNT]; 4], sq: Square, occ: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::new();

    for (d, dir_rays) in rays.iter().enumerate() {
        let ray = dir_rays[sq as usize];
        let blockers = ray & occ;
        let blocker = if d < 2 { blockers.peek() } else { blockers.peek_last() };

        attacks |= match blocker {
            Some(blocker) => ray - dir_rays[blocker as usize],
            None => ray,
        };
    }

    attacks
}

/// Computes knight-like attacks to or from `sq`
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    TABLES.knight[sq as usize]
}

/// Computes king-like attacks to or from `sq`
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    TABLES.king[sq as usize]
}

/// Computes the squares attacked by a pawn of color `c` standing on `sq`
#[inline]
pub fn pawn_attacks(c: Color, sq: Square) -> Bitboard {
    TABLES.pawn[c as usize][sq as usize]
}

/// Computes bishop-like attacks to or from `sq` based on the occupied squares given by `occ`
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    sliding_attacks(&TABLES.bishop_rays, sq, occ)
}

/// Computes rook-like attacks to or from `sq` based on the occupied squares given by `occ`
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    sliding_attacks(&TABLES.rook_rays, sq, occ)
}

/// Computes queen-like attacks to or from square based on the occupied squares given by `occ`
#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}
