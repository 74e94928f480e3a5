//! Generates pseudo-legal moves into fixed-size, per-ply move lists and orders them for search
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::ops;
use log::{error, trace};
use super::*;

/// Capacity of a single move list
pub const MAX_MOVES: usize = 256;

/// Number of move lists, and so the deepest ply, available to one search
pub const MAX_PLY: usize = 64;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A generated move together with its ordering score
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveEntry {
    /// The move
    pub mv: Move,
    /// Ordering score, only filled in when capture scoring is enabled
    pub score: i32,
}

impl MoveEntry {
    const EMPTY: MoveEntry = MoveEntry { mv: Move::NULL, score: 0 };
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A reusable, fixed-capacity buffer of moves for one ply of the search.
///
/// A list is filled by calling `start()` and then generating into the returned `MoveGen`, and is
/// drained with `next_move()`. Starting the list again discards whatever it held.
#[derive(Clone)]
pub struct MoveList {
    moves: [MoveEntry; MAX_MOVES],
    ply: usize,
    head: usize,
    tail: usize,
    score_captures: bool,
}

impl MoveList {
    /// Creates an empty move list for the given ply
    pub fn new(ply: usize) -> MoveList {
        MoveList {
            moves: [MoveEntry::EMPTY; MAX_MOVES],
            ply,
            head: 0,
            tail: 0,
            score_captures: false,
        }
    }

    /// Enables or disables most-valuable-victim/least-valuable-attacker ordering of captures
    pub fn set_capture_scoring(&mut self, enabled: bool) {
        self.score_captures = enabled;
    }

    /// Clears the list and binds it to `pos`, returning a handle used to generate and order moves.
    pub fn start<'a>(&'a mut self, pos: &'a Position, ply: usize) -> MoveGen<'a> {
        self.ply = ply;
        self.head = 0;
        self.tail = 0;

        MoveGen { list: self, pos }
    }

    /// Returns the next move and advances past it, or `None` once every move has been returned.
    pub fn next_move(&mut self) -> Option<Move> {
        if self.head < self.tail {
            self.head += 1;
            Some(self.moves[self.head - 1].mv)
        } else {
            None
        }
    }

    /// Returns the ply the list was last started at
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Returns the number of generated moves
    pub fn len(&self) -> usize {
        self.tail
    }

    /// Returns `true` if no moves were generated
    pub fn is_empty(&self) -> bool {
        self.tail == 0
    }

    /// Returns the number of moves not yet returned by `next_move()`
    pub fn remaining(&self) -> usize {
        self.tail - self.head
    }

    /// Returns the generated moves, in their current order
    pub fn entries(&self) -> &[MoveEntry] {
        &self.moves[..self.tail]
    }

    /// Returns an iterator over the generated moves, in their current order, without consuming
    /// them.
    pub fn moves(&self) -> impl Iterator<Item=Move> + '_ {
        self.entries().iter().map(|e| e.mv)
    }

    fn push(&mut self, mv: Move) {
        if self.tail == MAX_MOVES {
            error!("move list overflow at ply {}", self.ply);
            panic!("move list overflow at ply {}", self.ply);
        }

        self.moves[self.tail] = MoveEntry { mv, score: 0 };
        self.tail += 1;
    }

    fn score(&mut self) {
        for entry in &mut self.moves[..self.tail] {
            entry.score = mvv_lva(&entry.mv);
        }
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveList")
            .field("ply", &self.ply)
            .field("head", &self.head)
            .field("moves", &self.entries())
            .field("score_captures", &self.score_captures)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One move list per ply, owned by a single search.
#[derive(Debug, Clone)]
pub struct MoveLists(Vec<MoveList>);

impl MoveLists {
    /// Creates `MAX_PLY` empty move lists
    pub fn new() -> MoveLists {
        MoveLists((0..MAX_PLY).map(MoveList::new).collect())
    }

    /// Enables or disables capture scoring in every list
    pub fn set_capture_scoring(&mut self, enabled: bool) {
        for list in &mut self.0 {
            list.set_capture_scoring(enabled);
        }
    }
}

impl Default for MoveLists {
    fn default() -> Self {
        MoveLists::new()
    }
}

impl ops::Index<usize> for MoveLists {
    type Output = MoveList;

    /// # Panics
    ///
    /// Panics if `ply` is not less than `MAX_PLY`.
    fn index(&self, ply: usize) -> &MoveList {
        &self.0[ply]
    }
}

impl ops::IndexMut<usize> for MoveLists {
    fn index_mut(&mut self, ply: usize) -> &mut MoveList {
        &mut self.0[ply]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The buckets moves are sorted into, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Captures,
    Promotions,
    Killers,
    Remaining,
}

impl Bucket {
    const ORDER: [Bucket; 4] = [
        Bucket::Captures, Bucket::Promotions, Bucket::Killers, Bucket::Remaining,
    ];

    fn accepts(self, mv: &Move, killers: &[Option<Move>; 2]) -> bool {
        match self {
            Bucket::Captures => mv.is_capture(),
            Bucket::Promotions => mv.is_promotion(),
            Bucket::Killers => killers.iter().any(|k| *k == Some(*mv)),
            Bucket::Remaining => true,
        }
    }
}

/// Captures of valuable pieces by cheap pieces score highest; quiet moves score zero.
fn mvv_lva(mv: &Move) -> i32 {
    match mv.capt_pc {
        Some(victim) => {
            let prom = mv.promotion().map_or(0, |p| Piece::from(p) as i32);
            (victim as i32 + 1) * 16 - mv.piece as i32 + prom
        },
        None => 0,
    }
}

/// Stable sort by descending score
fn sort_by_score(entries: &mut [MoveEntry]) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && entries[j - 1].score < entries[j].score {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move list bound to the position its moves are generated from.
///
/// Returned by `MoveList::start()`; each method consumes and returns the handle so calls can be
/// chained.
#[derive(Debug)]
pub struct MoveGen<'a> {
    list: &'a mut MoveList,
    pos: &'a Position,
}

impl<'a> MoveGen<'a> {
    /// Appends all pseudo-legal moves for the side to move: pawn moves first, then knight, bishop,
    /// rook and queen moves, then king moves.
    pub fn generate(mut self) -> Self {
        let pos = self.pos;
        let color = pos.turn;

        for orig in pos.outposts[color as usize][Pawn as usize] {
            for dest in pos.targets[orig as usize] {
                self.add_pawn_move(orig, dest);
            }
        }

        for piece in [Knight, Bishop, Rook, Queen].iter().copied() {
            for orig in pos.outposts[color as usize][piece as usize] {
                for dest in pos.targets[orig as usize] {
                    self.list.push(pos.new_move(piece, orig, dest, None));
                }
            }
        }

        if let Some(orig) = pos.king[color as usize] {
            for dest in pos.targets[orig as usize] {
                self.list.push(pos.new_move(King, orig, dest, None));
            }
        }

        trace!("{} candidates for {}", self.list.tail, color);
        self
    }

    /// Appends the pseudo-legal captures for the side to move, including en passant captures and
    /// capturing promotions, scanning the board from `A1` to `H8`.
    pub fn generate_captures(mut self) -> Self {
        let pos = self.pos;
        let color = pos.turn;
        let enemies = pos.occ_by_color[!color as usize];

        for orig in pos.occ_by_color[color as usize] {
            let piece = match pos.pieces[orig as usize] {
                Some((_, piece)) => piece,
                None => continue,
            };

            let mut victims = enemies;
            if piece == Pawn {
                if let Some(ep_square) = pos.ep_square {
                    victims.insert(ep_square);
                }
            }

            for dest in pos.targets[orig as usize] & victims {
                if piece == Pawn {
                    self.add_pawn_move(orig, dest);
                } else {
                    self.list.push(pos.new_move(piece, orig, dest, None));
                }
            }
        }

        trace!("{} capture candidates for {}", self.list.tail, color);
        self
    }

    /// Reorders the generated moves: the best move first, then captures, non-capturing
    /// promotions, killer moves and finally the remaining quiet moves.
    ///
    /// Moves keep their generation order within each group unless capture scoring is enabled,
    /// in which case captures are sorted by score. The reordering happens in place.
    pub fn reorder(mut self, best: Option<Move>, killers: [Option<Move>; 2]) -> Self {
        let list = &mut *self.list;
        let n = list.tail;

        if list.score_captures {
            list.score();
        }

        let mut ordered = [MoveEntry::EMPTY; MAX_MOVES];
        let mut taken = [false; MAX_MOVES];
        let mut out = 0;

        if let Some(best) = best {
            if let Some(i) = list.moves[..n].iter().position(|e| e.mv == best) {
                ordered[out] = list.moves[i];
                taken[i] = true;
                out += 1;
            }
        }

        for bucket in Bucket::ORDER.iter().copied() {
            let start = out;

            for i in 0..n {
                if !taken[i] && bucket.accepts(&list.moves[i].mv, &killers) {
                    ordered[out] = list.moves[i];
                    taken[i] = true;
                    out += 1;
                }
            }

            match bucket {
                Bucket::Captures if list.score_captures => {
                    sort_by_score(&mut ordered[start..out]);
                },
                Bucket::Killers if out - start > 1 && Some(ordered[start].mv) == killers[1] => {
                    ordered.swap(start, start + 1);
                },
                _ => {},
            }
        }

        list.moves[..n].copy_from_slice(&ordered[..n]);
        self
    }

    /// Reorders a list of captures: if the best move is a capture it is moved to the front and the
    /// other moves keep their order; otherwise the list is left as is, apart from capture scoring
    /// when enabled.
    pub fn reorder_captures(mut self, best: Option<Move>) -> Self {
        let list = &mut *self.list;
        let n = list.tail;

        if list.score_captures {
            list.score();
            sort_by_score(&mut list.moves[..n]);
        }

        if let Some(best) = best.filter(Move::is_capture) {
            if let Some(i) = list.moves[..n].iter().position(|e| e.mv == best) {
                list.moves[..=i].rotate_right(1);
            }
        }

        self
    }

    /// Returns the move list
    pub fn list(&self) -> &MoveList {
        self.list
    }

    fn add_pawn_move(&mut self, orig: Square, dest: Square) {
        let pos = self.pos;

        if dest.rank() == Rank::R1 || dest.rank() == Rank::R8 {
            for prom in Promotion::ALL.iter().copied() {
                self.list.push(pos.new_move(Pawn, orig, dest, Some(prom)));
            }
        } else {
            self.list.push(pos.new_move(Pawn, orig, dest, None));
        }
    }
}
