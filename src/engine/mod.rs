//! The engine's search context: per-ply move lists, principal moves, killers and evaluation
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::debug;
use crate::chess::{Move, MoveList, MoveLists, Position, MAX_PLY};

pub mod config;
pub mod eval;
pub use eval::{evaluate_king_safety, Evaluator, Score};
use config::Config;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// State owned by one search lane.
///
/// The search driver records the best line and killer moves as it goes, and asks the game for
/// the moves at each ply, already ordered using that information.
#[derive(Debug, Clone)]
pub struct Game {
    best_line: [Option<Move>; MAX_PLY],
    killers: [[Option<Move>; 2]; MAX_PLY],
    lists: MoveLists,
    evaluator: Evaluator,
}

impl Game {
    /// Creates a search context with the default configuration
    pub fn new() -> Self {
        Game::with_config(&Config::default())
    }

    /// Creates a search context using the given configuration
    pub fn with_config(config: &Config) -> Self {
        let mut lists = MoveLists::new();
        lists.set_capture_scoring(config.ordering.score_captures);
        debug!("new game: {:?}", config);

        Game {
            best_line: [None; MAX_PLY],
            killers: [[None; 2]; MAX_PLY],
            lists,
            evaluator: Evaluator::new(config.king_safety),
        }
    }

    /// Generates every pseudo-legal move in `pos` into the list for `ply`, ordered with the best
    /// move and killers recorded for that ply.
    ///
    /// # Panics
    ///
    /// Panics if `ply` is not less than `MAX_PLY`.
    pub fn generate_moves(&mut self, pos: &Position, ply: usize) -> &mut MoveList {
        let best = self.best_line[ply];
        let killers = self.killers[ply];

        self.lists[ply].start(pos, ply).generate().reorder(best, killers);
        &mut self.lists[ply]
    }

    /// Generates only the captures in `pos`, capturing promotions included, into the list for
    /// `ply`, with the best move first when it is one of them.
    ///
    /// # Panics
    ///
    /// Panics if `ply` is not less than `MAX_PLY`.
    pub fn generate_captures(&mut self, pos: &Position, ply: usize) -> &mut MoveList {
        let best = self.best_line[ply];

        self.lists[ply].start(pos, ply).generate_captures().reorder_captures(best);
        &mut self.lists[ply]
    }

    /// Returns the next move from the list for `ply`
    ///
    /// # Panics
    ///
    /// Panics if `ply` is not less than `MAX_PLY`.
    pub fn next_move(&mut self, ply: usize) -> Option<Move> {
        self.lists[ply].next_move()
    }

    /// Records the best move found at `ply`
    pub fn set_best_move(&mut self, ply: usize, mv: Move) {
        self.best_line[ply] = Some(mv);
    }

    /// Returns the best move recorded at `ply`
    pub fn best_move(&self, ply: usize) -> Option<Move> {
        self.best_line[ply]
    }

    /// Records a move that caused a cutoff at `ply`. The previous first killer becomes the second
    /// unless it is the same move.
    pub fn add_killer(&mut self, ply: usize, mv: Move) {
        let killers = &mut self.killers[ply];

        if killers[0] != Some(mv) {
            killers[1] = killers[0];
            killers[0] = Some(mv);
        }
    }

    /// Returns the killer moves recorded at `ply`
    pub fn killers(&self, ply: usize) -> [Option<Move>; 2] {
        self.killers[ply]
    }

    /// Forgets the best line and killers, for example before searching an unrelated position.
    pub fn clear(&mut self) {
        self.best_line = [None; MAX_PLY];
        self.killers = [[None; 2]; MAX_PLY];
    }

    /// Returns the king-safety score of `pos` using this game's weights
    pub fn evaluate_king_safety(&self, pos: &Position) -> Score {
        self.evaluator.analyze_king_safety(pos)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
