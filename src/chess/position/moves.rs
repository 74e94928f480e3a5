//! Contains structures to represent moves
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of move
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveType {
    /// Any move which is not castling, a two-square pawn advancement, en-passant capture, or pawn
    /// promotion
    Standard,
    /// A castling move
    Castling,
    /// A two-square pawn advancement.
    ///
    /// `en_passant` is `true` when an enemy pawn stands beside the destination, so the pawn can be
    /// taken en passant on the next move.
    Advance2 {
        /// An enemy pawn could capture the advanced pawn en passant
        en_passant: bool,
    },
    /// An en passant capture
    EnPassant,
    /// A pawn promotion to the given piece type
    Promotion(Promotion),
}

impl Default for MoveType {
    fn default() -> Self {
        MoveType::Standard
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which piece to promote to for a promotion move
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Promotion {
    ToKnight = 1,
    ToBishop = 2,
    ToRook = 3,
    ToQueen = 4,
}

use Promotion::*;

impl Promotion {
    /// Promotions in the order they are generated
    pub const ALL: [Promotion; 4] = [ ToQueen, ToRook, ToBishop, ToKnight ];
}

impl Default for Promotion {
    fn default() -> Self {
        ToQueen
    }
}

impl From<Promotion> for Piece {
    fn from(prom: Promotion) -> Self {
        match prom {
            ToKnight => Knight,
            ToBishop => Bishop,
            ToRook => Rook,
            ToQueen => Queen,
        }
    }
}

impl TryFrom<Piece> for Promotion {
    type Error = Error;

    fn try_from(piece: Piece) -> Result<Self> {
        match piece {
            Knight => Ok(ToKnight),
            Bishop => Ok(ToBishop),
            Rook => Ok(ToRook),
            Queen => Ok(ToQueen),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A pseudo-legal move.
///
/// A move does not hold on to the position it was generated from, so it can be stored in move lists,
/// killer slots and the best line. Two moves are equal when they share origin, destination and
/// promotion piece.
///
/// Note that the move might not be fully legal; it may leave the mover in check. Use
/// `Position::make_move()` to verify full legality.
#[derive(Debug, Copy, Clone, Eq)]
pub struct Move {
    pub (super) piece: Piece,
    pub (super) orig: Square,
    pub (super) dest: Square,
    pub (super) capt_pc: Option<Piece>,
    pub (super) move_type: MoveType,
}

impl Move {
    /// Placeholder used to fill empty move buffers
    pub (crate) const NULL: Move = Move {
        piece: Pawn,
        orig: Square::A1,
        dest: Square::A1,
        capt_pc: None,
        move_type: MoveType::Standard,
    };

    /// Creates a move from its parts.
    ///
    /// No validation is done; moves meant for a specific position should come from the move
    /// generator or `Position::parse_move()`.
    pub fn new(
        piece: Piece,
        orig: Square,
        dest: Square,
        capt_pc: Option<Piece>,
        move_type: MoveType,
    ) -> Move {
        Move { piece, orig, dest, capt_pc, move_type }
    }
    /// Returns the piece to be moved.
    pub fn piece(&self) -> Piece {
        self.piece
    }
    /// Returns the origin of the moved piece.
    pub fn origin(&self) -> Square {
        self.orig
    }
    /// Returns the destination of the moved piece.
    pub fn destination(&self) -> Square {
        self.dest
    }
    /// Returns the captured piece, if any.
    ///
    /// For en passant captures this is `Some(Pawn)` even though the destination is empty.
    pub fn captured_piece(&self) -> Option<Piece> {
        self.capt_pc
    }
    /// Returns the type of promotion, if any
    pub fn promotion(&self) -> Option<Promotion> {
        if let MoveType::Promotion(prom_pc) = self.move_type {
            Some(prom_pc)
        } else {
            None
        }
    }
    /// Returns the type of move.
    pub fn move_type(&self) -> MoveType {
        self.move_type
    }
    /// Returns `true` if the move is a capture.
    pub fn is_capture(&self) -> bool {
        self.capt_pc.is_some()
    }
    /// Returns `true` if the move is a promotion.
    pub fn is_promotion(&self) -> bool {
        self.promotion().is_some()
    }
    /// Returns `true` if the move is a castling move.
    pub fn is_castle(&self) -> bool {
        self.move_type == MoveType::Castling
    }
    /// Returns `true` if the move is a two-square advance which an enemy pawn could capture en
    /// passant.
    pub fn is_en_passant_push(&self) -> bool {
        self.move_type == MoveType::Advance2 { en_passant: true }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.orig == other.orig
            && self.dest == other.dest
            && self.promotion() == other.promotion()
    }
}

impl fmt::Display for Move {
    /// The move is formatted as follows:
    ///
    /// "{}" -- Coordinate Notation (eg g1f3, e7e8q, or e1g1)
    ///
    /// "{:#}" -- Long Algebraic Notation (eg Ng1-f3, e7-e8=Q, or O-O)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();

        if !f.alternate() {
            s += &self.orig.to_string();
            s += &self.dest.to_string();
            if let Some(prom_pc) = self.promotion() {
                s += &Piece::from(prom_pc).to_string().to_lowercase();
            }
            return s.fmt(f);
        }

        if self.move_type == MoveType::Castling {
            match self.dest.file() {
                File::G => return "O-O".fmt(f),
                File::C => return "O-O-O".fmt(f),
                _ => {},
            }
        }

        if self.piece != Pawn {
            s += &self.piece.to_string();
        }
        s += &self.orig.to_string();
        s += if self.is_capture() { "x" } else { "-" };
        s += &self.dest.to_string();

        if let Some(prom_pc) = self.promotion() {
            s += "=";
            s += &Piece::from(prom_pc).to_string();
        }
        if self.move_type == MoveType::EnPassant {
            s += " e.p.";
        }

        s.fmt(f)
    }
}
