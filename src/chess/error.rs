//! Errors returned while building positions, parsing notation and making moves
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by the `chess` module.
///
/// Generating and ordering moves never fails. Overflowing a move list is a bug and panics instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed FEN, square, piece or move text
    ParseError,
    /// Integer does not name a color, piece, file, rank or square
    TryFromIntError,

    /// A side has more than one king
    InvalidKingCount,
    /// Pawn on the first or last rank
    InvalidPawnRank,
    /// More pieces or pawns than a side can have in a game
    InvalidMaterial,
    /// Castling right without the king and rook on their home squares
    InvalidCastlingFlags,
    /// En passant square with no pawn that just made a double push
    MissingEnPassantPawn,
    /// En passant square is occupied
    EnPassantSquareOccupied,

    /// Move is not pseudo-legal in the position
    IllegalMove,
    /// The side that just moved left its king under attack
    KingCapturable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::ParseError => "cannot parse string",
            Error::TryFromIntError => "integer out of range",
            Error::InvalidKingCount => "more than one king of the same color",
            Error::InvalidPawnRank => "pawn on first or last rank",
            Error::InvalidMaterial => "too many pieces of the same color",
            Error::InvalidCastlingFlags => "castling flags don't match the king and rooks",
            Error::MissingEnPassantPawn => "en passant square without capturable pawn",
            Error::EnPassantSquareOccupied => "en passant square is occupied",
            Error::IllegalMove => "illegal move",
            Error::KingCapturable => "king can be captured",
        };

        f.write_str(msg)
    }
}

impl std::error::Error for Error { }

/// Result type used by the `chess` module
pub type Result<T> = std::result::Result<T, Error>;
