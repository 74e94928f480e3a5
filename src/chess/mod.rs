//! Board representation, move generation and move ordering.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops;
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::convert::TryFrom;
use error::*;

/// Implements `TryFrom<usize>` and `From<_> for usize` for fieldless `#[repr(u8)]` enums whose
/// discriminants run from 0 to `COUNT - 1`.
macro_rules! index_conversions {
    ($($t:ident),*) => {$(
        impl TryFrom<usize> for $t {
            type Error = Error;

            fn try_from(value: usize) -> Result<Self> {
                if value < $t::COUNT {
                    // SAFETY: every value below COUNT is a discriminant of this u8 enum
                    Ok(unsafe { mem::transmute::<u8, $t>(value as u8) })
                } else {
                    Err(Error::TryFromIntError)
                }
            }
        }

        impl From<$t> for usize {
            fn from(value: $t) -> Self {
                value as usize
            }
        }
    )*};
}

index_conversions!(Color, Piece, File, Rank, Square);

/// Parses a string holding exactly one character
fn single_char(s: &str) -> Result<char> {
    let mut chars = s.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::ParseError),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The side a piece or player belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;
}

impl ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color
    ///
    /// # Example
    /// ```
    /// use kestrel::chess::Color;
    /// assert_eq!(!Color::White, Color::Black);
    /// assert_eq!(!Color::Black, Color::White);
    /// ```
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => 'w'.fmt(f),
            Color::Black => 'b'.fmt(f),
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" => Ok(Color::White),
            "b" => Ok(Color::Black),
            _   => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The kind of a chess piece, in increasing order of value
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// The number of piece types
    pub const COUNT: usize = Piece::King as usize + 1;

    /// All piece types, in ascending order
    pub const ALL: [Piece; Piece::COUNT] = [
        Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King,
    ];

    const LETTERS: [char; Piece::COUNT] = ['P', 'N', 'B', 'R', 'Q', 'K'];
}

impl fmt::Display for Piece {
    /// Writes the upper case letter of the piece
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Piece::LETTERS[*self as usize].fmt(f)
    }
}

impl FromStr for Piece {
    type Err = Error;

    /// Accepts the piece letter in either case
    fn from_str(s: &str) -> Result<Self> {
        let c = single_char(s)?.to_ascii_uppercase();

        Piece::LETTERS.iter()
            .position(|&l| l == c)
            .map(|i| Piece::ALL[i])
            .ok_or(Error::ParseError)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, `A` through `H` from `White`'s left.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum File {
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl File {
    /// The number of files
    pub const COUNT: usize = File::H as usize + 1;
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        char::from(b'a' + *self as u8).fmt(f)
    }
}

impl FromStr for File {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match single_char(s)?.to_ascii_lowercase() {
            c @ 'a' ..= 'h' => File::try_from((c as u8 - b'a') as usize),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, `R1` through `R8` counting away from `White`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Rank {
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = Rank::R8 as usize + 1;

    /// Returns the rank as seen from `color`'s side of the board, so `R1` is always the back
    /// rank of `color`.
    pub fn relative(self, color: Color) -> Rank {
        match color {
            Color::White => self,
            Color::Black => Rank::try_from(7 - self as usize).expect("INFALLIBLE"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        char::from(b'1' + *self as u8).fmt(f)
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match single_char(s)? {
            c @ '1' ..= '8' => Rank::try_from((c as u8 - b'1') as usize),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A square of the board.
///
/// Squares are numbered rank by rank starting from `White`'s side, so `A1` is 0, `H1` is 7, `A8`
/// is 56 and `H8` is 63.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Square {
    A1 = 0o00, B1 = 0o01, C1 = 0o02, D1 = 0o03, E1 = 0o04, F1 = 0o05, G1 = 0o06, H1 = 0o07,
    A2 = 0o10, B2 = 0o11, C2 = 0o12, D2 = 0o13, E2 = 0o14, F2 = 0o15, G2 = 0o16, H2 = 0o17,
    A3 = 0o20, B3 = 0o21, C3 = 0o22, D3 = 0o23, E3 = 0o24, F3 = 0o25, G3 = 0o26, H3 = 0o27,
    A4 = 0o30, B4 = 0o31, C4 = 0o32, D4 = 0o33, E4 = 0o34, F4 = 0o35, G4 = 0o36, H4 = 0o37,
    A5 = 0o40, B5 = 0o41, C5 = 0o42, D5 = 0o43, E5 = 0o44, F5 = 0o45, G5 = 0o46, H5 = 0o47,
    A6 = 0o50, B6 = 0o51, C6 = 0o52, D6 = 0o53, E6 = 0o54, F6 = 0o55, G6 = 0o56, H6 = 0o57,
    A7 = 0o60, B7 = 0o61, C7 = 0o62, D7 = 0o63, E7 = 0o64, F7 = 0o65, G7 = 0o66, H7 = 0o67,
    A8 = 0o70, B8 = 0o71, C8 = 0o72, D8 = 0o73, E8 = 0o74, F8 = 0o75, G8 = 0o76, H8 = 0o77,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = Square::H8 as usize + 1;

    /// Returns the square at the given file and rank
    pub fn from_coord(file: File, rank: Rank) -> Square {
        Square::try_from(((rank as usize) << 3) | file as usize).expect("INFALLIBLE")
    }

    /// Returns the square's file
    pub fn file(self) -> File {
        File::try_from((self as usize) & 7).expect("INFALLIBLE")
    }

    /// Returns the square's rank
    pub fn rank(self) -> Rank {
        Rank::try_from((self as usize) >> 3).expect("INFALLIBLE")
    }

    /// Mirrors the square across the horizontal axis of the board when `color` is `White`, and
    /// returns it unchanged when `color` is `Black`.
    ///
    /// Tables written from `White`'s point of view list rank 8 first, so `sq.flip(color)` is the
    /// table index for a piece of `color` standing on `sq`.
    ///
    /// ```
    /// use kestrel::chess::{Color, Square};
    /// assert_eq!(Square::G1.flip(Color::White), Square::G8);
    /// assert_eq!(Square::G8.flip(Color::Black), Square::G8);
    /// ```
    pub fn flip(self, color: Color) -> Square {
        match color {
            Color::White => Square::try_from(self as usize ^ 0o70).expect("INFALLIBLE"),
            Color::Black => self,
        }
    }

    /// Returns the square as seen from `color`'s side of the board, so that `color`'s back rank
    /// is always rank 1.
    pub fn relative(self, color: Color) -> Square {
        self.flip(!color)
    }

    /// Returns the square `files` files and `ranks` ranks away, if it is on the board
    pub fn offset(self, files: i8, ranks: i8) -> Option<Square> {
        let file = self.file() as i8 + files;
        let rank = self.rank() as i8 + ranks;

        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Square::try_from((rank as usize) << 3 | file as usize).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.file().to_string() + &self.rank().to_string()).fmt(f)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match (s.get(..1), s.get(1..)) {
            (Some(file), Some(rank)) => Ok(Square::from_coord(file.parse()?, rank.parse()?)),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod bitboard;
pub mod position;
pub use position::Position;
pub use position::moves::{Move, MoveType, Promotion};
pub use position::move_gen::{MoveEntry, MoveList, MoveLists, MoveGen, MAX_MOVES, MAX_PLY};

pub mod variations;

pub mod error;
pub use error::{Error, Result};

#[cfg(test)]
mod color_tests {
    use std::convert::TryFrom;
    use super::Color;

    #[test]
    fn display_trait_works() {
        assert_eq!(format!("{}", Color::White), "w");
        assert_eq!(format!("{}", Color::Black), "b");
    }

    #[test]
    fn fromstr_trait_works() {
        assert_eq!("w".parse::<Color>().unwrap(), Color::White);
        assert_eq!("b".parse::<Color>().unwrap(), Color::Black);
        assert!("x".parse::<Color>().is_err());
    }

    #[test]
    fn from_usize_is_correct() {
        assert_eq!(Color::try_from(0).unwrap(), Color::White);
        assert_eq!(Color::try_from(1).unwrap(), Color::Black);
        assert!(Color::try_from(2).is_err());
    }
}

#[cfg(test)]
mod piece_tests {
    use std::convert::TryFrom;
    use super::Piece;

    #[test]
    fn fromstr_accepts_both_cases() {
        for (upper, lower, piece) in &[
            ("P", "p", Piece::Pawn), ("N", "n", Piece::Knight), ("B", "b", Piece::Bishop),
            ("R", "r", Piece::Rook), ("Q", "q", Piece::Queen), ("K", "k", Piece::King),
        ] {
            assert_eq!(upper.parse::<Piece>().unwrap(), *piece);
            assert_eq!(lower.parse::<Piece>().unwrap(), *piece);
            assert_eq!(piece.to_string(), *upper);
        }
        assert!("x".parse::<Piece>().is_err());
    }

    #[test]
    fn usize_conversions_follow_all_order() {
        for (i, piece) in Piece::ALL.iter().enumerate() {
            assert_eq!(usize::from(*piece), i);
            assert_eq!(Piece::try_from(i).unwrap(), *piece);
        }
        assert!(Piece::try_from(6).is_err());
    }
}


#[cfg(test)]
mod square_tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn numbering_is_rank_major() {
        assert_eq!(Square::A1 as usize, 0);
        assert_eq!(Square::H1 as usize, 7);
        assert_eq!(Square::A2 as usize, 8);
        assert_eq!(Square::A8 as usize, 56);
        assert_eq!(Square::H8 as usize, 63);
        assert_eq!(Square::from_coord(File::E, Rank::R4), Square::E4);
    }

    #[test]
    fn file_and_rank_methods_match_from_coord() {
        for f in 0..File::COUNT {
            for r in 0..Rank::COUNT {
                let file = File::try_from(f).unwrap();
                let rank = Rank::try_from(r).unwrap();
                let s = Square::from_coord(file, rank);
                assert_eq!(file, s.file());
                assert_eq!(rank, s.rank());
                assert_eq!(format!("{}", s), format!("{}{}", file, rank));
                assert_eq!(format!("{}", s).parse::<Square>().unwrap(), s);
            }
        }
    }

    #[test]
    fn fromstr_trait_produces_errors_when_it_should() {
        assert!("a".parse::<Square>().is_err());
        assert!("ax".parse::<Square>().is_err());
        assert!("x1".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
    }

    #[test]
    fn flip_mirrors_only_for_white() {
        assert_eq!(Square::E1.flip(Color::White), Square::E8);
        assert_eq!(Square::A8.flip(Color::White), Square::A1);
        assert_eq!(Square::C3.flip(Color::White), Square::C6);
        assert_eq!(Square::C3.flip(Color::Black), Square::C3);
    }

    #[test]
    fn flip_is_an_involution() {
        for i in 0..Square::COUNT {
            let s = Square::try_from(i).unwrap();
            assert_eq!(s.flip(Color::White).flip(Color::White), s);
            assert_eq!(s.flip(Color::White).file(), s.file());
        }
    }

    #[test]
    fn relative_square_puts_own_back_rank_first() {
        assert_eq!(Square::G1.relative(Color::White), Square::G1);
        assert_eq!(Square::G8.relative(Color::Black), Square::G1);
        assert_eq!(Square::B7.relative(Color::Black), Square::B2);
    }

    #[test]
    fn offset_stays_on_the_board() {
        assert_eq!(Square::E4.offset(1, 1), Some(Square::F5));
        assert_eq!(Square::A4.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::B1.offset(-1, 2), Some(Square::A3));
    }

    #[test]
    fn out_of_bound_usize_conversion_is_an_error() {
        assert!(Square::try_from(Square::COUNT).is_err());
    }
}
