//! Contains structures related to the `Position`
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

use bitboard::*;

use Color::*;
use Piece::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A representation of the arrangement of pieces on the board at a given point in the game, as well
/// as castling availability and en passant legality.
///
/// Besides the occupancy bitboards ("outposts"), the position keeps the piece standing on every
/// square and the pseudo-legal destinations ("targets") of every piece. Targets are recomputed
/// whenever a position is built or a move is made, and are what the move generator enumerates.
#[allow(missing_copy_implementations,)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    turn: Color,
    outposts: [[Bitboard; Piece::COUNT]; Color::COUNT],
    occ_by_color: [Bitboard; Color::COUNT],
    occ_squares: Bitboard,
    pieces: [Option<(Color, Piece)>; Square::COUNT],
    targets: [Bitboard; Square::COUNT],
    king: [Option<Square>; Color::COUNT],

    in_check: bool,
    ep_square: Option<Square>,
    castling_rights: [u8; Color::COUNT],

    draw_plies: usize,
    move_num: usize,
}

const CASTLE_KING_SIDE: u8 = 0x1;
const CASTLE_QUEEN_SIDE: u8 = 0x2;
const CASTLE_BOTH_SIDES: u8 = CASTLE_KING_SIDE | CASTLE_QUEEN_SIDE;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

lazy_static! {
    static ref COORDINATE_MOVE: Regex = Regex::new(r"^([a-h][1-8])([a-h][1-8])([nbrqNBRQ])?$")
        .expect("INFALLIBLE");
}

impl Position {

    /// Returns the standard starting Position
    pub fn new() -> Position {
        Position::from_fen_str(START_FEN).expect("INFALLIBLE")
    }

    /// Returns a position with an empty board
    fn empty_board() -> Position {
        Position {
            turn: White,
            outposts: [[Bitboard::new(); Piece::COUNT]; Color::COUNT],
            occ_by_color: [Bitboard::new(); Color::COUNT],
            occ_squares: Bitboard::new(),
            pieces: [None; Square::COUNT],
            targets: [Bitboard::new(); Square::COUNT],
            king: [None; Color::COUNT],
            in_check: false,
            ep_square: None,
            castling_rights: [0, 0],
            draw_plies: 0,
            move_num: 1,
        }
    }

    /// Parse a position from a FEN string
    ///
    /// A side may be missing its king, which is useful for setting up test positions, but a side
    /// may never have more than one.
    pub fn from_fen_str(s: &str) -> Result<Position> {
        let mut pos = Position::empty_board();
        let mut fields = s.trim().split_whitespace();

        // parse the board
        if let Some(board) = fields.next() {
            let mut r = Rank::COUNT - 1;
            let mut f = 0;
            for c in board.chars() {
                match c {
                    '1' ..= '8' => {
                        f += c.to_digit(10).expect("INFALLIBLE") as usize;
                        if f > 8 {
                            return Err(Error::ParseError);
                        }
                    }
                    '/' => {
                        if f == File::COUNT && r > 0 {
                            r -= 1;
                            f = 0;
                        } else {
                            return Err(Error::ParseError);
                        }
                    }
                    _ => {
                        let sq = match (f.try_into(), r.try_into()) {
                            (Ok(f), Ok(r)) => Square::from_coord(f, r),
                            _ => return Err(Error::ParseError),
                        };
                        let color = if c.is_uppercase() { White } else { Black };
                        let piece: Piece = c.to_string().parse()?;

                        pos.put_piece(sq, color, piece);

                        f += 1;
                    }
                }
            }
            if r > 0 || f < 8 {
                return Err(Error::ParseError);
            }
        } else {
            return Err(Error::ParseError);
        }

        // parse the turn
        match fields.next() {
            Some(turn) => pos.turn = turn.parse()?,
            None => return Err(Error::ParseError),
        }

        // parse the castling flags
        match fields.next() {
            Some("-") => {},
            Some(castling_flags) => {
                for c in castling_flags.chars() {
                    match c {
                        'K' => pos.castling_rights[White as usize] |= CASTLE_KING_SIDE,
                        'Q' => pos.castling_rights[White as usize] |= CASTLE_QUEEN_SIDE,
                        'k' => pos.castling_rights[Black as usize] |= CASTLE_KING_SIDE,
                        'q' => pos.castling_rights[Black as usize] |= CASTLE_QUEEN_SIDE,
                        _ => return Err(Error::ParseError),
                    }
                }
            },
            None => return Err(Error::ParseError),
        }

        // parse en passant square
        match fields.next() {
            Some("-") => {},
            Some(ep_square) => pos.ep_square = Some(ep_square.parse()?),
            None => return Err(Error::ParseError),
        }

        // parse half move clock, if present
        if let Some(plies) = fields.next() {
            pos.draw_plies = plies.parse().map_err(|_| Error::ParseError)?;
        }

        // parse move number, if present
        if let Some(move_num) = fields.next() {
            pos.move_num = move_num.parse().map_err(|_| Error::ParseError)?;
        }

        pos.validate()?;
        pos.update();

        Ok(pos)
    }

    /// Rejects positions with too many kings, impossible material, pawns on the back ranks, a
    /// capturable king, or inconsistent en passant or castling state. A missing king is allowed.
    fn validate(&self) -> Result<()> {
        for c in 0..Color::COUNT {
            // Step 1: at most one king per side
            if self.outposts[c][King as usize].len() > 1 {
                return Err(Error::InvalidKingCount);
            }
            // Step 2: no pawns on ranks 1 and 8
            if self.outposts[c][Pawn as usize]
                .intersects(Bitboard::from(Rank::R1) | Rank::R8.into()) {
                return Err(Error::InvalidPawnRank);
            }
            // Step 3: no more material than promotions can account for
            if !self.material_possible(c) {
                return Err(Error::InvalidMaterial);
            }
        }
        // Step 4: opponent's king is not attacked
        if let Some(king) = self.outposts[!self.turn as usize][King as usize].peek() {
            if self.square_attacked_by(king, self.turn) {
                return Err(Error::KingCapturable);
            }
        }
        // Step 5: if there is an EP square, it must be empty and there must be a pawn to capture
        if let Some(ep_square) = self.ep_square {
            if self.occ_squares.contains(ep_square) {
                return Err(Error::EnPassantSquareOccupied);
            }
            let forward = if self.turn == White { 1 } else { -1 };
            if !self.outposts[!self.turn as usize][Pawn as usize]
                .shift_y(forward).contains(ep_square) {
                return Err(Error::MissingEnPassantPawn);
            }
        }
        // Step 6: if castling rights exist, king and rook must be in the correct squares
        for c in [White, Black].iter().copied() {
            let rights = self.castling_rights[c as usize];
            if rights == 0 {
                continue;
            }
            if self.pieces[Square::E1.relative(c) as usize] != Some((c, King)) {
                return Err(Error::InvalidCastlingFlags);
            }
            if rights & CASTLE_QUEEN_SIDE != 0
                && self.pieces[Square::A1.relative(c) as usize] != Some((c, Rook)) {
                return Err(Error::InvalidCastlingFlags);
            }
            if rights & CASTLE_KING_SIDE != 0
                && self.pieces[Square::H1.relative(c) as usize] != Some((c, Rook)) {
                return Err(Error::InvalidCastlingFlags);
            }
        }

        Ok(())
    }

    /// Returns `true` if side `c` has at most 16 men and 8 pawns, and no more extra knights,
    /// bishops, rooks and queens than its missing pawns could have promoted to.
    fn material_possible(&self, c: usize) -> bool {
        let pieces = &self.outposts[c];
        let count = |p: Piece| pieces[p as usize].len();
        let pawns = count(Pawn);

        let promoted = count(Knight).saturating_sub(2)
            + count(Bishop).saturating_sub(2)
            + count(Rook).saturating_sub(2)
            + count(Queen).saturating_sub(1);

        self.occ_by_color[c].len() <= 16 && pawns <= 8 && promoted <= 8 - pawns
    }

    /// Converts the position to a FEN string
    pub fn to_fen_str(&self) -> String {
        // the board
        let mut board = String::new();

        for r in (0..Rank::COUNT).rev() {
            let mut count = 0;
            for f in 0..File::COUNT {
                let sq = Square::from_coord(
                    f.try_into().expect("INFALLIBLE"),
                    r.try_into().expect("INFALLIBLE"),
                );
                if let Some((c, p)) = self.pieces[sq as usize] {
                    if count > 0 {
                        board += &count.to_string();
                        count = 0;
                    }

                    if c == White {
                        board += &p.to_string();
                    } else {
                        board += &p.to_string().to_lowercase();
                    }
                } else {
                    count += 1;
                }
            }
            if count > 0 {
                board += &count.to_string();
            }
            if r > 0 {
                board += "/";
            }
        }

        // castling rights
        let mut castling = String::new();
        castling += match self.castling_rights[White as usize] {
            CASTLE_KING_SIDE => "K",
            CASTLE_QUEEN_SIDE => "Q",
            CASTLE_BOTH_SIDES => "KQ",
            _ => "",
        };
        castling += match self.castling_rights[Black as usize] {
            CASTLE_KING_SIDE => "k",
            CASTLE_QUEEN_SIDE => "q",
            CASTLE_BOTH_SIDES => "kq",
            _ => "",
        };
        if castling.is_empty() {
            castling += "-";
        }

        // en passant square
        let ep_square = match self.ep_square {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {} {} {}", board, self.turn, castling, ep_square,
                                     self.draw_plies, self.move_num)
    }

    /// Returns the color whose turn it is
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns `true` if the color to move is in check.
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Returns the en passant square, if any
    pub fn en_passant_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Returns the number of plies which count toward the fifty move rule
    pub fn draw_plies(&self) -> usize {
        self.draw_plies
    }

    /// Returns the square where the king of the given color is located, if it is on the board
    pub fn king_square(&self, c: Color) -> Option<Square> {
        self.king[c as usize]
    }

    /// Returns the color and type of piece, if any, at the given location
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.pieces[sq as usize]
    }

    /// Returns all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.occ_squares
    }

    /// Returns the squares occupied by pieces of color `c`
    pub fn occupied_by(&self, c: Color) -> Bitboard {
        self.occ_by_color[c as usize]
    }

    /// Returns the squares occupied by pieces of color `c` and type `p`
    pub fn occupied_by_piece(&self, c: Color, p: Piece) -> Bitboard {
        self.outposts[c as usize][p as usize]
    }

    /// Returns the pseudo-legal destinations of the piece on `sq`, or an empty bitboard if `sq` is
    /// empty.
    pub fn targets(&self, sq: Square) -> Bitboard {
        self.targets[sq as usize]
    }

    /// Returns `true` if color `c` has a queen and at least one other knight, bishop, rook or
    /// queen, which is enough material to attack a king whose pawn shield is broken.
    pub fn strong_enough(&self, c: Color) -> bool {
        let pieces = &self.outposts[c as usize];
        let queens = pieces[Queen as usize];
        let others = pieces[Knight as usize] | pieces[Bishop as usize] | pieces[Rook as usize]
            | queens;

        !queens.is_empty() && others.len() > 1
    }

    /// Returns `true` if `sq` is attacked by a piece of color `c`.
    pub fn square_attacked_by(&self, sq: Square, c: Color) -> bool {
        let pieces = &self.outposts[c as usize];
        let bishops = pieces[Bishop as usize];
        let rooks = pieces[Rook as usize];
        let queens = pieces[Queen as usize];

        bishop_attacks(sq, self.occ_squares).intersects(bishops | queens)
            || rook_attacks(sq, self.occ_squares).intersects(rooks | queens)
            || knight_attacks(sq).intersects(pieces[Knight as usize])
            || king_attacks(sq).intersects(pieces[King as usize])
            || pawn_attacks(!c, sq).intersects(pieces[Pawn as usize])
    }

    /// Makes the move, returning the resulting position.
    ///
    /// The move must be pseudo-legal in this position. Returns `Error::KingCapturable` if the move
    /// leaves the mover's king under attack.
    pub fn make_move(&self, m: &Move) -> Result<Position> {
        let color = self.turn;

        if self.pieces[m.orig as usize] != Some((color, m.piece))
            || !self.targets[m.orig as usize].contains(m.dest) {
            return Err(Error::IllegalMove);
        }
        let promotes = m.piece == Pawn && m.dest.rank().relative(color) == Rank::R8;
        if promotes != m.is_promotion() {
            return Err(Error::IllegalMove);
        }

        let mut pos = self.clone();

        // clear captured piece (including en passant)
        if m.capt_pc.is_some() {
            let sq = if m.move_type == MoveType::EnPassant {
                Square::from_coord(m.dest.file(), m.orig.rank())
            } else {
                m.dest
            };
            pos.remove_piece(sq);
        }

        // move piece to new location (update piece type if promotion)
        pos.remove_piece(m.orig);
        match m.move_type {
            MoveType::Promotion(prom_pc) => pos.put_piece(m.dest, color, prom_pc.into()),
            _ => pos.put_piece(m.dest, color, m.piece),
        }

        // move rook for castling moves
        if m.move_type == MoveType::Castling {
            let rank = m.orig.rank();
            let (orig, dest) = match m.dest.file() {
                File::C => (Square::from_coord(File::A, rank), Square::from_coord(File::D, rank)),
                _ => (Square::from_coord(File::H, rank), Square::from_coord(File::F, rank)),
            };
            pos.remove_piece(orig);
            pos.put_piece(dest, color, Rook);
        }

        // update en passant square
        pos.ep_square = if m.is_en_passant_push() {
            m.orig.offset(0, if color == White { 1 } else { -1 })
        } else {
            None
        };

        // update castling rights if a king or rook leaves, or a rook is captured on, its square
        for sq in [m.orig, m.dest].iter().copied() {
            match sq {
                Square::E1 => pos.castling_rights[White as usize] = 0,
                Square::E8 => pos.castling_rights[Black as usize] = 0,
                Square::A1 => pos.castling_rights[White as usize] &= !CASTLE_QUEEN_SIDE,
                Square::H1 => pos.castling_rights[White as usize] &= !CASTLE_KING_SIDE,
                Square::A8 => pos.castling_rights[Black as usize] &= !CASTLE_QUEEN_SIDE,
                Square::H8 => pos.castling_rights[Black as usize] &= !CASTLE_KING_SIDE,
                _ => {},
            }
        }

        // switch turns
        pos.turn = !color;

        // update move counters
        if pos.turn == White {
            pos.move_num += 1;
        }
        if m.capt_pc.is_some() || m.piece == Pawn {
            pos.draw_plies = 0;
        } else {
            pos.draw_plies += 1;
        }

        pos.update();

        // verify mover is not in check
        if let Some(king) = pos.king[color as usize] {
            if pos.square_attacked_by(king, !color) {
                return Err(Error::KingCapturable);
            }
        }

        Ok(pos)
    }

    /// Parses a move written in coordinate notation (eg `e2e4` or `e7e8q`) and validates its
    /// pseudo-legality.
    ///
    /// A pawn reaching the last rank without a promotion piece promotes to a queen.
    pub fn parse_move(&self, s: &str) -> Result<Move> {
        let caps = COORDINATE_MOVE.captures(s.trim()).ok_or(Error::ParseError)?;

        let orig: Square = caps[1].parse()?;
        let dest: Square = caps[2].parse()?;
        let prom = match caps.get(3) {
            Some(p) => Some(Promotion::try_from(p.as_str().parse::<Piece>()?)?),
            None => None,
        };

        let piece = match self.pieces[orig as usize] {
            Some((c, p)) if c == self.turn => p,
            _ => return Err(Error::IllegalMove),
        };
        if !self.targets[orig as usize].contains(dest) {
            return Err(Error::IllegalMove);
        }

        let promotes = piece == Pawn && dest.rank().relative(self.turn) == Rank::R8;
        let prom = match (promotes, prom) {
            (true, None) => Some(Promotion::ToQueen),
            (false, Some(_)) => return Err(Error::IllegalMove),
            (_, prom) => prom,
        };

        Ok(self.new_move(piece, orig, dest, prom))
    }

    /// Builds the move of `piece` from `orig` to `dest`, deciding its type from the board.
    ///
    /// `dest` must be one of the targets of `orig`.
    pub (super) fn new_move(
        &self,
        piece: Piece,
        orig: Square,
        dest: Square,
        prom: Option<Promotion>,
    ) -> Move {
        let mut capt_pc = self.pieces[dest as usize].map(|(_, p)| p);

        let move_type = match piece {
            Pawn => {
                if let Some(prom) = prom {
                    MoveType::Promotion(prom)
                } else if capt_pc.is_none() && orig.file() != dest.file() {
                    capt_pc = Some(Pawn);
                    MoveType::EnPassant
                } else if orig.rank().relative(self.turn) == Rank::R2
                    && dest.rank().relative(self.turn) == Rank::R4 {
                    MoveType::Advance2 { en_passant: self.exposes_en_passant(dest) }
                } else {
                    MoveType::Standard
                }
            },
            King if (dest.file() as i8 - orig.file() as i8).abs() == 2 => MoveType::Castling,
            _ => MoveType::Standard,
        };

        Move { piece, orig, dest, capt_pc, move_type }
    }

    /// Returns `true` if an enemy pawn stands right beside `sq`
    fn exposes_en_passant(&self, sq: Square) -> bool {
        let pawns = self.outposts[!self.turn as usize][Pawn as usize];

        [-1, 1].iter()
            .filter_map(|&x| sq.offset(x, 0))
            .any(|beside| pawns.contains(beside))
    }

    fn put_piece(&mut self, sq: Square, c: Color, p: Piece) {
        self.pieces[sq as usize] = Some((c, p));
        self.outposts[c as usize][p as usize].insert(sq);
        self.occ_by_color[c as usize].insert(sq);
        self.occ_squares.insert(sq);
    }

    fn remove_piece(&mut self, sq: Square) {
        if let Some((c, p)) = self.pieces[sq as usize].take() {
            self.outposts[c as usize][p as usize].remove(sq);
            self.occ_by_color[c as usize].remove(sq);
            self.occ_squares.remove(sq);
        }
    }

    /// Recomputes king squares, targets and check status after the board changes
    fn update(&mut self) {
        for c in [White, Black].iter().copied() {
            self.king[c as usize] = self.outposts[c as usize][King as usize].peek();
        }

        for i in 0..Square::COUNT {
            self.targets[i] = match self.pieces[i] {
                Some((c, p)) => self.calc_targets(i.try_into().expect("INFALLIBLE"), c, p),
                None => Bitboard::new(),
            };
        }

        self.in_check = match self.king[self.turn as usize] {
            Some(king) => self.square_attacked_by(king, !self.turn),
            None => false,
        };
    }

    fn calc_targets(&self, sq: Square, c: Color, p: Piece) -> Bitboard {
        let own = self.occ_by_color[c as usize];

        match p {
            Pawn => self.pawn_targets(sq, c),
            Knight => knight_attacks(sq) - own,
            Bishop => bishop_attacks(sq, self.occ_squares) - own,
            Rook => rook_attacks(sq, self.occ_squares) - own,
            Queen => queen_attacks(sq, self.occ_squares) - own,
            King => (king_attacks(sq) - own) | self.castle_targets(c),
        }
    }

    fn pawn_targets(&self, sq: Square, c: Color) -> Bitboard {
        let forward = if c == White { 1 } else { -1 };
        let mut targets = Bitboard::new();

        // advancement
        if let Some(one) = sq.offset(0, forward) {
            if !self.occ_squares.contains(one) {
                targets.insert(one);

                if sq.rank().relative(c) == Rank::R2 {
                    if let Some(two) = one.offset(0, forward) {
                        if !self.occ_squares.contains(two) {
                            targets.insert(two);
                        }
                    }
                }
            }
        }

        // captures
        let mut enemies = self.occ_by_color[!c as usize];
        if c == self.turn {
            if let Some(ep_square) = self.ep_square {
                enemies.insert(ep_square);
            }
        }

        targets | (pawn_attacks(c, sq) & enemies)
    }

    /// Castling destinations of the king of color `c`
    fn castle_targets(&self, c: Color) -> Bitboard {
        let rights = self.castling_rights[c as usize];
        let home = Square::E1.relative(c);
        let mut targets = Bitboard::new();

        if rights == 0 || self.king[c as usize] != Some(home) || self.square_attacked_by(home, !c) {
            return targets;
        }

        let rooks = self.outposts[c as usize][Rook as usize];

        if rights & CASTLE_KING_SIDE != 0 && rooks.contains(Square::H1.relative(c)) {
            let path = Bitboard::from(Square::F1.relative(c)) | Square::G1.relative(c).into();
            if self.occ_squares.is_disjoint(path)
                && !self.square_attacked_by(Square::F1.relative(c), !c) {
                targets.insert(Square::G1.relative(c));
            }
        }

        if rights & CASTLE_QUEEN_SIDE != 0 && rooks.contains(Square::A1.relative(c)) {
            let path = Bitboard::from(Square::B1.relative(c))
                | Square::C1.relative(c).into()
                | Square::D1.relative(c).into();
            if self.occ_squares.is_disjoint(path)
                && !self.square_attacked_by(Square::D1.relative(c), !c) {
                targets.insert(Square::C1.relative(c));
            }
        }

        targets
    }
}

impl Default for Position {
    /// Returns the standard starting Position
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    /// Writes out the position using FEN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen_str().fmt(f)
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parse a position from a FEN string
    fn from_str(s: &str) -> Result<Self> {
        Position::from_fen_str(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod moves;
pub mod move_gen;

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn fen(s: &str) -> Position {
        Position::from_fen_str(s).expect("valid fen")
    }

    /// Position::new() must return the standard starting position.
    #[test]
    fn new_returns_the_standard_starting_position() {
        assert_eq!(Position::new().to_fen_str(), START_FEN);
    }

    /// Tests for Position::from_fen_str()
    mod from_fen_str {
        use super::*;
        use Error::*;

        #[test]
        fn empty_string_returns_error() {
            assert_eq!(Position::from_fen_str(""), Err(ParseError));
            assert_eq!(Position::from_fen_str(" \t\r\n"), Err(ParseError));
        }

        #[test]
        fn invalid_empty_square_count_returns_error() {
            assert_eq!(Position::from_fen_str("0K1k5/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/9/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
        }

        #[test]
        fn bad_rank_lengths_return_error() {
            assert_eq!(Position::from_fen_str("K1k6/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k4/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
        }

        #[test]
        fn missing_or_bad_fields_return_error() {
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 x - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w x - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w -"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w - x 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w - - x 1"), Err(ParseError));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w - - 0 x"), Err(ParseError));
        }

        #[test]
        fn optional_counters_take_defaults() {
            let pos = fen("K1k5/8/8/8/8/8/8/8 w - -");
            assert_eq!(pos.draw_plies, 0);
            assert_eq!(pos.move_num, 1);
        }

        #[test]
        fn turn_set_correctly() {
            assert_eq!(fen("K1k5/8/8/8/8/8/8/8 w - - 0 1").turn(), Color::White);
            assert_eq!(fen("K1k5/8/8/8/8/8/8/8 b - - 0 1").turn(), Color::Black);
        }

        #[test]
        fn castling_flags_set_correctly() {
            let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1");
            assert_eq!(pos.castling_rights[Color::White as usize], CASTLE_KING_SIDE);
            assert_eq!(pos.castling_rights[Color::Black as usize], CASTLE_QUEEN_SIDE);
        }

        #[test]
        fn multiple_kings_returns_error() {
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/7K/8 w - - 0 1"),
                Err(InvalidKingCount));
        }

        #[test]
        fn impossible_material_returns_error() {
            assert_eq!(
                Position::from_fen_str(
                    "1QQ1QQ2/Q5Q1/Q6Q/Q2Q4/Q6Q/Q6Q/Q6Q/1QQQQQQ1 w - - 0 1"),
                Err(InvalidMaterial));
            assert_eq!(Position::from_fen_str("4k3/pppppppp/p7/8/8/8/8/4K3 w - - 0 1"),
                Err(InvalidMaterial));
            assert_eq!(Position::from_fen_str("4k3/8/8/8/8/8/PPPPPPP1/QQQ1K3 w - - 0 1"),
                Err(InvalidMaterial));
            assert_eq!(Position::from_fen_str("4k3/8/8/8/8/8/PPPPPP2/QQQ1K3 w - - 0 1")
                .map(|pos| pos.occupied_by(Color::White).len()), Ok(10));
        }

        #[test]
        fn every_valid_position_fits_a_move_list() {
            // nine queens and two of each other piece
            let pos = fen("k7/pp6/8/8/1QQQQ3/1QQQQ3/1RRBBNN1/Q6K w - - 0 1");
            let mut list = MoveList::new(0);
            list.start(&pos, 0).generate();
            assert!(list.len() <= MAX_MOVES);
        }

        #[test]
        fn missing_king_is_allowed() {
            let pos = fen("K7/8/8/8/8/8/8/8 w - - 0 1");
            assert_eq!(pos.king_square(Color::White), Some(Square::A8));
            assert_eq!(pos.king_square(Color::Black), None);
        }

        #[test]
        fn pawns_on_first_or_last_rank_returns_error() {
            assert_eq!(Position::from_fen_str("K1k4p/8/8/8/8/8/8/8 w - - 0 1"),
                Err(InvalidPawnRank));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/P7 w - - 0 1"),
                Err(InvalidPawnRank));
        }

        #[test]
        fn capturable_king_returns_error() {
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/2R5 w - - 0 1"),
                Err(KingCapturable));
        }

        #[test]
        fn bad_en_passant_square_returns_error() {
            assert_eq!(Position::from_fen_str("K1k5/8/7p/7p/8/8/8/8 w - h6 0 1"),
                Err(EnPassantSquareOccupied));
            assert_eq!(Position::from_fen_str("K1k5/8/8/8/8/8/8/8 w - h6 0 1"),
                Err(MissingEnPassantPawn));
        }

        #[test]
        fn misplaced_castling_pieces_return_error() {
            assert_eq!(Position::from_fen_str("2k5/8/8/8/8/8/7K/R6R w K - 0 1"),
                Err(InvalidCastlingFlags));
            assert_eq!(Position::from_fen_str("2k5/8/8/8/8/8/8/4K3 w Q - 0 1"),
                Err(InvalidCastlingFlags));
            assert_eq!(Position::from_fen_str("4k3/8/8/8/8/8/8/2K5 w k - 0 1"),
                Err(InvalidCastlingFlags));
        }

        #[test]
        fn back_to_identical_fen() {
            for s in &[
                START_FEN,
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 12 40",
            ] {
                assert_eq!(fen(s).to_fen_str(), *s);
            }
        }
    }

    mod targets {
        use super::*;

        #[test]
        fn starting_position_targets() {
            let pos = Position::new();
            assert_eq!(pos.targets(Square::E2), Bitboard::from(Square::E3) | Square::E4.into());
            assert_eq!(pos.targets(Square::G1), Bitboard::from(Square::F3) | Square::H3.into());
            assert!(pos.targets(Square::D1).is_empty());
            assert!(pos.targets(Square::E1).is_empty());
            assert!(pos.targets(Square::E4).is_empty());
            assert_eq!(pos.targets(Square::B8), Bitboard::from(Square::A6) | Square::C6.into());
        }

        #[test]
        fn blocked_pawn_cannot_jump() {
            let pos = fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
            assert!(pos.targets(Square::E2).is_empty());
            let pos = fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
            assert_eq!(pos.targets(Square::E2), Bitboard::from(Square::E3));
        }

        #[test]
        fn en_passant_square_is_a_pawn_target() {
            let pos = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
            assert_eq!(pos.targets(Square::E5), Bitboard::from(Square::E6) | Square::D6.into());
        }

        #[test]
        fn castling_targets_need_rights_empty_path_and_safe_transit() {
            let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
            assert!(pos.targets(Square::E1).contains(Square::G1));
            assert!(pos.targets(Square::E1).contains(Square::C1));
            assert!(pos.targets(Square::E8).contains(Square::G8));
            assert!(pos.targets(Square::E8).contains(Square::C8));

            // no rights
            let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
            assert!(!pos.targets(Square::E1).contains(Square::G1));

            // knight in the way on the queen side
            let pos = fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
            assert!(!pos.targets(Square::E1).contains(Square::C1));
            assert!(pos.targets(Square::E1).contains(Square::G1));

            // f1 is attacked
            let pos = fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
            assert!(!pos.targets(Square::E1).contains(Square::G1));

            // in check
            let pos = fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
            assert!(pos.in_check());
            assert!(!pos.targets(Square::E1).contains(Square::G1));
            assert!(!pos.targets(Square::E1).contains(Square::C1));
        }
    }

    mod make_move {
        use super::*;

        #[test]
        fn double_push_sets_en_passant_square_only_when_exposed() {
            let pos = fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
            let m = pos.parse_move("e2e4").expect("valid move");
            assert_eq!(m.move_type(), MoveType::Advance2 { en_passant: true });
            let after = pos.make_move(&m).expect("legal");
            assert_eq!(after.en_passant_square(), Some(Square::E3));

            let pos = fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
            let m = pos.parse_move("e2e4").expect("valid move");
            assert_eq!(m.move_type(), MoveType::Advance2 { en_passant: false });
            let after = pos.make_move(&m).expect("legal");
            assert_eq!(after.en_passant_square(), None);
        }

        #[test]
        fn en_passant_capture_removes_the_pawn() {
            let pos = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
            let m = pos.parse_move("e5d6").expect("valid move");
            assert_eq!(m.move_type(), MoveType::EnPassant);
            assert_eq!(m.captured_piece(), Some(Pawn));
            let after = pos.make_move(&m).expect("legal");
            assert_eq!(after.piece_at(Square::D5), None);
            assert_eq!(after.piece_at(Square::D6), Some((White, Pawn)));
        }

        #[test]
        fn castling_moves_the_rook() {
            let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
            let m = pos.parse_move("e8c8").expect("valid move");
            assert!(m.is_castle());
            let after = pos.make_move(&m).expect("legal");
            assert_eq!(after.piece_at(Square::D8), Some((Black, Rook)));
            assert_eq!(after.piece_at(Square::A8), None);
            assert_eq!(after.to_fen_str(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
        }

        #[test]
        fn capturing_a_rook_clears_castling_rights() {
            let pos = fen("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1");
            let m = pos.parse_move("g2h1").expect("valid move");
            let after = pos.make_move(&m).expect("legal");
            assert_eq!(after.to_fen_str(), "r3k2r/8/8/8/8/8/8/R3K2b w Qkq - 0 2");
        }

        #[test]
        fn promotion_replaces_the_pawn() {
            let pos = fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
            let m = pos.parse_move("a7b8n").expect("valid move");
            assert_eq!(m.captured_piece(), Some(Rook));
            let after = pos.make_move(&m).expect("legal");
            assert_eq!(after.piece_at(Square::B8), Some((White, Knight)));
            assert_eq!(after.piece_at(Square::A7), None);
        }

        #[test]
        fn leaving_king_attacked_is_an_error() {
            let pos = fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
            let m = pos.parse_move("e2d3").expect("pseudo-legal");
            assert_eq!(pos.make_move(&m), Err(Error::KingCapturable));
        }

        #[test]
        fn move_must_be_pseudo_legal() {
            let pos = Position::new();
            let m = Move::new(Knight, Square::G1, Square::G3, None, MoveType::Standard);
            assert_eq!(pos.make_move(&m), Err(Error::IllegalMove));
        }

        #[test]
        fn moves_give_check() {
            let pos = fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
            let m = pos.parse_move("a1a8").expect("valid move");
            assert!(pos.make_move(&m).expect("legal").in_check());
        }
    }

    mod parse_move {
        use super::*;

        #[test]
        fn rejects_malformed_strings() {
            let pos = Position::new();
            assert_eq!(pos.parse_move(""), Err(Error::ParseError));
            assert_eq!(pos.parse_move("e2-e4"), Err(Error::ParseError));
            assert_eq!(pos.parse_move("e2e4k"), Err(Error::ParseError));
            assert_eq!(pos.parse_move("i2i4"), Err(Error::ParseError));
        }

        #[test]
        fn rejects_moves_that_are_not_pseudo_legal() {
            let pos = Position::new();
            assert_eq!(pos.parse_move("e2e5"), Err(Error::IllegalMove));
            assert_eq!(pos.parse_move("e7e5"), Err(Error::IllegalMove));
            assert_eq!(pos.parse_move("e2e4q"), Err(Error::IllegalMove));
        }

        #[test]
        fn promotion_defaults_to_queen() {
            let pos = fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
            let m = pos.parse_move("a7a8").expect("valid move");
            assert_eq!(m.promotion(), Some(Promotion::ToQueen));
            assert_eq!(pos.parse_move("a7a8r").expect("valid move").promotion(),
                Some(Promotion::ToRook));
        }
    }

    #[test]
    fn strong_enough_needs_a_queen_and_another_piece() {
        assert!(!fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").strong_enough(White));
        assert!(!fen("4k3/8/8/8/8/8/8/R2RK3 w - - 0 1").strong_enough(White));
        assert!(fen("4k3/8/8/8/8/8/8/3QK1N1 w - - 0 1").strong_enough(White));
        assert!(fen("4k3/8/8/8/8/8/8/Q2QK3 w - - 0 1").strong_enough(White));
        assert!(Position::new().strong_enough(Black));
    }

    #[test]
    fn square_attacked_by() {
        let pos = fen("4k3/8/8/3p4/8/8/8/4K2R w - - 0 1");
        assert!(pos.square_attacked_by(Square::C4, Black));
        assert!(pos.square_attacked_by(Square::E4, Black));
        assert!(!pos.square_attacked_by(Square::D4, Black));
        assert!(pos.square_attacked_by(Square::H8, White));
        assert!(pos.square_attacked_by(Square::D2, White));
        assert!(!pos.square_attacked_by(Square::A8, White));
    }
}
