// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use once_cell::sync::Lazy;
use std::ops::{Index, IndexMut};

use super::lion;
use super::piece::{Pair, Piece, Side};
use super::promotion;
use super::sfen;
use super::square::{Mask, Rank, Square, SQUARE_COUNT};
use super::Turn;

/// The standard starting arrangement. Black's pawns sit on rank i, so the
/// canonical first pawn push is `7i7h`.
pub const START_SFEN: &str = "lfcsgekgscfl/a1b1txot1b1a/mvrhdqndhrvm/pppppppppppp/3i4i3/12/12/3I4I3/PPPPPPPPPPPP/MVRHDNQDHRVM/A1B1TOXT1B1A/LFCSGKEGSCFL b - 1";

static START_POSITION: Lazy<Position> = Lazy::new(|| {
    sfen::decode_position(START_SFEN).expect("standard starting position parses")
});

/// The promotion zone is the farthest four ranks from a side's home edge.
pub fn in_promotion_zone(square: Square, side: Side) -> bool {
    match side {
        Side::Black => square.rank_index() <= 3,
        Side::White => square.rank_index() >= 8,
    }
}

/// The single farthest rank, where pawns (and optionally lances) earn a
/// promotion chance without capturing.
pub fn is_final_rank(square: Square, side: Side) -> bool {
    match side {
        Side::Black => square.rank() == Rank::RankA,
        Side::White => square.rank() == Rank::RankL,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squares([Option<Piece>; SQUARE_COUNT]);

impl Squares {
    fn empty() -> Self {
        Self([None; SQUARE_COUNT])
    }
}

impl Index<Square> for Squares {
    type Output = Option<Piece>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

/// What `apply_move` did, snapshotted for the move record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub captured_at_midpoint: Option<Piece>,
    pub promoted: bool,
}

/// Full game-rules state of the board at one instant: contents, side to
/// move, the counter-strike square, and the 1-based number of the ply
/// about to be played.
#[derive(Debug, Clone)]
pub struct Position {
    squares: Squares,
    occupancy: Pair<Mask>,
    side_to_move: Side,
    counter_strike: Option<Square>,
    ply: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.counter_strike == other.counter_strike
            && self.ply == other.ply
    }
}
impl Eq for Position {}

impl Position {
    pub fn empty() -> Self {
        Self {
            squares: Squares::empty(),
            occupancy: Pair::new(Mask::empty(), Mask::empty()),
            side_to_move: Side::Black,
            counter_strike: None,
            ply: 1,
        }
    }

    pub fn startpos() -> Self {
        START_POSITION.clone()
    }

    pub(crate) fn from_parts(
        squares: Vec<(Square, Piece)>,
        side_to_move: Side,
        counter_strike: Option<Square>,
        ply: u32,
    ) -> Self {
        let mut position = Self::empty();
        for (square, piece) in squares {
            position.place(square, piece);
        }
        position.side_to_move = side_to_move;
        position.counter_strike = counter_strike;
        position.ply = ply;
        position
    }

    #[inline]
    pub fn contents(&self, square: Square) -> &Option<Piece> {
        &self.squares[square]
    }

    #[inline]
    pub fn counter_strike(&self) -> Option<Square> {
        self.counter_strike
    }

    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn pieces(&self, side: Side) -> Mask {
        self.occupancy[side]
    }

    #[inline]
    pub fn occupied(&self) -> Mask {
        *self.occupancy.black() | *self.occupancy.white()
    }

    #[inline]
    pub fn is_vacant(&self, square: Square) -> bool {
        self.contents(square).is_none()
    }

    pub fn royal_squares(&self, side: Side) -> Mask {
        self.kind_squares(side, |piece| piece.is_royal())
    }

    pub fn lion_squares(&self, side: Side) -> Mask {
        self.kind_squares(side, |piece| piece.is_lion())
    }

    fn kind_squares(&self, side: Side, select: impl Fn(&Piece) -> bool) -> Mask {
        let mut mask = Mask::empty();
        for square in self.pieces(side).iter() {
            // Safety: occupancy masks track `squares` exactly
            let piece = self.squares[square].as_ref().unwrap();
            if select(piece) {
                mask |= square;
            }
        }
        mask
    }

    /// The (board, side-to-move) fingerprint the repetition rule counts.
    pub fn repetition_key(&self) -> String {
        format!(
            "{} {}",
            sfen::encode_board(self),
            self.side_to_move.notation()
        )
    }

    /// Move a piece, resolving midpoint and destination captures, the
    /// optional promotion (or, for an already-promoted piece, reverse
    /// promotion), the counter-strike square, and the turn flip.
    ///
    /// The move must already be structurally valid: `from` occupied, and
    /// `midpoint` only present when it holds an opposing piece to capture.
    pub fn apply_move(
        &mut self,
        from: Square,
        midpoint: Option<Square>,
        to: Square,
        promote: bool,
    ) -> AppliedMove {
        let before = self.occupied().len();
        // Safety: callers validate occupancy before applying
        let piece = self.remove(from).unwrap();
        let captured_at_midpoint = midpoint.and_then(|square| self.remove(square));
        let captured = if to != from { self.remove(to) } else { None };
        let placed = if promote {
            promotion::toggle(piece)
        } else {
            piece
        };
        self.place(to, placed);
        self.counter_strike =
            lion::next_counter_strike(&piece, from, midpoint, to, captured, captured_at_midpoint);
        self.side_to_move = !self.side_to_move;
        self.ply += 1;

        let captures =
            captured.is_some() as usize + captured_at_midpoint.is_some() as usize;
        debug_assert_eq!(self.occupied().len(), before - captures);

        AppliedMove {
            piece,
            captured,
            captured_at_midpoint,
            promoted: placed != piece,
        }
    }

    pub(crate) fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        let replaced = self.remove(square);
        self.squares[square] = Some(piece);
        self.occupancy[piece.side()] |= square;
        replaced
    }

    pub(crate) fn remove(&mut self, square: Square) -> Option<Piece> {
        if let Some(piece) = self.squares[square] {
            self.squares[square] = None;
            self.occupancy[piece.side()] &= !square.to_mask();
            return Some(piece);
        }
        None
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Side {
        self.side_to_move
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg(test)]
impl Position {
    pub fn set_contents(mut self, square: Square, value: Option<Piece>) -> Self {
        match value {
            Some(piece) => {
                self.place(square, piece);
            }
            None => {
                self.remove(square);
            }
        }
        self
    }
    pub fn set_turn(mut self, side: Side) -> Self {
        self.side_to_move = side;
        self
    }
    pub fn set_counter_strike(mut self, value: Option<Square>) -> Self {
        self.counter_strike = value;
        self
    }
    pub fn set_ply(mut self, value: u32) -> Self {
        self.ply = value;
        self
    }
}
