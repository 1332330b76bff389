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

//! Raw square expansion and whole-board attack maps.
//!
//! `reachable` answers "where could this piece physically go" with no rule
//! filtering beyond occupancy; `influence` aggregates coverage per side.
//! Coverage includes the first occupied square on a ray regardless of whose
//! piece stands there, so a defended friendly square registers as covered.
//! Squares in the exclusion mask neither contribute coverage nor block rays.

use super::piece::{Pair, Piece, Side};
use super::position::Position;
use super::square::{Mask, Offset, Square};

pub(crate) fn oriented(offset: Offset, side: Side) -> Offset {
    match side {
        Side::Black => offset,
        Side::White => offset.flipped(),
    }
}

/// Squares covered by `piece` standing on `from`, with `excluded` squares
/// treated as transparent.
pub fn coverage(position: &Position, from: Square, piece: &Piece, excluded: Mask) -> Mask {
    let pattern = piece.kind().pattern();
    let occupied = position.occupied() - excluded;
    let mut mask = Mask::empty();
    for offset in pattern.steps {
        if let Some(square) = from + oriented(*offset, piece.side()) {
            mask |= square;
        }
    }
    for ray in pattern.slides {
        let step = oriented(*ray, piece.side());
        let mut next = from + step;
        while let Some(square) = next {
            mask |= square;
            if occupied.contains(square) {
                break;
            }
            next = square + step;
        }
    }
    mask
}

/// The raw "could physically reach" set for the piece on `from`: its
/// coverage minus squares held by its own side. Empty if the square is.
pub fn reachable(position: &Position, from: Square) -> Mask {
    match position.contents(from) {
        Some(piece) => {
            coverage(position, from, piece, Mask::empty()) - position.pieces(piece.side())
        }
        None => Mask::empty(),
    }
}

/// Per-side attack maps for the whole position. Pieces standing on
/// `excluded` squares are skipped and their squares do not block rays.
/// Valid only for the exact position it was computed from.
pub fn influence(position: &Position, excluded: Mask) -> Pair<Mask> {
    let mut result = Pair::new(Mask::empty(), Mask::empty());
    for side in [Side::Black, Side::White] {
        for square in (position.pieces(side) - excluded).iter() {
            // Safety: occupancy masks track contents exactly
            let piece = position.contents(square).as_ref().unwrap();
            result[side] |= coverage(position, square, piece, excluded);
        }
    }
    result
}
