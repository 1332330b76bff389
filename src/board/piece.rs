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

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

use Side::{Black, White};

/// Black moves first and sits on the rank-l edge; the notation letter is
/// `b`. White mirrors from the rank-a edge.
#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    pub const fn notation(&self) -> char {
        match self {
            Black => 'b',
            White => 'w',
        }
    }

    /// One step toward the opponent's home edge.
    pub const fn forward(&self) -> isize {
        match self {
            Black => -1,
            White => 1,
        }
    }
}

impl Not for Side {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Black => White,
            White => Black,
        }
    }
}

/// A movement identity. Promotion rewrites a piece's kind to its target
/// kind, so a promoted Rook *is* a `DragonKing` here; the eight
/// promoted-only identities never appear unpromoted on a legal board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PieceKind {
    King,
    Prince,
    Queen,
    Lion,
    DragonKing,
    DragonHorse,
    Rook,
    Bishop,
    Gold,
    Silver,
    Copper,
    Leopard,
    BlindTiger,
    Kirin,
    Phoenix,
    Lance,
    ReverseChariot,
    SideMover,
    VerticalMover,
    Pawn,
    GoBetween,
    DrunkElephant,
    FlyingStag,
    FreeBoar,
    FlyingOx,
    Whale,
    WhiteHorse,
    HornedFalcon,
    SoaringEagle,
}

use PieceKind::*;

impl PieceKind {
    /// Royal kinds: losing the last of these loses the game, and they share
    /// the repetition-exception treatment.
    pub fn is_royal(&self) -> bool {
        matches!(*self, King | Prince)
    }

    /// The kind whose capture the counter-strike and bridge-capture rules
    /// gate. Covers the promoted Kirin, whose kind is `Lion`.
    pub fn is_lion(&self) -> bool {
        matches!(*self, Lion)
    }

    /// The two-step movers.
    pub fn is_double_mover(&self) -> bool {
        matches!(*self, Lion | HornedFalcon | SoaringEagle)
    }

    /// Low-value kinds whose lone protection of a lion is overridden by the
    /// midpoint-protection rule.
    pub fn is_pawnlike(&self) -> bool {
        matches!(*self, Pawn | GoBetween)
    }
}

/// A piece on the board. `kind` is the current movement identity and
/// `base` the pre-promotion identity; `base` is `None` exactly when the
/// piece is unpromoted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    side: Side,
    kind: PieceKind,
    promoted: bool,
    base: Option<PieceKind>,
}

impl Piece {
    #[inline]
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self {
            side,
            kind,
            promoted: false,
            base: None,
        }
    }

    #[inline]
    pub const fn promoted(side: Side, kind: PieceKind, base: PieceKind) -> Self {
        Self {
            side,
            kind,
            promoted: true,
            base: Some(base),
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    #[inline]
    pub fn base(&self) -> Option<PieceKind> {
        self.base
    }

    /// The identity the notation letter is drawn from.
    #[inline]
    pub fn base_kind(&self) -> PieceKind {
        self.base.unwrap_or(self.kind)
    }

    #[inline]
    pub fn is_royal(&self) -> bool {
        self.kind.is_royal()
    }

    #[inline]
    pub fn is_lion(&self) -> bool {
        self.kind.is_lion()
    }

    #[inline]
    pub fn is_double_mover(&self) -> bool {
        self.kind.is_double_mover()
    }
}

/// A pair of values indexed by side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(black: T, white: T) -> Self {
        Self((black, white))
    }

    pub fn black(&self) -> &T {
        &self.0 .0
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn white(&self) -> &T {
        &self.0 .1
    }
    pub fn white_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.black().hash(state);
        self.white().hash(state);
    }
}

impl<T> Index<Side> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Side) -> &Self::Output {
        match index {
            Black => self.black(),
            White => self.white(),
        }
    }
}

impl<T> IndexMut<Side> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        match index {
            Black => self.black_mut(),
            White => self.white_mut(),
        }
    }
}
