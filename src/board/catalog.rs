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

//! Static movement and promotion tables.
//!
//! Patterns are written for Black (forward = negative `y`) and mirrored
//! for White. Step offsets reach their target regardless of intervening
//! occupancy (this is how the jumping moves work); slide offsets are unit
//! rays walked until blocked.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::piece::PieceKind;
use super::square::Offset;

use PieceKind::*;

/// A piece's raw movement pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub steps: &'static [Offset],
    pub slides: &'static [Offset],
}

const fn off(x: isize, y: isize) -> Offset {
    Offset::new(x, y)
}

const ORTHOGONALS: [Offset; 4] = [off(0, -1), off(0, 1), off(-1, 0), off(1, 0)];
const DIAGONALS: [Offset; 4] = [off(-1, -1), off(1, -1), off(-1, 1), off(1, 1)];
const NEIGHBORS: [Offset; 8] = [
    off(-1, -1), off(0, -1), off(1, -1),
    off(-1, 0),              off(1, 0),
    off(-1, 1),  off(0, 1),  off(1, 1),
];

// Every square within king-step distance 2.
const LION_AREA: [Offset; 24] = [
    off(-2, -2), off(-1, -2), off(0, -2), off(1, -2), off(2, -2),
    off(-2, -1), off(-1, -1), off(0, -1), off(1, -1), off(2, -1),
    off(-2, 0),  off(-1, 0),              off(1, 0),  off(2, 0),
    off(-2, 1),  off(-1, 1),  off(0, 1),  off(1, 1),  off(2, 1),
    off(-2, 2),  off(-1, 2),  off(0, 2),  off(1, 2),  off(2, 2),
];

const GOLD_STEPS: [Offset; 6] = [
    off(-1, -1), off(0, -1), off(1, -1), off(-1, 0), off(1, 0), off(0, 1),
];
const SILVER_STEPS: [Offset; 5] = [
    off(-1, -1), off(0, -1), off(1, -1), off(-1, 1), off(1, 1),
];
const COPPER_STEPS: [Offset; 4] = [off(-1, -1), off(0, -1), off(1, -1), off(0, 1)];
const LEOPARD_STEPS: [Offset; 6] = [
    off(-1, -1), off(0, -1), off(1, -1), off(-1, 1), off(0, 1), off(1, 1),
];
const TIGER_STEPS: [Offset; 7] = [
    off(-1, -1), off(1, -1),
    off(-1, 0), off(1, 0),
    off(-1, 1), off(0, 1), off(1, 1),
];
const ELEPHANT_STEPS: [Offset; 7] = [
    off(-1, -1), off(0, -1), off(1, -1),
    off(-1, 0), off(1, 0),
    off(-1, 1), off(1, 1),
];
const KIRIN_STEPS: [Offset; 8] = [
    off(-1, -1), off(1, -1), off(-1, 1), off(1, 1),
    off(0, -2), off(0, 2), off(-2, 0), off(2, 0),
];
const PHOENIX_STEPS: [Offset; 8] = [
    off(0, -1), off(0, 1), off(-1, 0), off(1, 0),
    off(-2, -2), off(2, -2), off(-2, 2), off(2, 2),
];
const STAG_STEPS: [Offset; 6] = [
    off(-1, -1), off(1, -1), off(-1, 0), off(1, 0), off(-1, 1), off(1, 1),
];
const FALCON_STEPS: [Offset; 2] = [off(0, -1), off(0, -2)];
const FALCON_SLIDES: [Offset; 7] = [
    off(-1, -1), off(1, -1),
    off(-1, 0), off(1, 0),
    off(-1, 1), off(0, 1), off(1, 1),
];
const EAGLE_STEPS: [Offset; 4] = [off(-1, -1), off(1, -1), off(-2, -2), off(2, -2)];
const EAGLE_SLIDES: [Offset; 6] = [
    off(0, -1),
    off(-1, 0), off(1, 0),
    off(-1, 1), off(0, 1), off(1, 1),
];

const FORWARD: [Offset; 1] = [off(0, -1)];
const VERTICALS: [Offset; 2] = [off(0, -1), off(0, 1)];
const SIDEWAYS: [Offset; 2] = [off(-1, 0), off(1, 0)];
const BACK_DIAGONALS: [Offset; 2] = [off(-1, 1), off(1, 1)];
const FORWARD_DIAGONALS: [Offset; 2] = [off(-1, -1), off(1, -1)];
const WHALE_SLIDES: [Offset; 4] = [off(0, -1), off(0, 1), off(-1, 1), off(1, 1)];
const HORSE_SLIDES: [Offset; 4] = [off(0, -1), off(0, 1), off(-1, -1), off(1, -1)];
const BOAR_SLIDES: [Offset; 6] = [
    off(-1, 0), off(1, 0), off(-1, -1), off(1, -1), off(-1, 1), off(1, 1),
];
const OX_SLIDES: [Offset; 6] = [
    off(0, -1), off(0, 1), off(-1, -1), off(1, -1), off(-1, 1), off(1, 1),
];

const NONE: [Offset; 0] = [];

impl PieceKind {
    pub fn pattern(&self) -> Pattern {
        match *self {
            King | Prince => Pattern { steps: &NEIGHBORS, slides: &NONE },
            Queen => Pattern { steps: &NONE, slides: &NEIGHBORS },
            Lion => Pattern { steps: &LION_AREA, slides: &NONE },
            DragonKing => Pattern { steps: &DIAGONALS, slides: &ORTHOGONALS },
            DragonHorse => Pattern { steps: &ORTHOGONALS, slides: &DIAGONALS },
            Rook => Pattern { steps: &NONE, slides: &ORTHOGONALS },
            Bishop => Pattern { steps: &NONE, slides: &DIAGONALS },
            Gold => Pattern { steps: &GOLD_STEPS, slides: &NONE },
            Silver => Pattern { steps: &SILVER_STEPS, slides: &NONE },
            Copper => Pattern { steps: &COPPER_STEPS, slides: &NONE },
            Leopard => Pattern { steps: &LEOPARD_STEPS, slides: &NONE },
            BlindTiger => Pattern { steps: &TIGER_STEPS, slides: &NONE },
            Kirin => Pattern { steps: &KIRIN_STEPS, slides: &NONE },
            Phoenix => Pattern { steps: &PHOENIX_STEPS, slides: &NONE },
            Lance => Pattern { steps: &NONE, slides: &FORWARD },
            ReverseChariot => Pattern { steps: &NONE, slides: &VERTICALS },
            SideMover => Pattern { steps: &VERTICALS, slides: &SIDEWAYS },
            VerticalMover => Pattern { steps: &SIDEWAYS, slides: &VERTICALS },
            Pawn => Pattern { steps: &FORWARD, slides: &NONE },
            GoBetween => Pattern { steps: &VERTICALS, slides: &NONE },
            DrunkElephant => Pattern { steps: &ELEPHANT_STEPS, slides: &NONE },
            FlyingStag => Pattern { steps: &STAG_STEPS, slides: &VERTICALS },
            FreeBoar => Pattern { steps: &NONE, slides: &BOAR_SLIDES },
            FlyingOx => Pattern { steps: &NONE, slides: &OX_SLIDES },
            Whale => Pattern { steps: &NONE, slides: &WHALE_SLIDES },
            WhiteHorse => Pattern { steps: &NONE, slides: &HORSE_SLIDES },
            HornedFalcon => Pattern { steps: &FALCON_STEPS, slides: &FALCON_SLIDES },
            SoaringEagle => Pattern { steps: &EAGLE_STEPS, slides: &EAGLE_SLIDES },
        }
    }

    pub fn promotes_to(&self) -> Option<PieceKind> {
        match *self {
            Pawn => Some(Gold),
            GoBetween => Some(DrunkElephant),
            Copper => Some(SideMover),
            Silver => Some(VerticalMover),
            Gold => Some(Rook),
            Leopard => Some(Bishop),
            BlindTiger => Some(FlyingStag),
            DrunkElephant => Some(Prince),
            Kirin => Some(Lion),
            Phoenix => Some(Queen),
            Lance => Some(WhiteHorse),
            ReverseChariot => Some(Whale),
            SideMover => Some(FreeBoar),
            VerticalMover => Some(FlyingOx),
            Rook => Some(DragonKing),
            Bishop => Some(DragonHorse),
            DragonKing => Some(SoaringEagle),
            DragonHorse => Some(HornedFalcon),
            King | Prince | Queen | Lion | FlyingStag | FreeBoar | FlyingOx | Whale
            | WhiteHorse | HornedFalcon | SoaringEagle => None,
        }
    }

    /// Notation letter (lowercase form). The promoted-only identities have
    /// none; they are always written through their base kind's letter.
    pub fn letter(&self) -> Option<char> {
        match *self {
            King => Some('k'),
            Queen => Some('q'),
            Lion => Some('n'),
            DragonKing => Some('d'),
            DragonHorse => Some('h'),
            Rook => Some('r'),
            Bishop => Some('b'),
            Gold => Some('g'),
            Silver => Some('s'),
            Copper => Some('c'),
            Leopard => Some('f'),
            BlindTiger => Some('t'),
            Kirin => Some('o'),
            Phoenix => Some('x'),
            Lance => Some('l'),
            ReverseChariot => Some('a'),
            SideMover => Some('m'),
            VerticalMover => Some('v'),
            Pawn => Some('p'),
            GoBetween => Some('i'),
            DrunkElephant => Some('e'),
            Prince | FlyingStag | FreeBoar | FlyingOx | Whale | WhiteHorse | HornedFalcon
            | SoaringEagle => None,
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        LETTERS.get(&c.to_ascii_lowercase()).copied()
    }

    /// First-step directions of the two-step movers (Black orientation).
    pub fn first_step_offsets(&self) -> &'static [Offset] {
        match *self {
            Lion => &NEIGHBORS,
            HornedFalcon => &FORWARD,
            SoaringEagle => &FORWARD_DIAGONALS,
            _ => &NONE,
        }
    }
}

static LETTERS: Lazy<HashMap<char, PieceKind>> = Lazy::new(|| {
    use strum::IntoEnumIterator;
    PieceKind::iter()
        .filter_map(|kind| kind.letter().map(|c| (c, kind)))
        .collect()
});
