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

//! The lion-trading safeguards and the two-step move machinery.
//!
//! Two independent filters gate any capture of a lion: the counter-strike
//! rule (after a non-lion takes a lion, the reply may take a lion with a
//! non-lion only on the recorded square) and the bridge-capture rule (a
//! lion may take a distant lion only when it is unprotected). Both lean on
//! the influence calculator's exclusion support so an attacker never blocks
//! its own view of the defenders.

use super::movegen::{self, oriented};
use super::moves::{Move, MoveState};
use super::piece::{PieceKind, Side};
use super::piece::Piece;
use super::position::Position;
use super::square::{Mask, Offset, Square};
use super::{Rules, Turn};

/// The counter-strike square after a move, from the fixed case table keyed
/// on what the mover was and where lions were captured.
pub fn next_counter_strike(
    piece: &Piece,
    from: Square,
    midpoint: Option<Square>,
    to: Square,
    captured: Option<Piece>,
    captured_at_midpoint: Option<Piece>,
) -> Option<Square> {
    // A lion mover always clears the field; lion-takes-lion is settled by
    // the bridge rule alone.
    if piece.is_lion() {
        return None;
    }
    let lion_at_to = captured.is_some_and(|target| target.is_lion());
    let lion_at_midpoint = captured_at_midpoint.is_some_and(|target| target.is_lion());
    match (lion_at_to, lion_at_midpoint) {
        // direct capture at the destination
        (true, false) => Some(to),
        // double capture whose second victim is the lion
        (true, true) => Some(to),
        // hit-and-run: the lion fell at the midpoint and the capturer moved on
        (false, true) if to != from => midpoint,
        // capture without further movement (return to origin)
        (false, true) => midpoint,
        // any other move clears the field
        (false, false) => None,
    }
}

/// Whether the counter-strike rule lets `attacker` capture the lion on
/// `capture_square`. A lion may always capture a lion.
pub fn counter_strike_permits(
    position: &Position,
    attacker: &Piece,
    capture_square: Square,
) -> bool {
    if attacker.is_lion() {
        return true;
    }
    match position.counter_strike() {
        Some(square) => square == capture_square,
        None => true,
    }
}

/// Whether the bridge-capture rule lets the lion on `from` capture the
/// lion on `to`. Adjacent captures always pass; a distant capture requires
/// the target to be unprotected, computed with the attacker's origin (and
/// midpoint, for a double move) treated as transparent.
pub fn bridge_capture_permits(
    position: &Position,
    rules: &Rules,
    from: Square,
    midpoint: Option<Square>,
    to: Square,
) -> bool {
    if from.distance(to) <= 1 {
        return true;
    }
    let defender = match position.contents(to) {
        Some(target) => target.side(),
        None => return true,
    };
    let mut excluded = from.to_mask();
    if let Some(square) = midpoint {
        excluded |= square;
    }
    if movegen::influence(position, excluded)[defender].contains(to) {
        return false;
    }
    if rules.midpoint_protection {
        // Eating the lone pawn-like protector en route does not make the
        // target count as unprotected.
        if let Some(square) = midpoint {
            let bridged = position
                .contents(square)
                .is_some_and(|p| p.side() == defender && p.kind().is_pawnlike());
            if bridged && movegen::influence(position, from.to_mask())[defender].contains(to) {
                return false;
            }
        }
    }
    true
}

/// First-step squares for the two-step mover on `from`: the allowed
/// directions for its kind, minus squares held by its own side.
pub fn first_steps(position: &Position, from: Square) -> Mask {
    let piece = match position.contents(from) {
        Some(piece) if piece.is_double_mover() => *piece,
        _ => return Mask::empty(),
    };
    let mut mask = Mask::empty();
    for offset in piece.kind().first_step_offsets() {
        if let Some(square) = from + oriented(*offset, piece.side()) {
            mask |= square;
        }
    }
    mask - position.pieces(piece.side())
}

/// Second-step squares from a chosen midpoint. The lion continues to any
/// neighbor of the midpoint (the origin included); the directional movers
/// continue along the same direction or return to the origin.
pub fn second_steps(position: &Position, origin: Square, midpoint: Square) -> Mask {
    let piece = match position.contents(origin) {
        Some(piece) if piece.is_double_mover() => *piece,
        _ => return Mask::empty(),
    };
    let mut mask = Mask::empty();
    match piece.kind() {
        PieceKind::Lion => {
            for offset in PieceKind::King.pattern().steps {
                if let Some(square) = midpoint + *offset {
                    mask |= square;
                }
            }
        }
        _ => {
            mask |= origin;
            if let Some(square) = midpoint + (midpoint - origin) {
                mask |= square;
            }
        }
    }
    // own pieces block everywhere but the vacated origin
    mask - (position.pieces(piece.side()) - origin)
}

/// Whether the side to move is exempt from the repetition rule: a lone
/// royal currently attacked, or two adjacent royals both capturable by one
/// enemy double-mover in a single two-step move.
pub fn repetition_exempt(position: &Position) -> bool {
    let side = position.turn();
    let royals = position.royal_squares(side);
    match royals.len() {
        1 => {
            let attacks = movegen::influence(position, Mask::empty())[!side];
            // Safety: len() == 1
            attacks.contains(royals.first().unwrap())
        }
        2 => {
            let mut squares = royals.iter();
            // Safety: len() == 2
            let first = squares.next().unwrap();
            let second = squares.next().unwrap();
            first.is_adjacent(second) && double_mover_forks(position, !side, first, second)
        }
        _ => false,
    }
}

fn double_mover_forks(position: &Position, attacker: Side, first: Square, second: Square) -> bool {
    for square in position.pieces(attacker).iter() {
        // Safety: occupancy masks track contents exactly
        let piece = position.contents(square).unwrap();
        let forks = match piece.kind() {
            // take the nearer royal, then its adjacent partner
            PieceKind::Lion => square.distance(first) == 1 || square.distance(second) == 1,
            PieceKind::HornedFalcon => {
                forks_along(square, oriented(Offset::new(0, -1), attacker), first, second)
            }
            PieceKind::SoaringEagle => {
                forks_along(square, oriented(Offset::new(-1, -1), attacker), first, second)
                    || forks_along(square, oriented(Offset::new(1, -1), attacker), first, second)
            }
            _ => false,
        };
        if forks {
            return true;
        }
    }
    false
}

fn forks_along(from: Square, step: Offset, first: Square, second: Square) -> bool {
    let near = from + step;
    let far = near.and_then(|square| square + step);
    matches!(
        (near, far),
        (Some(a), Some(b)) if (a == first && b == second) || (a == second && b == first)
    )
}

/// Whether any of `side`'s royals stands on an attacked square.
pub fn in_check(position: &Position, side: Side) -> bool {
    let attacks = movegen::influence(position, Mask::empty())[!side];
    position
        .royal_squares(side)
        .iter()
        .any(|square| attacks.contains(square))
}

/// Interactive two-step selection. Hosts hold one of these while the user
/// picks the midpoint and then the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoubleMoveState {
    #[default]
    Idle,
    FirstStepChosen { origin: Square, midpoint: Square },
}

impl DoubleMoveState {
    /// Enter the first-step state, if `midpoint` is a valid first step for
    /// the two-step mover on `origin`.
    pub fn choose_first(position: &Position, origin: Square, midpoint: Square) -> Option<Self> {
        first_steps(position, origin)
            .contains(midpoint)
            .then_some(Self::FirstStepChosen { origin, midpoint })
    }

    /// Candidate destinations for the pending second step, filtered by the
    /// same rules a committed move faces.
    pub fn destinations(&self, state: &MoveState) -> Mask {
        match *self {
            Self::Idle => Mask::empty(),
            Self::FirstStepChosen { origin, midpoint } => state.classify_second(origin, midpoint),
        }
    }

    /// Build the committed move, leaving promotion to be resolved.
    pub fn commit(&self, destination: Square) -> Option<Move> {
        match *self {
            Self::Idle => None,
            Self::FirstStepChosen { origin, midpoint } => {
                Some(Move::double(origin, midpoint, destination))
            }
        }
    }

    pub fn cancel(self) -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::piece::PieceKind::*;

    fn sq(name: &str) -> Square {
        Square::try_from_str(name).unwrap()
    }
    fn black(kind: PieceKind) -> Piece {
        Piece::new(Side::Black, kind)
    }
    fn white(kind: PieceKind) -> Piece {
        Piece::new(Side::White, kind)
    }

    #[test]
    fn test_counter_strike_set_by_direct_capture() {
        let rook = black(Rook);
        let square = next_counter_strike(
            &rook,
            sq("6f"),
            None,
            sq("6c"),
            Some(white(Lion)),
            None,
        );
        assert_eq!(square, Some(sq("6c")));
    }

    #[test]
    fn test_counter_strike_set_by_hit_and_run() {
        let falcon = black(HornedFalcon);
        let square = next_counter_strike(
            &falcon,
            sq("6f"),
            Some(sq("6e")),
            sq("6d"),
            None,
            Some(white(Lion)),
        );
        assert_eq!(square, Some(sq("6e")));
    }

    #[test]
    fn test_counter_strike_set_by_igui_capture() {
        let falcon = black(HornedFalcon);
        let square = next_counter_strike(
            &falcon,
            sq("6f"),
            Some(sq("6e")),
            sq("6f"),
            None,
            Some(white(Lion)),
        );
        assert_eq!(square, Some(sq("6e")));
    }

    #[test]
    fn test_counter_strike_double_capture_prefers_destination() {
        let eagle = black(SoaringEagle);
        let square = next_counter_strike(
            &eagle,
            sq("6f"),
            Some(sq("5e")),
            sq("4d"),
            Some(white(Lion)),
            Some(white(Lion)),
        );
        assert_eq!(square, Some(sq("4d")));
    }

    #[test]
    fn test_counter_strike_cleared_by_lion_mover() {
        let lion = black(Lion);
        let square = next_counter_strike(
            &lion,
            sq("6f"),
            None,
            sq("6e"),
            Some(white(Lion)),
            None,
        );
        assert_eq!(square, None);
        // the promoted kirin counts as a lion mover too
        let promoted = Piece::promoted(Side::Black, Lion, Kirin);
        let square = next_counter_strike(
            &promoted,
            sq("6f"),
            None,
            sq("6e"),
            Some(white(Lion)),
            None,
        );
        assert_eq!(square, None);
    }

    #[test]
    fn test_counter_strike_cleared_by_quiet_move() {
        let rook = black(Rook);
        assert_eq!(
            next_counter_strike(&rook, sq("6f"), None, sq("6e"), Some(white(Pawn)), None),
            None
        );
        assert_eq!(
            next_counter_strike(&rook, sq("6f"), None, sq("6e"), None, None),
            None
        );
    }

    #[test]
    fn test_counter_strike_filter() {
        let position = Position::empty().set_counter_strike(Some(sq("6c")));
        let rook = black(Rook);
        assert!(counter_strike_permits(&position, &rook, sq("6c")));
        assert!(!counter_strike_permits(&position, &rook, sq("8c")));
        // lions are never restricted
        assert!(counter_strike_permits(&position, &black(Lion), sq("8c")));
        // no square recorded, no restriction
        let open = Position::empty();
        assert!(counter_strike_permits(&open, &rook, sq("8c")));
    }

    #[test]
    fn test_bridge_capture_adjacent_always_allowed() {
        let position = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("6e"), Some(white(Lion)))
            .set_contents(sq("6d"), Some(white(Pawn)));
        // protected, but adjacent
        assert!(bridge_capture_permits(
            &position,
            &Rules::default(),
            sq("6f"),
            None,
            sq("6e")
        ));
    }

    #[test]
    fn test_bridge_capture_blocks_protected_distant_lion() {
        let position = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("6d"), Some(white(Lion)))
            .set_contents(sq("6c"), Some(white(Gold)));
        assert!(!bridge_capture_permits(
            &position,
            &Rules::default(),
            sq("6f"),
            None,
            sq("6d")
        ));
        let unprotected = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("6d"), Some(white(Lion)));
        assert!(bridge_capture_permits(
            &unprotected,
            &Rules::default(),
            sq("6f"),
            None,
            sq("6d")
        ));
    }

    #[test]
    fn test_bridge_capture_attacker_origin_is_transparent() {
        // the attacking lion sits between the defender's rook and the
        // target; with the origin excluded the rook protects the target
        let position = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("6h"), Some(white(Rook)))
            .set_contents(sq("6d"), Some(white(Lion)));
        assert!(!bridge_capture_permits(
            &position,
            &Rules::default(),
            sq("6f"),
            None,
            sq("6d")
        ));
    }

    #[test]
    fn test_bridge_capture_midpoint_protection_variant() {
        // the pawn on the midpoint is the target lion's only protector
        // (white moves toward rank l, so the pawn on 6c guards 6d)
        let position = Position::empty()
            .set_contents(sq("6b"), Some(black(Lion)))
            .set_contents(sq("6c"), Some(white(Pawn)))
            .set_contents(sq("6d"), Some(white(Lion)));
        let base = Rules::default();
        assert!(bridge_capture_permits(
            &position,
            &base,
            sq("6b"),
            Some(sq("6c")),
            sq("6d")
        ));
        let strict = Rules {
            midpoint_protection: true,
            ..Rules::default()
        };
        assert!(!bridge_capture_permits(
            &position,
            &strict,
            sq("6b"),
            Some(sq("6c")),
            sq("6d")
        ));
    }

    #[test]
    fn test_first_steps_by_kind() {
        let position = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("5f"), Some(black(Pawn)))
            .set_contents(sq("7f"), Some(white(Pawn)));
        let mask = first_steps(&position, sq("6f"));
        assert_eq!(mask.len(), 7);
        assert!(!mask.contains(sq("5f")));
        assert!(mask.contains(sq("7f")));

        let position = Position::empty().set_contents(sq("6f"), Some(black(HornedFalcon)));
        assert_eq!(first_steps(&position, sq("6f")), sq("6e").to_mask());

        let position = Position::empty().set_contents(sq("6f"), Some(white(SoaringEagle)));
        let mask = first_steps(&position, sq("6f"));
        assert_eq!(mask.len(), 2);
        assert!(mask.contains(sq("5g")));
        assert!(mask.contains(sq("7g")));

        let position = Position::empty().set_contents(sq("6f"), Some(black(Rook)));
        assert!(first_steps(&position, sq("6f")).is_empty());
    }

    #[test]
    fn test_second_steps_lion() {
        let position = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("5d"), Some(black(Pawn)));
        let mask = second_steps(&position, sq("6f"), sq("6e"));
        // all neighbors of the midpoint, origin included, own pawn excluded
        assert_eq!(mask.len(), 7);
        assert!(mask.contains(sq("6f")));
        assert!(mask.contains(sq("6d")));
        assert!(!mask.contains(sq("5d")));
    }

    #[test]
    fn test_second_steps_directional() {
        let position = Position::empty().set_contents(sq("6f"), Some(black(HornedFalcon)));
        let mask = second_steps(&position, sq("6f"), sq("6e"));
        assert_eq!(mask.len(), 2);
        assert!(mask.contains(sq("6f")));
        assert!(mask.contains(sq("6d")));

        let position = Position::empty().set_contents(sq("6f"), Some(black(SoaringEagle)));
        let mask = second_steps(&position, sq("6f"), sq("7e"));
        assert_eq!(mask.len(), 2);
        assert!(mask.contains(sq("6f")));
        assert!(mask.contains(sq("8d")));
    }

    #[test]
    fn test_repetition_exempt_lone_royal_in_check() {
        let position = Position::empty()
            .set_contents(sq("6l"), Some(black(King)))
            .set_contents(sq("6a"), Some(white(Lance)));
        assert!(repetition_exempt(&position));
        let safe = Position::empty()
            .set_contents(sq("6l"), Some(black(King)))
            .set_contents(sq("5a"), Some(white(Lance)));
        assert!(!repetition_exempt(&safe));
    }

    #[test]
    fn test_repetition_exempt_double_royal_lion_fork() {
        let position = Position::empty()
            .set_contents(sq("6l"), Some(black(King)))
            .set_contents(sq("6k"), Some(Piece::promoted(Side::Black, Prince, DrunkElephant)))
            .set_contents(sq("7j"), Some(white(Lion)));
        assert!(repetition_exempt(&position));
        // too far for the two-step capture of both
        let far = Position::empty()
            .set_contents(sq("6l"), Some(black(King)))
            .set_contents(sq("6k"), Some(Piece::promoted(Side::Black, Prince, DrunkElephant)))
            .set_contents(sq("9j"), Some(white(Lion)));
        assert!(!far.royal_squares(Side::Black).is_empty());
        assert!(!repetition_exempt(&far));
    }

    #[test]
    fn test_repetition_exempt_double_royal_falcon_line() {
        // the white falcon's lion power runs down the file: royals must be
        // at one and two steps along it
        let position = Position::empty()
            .set_contents(sq("6i"), Some(black(King)))
            .set_contents(sq("6j"), Some(Piece::promoted(Side::Black, Prince, DrunkElephant)))
            .set_contents(sq("6h"), Some(white(HornedFalcon)));
        assert!(repetition_exempt(&position));
        let askew = Position::empty()
            .set_contents(sq("6i"), Some(black(King)))
            .set_contents(sq("7j"), Some(Piece::promoted(Side::Black, Prince, DrunkElephant)))
            .set_contents(sq("6h"), Some(white(HornedFalcon)));
        assert!(!repetition_exempt(&askew));
    }

    #[test]
    fn test_repetition_exempt_double_royal_eagle_diagonal() {
        let position = Position::empty()
            .set_contents(sq("5i"), Some(black(King)))
            .set_contents(sq("4j"), Some(Piece::promoted(Side::Black, Prince, DrunkElephant)))
            .set_contents(sq("6h"), Some(white(SoaringEagle)));
        assert!(repetition_exempt(&position));
    }

    #[test]
    fn test_in_check_sees_both_royals() {
        let position = Position::empty()
            .set_contents(sq("6l"), Some(black(King)))
            .set_contents(
                sq("3i"),
                Some(Piece::promoted(Side::Black, Prince, DrunkElephant)),
            )
            .set_contents(sq("3a"), Some(white(Lance)));
        // the lance bears down its file onto the prince
        assert!(in_check(&position, Side::Black));
        assert!(!in_check(&position, Side::White));
        let clear = Position::empty()
            .set_contents(sq("6l"), Some(black(King)))
            .set_contents(sq("3a"), Some(white(Lance)));
        assert!(!in_check(&clear, Side::Black));
    }

    #[test]
    fn test_double_move_state_flow() {
        let position = Position::empty().set_contents(sq("6f"), Some(black(Lion)));
        let state = MoveState::new(position.clone(), Rules::default());
        assert_eq!(
            DoubleMoveState::choose_first(&position, sq("6f"), sq("4f")),
            None
        );
        let pending = DoubleMoveState::choose_first(&position, sq("6f"), sq("6e")).unwrap();
        assert!(pending.destinations(&state).contains(sq("6d")));
        let mv = pending.commit(sq("6d")).unwrap();
        assert_eq!(mv.from, sq("6f"));
        assert_eq!(mv.midpoint, Some(sq("6e")));
        assert_eq!(mv.to, sq("6d"));
        assert_eq!(pending.cancel(), DoubleMoveState::Idle);
    }

    #[test]
    fn test_second_step_candidates_respect_bridge_rule() {
        // a protected distant lion stays off the second-step menu
        let position = Position::empty()
            .set_contents(sq("6f"), Some(black(Lion)))
            .set_contents(sq("6d"), Some(white(Lion)))
            .set_contents(sq("6c"), Some(white(Gold)));
        let state = MoveState::new(position.clone(), Rules::default());
        let pending = DoubleMoveState::choose_first(&position, sq("6f"), sq("6e")).unwrap();
        let mask = pending.destinations(&state);
        assert!(!mask.contains(sq("6d")));
        assert!(mask.contains(sq("6f")));
        assert!(mask.contains(sq("5d")));
    }
}
