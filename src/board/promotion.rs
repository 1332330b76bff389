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

use super::piece::{Piece, PieceKind};
use super::position::{in_promotion_zone, is_final_rank};
use super::square::Square;
use super::Rules;

/// Whether the move from `from` to `to` earns a promotion choice.
pub fn eligible(piece: &Piece, from: Square, to: Square, captures: bool, rules: &Rules) -> bool {
    if piece.is_promoted() || piece.kind().promotes_to().is_none() {
        return false;
    }
    let side = piece.side();
    let enters_zone = in_promotion_zone(to, side) && !in_promotion_zone(from, side);
    let in_zone_capture = in_promotion_zone(from, side) && captures;
    let pawn_to_final = piece.kind() == PieceKind::Pawn && is_final_rank(to, side);
    let lance_to_final = rules.lance_final_rank
        && piece.kind() == PieceKind::Lance
        && is_final_rank(to, side)
        && !captures;
    enters_zone || in_zone_capture || pawn_to_final || lance_to_final
}

/// Reverse-promotion eligibility, used only when illegal moves are
/// permitted: the forward conditions with origin and destination swapped,
/// keyed on the piece's pre-promotion identity.
pub fn reverse_eligible(
    piece: &Piece,
    from: Square,
    to: Square,
    captures: bool,
    rules: &Rules,
) -> bool {
    let base = match piece.base() {
        Some(base) if piece.is_promoted() => base,
        _ => return false,
    };
    let side = piece.side();
    let exits_zone = in_promotion_zone(from, side) && !in_promotion_zone(to, side);
    let in_zone_capture = in_promotion_zone(from, side) && captures;
    let pawn_from_final = base == PieceKind::Pawn && is_final_rank(from, side);
    let lance_from_final = rules.lance_final_rank
        && base == PieceKind::Lance
        && is_final_rank(from, side)
        && !captures;
    exits_zone || in_zone_capture || pawn_from_final || lance_from_final
}

/// Promote a piece to its catalog target. A piece already promoted, or
/// with no target, comes back unchanged.
pub fn promote(piece: Piece) -> Piece {
    match piece.kind().promotes_to() {
        Some(target) if !piece.is_promoted() => {
            Piece::promoted(piece.side(), target, piece.kind())
        }
        _ => piece,
    }
}

/// Restore a promoted piece to its pre-promotion identity.
pub fn unpromote(piece: Piece) -> Piece {
    match piece.base() {
        Some(base) => Piece::new(piece.side(), base),
        None => piece,
    }
}

/// The transform `apply_move` runs when a promotion was chosen: forward
/// for an unpromoted piece, reverse for a promoted one.
pub(crate) fn toggle(piece: Piece) -> Piece {
    if piece.is_promoted() {
        unpromote(piece)
    } else {
        promote(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::piece::Side;
    use PieceKind::*;

    fn sq(name: &str) -> Square {
        Square::try_from_str(name).unwrap()
    }

    #[test]
    fn test_eligible_on_zone_entry() {
        let rules = Rules::default();
        let rook = Piece::new(Side::Black, Rook);
        assert!(eligible(&rook, sq("5e"), sq("5d"), false, &rules));
        assert!(eligible(&rook, sq("5h"), sq("5a"), false, &rules));
        // wholly outside, or moving deeper inside without a capture
        assert!(!eligible(&rook, sq("5h"), sq("5e"), false, &rules));
        assert!(!eligible(&rook, sq("5d"), sq("5b"), false, &rules));
        // white mirrors
        let rook = Piece::new(Side::White, Rook);
        assert!(eligible(&rook, sq("5h"), sq("5i"), false, &rules));
        assert!(!eligible(&rook, sq("5h"), sq("5g"), false, &rules));
    }

    #[test]
    fn test_eligible_on_in_zone_capture() {
        let rules = Rules::default();
        let rook = Piece::new(Side::Black, Rook);
        assert!(eligible(&rook, sq("5d"), sq("5b"), true, &rules));
        assert!(!eligible(&rook, sq("5e"), sq("5f"), true, &rules));
    }

    #[test]
    fn test_pawn_final_rank() {
        let rules = Rules::default();
        let pawn = Piece::new(Side::Black, Pawn);
        // already inside the zone, quiet move to the last rank
        assert!(eligible(&pawn, sq("5b"), sq("5a"), false, &rules));
        assert!(!eligible(&pawn, sq("5c"), sq("5b"), false, &rules));
    }

    #[test]
    fn test_lance_final_rank_variant() {
        let lance = Piece::new(Side::Black, Lance);
        assert!(!eligible(&lance, sq("5b"), sq("5a"), false, &Rules::default()));
        let variant = Rules {
            lance_final_rank: true,
            ..Rules::default()
        };
        assert!(eligible(&lance, sq("5b"), sq("5a"), false, &variant));
        // capturing on the last rank is already covered by the zone rule
        assert!(eligible(&lance, sq("5b"), sq("5a"), true, &variant));
    }

    #[test]
    fn test_never_eligible_without_target() {
        let rules = Rules::default();
        for kind in [King, Queen, Lion] {
            let piece = Piece::new(Side::Black, kind);
            assert!(!eligible(&piece, sq("5e"), sq("5d"), true, &rules));
        }
        let dragon = Piece::promoted(Side::Black, DragonKing, Rook);
        assert!(!eligible(&dragon, sq("5e"), sq("5d"), true, &rules));
    }

    #[test]
    fn test_promote_is_idempotent() {
        let rook = Piece::new(Side::Black, Rook);
        let dragon = promote(rook);
        assert_eq!(dragon, Piece::promoted(Side::Black, DragonKing, Rook));
        assert_eq!(promote(dragon), dragon);
        assert_eq!(promote(Piece::new(Side::Black, King)), Piece::new(Side::Black, King));
    }

    #[test]
    fn test_unpromote_restores_base() {
        let dragon = promote(Piece::new(Side::White, Rook));
        assert_eq!(unpromote(dragon), Piece::new(Side::White, Rook));
        let rook = Piece::new(Side::White, Rook);
        assert_eq!(unpromote(rook), rook);
    }

    #[test]
    fn test_reverse_eligibility_mirrors_forward() {
        let rules = Rules {
            permit_illegal: true,
            ..Rules::default()
        };
        let dragon = Piece::promoted(Side::Black, DragonKing, Rook);
        // leaving the zone
        assert!(reverse_eligible(&dragon, sq("5d"), sq("5e"), false, &rules));
        // capture inside the zone
        assert!(reverse_eligible(&dragon, sq("5b"), sq("5a"), true, &rules));
        // staying outside
        assert!(!reverse_eligible(&dragon, sq("5f"), sq("5e"), false, &rules));
        // unpromoted pieces have nothing to reverse
        let rook = Piece::new(Side::Black, Rook);
        assert!(!reverse_eligible(&rook, sq("5d"), sq("5e"), false, &rules));
        // promoted pawn leaving the final rank
        let tokin = Piece::promoted(Side::Black, Gold, Pawn);
        assert!(reverse_eligible(&tokin, sq("5a"), sq("5b"), false, &rules));
    }
}
