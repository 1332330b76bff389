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
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::lion;
use super::movegen;
use super::piece::{Piece, Side};
use super::position::Position;
use super::promotion;
use super::sfen;
use super::square::{Mask, Square};
use super::{Rules, Turn};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("the piece on {0} belongs to the side not on move")]
    WrongSide(Square),
    #[error("destination is not reachable")]
    Unreachable,
    #[error("only two-step movers may pass through a midpoint")]
    NotDoubleMover,
    #[error("invalid two-step path")]
    BadDoubleStep,
    #[error("counter-strike rule forbids capturing the lion there")]
    CounterStrike,
    #[error("bridge-capture rule forbids taking the protected lion")]
    BridgeCapture,
    #[error("move would repeat a prior position")]
    Repetition,
    #[error("promotion choice required before the move can be committed")]
    PromotionChoice,
    #[error("promotion is not available for this move")]
    PromotionNotAllowed,
}
use MoveError::*;

/// A candidate move. `midpoint` is set only for an explicit two-step path;
/// `promote` is `None` when the caller has not yet answered the promotion
/// question.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub midpoint: Option<Square>,
    pub promote: Option<bool>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            midpoint: None,
            promote: None,
        }
    }

    pub fn double(from: Square, midpoint: Square, to: Square) -> Self {
        Self {
            from,
            to,
            midpoint: Some(midpoint),
            promote: None,
        }
    }

    pub fn promoting(mut self, promote: bool) -> Self {
        self.promote = Some(promote);
        self
    }

    /// The no-op double-move skip: back to an unchanged origin.
    pub fn is_turn_skip(&self) -> bool {
        self.from == self.to && self.midpoint.is_none()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", sfen::encode_move(self))
    }
}

impl FromStr for Move {
    type Err = sfen::ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        sfen::decode_move(s)
    }
}

/// The three-way classification of destinations for one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveClasses {
    pub legal: Mask,
    /// Repetition-blocked, playable only with promotion.
    pub promotion_only: Mask,
    /// The complement of the reachable set; populated only when illegal
    /// moves are permitted, for display.
    pub illegal: Mask,
}

/// A committed move as the game history stores it. Immutable once
/// appended, except for the annotation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub midpoint: Option<Square>,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub captured_at_midpoint: Option<Piece>,
    pub promoted: bool,
    pub notation: String,
    pub resulting_sfen: String,
    pub comment: String,
}

/// A position plus everything needed to answer legality questions about
/// it: the rule configuration and the occurrence counts of every (board,
/// side) pair seen so far, the current position included.
#[derive(Debug, Clone)]
pub struct MoveState {
    position: Position,
    rules: Rules,
    repetitions: HashMap<String, u32>,
}

impl Default for MoveState {
    fn default() -> Self {
        Self::new(Position::default(), Rules::default())
    }
}

impl Turn for MoveState {
    fn turn(&self) -> Side {
        self.position.turn()
    }
}

impl AsRef<Position> for MoveState {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl MoveState {
    pub fn new(position: Position, rules: Rules) -> Self {
        let key = position.repetition_key();
        Self::with_history(position, rules, [key])
    }

    /// Rebuild a state from replayed history. `prior_keys` must hold the
    /// repetition key of every position seen so far, the current one
    /// included (starting position plus each recorded resulting position).
    pub fn with_history<I>(position: Position, rules: Rules, prior_keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut repetitions = HashMap::new();
        for key in prior_keys {
            *repetitions.entry(key).or_insert(0) += 1;
        }
        Self {
            position,
            rules,
            repetitions,
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    fn seen(&self, key: &str) -> u32 {
        self.repetitions.get(key).copied().unwrap_or(0)
    }

    /// Classify every destination for the piece on `from`.
    pub fn classify(&self, from: Square) -> MoveClasses {
        let mut result = MoveClasses::default();
        let piece = match self.position.contents(from) {
            Some(piece) => *piece,
            None => return result,
        };
        if self.rules.permit_illegal {
            result.legal = movegen::reachable(&self.position, from);
            result.illegal = (!result.legal) - from;
            return result;
        }
        if piece.side() != self.position.turn() {
            return result;
        }
        let exempt = lion::repetition_exempt(&self.position);
        for to in movegen::reachable(&self.position, from).iter() {
            if self.special_rules(&piece, from, None, to).is_err() {
                continue;
            }
            let captures = self.position.contents(to).is_some();
            if !exempt && self.repeats(from, None, to, false) {
                if promotion::eligible(&piece, from, to, captures, &self.rules) {
                    result.promotion_only |= to;
                }
                continue;
            }
            result.legal |= to;
        }
        result
    }

    /// Legal second-step destinations once a midpoint is chosen: the raw
    /// continuation set filtered by the special rules, with the midpoint
    /// as an extra exclusion.
    pub fn classify_second(&self, origin: Square, midpoint: Square) -> Mask {
        let piece = match self.position.contents(origin) {
            Some(piece) => *piece,
            None => return Mask::empty(),
        };
        let raw = lion::second_steps(&self.position, origin, midpoint);
        if self.rules.permit_illegal {
            return raw;
        }
        let mut mask = Mask::empty();
        for to in raw.iter() {
            if self.special_rules(&piece, origin, Some(midpoint), to).is_ok() {
                mask |= to;
            }
        }
        mask
    }

    /// Structural checks plus the empty-midpoint collapse. Rule filters
    /// are not applied here.
    pub fn normalize(&self, mv: Move) -> Result<Move, MoveError> {
        let piece = match self.position.contents(mv.from) {
            Some(piece) => *piece,
            None => return Err(EmptySquare(mv.from)),
        };
        if !self.rules.permit_illegal && piece.side() != self.position.turn() {
            return Err(WrongSide(mv.from));
        }
        if let Some(midpoint) = mv.midpoint {
            if !piece.is_double_mover() {
                return Err(NotDoubleMover);
            }
            if !lion::first_steps(&self.position, mv.from).contains(midpoint) {
                return Err(BadDoubleStep);
            }
            if !lion::second_steps(&self.position, mv.from, midpoint).contains(mv.to) {
                return Err(BadDoubleStep);
            }
            if self.position.is_vacant(midpoint) {
                // nothing happened there; the move collapses to its
                // single-step equivalent (turn skips included)
                return Ok(Move {
                    midpoint: None,
                    ..mv
                });
            }
            return Ok(mv);
        }
        if mv.is_turn_skip() {
            if !piece.is_double_mover() {
                return Err(Unreachable);
            }
            let empty_first_steps =
                lion::first_steps(&self.position, mv.from) - self.position.occupied();
            if empty_first_steps.is_empty() {
                return Err(Unreachable);
            }
        }
        Ok(mv)
    }

    /// Run the full pipeline and resolve the promotion flag. The returned
    /// move always carries `promote: Some(..)` and is safe to apply.
    pub fn validate(&self, mv: Move) -> Result<Move, MoveError> {
        let mv = self.normalize(mv)?;
        // Safety: normalize checked occupancy
        let piece = (*self.position.contents(mv.from)).unwrap();

        if !self.rules.permit_illegal {
            if mv.midpoint.is_none()
                && !mv.is_turn_skip()
                && !movegen::reachable(&self.position, mv.from).contains(mv.to)
            {
                return Err(Unreachable);
            }
            self.special_rules(&piece, mv.from, mv.midpoint, mv.to)?;
        }

        let captures = (mv.to != mv.from && self.position.contents(mv.to).is_some())
            || mv.midpoint.is_some();
        let forward = promotion::eligible(&piece, mv.from, mv.to, captures, &self.rules);
        let reverse = self.rules.permit_illegal
            && promotion::reverse_eligible(&piece, mv.from, mv.to, captures, &self.rules);
        let promote = match mv.promote {
            Some(true) if !(forward || reverse) => return Err(PromotionNotAllowed),
            Some(choice) => choice,
            None if forward || reverse => return Err(PromotionChoice),
            None => false,
        };

        if !self.rules.permit_illegal
            && !lion::repetition_exempt(&self.position)
            && self.repeats(mv.from, mv.midpoint, mv.to, promote)
        {
            return Err(Repetition);
        }
        Ok(mv.promoting(promote))
    }

    /// Validate and apply, producing the record the game history stores.
    pub fn commit(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        let mv = self.validate(mv)?;
        // Safety: validate resolved the choice
        let promote = mv.promote.unwrap();
        let applied = self
            .position
            .apply_move(mv.from, mv.midpoint, mv.to, promote);
        let resulting_sfen = sfen::encode_position(&self.position);
        *self
            .repetitions
            .entry(self.position.repetition_key())
            .or_insert(0) += 1;
        Ok(MoveRecord {
            from: mv.from,
            to: mv.to,
            midpoint: mv.midpoint,
            piece: applied.piece,
            captured: applied.captured,
            captured_at_midpoint: applied.captured_at_midpoint,
            promoted: applied.promoted,
            notation: sfen::encode_move(&mv),
            resulting_sfen,
            comment: String::new(),
        })
    }

    /// The counter-strike and bridge-capture filters for one candidate.
    fn special_rules(
        &self,
        piece: &Piece,
        from: Square,
        midpoint: Option<Square>,
        to: Square,
    ) -> Result<(), MoveError> {
        if let Some(square) = midpoint {
            if let Some(target) = self.position.contents(square) {
                if target.side() != piece.side()
                    && target.is_lion()
                    && !lion::counter_strike_permits(&self.position, piece, square)
                {
                    return Err(CounterStrike);
                }
            }
        }
        if to != from {
            if let Some(target) = self.position.contents(to) {
                if target.side() != piece.side() && target.is_lion() {
                    if !lion::counter_strike_permits(&self.position, piece, to) {
                        return Err(CounterStrike);
                    }
                    if piece.is_lion()
                        && !lion::bridge_capture_permits(
                            &self.position,
                            &self.rules,
                            from,
                            midpoint,
                            to,
                        )
                    {
                        return Err(BridgeCapture);
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether the configured policy forbids the position this move
    /// would produce.
    fn repeats(&self, from: Square, midpoint: Option<Square>, to: Square, promote: bool) -> bool {
        let mut resulting = self.position.clone();
        resulting.apply_move(from, midpoint, to, promote);
        self.rules
            .repetition
            .forbids(self.seen(&resulting.repetition_key()))
    }
}
