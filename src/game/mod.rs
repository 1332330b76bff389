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

//! Game histories.
//!
//! A `Game` owns the starting notation and an append-only sequence of
//! move records; the position at any point is recomputed from the stored
//! notations, never unwound incrementally. A cursor makes review
//! navigation cheap and idempotent.

pub mod record;

use anyhow::{bail, Result};

use crate::board::{
    decode_position, encode_position, Move, MoveClasses, MoveRecord, MoveState, Position, Rules,
    Square,
};

/// Where `jump_to` should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Start,
    End,
    /// After `n` moves from the start; `Ply(0)` is the starting position.
    Ply(usize),
}

#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    start_sfen: String,
    start_comment: String,
    records: Vec<MoveRecord>,
    /// Number of records currently applied; 0 is the starting position.
    cursor: usize,
    state: MoveState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Game {
    pub fn new(rules: Rules) -> Self {
        let position = Position::startpos();
        Self {
            rules,
            start_sfen: encode_position(&position),
            start_comment: String::new(),
            records: Vec::new(),
            cursor: 0,
            state: MoveState::new(position, rules),
        }
    }

    /// Start from an arbitrary position notation.
    pub fn from_sfen(text: &str, rules: Rules) -> Result<Self> {
        let position = decode_position(text)?;
        Ok(Self {
            rules,
            start_sfen: encode_position(&position),
            start_comment: String::new(),
            records: Vec::new(),
            cursor: 0,
            state: MoveState::new(position, rules),
        })
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn start_sfen(&self) -> &str {
        &self.start_sfen
    }

    #[inline]
    pub fn start_comment(&self) -> &str {
        &self.start_comment
    }

    #[inline]
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor == self.records.len()
    }

    /// The position at the cursor.
    pub fn position(&self) -> &Position {
        self.state.position()
    }

    /// Destination classes for the piece on `from`, at the cursor.
    pub fn classify(&self, from: Square) -> MoveClasses {
        self.state.classify(from)
    }

    /// Validate and apply a move at the cursor. Any abandoned tail beyond
    /// the cursor is truncated first; on rejection nothing changes.
    pub fn attempt_move(&mut self, mv: Move) -> Result<&MoveRecord> {
        let record = self.state.commit(mv)?;
        self.records.truncate(self.cursor);
        self.records.push(record);
        self.cursor += 1;
        // Safety: just pushed
        Ok(self.records.last().unwrap())
    }

    /// Take back the last move, replaying the remaining history from its
    /// stored notation. Returns the removed record.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        if self.records.is_empty() {
            return None;
        }
        let record = self.records.pop()?;
        self.cursor = self.cursor.min(self.records.len());
        self.rebuild();
        Some(record)
    }

    /// Move the review cursor; the position there is decoded from stored
    /// notation, so jumping is order-independent.
    pub fn jump_to(&mut self, target: JumpTarget) -> Result<()> {
        let index = match target {
            JumpTarget::Start => 0,
            JumpTarget::End => self.records.len(),
            JumpTarget::Ply(n) => {
                if n > self.records.len() {
                    bail!("jump target {n} is beyond the {} recorded moves", self.records.len());
                }
                n
            }
        };
        self.cursor = index;
        self.rebuild();
        Ok(())
    }

    /// The position after `index` moves, decoded from the stored notation.
    pub fn position_at(&self, index: usize) -> Result<Position> {
        let text = if index == 0 {
            &self.start_sfen
        } else {
            match self.records.get(index - 1) {
                Some(record) => &record.resulting_sfen,
                None => bail!("no position at index {index}"),
            }
        };
        Ok(decode_position(text)?)
    }

    /// Attach a comment to the starting position.
    pub fn set_start_comment(&mut self, text: impl Into<String>) {
        self.start_comment = text.into();
    }

    /// Attach a comment to the record of move number `ply` (1-based).
    pub fn set_comment(&mut self, ply: usize, text: impl Into<String>) -> Result<()> {
        match ply.checked_sub(1).and_then(|i| self.records.get_mut(i)) {
            Some(record) => {
                record.comment = text.into();
                Ok(())
            }
            None => bail!("no move {ply} to annotate"),
        }
    }

    /// Serialize the full history in the export grammar.
    pub fn export(&self) -> String {
        record::encode(&self.start_sfen, &self.start_comment, &self.records)
    }

    /// Load an exported game. A moves-only string continues from the
    /// current end of history instead of resetting the start.
    pub fn import(&mut self, text: &str) -> Result<()> {
        let parsed = record::parse(text)?;
        if let Some(start) = parsed.start {
            *self = Self::from_sfen(&start, self.rules)?;
            self.start_comment = parsed.start_comment;
        } else {
            self.jump_to(JumpTarget::End)?;
        }
        for (notation, comment) in parsed.moves {
            let mv: Move = notation.parse()?;
            self.attempt_move(mv)?;
            if !comment.is_empty() {
                let ply = self.cursor;
                self.set_comment(ply, comment)?;
            }
        }
        Ok(())
    }

    /// Reconstruct the working state at the cursor from stored notation.
    fn rebuild(&mut self) {
        // Safety: stored notations were produced by the encoder
        let position = self.position_at(self.cursor).unwrap();
        let keys = std::iter::once(repetition_key_of(&self.start_sfen)).chain(
            self.records[..self.cursor]
                .iter()
                .map(|record| repetition_key_of(&record.resulting_sfen)),
        );
        self.state = MoveState::with_history(position, self.rules, keys);
    }
}

/// The (board, side) prefix of a stored position notation.
fn repetition_key_of(sfen: &str) -> String {
    let mut fields = sfen.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(board), Some(side)) => format!("{board} {side}"),
        _ => sfen.to_string(),
    }
}
