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

//! The position and move notations.
//!
//! A position is four whitespace-separated fields:
//! `<board> <side> <counter-strike> <ply>`. The board field is twelve
//! `/`-separated ranks of piece letters (uppercase = first side), `+`
//! prefixes for promoted pieces, and empty-run digits 1-12. A move is two
//! or three concatenated squares with an optional `+` promotion suffix.
//! Malformed input yields a typed error naming the offending field, never
//! a partially built position.

use strum::IntoEnumIterator;
use thiserror::Error;

use super::moves::Move;
use super::piece::{Piece, PieceKind, Side};
use super::position::Position;
use super::square::{File, Rank, Square};
use super::Turn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 4 position fields, found {0}")]
    FieldCount(usize),
    #[error("expected 12 board ranks, found {0}")]
    RankCount(usize),
    #[error("board rank {rank} covers {width} squares instead of 12")]
    RankWidth { rank: usize, width: usize },
    #[error("invalid piece letter '{0}'")]
    BadPieceLetter(char),
    #[error("'{0}' does not name a promotable piece")]
    NotPromotable(char),
    #[error("invalid empty-square run in board rank {0}")]
    BadRun(usize),
    #[error("invalid side-to-move field '{0}'")]
    BadSide(String),
    #[error("invalid counter-strike field '{0}'")]
    BadCounterStrike(String),
    #[error("invalid ply field '{0}'")]
    BadPly(String),
    #[error("invalid move string '{0}'")]
    BadMove(String),
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Encode only the board field.
pub fn encode_board(position: &Position) -> String {
    let mut out = String::new();
    for rank in Rank::iter() {
        if rank != Rank::RankA {
            out.push('/');
        }
        let mut run = 0;
        for file in File::iter().rev() {
            match position.contents(Square::new(file, rank)) {
                None => run += 1,
                Some(piece) => {
                    if run > 0 {
                        out.push_str(&run.to_string());
                        run = 0;
                    }
                    push_piece(&mut out, piece);
                }
            }
        }
        if run > 0 {
            out.push_str(&run.to_string());
        }
    }
    out
}

pub fn encode_position(position: &Position) -> String {
    let counter_strike = match position.counter_strike() {
        Some(square) => square.to_string(),
        None => "-".to_string(),
    };
    format!(
        "{} {} {} {}",
        encode_board(position),
        position.turn().notation(),
        counter_strike,
        position.ply()
    )
}

fn push_piece(out: &mut String, piece: &Piece) {
    // Safety: every board piece is written through a lettered base kind
    let letter = piece.base_kind().letter().unwrap();
    if piece.is_promoted() {
        out.push('+');
    }
    out.push(match piece.side() {
        Side::Black => letter.to_ascii_uppercase(),
        Side::White => letter,
    });
}

fn piece_from_letter(letter: char, promoted: bool) -> Result<Piece, ParseError> {
    let side = if letter.is_ascii_uppercase() {
        Side::Black
    } else {
        Side::White
    };
    let kind =
        PieceKind::from_letter(letter).ok_or(ParseError::BadPieceLetter(letter))?;
    if !promoted {
        return Ok(Piece::new(side, kind));
    }
    let target = kind
        .promotes_to()
        .ok_or(ParseError::NotPromotable(letter))?;
    Ok(Piece::promoted(side, target, kind))
}

pub fn decode_position(text: &str) -> Result<Position, ParseError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let rows: Vec<&str> = fields[0].split('/').collect();
    if rows.len() != 12 {
        return Err(ParseError::RankCount(rows.len()));
    }
    let mut pieces = Vec::new();
    for (rank_index, row) in rows.iter().enumerate() {
        let mut slot = 0usize; // columns left to right, file 12 first
        let mut chars = row.chars().peekable();
        while let Some(c) = chars.next() {
            if let Some(digit) = c.to_digit(10) {
                let mut run = digit as usize;
                if run == 1 {
                    // two-digit runs 10-12
                    if let Some(low) = chars.peek().and_then(|next| next.to_digit(10)) {
                        if low <= 2 {
                            run = 10 + low as usize;
                            chars.next();
                        }
                    }
                }
                if run == 0 || run > 12 {
                    return Err(ParseError::BadRun(rank_index));
                }
                slot += run;
            } else {
                let (letter, promoted) = if c == '+' {
                    (
                        chars.next().ok_or(ParseError::BadPieceLetter('+'))?,
                        true,
                    )
                } else {
                    (c, false)
                };
                let piece = piece_from_letter(letter, promoted)?;
                if slot >= 12 {
                    return Err(ParseError::RankWidth {
                        rank: rank_index,
                        width: slot + 1,
                    });
                }
                let square =
                    Square::new(File::from_index(11 - slot), Rank::from_index(rank_index));
                pieces.push((square, piece));
                slot += 1;
            }
        }
        if slot != 12 {
            return Err(ParseError::RankWidth {
                rank: rank_index,
                width: slot,
            });
        }
    }

    let side = match fields[1] {
        "b" => Side::Black,
        "w" => Side::White,
        other => return Err(ParseError::BadSide(other.to_string())),
    };
    let counter_strike = match fields[2] {
        "-" => None,
        other => Some(
            Square::try_from_str(other)
                .ok_or_else(|| ParseError::BadCounterStrike(other.to_string()))?,
        ),
    };
    let ply: u32 = fields[3]
        .parse()
        .map_err(|_| ParseError::BadPly(fields[3].to_string()))?;

    Ok(Position::from_parts(pieces, side, counter_strike, ply))
}

pub fn encode_move(mv: &Move) -> String {
    let mut out = mv.from.to_string();
    if let Some(square) = mv.midpoint {
        out.push_str(&square.to_string());
    }
    out.push_str(&mv.to.to_string());
    if mv.promote == Some(true) {
        out.push('+');
    }
    out
}

pub fn decode_move(text: &str) -> Result<Move, ParseError> {
    let bad = || ParseError::BadMove(text.to_string());
    let (body, promote) = match text.strip_suffix('+') {
        Some(body) => (body, true),
        None => (text, false),
    };
    let mut squares = Vec::new();
    let mut chars = body.chars().peekable();
    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.peek().copied() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            chars.next();
        }
        let rank = chars
            .next()
            .and_then(Rank::try_from_char)
            .ok_or_else(bad)?;
        let file = digits
            .parse::<usize>()
            .ok()
            .and_then(File::try_from_number)
            .ok_or_else(bad)?;
        squares.push(Square::new(file, rank));
    }
    match *squares.as_slice() {
        [from, to] => Ok(Move {
            from,
            to,
            midpoint: None,
            promote: Some(promote),
        }),
        [from, midpoint, to] => Ok(Move {
            from,
            to,
            midpoint: Some(midpoint),
            promote: Some(promote),
        }),
        _ => Err(bad()),
    }
}
