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

//! The game-export grammar.
//!
//! A game is written `<position> [{comment}] (<move> [{comment}])*`, where
//! each `{comment}` annotates the position or move it follows. Inside a
//! comment, `}`, `\` and newline are escaped as `\}`, `\\` and `\n`. A
//! string whose first token carries no `/` has no position field and is a
//! moves-only continuation of whatever is already loaded.

use crate::board::{MoveRecord, ParseError};

/// The decoded pieces of an export string. Move notations are kept as
/// text; the importer validates them against the live position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedGame {
    pub start: Option<String>,
    pub start_comment: String,
    pub moves: Vec<(String, String)>,
}

pub fn encode(start_sfen: &str, start_comment: &str, records: &[MoveRecord]) -> String {
    let mut out = String::from(start_sfen);
    if !start_comment.is_empty() {
        out.push_str(&format!(" {{{}}}", escape(start_comment)));
    }
    for record in records {
        out.push(' ');
        out.push_str(&record.notation);
        if !record.comment.is_empty() {
            out.push_str(&format!(" {{{}}}", escape(&record.comment)));
        }
    }
    out
}

pub fn parse(text: &str) -> Result<ParsedGame, ParseError> {
    let mut chars = text.chars().peekable();
    let mut parsed = ParsedGame::default();

    skip_whitespace(&mut chars);
    if chars.peek().is_some_and(|c| *c != '{') {
        let first = next_token(&mut chars);
        if first.contains('/') {
            // the board field, then side, counter-strike and ply
            let mut fields = vec![first];
            for _ in 0..3 {
                skip_whitespace(&mut chars);
                let field = next_token(&mut chars);
                if field.is_empty() {
                    return Err(ParseError::FieldCount(fields.len()));
                }
                fields.push(field);
            }
            parsed.start = Some(fields.join(" "));
        } else {
            parsed.moves.push((first, String::new()));
        }
    }

    loop {
        skip_whitespace(&mut chars);
        match chars.peek() {
            None => return Ok(parsed),
            Some('{') => {
                chars.next();
                let comment = scan_comment(&mut chars)?;
                match parsed.moves.last_mut() {
                    Some((_, slot)) => *slot = comment,
                    None => parsed.start_comment = comment,
                }
            }
            Some(_) => {
                let token = next_token(&mut chars);
                parsed.moves.push((token, String::new()));
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn scan_comment(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<String, ParseError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(ParseError::UnterminatedComment),
            Some('}') => return Ok(out),
            Some('\\') => match chars.next() {
                None => return Err(ParseError::UnterminatedComment),
                Some('n') => out.push('\n'),
                Some(escaped) => out.push(escaped),
            },
            Some(c) => out.push(c),
        }
    }
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn next_token(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(c) = chars.peek().copied() {
        if c.is_whitespace() || c == '{' {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}
