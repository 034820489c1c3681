//! Parsing of scripted moves.
//!
//! A game played by the binary is scripted as a comma separated list of moves,
//! each move being an answer token or `b`/`back` to undo the last answer.

use std::str::FromStr;

use log::debug;

use crate::{Error, Result, session::Answer};

/// A move of a scripted game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Answer the current question
    Answer(Answer),
    /// Undo the last answer
    Undo,
}

impl FromStr for Move {
    type Err = Error;

    /// Parses a single move.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAnswer`] when the token is neither an answer nor an undo.
    ///
    /// # Examples
    ///
    /// ```
    /// use guessr::commands::Move;
    /// use guessr::session::Answer;
    ///
    /// assert_eq!("y".parse::<Move>().unwrap(), Move::Answer(Answer::Yes));
    /// assert_eq!("back".parse::<Move>().unwrap(), Move::Undo);
    /// assert!("maybe".parse::<Move>().is_err());
    /// ```
    fn from_str(token: &str) -> Result<Self> {
        match token.trim().to_lowercase().as_str() {
            "b" | "back" | "undo" => Ok(Move::Undo),
            _ => Ok(Move::Answer(token.parse()?)),
        }
    }
}

/// Parses a comma separated script of moves.
///
/// Empty tokens are skipped, the first invalid token fails the whole script so
/// that nothing is sent for a mistyped script.
///
/// # Errors
///
/// [`Error::InvalidAnswer`] on the first invalid token.
pub fn parse_script(script: &str) -> Result<Vec<Move>> {
    let moves = script
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(Move::from_str)
        .collect::<Result<Vec<_>>>()?;

    debug!("parsed script {:?} -> {:?}", script, moves);
    Ok(moves)
}
