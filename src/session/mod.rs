//! Game sessions.
//!
//! # Modules
//!
//! - `structs` - Answers, questions, guesses and the session lifecycle
//! - `engine` - The [`Session`] driving a game on its endpoint

mod engine;
mod structs;

pub use crate::session::engine::{DEFAULT_GUESS_THRESHOLD, Session};
pub use crate::session::structs::{Answer, Guess, Question, SessionState};
