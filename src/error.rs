//! Error taxonomy of the client.
//!
//! Errors fall in three families:
//!
//! - **Selection errors** raised while looking for a server able to host a session
//!   ([`Error::UnsupportedCombination`], [`Error::EndpointUnavailable`],
//!   [`Error::GroupUnavailable`], [`Error::ServerNotFound`]).
//! - **Protocol errors** raised by the game server once it answered
//!   ([`Error::Protocol`], [`Error::SessionLost`]).
//! - **Caller errors** detected locally before any round trip
//!   ([`Error::InvalidAnswer`], [`Error::NothingToUndo`], [`Error::SessionTerminated`]).
//!
//! Transport and decoding failures keep their own variants so callers can apply a
//! different retry policy to them than to protocol-level failures.

use thiserror::Error;

use crate::servers::{Category, Language};

/// Errors returned by the guessing game client.
#[derive(Debug, Error)]
pub enum Error {
    /// No endpoint group is registered for this language and category.
    #[error("unsupported combination of language {language} and category {category}")]
    UnsupportedCombination {
        /// Requested language
        language: Language,
        /// Requested category
        category: Category,
    },

    /// The endpoint answered session creation with "server down".
    ///
    /// Only meaningful while establishing a session, the builder moves on to the
    /// next candidate of the group.
    #[error("server {0} is down")]
    EndpointUnavailable(String),

    /// Every endpoint of the group failed its probe.
    #[error("no server of the {language}/{category} group is reachable")]
    GroupUnavailable {
        /// Language of the exhausted group
        language: Language,
        /// Category of the exhausted group
        category: Category,
    },

    /// No candidate could host a session for this language and category.
    #[error("no server found for {language}/{category}")]
    ServerNotFound {
        /// Requested language
        language: Language,
        /// Requested category
        category: Category,
    },

    /// The server answered with an error status other than "server down".
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server bound to an established session went down.
    #[error("session lost, server {0} is down")]
    SessionLost(String),

    /// The answer is not one of the five accepted values.
    #[error("invalid answer {0:?}")]
    InvalidAnswer(String),

    /// Undo was requested on the first question.
    #[error("nothing to undo on the first question")]
    NothingToUndo,

    /// The session ended with a confirmed guess.
    #[error("session is terminated")]
    SessionTerminated,

    /// The credential provider could not supply a credential.
    #[error("credential unavailable: {0}")]
    Credential(String),

    /// Connection, timeout or HTTP level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not the expected JSON document.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type of the client.
pub type Result<T> = std::result::Result<T, Error>;
