//! Guessr - A client for the Akinator guessing game API.
//!
//! The game is served by redundant servers partitioned by language and
//! category. Guessr picks a live server, establishes a session on it and drives
//! the question and answer protocol turn by turn, up to a ranked list of guesses.
//!
//! # Architecture
//!
//! - [`api`] - HTTP requests, response envelopes and status classification
//! - [`credentials`] - Providers of the credential required by session creation
//! - [`servers`] - Endpoints, the catalog of server groups and server selection
//! - [`session`] - The session protocol engine and the game data structures
//! - [`builder`] - Establishment of a session with failover across a group
//! - [`config`] - Configuration file and environment loading
//! - [`commands`] - Scripted moves of the binary
//! - [`error`] - The error taxonomy
//!
//! # Failover
//!
//! Failover only happens before a session exists: session ids and step counters
//! are bound to the server they were created on. A server going down afterwards
//! loses the session with [`Error::SessionLost`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use guessr::api::ApiRequester;
//! use guessr::builder::{ClientBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_USER_AGENT};
//! use guessr::credentials::StaticCredential;
//! use guessr::servers::Catalog;
//! use guessr::session::{Answer, DEFAULT_GUESS_THRESHOLD};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), guessr::Error> {
//! let requester = Arc::new(ApiRequester::new(
//!     DEFAULT_USER_AGENT,
//!     DEFAULT_CONNECT_TIMEOUT,
//!     StaticCredential::new("credential"),
//! )?);
//! let mut session = ClientBuilder::new(requester, Arc::new(Catalog::builtin()))
//!     .build()
//!     .await?;
//!
//! while let Some(question) = session.question() {
//!     println!("{}", question);
//!     session.answer(Answer::DontKnow).await?;
//!     if let Some(guess) = session.suggest_guess(DEFAULT_GUESS_THRESHOLD).await? {
//!         println!("I think of {}", guess);
//!         session.confirm_guess(&guess)?;
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod builder;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod servers;
pub mod session;

pub use crate::error::{Error, Result};
