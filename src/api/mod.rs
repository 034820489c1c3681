//! Game server API client.
//!
//! This module handles the communication with a single game server: building
//! requests, decoding the response envelopes and classifying their status.
//!
//! # Modules
//!
//! - `requester` - HTTP client performing the four remote operations
//! - `response_structs` - Wire structures and the [`Reply`] envelope
//! - `status` - Status envelope and the [`classify`] function
//! - `lenient` - Deserializers for scalars sent as strings or numbers
//!
//! # Remote operations
//!
//! | Route | Parameters | Payload |
//! |---|---|---|
//! | `new_session` | player name, profanity filter, credential | identification, first question |
//! | `answer` | session, signature, step, answer id | next question |
//! | `cancel_answer` | session, signature, step | previous question |
//! | `list` | session, signature, step | guesses |

mod lenient;
mod requester;
mod response_structs;
mod status;

#[cfg(test)]
pub use crate::api::requester::MockRequester;
pub use crate::api::requester::{ApiRequester, Requester};
pub use crate::api::response_structs::{
    ElementWrapper, GuessElement, Identification, ListParameters, NewSessionParameters, Reply,
    StepInformation, decode,
};
pub use crate::api::status::{Classification, Level, Status, classify};
