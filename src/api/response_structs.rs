//! Response structures of the game server API.
//!
//! Every response is an envelope made of a `completion` status and operation
//! specific `parameters`:
//!
//! ```text
//! {
//!   "completion": "OK",
//!   "parameters": { ... }
//! }
//! ```
//!
//! [`decode`] turns a response body into a [`Reply`], which separates the shared
//! status from the payload of the operation.

use std::fmt;

use log::debug;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    Result,
    api::{
        lenient,
        status::{Level, Status},
    },
};

/// Raw envelope, before the parameters are decoded.
#[derive(Deserialize, Debug)]
struct RawEnvelope {
    completion: String,
    #[serde(default)]
    parameters: Option<serde_json::Value>,
}

/// Decoded response of one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// The server accepted the call, with an OK or WARN status.
    ///
    /// The payload is absent when the server has nothing to return, such as a
    /// `WARN - NO QUESTION` answer.
    Success {
        /// Status of the response
        status: Status,
        /// Operation specific payload
        payload: Option<T>,
    },
    /// The server rejected the call with a KO status.
    Failure(Status),
}

impl<T> Reply<T> {
    /// Creates a successful reply with an OK status.
    pub fn ok(payload: T) -> Self {
        Reply::Success {
            status: Status::ok(),
            payload: Some(payload),
        }
    }

    /// Creates a failed reply.
    pub fn failure(reason: &str) -> Self {
        Reply::Failure(Status::error(reason))
    }

    /// Returns the status of the response, whether it succeeded or not.
    pub fn status(&self) -> &Status {
        match self {
            Reply::Success { status, .. } => status,
            Reply::Failure(status) => status,
        }
    }
}

/// Decodes a response body.
///
/// The parameters of an OK response must match `T`. The parameters of a WARN
/// response are best effort: when they do not match, the payload is absent.
///
/// # Errors
///
/// [`crate::Error::Decode`] when the body is not an envelope, or when the
/// parameters of an OK response do not match `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<Reply<T>> {
    let envelope: RawEnvelope = serde_json::from_str(body)?;
    let status = Status::from_completion(&envelope.completion);

    let payload = match (status.level, envelope.parameters) {
        (Level::Error, _) => return Ok(Reply::Failure(status)),
        (_, None) => None,
        (Level::Ok, Some(parameters)) => Some(serde_json::from_value(parameters)?),
        (Level::Warning, Some(parameters)) => match serde_json::from_value(parameters) {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!("ignore parameters of warning {}: {}", status, e);
                None
            }
        },
    };

    Ok(Reply::Success { status, payload })
}

/// Parameters of `new_session`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewSessionParameters {
    /// Identity of the created session
    pub identification: Identification,
    /// First question of the session
    pub step_information: StepInformation,
}

/// Server issued identity of a session.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// Session id
    #[serde(deserialize_with = "lenient::string")]
    pub session: String,
    /// Session signature
    #[serde(deserialize_with = "lenient::string")]
    pub signature: String,
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "session={}, signature={}", self.session, self.signature)
    }
}

/// A question, as sent by `new_session`, `answer` and `cancel_answer`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StepInformation {
    /// Localized text of the question
    pub question: String,
    /// Step of the question, starting at 0
    #[serde(deserialize_with = "lenient::number")]
    pub step: u32,
    /// Progression towards a guess, between 0 and 100
    #[serde(deserialize_with = "lenient::number")]
    pub progression: f64,
    /// Id of the question
    #[serde(rename = "questionid", default, deserialize_with = "lenient::string")]
    pub question_id: String,
}

/// Parameters of `list`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ListParameters {
    /// Guesses, in the order of the server
    #[serde(default)]
    pub elements: Vec<ElementWrapper>,
}

/// Wrapper object around each guess of a `list` response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ElementWrapper {
    pub element: GuessElement,
}

/// A guess, as sent by `list`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GuessElement {
    /// Id of the guessed subject
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Localized name of the subject
    pub name: String,
    /// Probability of the guess, between 0 and 1
    #[serde(rename = "proba", deserialize_with = "lenient::probability")]
    pub probability: f64,
    /// Localized description of the subject
    #[serde(default)]
    pub description: Option<String>,
    /// URL of a picture of the subject
    #[serde(default)]
    pub absolute_picture_path: Option<String>,
    /// Whether the server flags the subject as explicit
    #[serde(rename = "corrupt", default, deserialize_with = "lenient::flag")]
    pub explicit: bool,
}

impl fmt::Display for GuessElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, name={}, probability={}",
            self.id, self.name, self.probability
        )
    }
}
