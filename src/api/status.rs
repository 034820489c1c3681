//! Status envelope carried by every game server response, and its classification.
//!
//! Each response holds a `completion` string such as `OK`, `WARN - NO QUESTION`
//! or `KO - SERVER DOWN`. [`Status`] is its decoded form and [`classify`] is the
//! single place deciding what a status means to the caller.

use std::fmt;

/// Severity of a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// The call succeeded
    Ok,
    /// The call succeeded with a remark, such as no question left
    Warning,
    /// The call failed
    Error,
}

/// Decoded status envelope of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Severity of the status
    pub level: Level,
    /// Optional explanation given by the server
    pub reason: Option<String>,
}

impl Status {
    /// Decodes a `completion` string.
    ///
    /// The level and the reason are separated by ` - `. An unknown level is
    /// considered an error whose reason is the whole completion string, so that
    /// nothing the server says is silently taken for a success.
    ///
    /// # Examples
    ///
    /// ```
    /// use guessr::api::{Level, Status};
    ///
    /// let status = Status::from_completion("KO - SERVER DOWN");
    /// assert_eq!(status.level, Level::Error);
    /// assert_eq!(status.reason.as_deref(), Some("SERVER DOWN"));
    /// ```
    pub fn from_completion(completion: &str) -> Self {
        let completion = completion.trim();
        let (level, reason) = match completion.split_once(" - ") {
            Some((level, reason)) => (level.trim(), Some(reason.trim().to_owned())),
            None => (completion, None),
        };

        let level = match level {
            "OK" => Level::Ok,
            "WARN" => Level::Warning,
            "KO" => Level::Error,
            _ => {
                return Status {
                    level: Level::Error,
                    reason: Some(completion.to_owned()),
                };
            }
        };

        Status { level, reason }
    }

    /// Creates an OK status without reason.
    pub fn ok() -> Self {
        Status {
            level: Level::Ok,
            reason: None,
        }
    }

    /// Creates a warning status.
    pub fn warning(reason: &str) -> Self {
        Status {
            level: Level::Warning,
            reason: Some(reason.to_owned()),
        }
    }

    /// Creates an error status.
    pub fn error(reason: &str) -> Self {
        Status {
            level: Level::Error,
            reason: Some(reason.to_owned()),
        }
    }

    /// Returns whether the reason equals `reason`, ignoring case.
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reason
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(reason))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level = match self.level {
            Level::Ok => "OK",
            Level::Warning => "WARN",
            Level::Error => "KO",
        };
        match &self.reason {
            Some(reason) => write!(f, "{} - {}", level, reason),
            None => f.write_str(level),
        }
    }
}

/// What a [`Status`] means to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Proceed
    Ok,
    /// Proceed, the reason may be worth logging
    Warning(Option<String>),
    /// The endpoint is down, another endpoint may be tried if no session exists yet
    EndpointUnavailable,
    /// Any other failure, fatal to the current call
    ProtocolError(String),
}

/// Reason given by a server that cannot host sessions at the moment.
const SERVER_DOWN: &str = "server down";

/// Classifies a status.
///
/// An error whose reason is "server down" (in any case) means the endpoint is
/// unavailable, any other error is a protocol error.
///
/// # Examples
///
/// ```
/// use guessr::api::{Classification, Status, classify};
///
/// assert_eq!(classify(&Status::error("Server Down")), Classification::EndpointUnavailable);
/// assert_eq!(
///     classify(&Status::error("unknown session")),
///     Classification::ProtocolError("unknown session".to_owned())
/// );
/// ```
pub fn classify(status: &Status) -> Classification {
    match status.level {
        Level::Ok => Classification::Ok,
        Level::Warning => Classification::Warning(status.reason.clone()),
        Level::Error if status.has_reason(SERVER_DOWN) => Classification::EndpointUnavailable,
        Level::Error => {
            Classification::ProtocolError(status.reason.clone().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_completion_ok() {
        assert_eq!(Status::from_completion("OK"), Status::ok());
    }

    #[test]
    fn test_from_completion_warning() {
        let status = Status::from_completion("WARN - NO QUESTION");
        assert_eq!(status.level, Level::Warning);
        assert_eq!(status.reason.as_deref(), Some("NO QUESTION"));
    }

    #[test]
    fn test_from_completion_error() {
        let status = Status::from_completion("KO - ELEM LIST IS EMPTY");
        assert_eq!(status.level, Level::Error);
        assert!(status.has_reason("elem list is empty"));
    }

    #[test]
    fn test_from_completion_error_without_reason() {
        let status = Status::from_completion("KO");
        assert_eq!(status.level, Level::Error);
        assert_eq!(status.reason, None);
        assert_eq!(
            classify(&status),
            Classification::ProtocolError(String::new())
        );
    }

    #[test]
    fn test_from_completion_unknown_level() {
        let status = Status::from_completion("TIMEOUT");
        assert_eq!(status.level, Level::Error);
        assert_eq!(status.reason.as_deref(), Some("TIMEOUT"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::ok().to_string(), "OK");
        assert_eq!(Status::warning("NO QUESTION").to_string(), "WARN - NO QUESTION");
        assert_eq!(
            Status::from_completion("KO - SERVER DOWN").to_string(),
            "KO - SERVER DOWN"
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&Status::ok()), Classification::Ok);
        assert_eq!(
            classify(&Status::warning("NO QUESTION")),
            Classification::Warning(Some("NO QUESTION".to_owned()))
        );
        assert_eq!(
            classify(&Status::from_completion("KO - SERVER DOWN")),
            Classification::EndpointUnavailable
        );
        assert_eq!(
            classify(&Status::error("server down")),
            Classification::EndpointUnavailable
        );
        assert_eq!(
            classify(&Status::from_completion("KO - TECHNICAL ERROR")),
            Classification::ProtocolError("TECHNICAL ERROR".to_owned())
        );
    }

    #[test]
    fn test_classify_server_down_needs_exact_reason() {
        assert_eq!(
            classify(&Status::error("server down for maintenance")),
            Classification::ProtocolError("server down for maintenance".to_owned())
        );
    }
}
