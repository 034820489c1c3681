//! Session protocol engine.
//!
//! A [`Session`] is bound to the endpoint it was created on: the session id,
//! signature and step counter are only meaningful there. The engine therefore
//! never switches endpoint once a session exists; a server going down
//! mid-session loses the session.
//!
//! # Lifecycle
//!
//! ```text
//!              establish
//!                  │
//!                  ▼
//!   answer ──► Active ◄──── reject_guess / undo_answer
//!   undo   │     │  ▲
//!   list   └─────┘  │
//!                │  │
//!  suggest_guess │  │
//!                ▼  │
//!           GuessPending ──── confirm_guess ───► Terminated
//!
//!   any state ── server down ──► Lost
//! ```

use std::{collections::HashSet, sync::Arc};

use log::{debug, info, warn};

use crate::{
    Error, Result,
    api::{Classification, Identification, Reply, Requester, Status, classify},
    servers::Endpoint,
    session::{Answer, Guess, Question, SessionState},
};

/// Reason of the `list` error sent while the server has no guess yet.
const EMPTY_GUESS_LIST: &str = "elem list is empty";

/// Default probability above which a guess is suggested.
pub const DEFAULT_GUESS_THRESHOLD: f64 = 0.85;

/// Why a reply was rejected by the server.
enum Rejection {
    /// The server is down
    EndpointDown,
    /// Any other error
    Protocol(String),
}

/// Returns the payload of a reply, or why it was rejected.
///
/// Warnings are logged and otherwise treated as successes.
fn accept<T>(reply: Reply<T>) -> std::result::Result<Option<T>, Rejection> {
    match reply {
        Reply::Success { status, payload } => {
            if let Classification::Warning(reason) = classify(&status) {
                warn!("server warning: {}", reason.unwrap_or_default());
            }
            Ok(payload)
        }
        Reply::Failure(status) => Err(rejection(&status)),
    }
}

fn rejection(status: &Status) -> Rejection {
    match classify(status) {
        Classification::EndpointUnavailable => Rejection::EndpointDown,
        Classification::ProtocolError(reason) => Rejection::Protocol(reason),
        // A failure always carries an error status, keep whatever was sent
        Classification::Ok | Classification::Warning(_) => Rejection::Protocol(status.to_string()),
    }
}

/// A game session established on one endpoint.
///
/// Every operation is one round trip against the bound endpoint. Operations take
/// `&mut self`: a session is driven by a single caller at a time.
///
/// # Examples
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
///
/// use guessr::api::ApiRequester;
/// use guessr::credentials::StaticCredential;
/// use guessr::servers::{Category, Endpoint, Language};
/// use guessr::session::{Answer, Session};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), guessr::Error> {
/// let requester = Arc::new(ApiRequester::new(
///     "guessr",
///     Duration::from_millis(2500),
///     StaticCredential::new("credential"),
/// )?);
/// let endpoint = Endpoint::new("api-en1.akinator.com", Language::English, Category::Character);
///
/// let mut session = Session::establish(requester, endpoint, "website-desktop", false).await?;
/// println!("{:?}", session.question());
///
/// session.answer(Answer::Yes).await?;
/// for guess in session.list_guesses().await? {
///     println!("{}", guess);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Session<R: Requester> {
    /// Client of the game server
    requester: Arc<R>,
    /// Endpoint the session was created on
    endpoint: Endpoint,
    /// Server issued session id and signature
    identification: Identification,
    /// Current step
    step: u32,
    /// Current question, `None` once the questions are exhausted
    question: Option<Question>,
    /// Whether the server filters profanity
    filter_profanity: bool,
    /// Lifecycle state
    state: SessionState,
    /// Guess suggested and waiting for a confirmation or a rejection
    pending_guess: Option<Guess>,
    /// Ids of the rejected guesses
    rejected_guesses: HashSet<String>,
}

impl<R: Requester> Session<R> {
    /// Creates a session on `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `requester` - Client of the game server
    /// * `endpoint` - Endpoint to create the session on
    /// * `player_name` - Name of the player, passed to the server as is
    /// * `filter_profanity` - Whether the server should filter profanity
    ///
    /// # Errors
    ///
    /// - [`Error::EndpointUnavailable`] when the server is down
    /// - [`Error::Protocol`] when the server rejects the session or sends no session
    /// - [`Error::Transport`], [`Error::Decode`] or [`Error::Credential`] when
    ///   the request itself fails
    pub async fn establish(
        requester: Arc<R>,
        endpoint: Endpoint,
        player_name: &str,
        filter_profanity: bool,
    ) -> Result<Self> {
        info!("establish session on {}", endpoint);

        let reply = requester
            .new_session(&endpoint, player_name, filter_profanity)
            .await?;

        let parameters = match accept(reply) {
            Ok(Some(parameters)) => parameters,
            Ok(None) => return Err(Error::Protocol("no session created".to_owned())),
            Err(Rejection::EndpointDown) => {
                return Err(Error::EndpointUnavailable(endpoint.host().to_owned()));
            }
            Err(Rejection::Protocol(reason)) => return Err(Error::Protocol(reason)),
        };

        let question = Question::from(parameters.step_information);
        info!(
            "established session {} on {}",
            parameters.identification, endpoint
        );
        debug!("first question {}", question);

        Ok(Session {
            requester,
            endpoint,
            identification: parameters.identification,
            step: question.step,
            question: Some(question),
            filter_profanity,
            state: SessionState::Active,
            pending_guess: None,
            rejected_guesses: HashSet::new(),
        })
    }

    /// Answers the current question.
    ///
    /// The step is incremented once the server accepts the answer. Returns the
    /// next question, or `None` when no question is left; running out of
    /// questions is not an error.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionTerminated`] after a confirmed guess
    /// - [`Error::SessionLost`] when the server is down
    /// - [`Error::Protocol`] when the server rejects the answer, the step is unchanged
    /// - [`Error::Transport`] or [`Error::Decode`] when the request fails
    pub async fn answer(&mut self, answer: Answer) -> Result<Option<Question>> {
        self.ensure_usable()?;
        info!("answer {} at step {}", answer, self.step);

        let reply = self
            .requester
            .answer(
                &self.endpoint,
                &self.identification,
                self.step,
                answer,
                self.filter_profanity,
            )
            .await?;
        let payload = self.settle(reply)?;

        self.step += 1;
        self.move_to(payload.map(Question::from));

        Ok(self.question.clone())
    }

    /// Cancels the last answer and returns to the previous question.
    ///
    /// # Errors
    ///
    /// - [`Error::NothingToUndo`] on the first question, without any request
    /// - [`Error::SessionTerminated`] after a confirmed guess
    /// - [`Error::SessionLost`] when the server is down
    /// - [`Error::Protocol`] when the server rejects the cancellation
    /// - [`Error::Transport`] or [`Error::Decode`] when the request fails
    pub async fn undo_answer(&mut self) -> Result<Option<Question>> {
        self.ensure_usable()?;
        if self.step == 0 {
            return Err(Error::NothingToUndo);
        }
        info!("undo answer at step {}", self.step);

        let reply = self
            .requester
            .cancel_answer(
                &self.endpoint,
                &self.identification,
                self.step,
                self.filter_profanity,
            )
            .await?;
        let payload = self.settle(reply)?;

        self.step -= 1;
        self.move_to(payload.map(Question::from));

        Ok(self.question.clone())
    }

    /// Lists the guesses of the current step, most probable first.
    ///
    /// Rejected guesses are left out. Guesses of equal probability keep the order
    /// of the server. An empty list means the server has no guess yet.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionTerminated`] after a confirmed guess
    /// - [`Error::SessionLost`] when the server is down
    /// - [`Error::Protocol`] when the server rejects the listing
    /// - [`Error::Transport`] or [`Error::Decode`] when the request fails
    pub async fn list_guesses(&mut self) -> Result<Vec<Guess>> {
        self.ensure_usable()?;
        info!("list guesses at step {}", self.step);

        let reply = self
            .requester
            .list(&self.endpoint, &self.identification, self.step)
            .await?;

        if let Reply::Failure(status) = &reply
            && status.has_reason(EMPTY_GUESS_LIST)
        {
            debug!("no guess yet at step {}", self.step);
            return Ok(vec![]);
        }

        let elements = self
            .settle(reply)?
            .map(|list| list.elements)
            .unwrap_or_default();

        let mut guesses: Vec<Guess> = elements
            .into_iter()
            .map(|wrapper| Guess::from(wrapper.element))
            .filter(|guess| !self.rejected_guesses.contains(&guess.id))
            .collect();
        // Stable sort, ties keep the server order
        guesses.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        debug!("guesses at step {}: {:?}", self.step, guesses);
        Ok(guesses)
    }

    /// Lists the guesses whose probability is at least `probability`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_guesses`].
    pub async fn guesses_above(&mut self, probability: f64) -> Result<Vec<Guess>> {
        let mut guesses = self.list_guesses().await?;
        guesses.retain(|guess| guess.probability >= probability);
        Ok(guesses)
    }

    /// Suggests the most probable guess if its probability reaches `threshold`.
    ///
    /// A suggested guess is pending until it is confirmed or rejected, or until
    /// the game moves to another question.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_guesses`].
    pub async fn suggest_guess(&mut self, threshold: f64) -> Result<Option<Guess>> {
        let guess = self.guesses_above(threshold).await?.into_iter().next();

        if let Some(guess) = &guess {
            info!("suggest guess {}", guess);
            self.state = SessionState::GuessPending;
            self.pending_guess = Some(guess.clone());
        }

        Ok(guess)
    }

    /// Confirms a guess, ending the game.
    ///
    /// # Errors
    ///
    /// [`Error::SessionTerminated`] or [`Error::SessionLost`] when the session is
    /// already over.
    pub fn confirm_guess(&mut self, guess: &Guess) -> Result<()> {
        self.ensure_usable()?;
        info!("guess {} confirmed at step {}", guess, self.step);

        self.state = SessionState::Terminated;
        self.pending_guess = None;
        Ok(())
    }

    /// Rejects a guess, leaving it out of every later listing of this session.
    ///
    /// # Errors
    ///
    /// [`Error::SessionTerminated`] or [`Error::SessionLost`] when the session is
    /// already over.
    pub fn reject_guess(&mut self, guess: &Guess) -> Result<()> {
        self.ensure_usable()?;
        info!("guess {} rejected at step {}", guess, self.step);

        self.rejected_guesses.insert(guess.id.clone());
        self.pending_guess = None;
        self.state = SessionState::Active;
        Ok(())
    }

    /// Returns the endpoint the session is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the server issued session id.
    pub fn session_id(&self) -> &str {
        &self.identification.session
    }

    /// Returns the server issued session signature.
    pub fn signature(&self) -> &str {
        &self.identification.signature
    }

    /// Returns the current step, 0 on the first question.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Returns the current question, `None` once the questions are exhausted.
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the suggested guess waiting for a confirmation or a rejection.
    pub fn pending_guess(&self) -> Option<&Guess> {
        self.pending_guess.as_ref()
    }

    /// Returns whether the server filters profanity for this session.
    pub fn filters_profanity(&self) -> bool {
        self.filter_profanity
    }

    /// Returns whether the guess with this id was rejected.
    pub fn is_rejected(&self, guess_id: &str) -> bool {
        self.rejected_guesses.contains(guess_id)
    }

    /// Fails when the session can no longer be used.
    fn ensure_usable(&self) -> Result<()> {
        match self.state {
            SessionState::Active | SessionState::GuessPending => Ok(()),
            SessionState::Terminated => Err(Error::SessionTerminated),
            SessionState::Lost => Err(Error::SessionLost(self.endpoint.host().to_owned())),
        }
    }

    /// Returns the payload of a mid-session reply.
    ///
    /// A server going down loses the session for good.
    fn settle<T>(&mut self, reply: Reply<T>) -> Result<Option<T>> {
        match accept(reply) {
            Ok(payload) => Ok(payload),
            Err(Rejection::EndpointDown) => {
                warn!(
                    "server {} went down, session {} is lost",
                    self.endpoint, self.identification.session
                );
                self.state = SessionState::Lost;
                Err(Error::SessionLost(self.endpoint.host().to_owned()))
            }
            Err(Rejection::Protocol(reason)) => {
                warn!("server {} rejected the request: {}", self.endpoint, reason);
                Err(Error::Protocol(reason))
            }
        }
    }

    /// Moves to a new question, after an answer or an undo.
    fn move_to(&mut self, question: Option<Question>) {
        match &question {
            Some(question) if question.step != self.step => warn!(
                "server sent step {} while the session is at step {}",
                question.step, self.step
            ),
            Some(question) => debug!("question {}", question),
            None => info!("no question left at step {}", self.step),
        }

        self.question = question;
        self.pending_guess = None;
        self.state = SessionState::Active;
    }
}
