//! HTTP client for the game server API.
//!
//! This module provides the [`Requester`] trait, one method per remote
//! operation, and [`ApiRequester`], its implementation over `reqwest`.

use std::time::Duration;

use log::{debug, info};
use mockall::automock;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    Result,
    api::response_structs::{
        Identification, ListParameters, NewSessionParameters, Reply, StepInformation, decode,
    },
    credentials::CredentialProvider,
    servers::Endpoint,
    session::Answer,
};

/// Partner id expected by the game server.
const PARTNER: &str = "5";
/// Constraint excluding subjects awaiting validation.
const CONSTRAINT: &str = "ETAT<>'AV'";
/// Front end address expected by the game server.
const FRONT_ADDRESS: &str = "NDYuMTA1LjExMC40NQ==";
/// Constraint keeping safe subjects only, sent when filtering profanity.
const SOFT_CONSTRAINT: &str = "ETAT='EN'";
/// Question filter sent when filtering profanity.
const QUESTION_FILTER: &str = "cat=1";
/// Answer id sent to cancel an answer.
const CANCEL_ANSWER: &str = "-1";

/// Trait for making requests to a game server.
///
/// This trait abstracts the HTTP operations for easier testing with mocks. Every
/// method performs exactly one round trip against `endpoint`.
#[automock]
pub trait Requester {
    /// Creates a new session.
    async fn new_session(
        &self,
        endpoint: &Endpoint,
        player_name: &str,
        filter_profanity: bool,
    ) -> Result<Reply<NewSessionParameters>>;

    /// Answers the question of `step`.
    async fn answer(
        &self,
        endpoint: &Endpoint,
        identification: &Identification,
        step: u32,
        answer: Answer,
        filter_profanity: bool,
    ) -> Result<Reply<StepInformation>>;

    /// Cancels the answer leading to `step`.
    async fn cancel_answer(
        &self,
        endpoint: &Endpoint,
        identification: &Identification,
        step: u32,
        filter_profanity: bool,
    ) -> Result<Reply<StepInformation>>;

    /// Lists the guesses at `step`.
    async fn list(
        &self,
        endpoint: &Endpoint,
        identification: &Identification,
        step: u32,
    ) -> Result<Reply<ListParameters>>;
}

/// HTTP client requesting the game servers.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use guessr::api::{ApiRequester, Requester};
/// use guessr::credentials::StaticCredential;
/// use guessr::servers::{Category, Endpoint, Language};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), guessr::Error> {
/// let requester = ApiRequester::new(
///     "guessr",
///     Duration::from_millis(2500),
///     StaticCredential::new("credential"),
/// )?;
/// let endpoint = Endpoint::new("api-en1.akinator.com", Language::English, Category::Character);
/// let reply = requester.new_session(&endpoint, "website-desktop", false).await?;
/// println!("{:?}", reply.status());
/// # Ok(())
/// # }
/// ```
pub struct ApiRequester<C: CredentialProvider> {
    /// HTTP client
    client: Client,
    /// Provider of the credential sent on session creation
    credentials: C,
}

impl<C: CredentialProvider> ApiRequester<C> {
    /// Creates a new [`ApiRequester`].
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User agent sent with every request
    /// * `connect_timeout` - Timeout of each connection attempt
    /// * `credentials` - Provider of the session creation credential
    ///
    /// # Errors
    ///
    /// [`crate::Error::Transport`] when the HTTP client cannot be built.
    pub fn new(user_agent: &str, connect_timeout: Duration, credentials: C) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self::with_client(client, credentials))
    }

    /// Creates a new [`ApiRequester`] sharing an existing HTTP client.
    pub fn with_client(client: Client, credentials: C) -> Self {
        ApiRequester {
            client,
            credentials,
        }
    }

    /// Requests `route` on `endpoint` and decodes the envelope.
    async fn get<T: DeserializeOwned + std::fmt::Debug>(
        &self,
        endpoint: &Endpoint,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<Reply<T>> {
        let url = format!("{}{}", endpoint.base_url(), route);
        info!("request {} on {}", route, endpoint);
        debug!("request {} {:?}", &url, query);

        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let reply = decode(&body)?;
        debug!("response from {} -> {:?}", &url, &reply);

        Ok(reply)
    }
}

/// Query parameters identifying a session at a step.
fn session_query(identification: &Identification, step: u32) -> Vec<(&'static str, String)> {
    vec![
        ("session", identification.session.clone()),
        ("signature", identification.signature.clone()),
        ("step", step.to_string()),
    ]
}

impl<C: CredentialProvider> Requester for ApiRequester<C> {
    /// Request `new_session`.
    ///
    /// The credential is requested from the provider first, a provider failure is
    /// returned before any request to the game server.
    async fn new_session(
        &self,
        endpoint: &Endpoint,
        player_name: &str,
        filter_profanity: bool,
    ) -> Result<Reply<NewSessionParameters>> {
        let credential = self.credentials.credential().await?;

        let mut query = vec![
            ("partner", PARTNER.to_owned()),
            ("player", player_name.to_owned()),
            ("constraint", CONSTRAINT.to_owned()),
            ("frontaddr", FRONT_ADDRESS.to_owned()),
            ("uid_ext_session", credential),
        ];
        if filter_profanity {
            query.push(("soft_constraint", SOFT_CONSTRAINT.to_owned()));
            query.push(("question_filter", QUESTION_FILTER.to_owned()));
        }

        self.get(endpoint, "new_session", &query).await
    }

    /// Request `answer`.
    async fn answer(
        &self,
        endpoint: &Endpoint,
        identification: &Identification,
        step: u32,
        answer: Answer,
        filter_profanity: bool,
    ) -> Result<Reply<StepInformation>> {
        let mut query = session_query(identification, step);
        query.push(("answer", answer.id().to_string()));
        if filter_profanity {
            query.push(("question_filter", QUESTION_FILTER.to_owned()));
        }

        self.get(endpoint, "answer", &query).await
    }

    /// Request `cancel_answer`.
    async fn cancel_answer(
        &self,
        endpoint: &Endpoint,
        identification: &Identification,
        step: u32,
        filter_profanity: bool,
    ) -> Result<Reply<StepInformation>> {
        let mut query = session_query(identification, step);
        query.push(("answer", CANCEL_ANSWER.to_owned()));
        if filter_profanity {
            query.push(("question_filter", QUESTION_FILTER.to_owned()));
        }

        self.get(endpoint, "cancel_answer", &query).await
    }

    /// Request `list`.
    async fn list(
        &self,
        endpoint: &Endpoint,
        identification: &Identification,
        step: u32,
    ) -> Result<Reply<ListParameters>> {
        let mut query = session_query(identification, step);
        query.push(("mode_question", "0".to_owned()));

        self.get(endpoint, "list", &query).await
    }
}
