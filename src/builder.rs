//! Client builder, establishing a session on the first usable server.
//!
//! Failover only happens here, before a session exists. Each candidate of a
//! group is consumed at most once and in its declared order: it is probed, then
//! a session is established on it. A candidate failing either step is skipped.
//! An explicit endpoint is attempted exactly once.

use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};

use crate::{
    Error, Result,
    api::Requester,
    servers::{Catalog, Category, Endpoint, EndpointGroup, Language, Prober, ServerSelector},
    session::Session,
};

/// Player name sent when none is configured.
pub const DEFAULT_PLAYER_NAME: &str = "website-desktop";

/// User agent of a desktop browser, the game servers reject unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Timeout of each connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(2500);

/// Servers the builder may use.
#[derive(Debug, Clone)]
enum Target {
    /// The catalog group of the language and category
    Catalog,
    /// A single server, attempted once
    Endpoint(Endpoint),
    /// A caller provided group
    Group(EndpointGroup),
}

/// Builds a [`Session`] on the first usable server.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use guessr::api::ApiRequester;
/// use guessr::builder::{ClientBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_USER_AGENT};
/// use guessr::credentials::StaticCredential;
/// use guessr::servers::{Catalog, Language};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), guessr::Error> {
/// let requester = Arc::new(ApiRequester::new(
///     DEFAULT_USER_AGENT,
///     DEFAULT_CONNECT_TIMEOUT,
///     StaticCredential::new("credential"),
/// )?);
///
/// let session = ClientBuilder::new(requester, Arc::new(Catalog::builtin()))
///     .language(Language::French)
///     .filter_profanity(true)
///     .build()
///     .await?;
/// println!("playing on {}", session.endpoint());
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder<R: Requester> {
    requester: Arc<R>,
    catalog: Arc<Catalog>,
    target: Target,
    language: Language,
    category: Category,
    filter_profanity: bool,
    player_name: String,
}

impl<R: Requester> ClientBuilder<R> {
    /// Creates a builder for english characters, without profanity filter.
    pub fn new(requester: Arc<R>, catalog: Arc<Catalog>) -> Self {
        ClientBuilder {
            requester,
            catalog,
            target: Target::Catalog,
            language: Language::English,
            category: Category::Character,
            filter_profanity: false,
            player_name: DEFAULT_PLAYER_NAME.to_owned(),
        }
    }

    /// Sets the language, going back to the servers of the catalog.
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self.target = Target::Catalog;
        self
    }

    /// Sets the category, going back to the servers of the catalog.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self.target = Target::Catalog;
        self
    }

    /// Uses only `endpoint`, adopting its language and category.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.language = endpoint.language();
        self.category = endpoint.category();
        self.target = Target::Endpoint(endpoint);
        self
    }

    /// Uses `group` instead of the catalog, adopting its language and category.
    pub fn group(mut self, group: EndpointGroup) -> Self {
        self.language = group.language();
        self.category = group.category();
        self.target = Target::Group(group);
        self
    }

    /// Sets whether the server filters profanity.
    pub fn filter_profanity(mut self, filter_profanity: bool) -> Self {
        self.filter_profanity = filter_profanity;
        self
    }

    /// Sets the player name sent on session creation.
    pub fn player_name(mut self, player_name: &str) -> Self {
        self.player_name = player_name.to_owned();
        self
    }

    /// Establishes the session.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedCombination`] when the catalog has no server for the
    ///   language and category
    /// - [`Error::ServerNotFound`] when no server of the group could host a session
    /// - [`Error::Credential`] when no credential is available, without trying
    ///   the other servers
    /// - any error of [`Session::establish`] when an explicit endpoint fails
    pub async fn build(self) -> Result<Session<R>> {
        match &self.target {
            Target::Endpoint(endpoint) => {
                info!("establish session on explicit server {}", endpoint);
                Session::establish(
                    Arc::clone(&self.requester),
                    endpoint.clone(),
                    &self.player_name,
                    self.filter_profanity,
                )
                .await
            }
            Target::Group(group) => self.build_on(group).await,
            Target::Catalog => {
                let group = self.catalog.lookup(self.language, self.category)?;
                self.build_on(group).await
            }
        }
    }

    /// Establishes the session on the first usable server of `group`.
    async fn build_on(&self, group: &EndpointGroup) -> Result<Session<R>> {
        info!(
            "look for a server among {} for {}/{}",
            group.len(),
            self.language,
            self.category
        );

        let selector = ServerSelector::new(Prober::new(Arc::clone(&self.requester)));
        let mut cursor = group.cursor();

        loop {
            let (endpoint, next) = match selector.select_first_available(cursor).await {
                Ok(selected) => selected,
                Err(Error::GroupUnavailable { language, category }) => {
                    warn!("no server available for {}/{}", language, category);
                    return Err(Error::ServerNotFound { language, category });
                }
                Err(e) => return Err(e),
            };
            cursor = next;

            match Session::establish(
                Arc::clone(&self.requester),
                endpoint.clone(),
                &self.player_name,
                self.filter_profanity,
            )
            .await
            {
                Ok(session) => return Ok(session),
                // Every other candidate would fail the same way
                Err(e @ Error::Credential(_)) => return Err(e),
                Err(Error::EndpointUnavailable(host)) => {
                    debug!("server {} went down, try the next one", host);
                }
                Err(e) => {
                    warn!("cannot establish a session on {}: {}", endpoint, e);
                }
            }
        }
    }
}
