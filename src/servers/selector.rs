//! Reachability probing and selection of a live server in a group.
//!
//! The [`Prober`] tells whether a single endpoint can host a session right now.
//! The [`ServerSelector`] walks a group in its declared order with the prober and
//! stops at the first reachable endpoint. Probing is sequential: a down server
//! is rare and costs one extra round trip.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    Error, Result,
    api::{Classification, Requester, classify},
    builder::DEFAULT_PLAYER_NAME,
    servers::{Endpoint, EndpointGroup, GroupCursor},
};

/// Probes endpoints by creating a throwaway session.
pub struct Prober<R: Requester> {
    requester: Arc<R>,
}

impl<R: Requester> Prober<R> {
    /// Creates a new [`Prober`].
    ///
    /// The connection timeout of each probe is the one of the requester.
    pub fn new(requester: Arc<R>) -> Self {
        Prober { requester }
    }

    /// Returns whether `endpoint` can create a session.
    ///
    /// Only an OK status counts as reachable. Transport failures, timeouts,
    /// malformed responses, warnings and errors all count as unreachable; they are
    /// logged and never returned.
    ///
    /// # Errors
    ///
    /// [`Error::Credential`] when no credential is available. No endpoint can be
    /// reached without one, so it is not a property of `endpoint`.
    pub async fn probe(&self, endpoint: &Endpoint) -> Result<bool> {
        debug!("probe {}", endpoint);

        let reply = match self
            .requester
            .new_session(endpoint, DEFAULT_PLAYER_NAME, false)
            .await
        {
            Ok(reply) => reply,
            Err(e @ Error::Credential(_)) => return Err(e),
            Err(e) => {
                debug!("{} is unreachable: {}", endpoint, e);
                return Ok(false);
            }
        };

        match classify(reply.status()) {
            Classification::Ok => Ok(true),
            classification => {
                debug!("{} is unusable: {:?}", endpoint, classification);
                Ok(false)
            }
        }
    }
}

/// Selects the first reachable endpoint of a group.
///
/// # Examples
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
///
/// use guessr::api::ApiRequester;
/// use guessr::credentials::StaticCredential;
/// use guessr::servers::{Catalog, Category, Language, Prober, ServerSelector};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), guessr::Error> {
/// let requester = Arc::new(ApiRequester::new(
///     "guessr",
///     Duration::from_millis(2500),
///     StaticCredential::new("credential"),
/// )?);
/// let catalog = Catalog::builtin();
/// let group = catalog.lookup(Language::English, Category::Character)?;
///
/// let selector = ServerSelector::new(Prober::new(requester));
/// let endpoint = selector.select(group).await?;
/// println!("using {}", endpoint);
/// # Ok(())
/// # }
/// ```
pub struct ServerSelector<R: Requester> {
    prober: Prober<R>,
}

impl<R: Requester> ServerSelector<R> {
    /// Creates a selector probing with `prober`.
    pub fn new(prober: Prober<R>) -> Self {
        ServerSelector { prober }
    }

    /// Probes the candidates from `cursor` on, in order, each exactly once.
    ///
    /// Returns the first reachable endpoint along with the cursor positioned on
    /// the candidate after it, so that a caller unable to use the endpoint can
    /// resume the walk where it stopped.
    ///
    /// # Errors
    ///
    /// - [`Error::GroupUnavailable`] when no remaining candidate is reachable
    /// - [`Error::Credential`] when no credential is available, the walk stops at
    ///   the first candidate
    pub async fn select_first_available<'a>(
        &self,
        mut cursor: GroupCursor<'a>,
    ) -> Result<(&'a Endpoint, GroupCursor<'a>)> {
        while let Some(endpoint) = cursor.current() {
            cursor.advance();

            if self.prober.probe(endpoint).await? {
                info!("selected server {}", endpoint);
                return Ok((endpoint, cursor));
            }

            debug!(
                "server {} is down, {} candidate(s) left",
                endpoint,
                cursor.remaining()
            );
        }

        let group = cursor.group();
        Err(Error::GroupUnavailable {
            language: group.language(),
            category: group.category(),
        })
    }

    /// Returns the first reachable endpoint of `group`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::select_first_available`].
    pub async fn select<'a>(&self, group: &'a EndpointGroup) -> Result<&'a Endpoint> {
        let (endpoint, _) = self.select_first_available(group.cursor()).await?;
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use super::*;
    use crate::{
        api::{
            ApiRequester, Identification, MockRequester, NewSessionParameters, Reply,
            StepInformation, Status,
        },
        credentials::StaticCredential,
        servers::{Category, Language},
    };

    fn session_parameters() -> NewSessionParameters {
        NewSessionParameters {
            identification: Identification {
                session: "1".to_owned(),
                signature: "2".to_owned(),
            },
            step_information: StepInformation {
                question: "Is your character real?".to_owned(),
                step: 0,
                progression: 0.0,
                question_id: "266".to_owned(),
            },
        }
    }

    fn numbered_group(n: usize) -> EndpointGroup {
        EndpointGroup::new(
            Language::English,
            Category::Character,
            (0..n).map(|i| format!("api-{}", i)),
        )
    }

    #[tokio::test]
    async fn test_probe_ok() {
        let mut requester = MockRequester::new();
        requester
            .expect_new_session()
            .withf(|_, player_name, filter_profanity| {
                player_name == DEFAULT_PLAYER_NAME && !filter_profanity
            })
            .times(1)
            .returning(|_, _, _| Ok(Reply::ok(session_parameters())));

        let prober = Prober::new(Arc::new(requester));
        let endpoint = Endpoint::new("api-en1", Language::English, Category::Character);
        assert!(prober.probe(&endpoint).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_server_down() {
        let mut requester = MockRequester::new();
        requester
            .expect_new_session()
            .times(1)
            .returning(|_, _, _| Ok(Reply::failure("SERVER DOWN")));

        let prober = Prober::new(Arc::new(requester));
        let endpoint = Endpoint::new("api-en1", Language::English, Category::Character);
        assert!(!prober.probe(&endpoint).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_warning_is_not_reachable() {
        let mut requester = MockRequester::new();
        requester.expect_new_session().times(1).returning(|_, _, _| {
            Ok(Reply::Success {
                status: Status::warning("MAINTENANCE"),
                payload: None,
            })
        });

        let prober = Prober::new(Arc::new(requester));
        let endpoint = Endpoint::new("api-en1", Language::English, Category::Character);
        assert!(!prober.probe(&endpoint).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_malformed_response() {
        let mut requester = MockRequester::new();
        requester.expect_new_session().times(1).returning(|_, _, _| {
            Err(Error::Decode(
                serde_json::from_str::<u32>("<html>").unwrap_err(),
            ))
        });

        let prober = Prober::new(Arc::new(requester));
        let endpoint = Endpoint::new("api-en1", Language::English, Category::Character);
        assert!(!prober.probe(&endpoint).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        let requester = ApiRequester::new(
            "guessr-test",
            Duration::from_millis(500),
            StaticCredential::new("credential"),
        )
        .unwrap();

        let prober = Prober::new(Arc::new(requester));
        let endpoint = Endpoint::new("127.0.0.1:1", Language::English, Category::Character);
        assert!(!prober.probe(&endpoint).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_credential_failure() {
        let mut requester = MockRequester::new();
        requester
            .expect_new_session()
            .times(1)
            .returning(|_, _, _| Err(Error::Credential("no credential found".to_owned())));

        let prober = Prober::new(Arc::new(requester));
        let endpoint = Endpoint::new("api-en1", Language::English, Category::Character);
        assert!(matches!(
            prober.probe(&endpoint).await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_select_stops_on_credential_failure() {
        let mut requester = MockRequester::new();
        requester
            .expect_new_session()
            .times(1)
            .returning(|_, _, _| Err(Error::Credential("no credential found".to_owned())));

        let group = numbered_group(3);
        let selector = ServerSelector::new(Prober::new(Arc::new(requester)));
        assert!(matches!(
            selector.select(&group).await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_select_skips_unreachable_prefix() {
        for n in 1..=4 {
            for k in 0..n {
                let probed = Arc::new(Mutex::new(Vec::new()));
                let probed_by_mock = Arc::clone(&probed);

                let mut requester = MockRequester::new();
                requester
                    .expect_new_session()
                    .times(k + 1)
                    .returning(move |endpoint, _, _| {
                        let mut probed = probed_by_mock.lock().unwrap();
                        probed.push(endpoint.host().to_owned());
                        if probed.len() <= k {
                            Ok(Reply::failure("SERVER DOWN"))
                        } else {
                            Ok(Reply::ok(session_parameters()))
                        }
                    });

                let group = numbered_group(n);
                let selector = ServerSelector::new(Prober::new(Arc::new(requester)));
                let (endpoint, cursor) = selector
                    .select_first_available(group.cursor())
                    .await
                    .unwrap();

                assert_eq!(endpoint.host(), format!("api-{}", k));
                assert_eq!(cursor.position(), k + 1);

                let expected: Vec<String> = (0..=k).map(|i| format!("api-{}", i)).collect();
                assert_eq!(*probed.lock().unwrap(), expected);
            }
        }
    }

    #[tokio::test]
    async fn test_select_group_unavailable() {
        for n in 0..=3 {
            let mut requester = MockRequester::new();
            requester
                .expect_new_session()
                .times(n)
                .returning(|_, _, _| Ok(Reply::failure("SERVER DOWN")));

            let group = numbered_group(n);
            let selector = ServerSelector::new(Prober::new(Arc::new(requester)));
            let result = selector.select(&group).await;

            assert!(matches!(
                result,
                Err(Error::GroupUnavailable {
                    language: Language::English,
                    category: Category::Character
                })
            ));
        }
    }

    #[tokio::test]
    async fn test_select_resumes_from_returned_cursor() {
        let mut requester = MockRequester::new();
        requester
            .expect_new_session()
            .times(2)
            .returning(|_, _, _| Ok(Reply::ok(session_parameters())));

        let group = numbered_group(3);
        let selector = ServerSelector::new(Prober::new(Arc::new(requester)));

        let (first, cursor) = selector
            .select_first_available(group.cursor())
            .await
            .unwrap();
        let (second, cursor) = selector.select_first_available(cursor).await.unwrap();

        assert_eq!(first.host(), "api-0");
        assert_eq!(second.host(), "api-1");
        assert_eq!(cursor.remaining(), 1);
    }
}
