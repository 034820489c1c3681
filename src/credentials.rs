//! Credential attached to session creation requests.
//!
//! The game server requires an opaque `uid_ext_session` value when creating a
//! session. The value is published by the game's web front end; the client only
//! needs "a current credential string" and gets it from a [`CredentialProvider`].

use log::{debug, info};
use mockall::automock;
use regex::Regex;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{Error, Result};

/// Pattern of the credential in the front end game page.
const CREDENTIAL_PATTERN: &str = r"var uid_ext_session = '([^']*)'";

/// Source of the credential required to create sessions.
#[automock]
pub trait CredentialProvider {
    /// Returns the current credential.
    async fn credential(&self) -> Result<String>;
}

/// A credential known in advance, typically from the configuration.
#[derive(Debug, Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    /// Creates a provider always returning `credential`.
    pub fn new(credential: &str) -> Self {
        StaticCredential(credential.to_owned())
    }
}

impl CredentialProvider for StaticCredential {
    async fn credential(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A credential scraped from the game front end on first use.
///
/// The scraped value is cached. A failure is returned to the caller needing the
/// credential and nothing is cached, so the next call tries again.
pub struct ScrapedCredential {
    /// HTTP client
    client: Client,
    /// Base URL of the front end, such as `https://en.akinator.com`
    front_url: String,
    /// Pattern of the credential in the game page
    pattern: Regex,
    /// Last scraped credential
    cached: Mutex<Option<String>>,
}

impl ScrapedCredential {
    /// Creates a new [`ScrapedCredential`].
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to fetch the front end
    /// * `front_url` - Base URL of the front end, a trailing slash is ignored
    pub fn new(client: Client, front_url: &str) -> Self {
        ScrapedCredential {
            client,
            front_url: front_url.trim_end_matches('/').to_owned(),
            pattern: Regex::new(CREDENTIAL_PATTERN).expect("credential pattern is a valid regex"),
            cached: Mutex::new(None),
        }
    }

    /// Scrapes the credential again and caches it.
    ///
    /// # Errors
    ///
    /// [`Error::Credential`] when the page cannot be fetched or holds no credential.
    pub async fn refresh(&self) -> Result<String> {
        let credential = self.scrape().await?;
        *self.cached.lock().await = Some(credential.clone());
        Ok(credential)
    }

    async fn scrape(&self) -> Result<String> {
        let url = format!("{}/game", &self.front_url);
        info!("scrape credential from {}", &url);

        let page = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::Credential(format!("failed to fetch {}: {}", &url, e)))?
            .text()
            .await
            .map_err(|e| Error::Credential(format!("failed to read {}: {}", &url, e)))?;

        let credential = self
            .pattern
            .captures(&page)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| Error::Credential(format!("no credential found in {}", &url)))?;

        debug!("scraped credential {}", &credential);
        Ok(credential)
    }
}

impl CredentialProvider for ScrapedCredential {
    async fn credential(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref() {
            return Ok(credential.clone());
        }

        let credential = self.scrape().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_PAGE: &str = r#"<html><script>
        var uid_ext_session = 'a7cd4d1b-3c5e-4d5d-9a1e-5f4e6a0b1c2d';
        var frontaddr = 'NDYuMTA1LjExMC40NQ==';
    </script></html>"#;

    #[tokio::test]
    async fn test_static_credential() {
        let provider = StaticCredential::new("abc");
        assert_eq!(provider.credential().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_scraped_credential_is_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/game")
            .with_status(200)
            .with_body(GAME_PAGE)
            .expect(1)
            .create_async()
            .await;

        let provider = ScrapedCredential::new(Client::new(), &format!("{}/", server.url()));
        assert_eq!(
            provider.credential().await.unwrap(),
            "a7cd4d1b-3c5e-4d5d-9a1e-5f4e6a0b1c2d"
        );
        assert_eq!(
            provider.credential().await.unwrap(),
            "a7cd4d1b-3c5e-4d5d-9a1e-5f4e6a0b1c2d"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_scrapes_again() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/game")
            .with_status(200)
            .with_body(GAME_PAGE)
            .expect(2)
            .create_async()
            .await;

        let provider = ScrapedCredential::new(Client::new(), &server.url());
        provider.credential().await.unwrap();
        provider.refresh().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scraped_credential_missing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/game")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let provider = ScrapedCredential::new(Client::new(), &server.url());
        let result = provider.credential().await;
        assert!(matches!(result, Err(Error::Credential(message)) if message.contains("no credential")));
    }

    #[tokio::test]
    async fn test_scraped_credential_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/game")
            .with_status(503)
            .create_async()
            .await;

        let provider = ScrapedCredential::new(Client::new(), &server.url());
        assert!(matches!(
            provider.credential().await,
            Err(Error::Credential(_))
        ));
    }
}
