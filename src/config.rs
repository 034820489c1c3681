//! Configuration of the guessr binary.
//!
//! The configuration is read from a YAML file and environment variables, over
//! built-in defaults. Every key is optional.
//!
//! # Configuration File Format
//!
//! ```yaml
//! game:
//!   # Language and category of the game
//!   language: french
//!   category: character
//!   # Whether the server filters profanity
//!   filter_profanity: true
//!   player_name: website-desktop
//!
//! http:
//!   user_agent: "Mozilla/5.0 ..."
//!   # Timeout of each connection attempt
//!   connect_timeout_ms: 2500
//!   # Front site the credential is scraped from
//!   front_url: https://en.akinator.com
//!
//! # Single server to use instead of the catalog, attempted once
//! server: api-fr3.akinator.com
//!
//! # Servers replacing the built-in ones, in the order they are tried
//! servers:
//!   - language: french
//!     category: character
//!     hosts: [api-fr3.akinator.com, api-fr1.akinator.com]
//!
//! # Credential sent on session creation, scraped from the front site when absent
//! credential: abcdef
//! ```
//!
//! # Environment Variable Overrides
//!
//! Any value can be overridden with the `GUESSR_` prefix, `__` separating the
//! nested keys:
//!
//! ```bash
//! export GUESSR_GAME__LANGUAGE="german"
//! export GUESSR_HTTP__CONNECT_TIMEOUT_MS="5000"
//! export GUESSR_CREDENTIAL="abcdef"
//! ```

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::{
    builder::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PLAYER_NAME, DEFAULT_USER_AGENT},
    servers::{Catalog, Category, Endpoint, EndpointGroup, Language},
};

/// Prefix of the environment variables.
const ENV_PREFIX: &str = "GUESSR_";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Game settings
    #[serde(default)]
    pub game: Game,
    /// HTTP settings
    #[serde(default)]
    pub http: Http,
    /// Single server to use instead of the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Server groups replacing the built-in ones
    #[serde(default)]
    pub servers: Vec<ServerGroup>,
    /// Credential sent on session creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Game settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Game {
    pub language: Language,
    pub category: Category,
    pub filter_profanity: bool,
    pub player_name: String,
}

impl Default for Game {
    fn default() -> Self {
        Game {
            language: Language::English,
            category: Category::Character,
            filter_profanity: false,
            player_name: DEFAULT_PLAYER_NAME.to_owned(),
        }
    }
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Http {
    pub user_agent: String,
    /// Timeout of each connection attempt, in milliseconds
    pub connect_timeout_ms: u64,
    /// Front site the credential is scraped from
    pub front_url: String,
}

impl Default for Http {
    fn default() -> Self {
        Http {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            front_url: "https://en.akinator.com".to_owned(),
        }
    }
}

impl Http {
    /// Returns the timeout of each connection attempt.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Servers of one language and category, in the order they are tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerGroup {
    pub language: Language,
    pub category: Category,
    pub hosts: Vec<String>,
}

impl From<&ServerGroup> for EndpointGroup {
    fn from(group: &ServerGroup) -> Self {
        EndpointGroup::new(group.language, group.category, &group.hosts)
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Priority, highest first:
    /// 1. `GUESSR_` environment variables
    /// 2. The YAML file at `path`, when given
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// When the file cannot be read or a value has the wrong type.
    pub fn load(path: Option<&str>) -> Result<Config, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Builds the catalog, the configured groups replacing the built-in ones.
    pub fn catalog(&self) -> Catalog {
        Catalog::builtin().with_overrides(self.servers.iter().map(EndpointGroup::from))
    }

    /// Returns the configured single server, serving the configured game.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.server
            .as_deref()
            .map(|host| Endpoint::new(host, self.game.language, self.game.category))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let config = Config::load(None).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.game.language, Language::English);
        assert_eq!(config.game.player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(config.http.connect_timeout(), Duration::from_millis(2500));
        assert!(config.server.is_none());
        assert!(config.credential.is_none());
    }

    #[test]
    #[serial]
    fn test_load_file() {
        let file = yaml_file(
            r#"
game:
  language: french
  filter_profanity: true
http:
  connect_timeout_ms: 1000
server: api-fr3.akinator.com
servers:
  - language: french
    category: character
    hosts: [first, second]
credential: abcdef
"#,
        );

        let config = Config::load(file.path().to_str()).unwrap();

        assert_eq!(config.game.language, Language::French);
        assert_eq!(config.game.category, Category::Character);
        assert!(config.game.filter_profanity);
        assert_eq!(config.game.player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(config.http.connect_timeout_ms, 1000);
        assert_eq!(config.http.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.server.as_deref(), Some("api-fr3.akinator.com"));
        assert_eq!(config.credential.as_deref(), Some("abcdef"));
        assert_eq!(config.servers.len(), 1);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = yaml_file("game:\n  language: french\n  player_name: Alice\n");

        unsafe {
            std::env::set_var("GUESSR_GAME__LANGUAGE", "german");
            std::env::set_var("GUESSR_CREDENTIAL", "from-env");
        }
        let config = Config::load(file.path().to_str());
        unsafe {
            std::env::remove_var("GUESSR_GAME__LANGUAGE");
            std::env::remove_var("GUESSR_CREDENTIAL");
        }

        let config = config.unwrap();
        assert_eq!(config.game.language, Language::German);
        assert_eq!(config.game.player_name, "Alice");
        assert_eq!(config.credential.as_deref(), Some("from-env"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        assert!(Config::load(Some("/nonexistent/guessr.yaml")).is_err());
    }

    #[test]
    #[serial]
    fn test_load_unknown_language() {
        let file = yaml_file("game:\n  language: klingon\n");
        assert!(Config::load(file.path().to_str()).is_err());
    }

    #[test]
    fn test_catalog_overrides() {
        let config = Config {
            servers: vec![
                ServerGroup {
                    language: Language::French,
                    category: Category::Character,
                    hosts: vec!["first".to_owned(), "second".to_owned()],
                },
                ServerGroup {
                    language: Language::French,
                    category: Category::Animal,
                    hosts: vec!["zoo".to_owned()],
                },
            ],
            ..Config::default()
        };

        let catalog = config.catalog();
        let group = catalog
            .lookup(Language::French, Category::Character)
            .unwrap();
        let hosts: Vec<&str> = group.endpoints().iter().map(|e| e.host()).collect();
        assert_eq!(hosts, vec!["first", "second"]);

        assert!(catalog.lookup(Language::French, Category::Animal).is_ok());
        // Untouched groups stay built-in
        assert!(
            !catalog
                .lookup(Language::English, Category::Character)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_endpoint() {
        let mut config = Config::default();
        assert!(config.endpoint().is_none());

        config.server = Some("api-de1.akinator.com".to_owned());
        config.game.language = Language::German;

        let endpoint = config.endpoint().unwrap();
        assert_eq!(endpoint.host(), "api-de1.akinator.com");
        assert_eq!(endpoint.language(), Language::German);
        assert_eq!(endpoint.category(), Category::Character);
    }
}
