//! Endpoints and the ordered groups they are declared in.
//!
//! An [`Endpoint`] is one host serving the game for a single language and
//! category. Endpoints serving the same pair are declared together in an
//! [`EndpointGroup`], in the order they should be tried. Walking a group is done
//! with a [`GroupCursor`], a small value owned by whoever iterates, so the group
//! itself stays immutable and can be shared.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Language of the questions and guesses served by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Arabic,
    Chinese,
    Dutch,
    English,
    French,
    German,
    Hebrew,
    Hindi,
    Italian,
    Japanese,
    Korean,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Turkish,
}

impl Language {
    /// Every supported language, in alphabetical order.
    pub const ALL: [Language; 16] = [
        Language::Arabic,
        Language::Chinese,
        Language::Dutch,
        Language::English,
        Language::French,
        Language::German,
        Language::Hebrew,
        Language::Hindi,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
        Language::Spanish,
        Language::Turkish,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Language::Arabic => "arabic",
            Language::Chinese => "chinese",
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Hebrew => "hebrew",
            Language::Hindi => "hindi",
            Language::Italian => "italian",
            Language::Japanese => "japanese",
            Language::Korean => "korean",
            Language::Polish => "polish",
            Language::Portuguese => "portuguese",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Turkish => "turkish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Parses a language name, case insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Language::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown language {}", s))
    }
}

/// Kind of subject the player thinks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Real or fictional characters
    Character,
    /// Objects
    Object,
    /// Animals
    Animal,
}

impl Category {
    /// Every category.
    pub const ALL: [Category; 3] = [Category::Character, Category::Object, Category::Animal];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Character => "character",
            Category::Object => "object",
            Category::Animal => "animal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parses a category name, case insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category {}", s))
    }
}

/// One host serving the game for a language and category.
///
/// Endpoints are immutable. Two endpoints are equal when their hosts are equal,
/// the language and category being attributes of the host.
///
/// # Examples
///
/// ```
/// use guessr::servers::{Category, Endpoint, Language};
///
/// let endpoint = Endpoint::new("api-en1.akinator.com", Language::English, Category::Character);
/// assert_eq!(endpoint.base_url(), "http://api-en1.akinator.com/ws/");
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Host, optionally with a port or a scheme
    host: String,
    /// Language served by the host
    language: Language,
    /// Category served by the host
    category: Category,
}

impl Endpoint {
    /// Creates a new [`Endpoint`].
    ///
    /// Surrounding whitespace of `host` is dropped.
    pub fn new(host: &str, language: Language, category: Category) -> Self {
        Endpoint {
            host: host.trim().to_owned(),
            language,
            category,
        }
    }

    /// Returns the host, as declared.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the language served.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the category served.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the base URL of the game API on this host, ending with a slash.
    ///
    /// Plain hosts are reached over `http` under `/ws/`. A host that already
    /// carries a scheme is used as the base URL as is.
    pub fn base_url(&self) -> String {
        if self.host.contains("://") {
            format!("{}/", self.host.trim_end_matches('/'))
        } else {
            format!("http://{}/ws/", self.host)
        }
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.host)
    }
}

/// Ordered endpoints sharing one language and category.
///
/// The declaration order is significant, it is the order in which endpoints are
/// probed and tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointGroup {
    language: Language,
    category: Category,
    endpoints: Vec<Endpoint>,
}

impl EndpointGroup {
    /// Creates a group from hosts, in the given order.
    ///
    /// Blank hosts are skipped.
    pub fn new<I, S>(language: Language, category: Category, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = hosts
            .into_iter()
            .filter(|host| !host.as_ref().trim().is_empty())
            .map(|host| Endpoint::new(host.as_ref(), language, category))
            .collect();

        EndpointGroup {
            language,
            category,
            endpoints,
        }
    }

    /// Returns the language served.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the category served.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the endpoints, in declaration order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Returns the number of endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns whether the group has no endpoint.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Returns a cursor positioned on the first endpoint.
    /// Returns a cursor on the first endpoint.
    pub fn cursor(&self) -> GroupCursor<'_> {
        GroupCursor {
            group: self,
            position: 0,
        }
    }
}

/// Position of an iteration over an [`EndpointGroup`].
///
/// The cursor is a plain value: each caller walking a group holds its own, so
/// concurrent walks of a shared group never interfere.
///
/// # Examples
///
/// ```
/// use guessr::servers::{Category, EndpointGroup, Language};
///
/// let group = EndpointGroup::new(Language::Polish, Category::Character, ["pl1", "pl3"]);
/// let mut cursor = group.cursor();
/// assert_eq!(cursor.current().unwrap().host(), "pl1");
/// assert!(cursor.advance());
/// assert_eq!(cursor.current().unwrap().host(), "pl3");
/// assert!(!cursor.advance());
/// assert!(cursor.current().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GroupCursor<'a> {
    group: &'a EndpointGroup,
    position: usize,
}

impl<'a> GroupCursor<'a> {
    /// Returns the current candidate, or `None` once the group is exhausted.
    pub fn current(&self) -> Option<&'a Endpoint> {
        self.group.endpoints.get(self.position)
    }

    /// Moves to the next candidate and returns whether one is left.
    pub fn advance(&mut self) -> bool {
        if self.position < self.group.endpoints.len() {
            self.position += 1;
        }
        self.position < self.group.endpoints.len()
    }

    /// Number of candidates not yet visited, the current one included.
    pub fn remaining(&self) -> usize {
        self.group.endpoints.len() - self.position
    }

    /// Zero based index of the current candidate.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns whether every candidate was visited.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the group walked by this cursor.
    pub fn group(&self) -> &'a EndpointGroup {
        self.group
    }
}

impl<'a> Iterator for GroupCursor<'a> {
    type Item = &'a Endpoint;

    fn next(&mut self) -> Option<Self::Item> {
        let endpoint = self.current()?;
        self.advance();
        Some(endpoint)
    }
}
