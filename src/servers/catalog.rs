//! Catalog of the known game servers.
//!
//! The [`Catalog`] maps a (language, category) pair to the [`EndpointGroup`] able
//! to serve it. It is built once when the process starts, from the built-in host
//! list optionally amended by the configuration, and is never mutated afterwards.
//! Groups are handed out by reference: their order is significant and is never
//! copied or reshuffled.

use std::collections::HashMap;

use log::debug;

use crate::{
    Error, Result,
    servers::{Category, EndpointGroup, Language},
};

/// Known API hosts of character games, per language, in the order they are tried.
const CHARACTER_HOSTS: [(Language, &[&str]); 16] = [
    (
        Language::Arabic,
        &["api-ar2.akinator.com", "api-ar3.akinator.com"],
    ),
    (
        Language::Chinese,
        &["api-cn1.akinator.com", "api-cn3.akinator.com"],
    ),
    (
        Language::Dutch,
        &["api-nl2.akinator.com", "api-nl3.akinator.com"],
    ),
    (
        Language::English,
        &[
            "api-en1.akinator.com",
            "api-en3.akinator.com",
            "api-en4.akinator.com",
            "api-usa1.akinator.com",
            "api-usa3.akinator.com",
            "api-usa4.akinator.com",
            "api-usa5.akinator.com",
            "api-usa6.akinator.com",
            "api-us3.akinator.com",
            "api-us4.akinator.com",
            "ns623133.ovh.net:8014",
        ],
    ),
    (
        Language::French,
        &[
            "api-obj-fr1.akinator.com",
            "api-obj-fr3.akinator.com",
            "ns623133.ovh.net:8030",
        ],
    ),
    (
        Language::German,
        &["api-de3.akinator.com", "ns623133.ovh.net:8005"],
    ),
    (Language::Hebrew, &["ns623133.ovh.net:8006"]),
    (
        Language::Hindi,
        &["api-in1.akinator.com", "api-in2.akinator.com"],
    ),
    (
        Language::Italian,
        &["api-it2.akinator.com", "api-it3.akinator.com"],
    ),
    (
        Language::Japanese,
        &[
            "api-jp2.akinator.com",
            "api-jp3.akinator.com",
            "ns623133.ovh.net:8012",
        ],
    ),
    (
        Language::Korean,
        &["api-kr1.akinator.com", "api-kr4.akinator.com"],
    ),
    (
        Language::Polish,
        &["api-pl1.akinator.com", "api-pl3.akinator.com"],
    ),
    (
        Language::Portuguese,
        &["api-pt3.akinator.com", "api-pt4.akinator.com"],
    ),
    (
        Language::Russian,
        &[
            "api-ru1.akinator.com",
            "api-ru3.akinator.com",
            "api-ru4.akinator.com",
        ],
    ),
    (
        Language::Spanish,
        &[
            "api-es3.akinator.com",
            "api-es4.akinator.com",
            "ns623133.ovh.net:8013",
        ],
    ),
    (
        Language::Turkish,
        &["api-tr1.akinator.com", "api-tr3.akinator.com"],
    ),
];

/// Immutable mapping from (language, category) to an [`EndpointGroup`].
///
/// # Examples
///
/// ```
/// use guessr::servers::{Catalog, Category, Language};
///
/// let catalog = Catalog::builtin();
/// let group = catalog.lookup(Language::Portuguese, Category::Character).unwrap();
/// assert_eq!(group.endpoints()[0].host(), "api-pt3.akinator.com");
///
/// assert!(catalog.lookup(Language::Portuguese, Category::Animal).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    groups: HashMap<(Language, Category), EndpointGroup>,
}

impl Catalog {
    /// Creates a catalog from groups.
    ///
    /// When two groups share a language and category the last one wins.
    pub fn new<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = EndpointGroup>,
    {
        let groups = groups
            .into_iter()
            .map(|group| ((group.language(), group.category()), group))
            .collect();

        Catalog { groups }
    }

    /// Creates the catalog of the known character servers.
    pub fn builtin() -> Self {
        Catalog::new(CHARACTER_HOSTS.iter().map(|(language, hosts)| {
            EndpointGroup::new(*language, Category::Character, hosts.iter())
        }))
    }

    /// Creates a new catalog where `overrides` replace the groups they share a pair with.
    ///
    /// Meant to be used once, while the process starts.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = EndpointGroup>,
    {
        for group in overrides {
            debug!(
                "override servers of {}/{} with {:?}",
                group.language(),
                group.category(),
                group.endpoints()
            );
            self.groups
                .insert((group.language(), group.category()), group);
        }
        self
    }

    /// Returns the group serving `language` and `category`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedCombination`] when no group is registered for the pair.
    pub fn lookup(&self, language: Language, category: Category) -> Result<&EndpointGroup> {
        self.groups
            .get(&(language, category))
            .ok_or(Error::UnsupportedCombination { language, category })
    }

    /// Returns every registered group, in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = &EndpointGroup> {
        self.groups.values()
    }
}
