//! Game servers and their selection.
//!
//! The game is served by redundant hosts partitioned by language and category.
//! This module declares them and picks a live one.
//!
//! # Modules
//!
//! - `endpoint` - Endpoints, ordered endpoint groups and group cursors
//! - `catalog` - The process wide catalog of groups
//! - `selector` - Reachability probing and selection of the first live endpoint
//!
//! # Examples
//!
//! ```
//! use guessr::servers::{Catalog, Category, Language};
//!
//! let catalog = Catalog::builtin();
//! let group = catalog.lookup(Language::English, Category::Character).unwrap();
//! for endpoint in group.cursor() {
//!     println!("{}", endpoint.base_url());
//! }
//! ```

mod catalog;
mod endpoint;
mod selector;

pub use crate::servers::catalog::Catalog;
pub use crate::servers::endpoint::{Category, Endpoint, EndpointGroup, GroupCursor, Language};
pub use crate::servers::selector::{Prober, ServerSelector};
