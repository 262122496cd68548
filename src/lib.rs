//! timberyard: a forestry and timber-trade ledger
//!
//! Two record collections, trees and timber lots, each kept in its own
//! ordered store and reached through the query/update entry points on
//! [`application::services::Ledger`].
//!
//! ```ignore
//! use timberyard::config::Settings;
//! use timberyard::domain::TreePayload;
//! use timberyard::infrastructure::di::ServiceContainer;
//!
//! let container = ServiceContainer::new(Settings::load(None)?)?;
//! let ledger = container.ledger();
//! let tree = ledger.add_tree(TreePayload {
//!     species: "Oak".into(),
//!     diameter: 40.0,
//!     length: 12.0,
//! })?;
//! assert_eq!(ledger.get_tree(&tree.id)?, tree);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
