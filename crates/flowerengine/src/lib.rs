//! FlowerEngine - Hive-Engine node discovery.
//!
//! Reads the node list the FlowerEngine benchmark publishes in a Hive
//! account's `json_metadata`, validates it, and recommends a node:
//! - fetcher: account -> validated [`NodeMetadataDocument`]
//! - selector: latency-first ([`best_available`]) and weighted-score
//!   ([`best_overall`]) policies, plus the active/failing breakdown
//!
//! The account lookup is injected through [`AccountLookup`]; [`HiveAccountLookup`]
//! talks to public Hive API nodes, [`FakeAccountLookup`] serves tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod hive;
pub mod lookup;
pub mod selector;
pub mod types;

pub use config::FlowerConfig;
pub use engine::{EngineClient, TokenInfo};
pub use error::{ConfigError, EngineError, LookupError, MetadataError};
pub use fetcher::{parse_metadata, MetadataFetcher, DEFAULT_ACCOUNT};
pub use hive::HiveAccountLookup;
pub use lookup::{AccountLookup, AccountRecord, FakeAccountLookup, FakeAccountLookupBuilder};
pub use selector::{
    active_and_failing, available_nodes, best_available, best_overall, AvailableSelection,
    OverallSelection,
};
pub use types::*;
