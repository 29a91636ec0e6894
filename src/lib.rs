//! FarmConnect: a conversational job board connecting farm workers with farm owners.
//!
//! [`bot::Bot`] drives the per-sender dialogs; [`matching::MatchingEngine`]
//! ranks open jobs for a farmer. Storage, outbound messaging and the scoring
//! oracle are injected behind the traits in [`store`], [`messaging`] and
//! [`oracle`].

pub mod bot;
pub mod config;
pub mod error;
pub mod matching;
pub mod messaging;
pub mod models;
pub mod oracle;
pub mod seed;
pub mod store;

pub use bot::Bot;
pub use config::Config;
pub use matching::MatchingEngine;
