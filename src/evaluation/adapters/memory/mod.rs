//! In-memory adapters for evaluation tests and local runs.

mod clients;
mod source;
mod store;

pub use clients::{ScriptedConverter, ScriptedDownloader, ScriptedScorer};
pub use source::ChannelMessageSource;
pub use store::InMemoryTaskStore;
