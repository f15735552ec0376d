//! Port contracts for the evaluation worker's external collaborators.

mod conversion;
mod download;
mod scoring;
mod source;
mod store;

pub use conversion::{ConversionError, ConversionResult, DocumentConverter};
pub use download::{DocumentDownloader, DownloadError, DownloadResult};
pub use scoring::{DocumentScorer, ScoringError, ScoringResult};
pub use source::{MessageSource, SourceError, SourceResult};
pub use store::{StoreError, StoreResult, TaskStore};
