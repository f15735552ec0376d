//! Document evaluation worker.
//!
//! Each queue payload names a task, a conversion endpoint and conversion
//! parameters. The worker converts the document, downloads the converted
//! text, asks a chat-completions service to score it and records the result
//! on the task row. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
