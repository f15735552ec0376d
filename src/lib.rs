//! Docscore: queue-driven document scoring worker.
//!
//! Consumes task messages, converts the referenced document through an
//! `OnlyOffice` conversion service, scores the converted text with an
//! OpenAI-compatible chat-completions service and persists the outcome.
//!
//! # Architecture
//!
//! Docscore follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP, queue)
//!
//! # Modules
//!
//! - [`evaluation`]: Task message handling and the evaluation lifecycle
//! - [`settings`]: Process configuration from flags and environment
//! - [`telemetry`]: Tracing subscriber installation

pub mod evaluation;
pub mod settings;
pub mod telemetry;
