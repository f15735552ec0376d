//! Service layer for task evaluation.

mod consumer;
mod lifecycle;
mod resilient;

pub use consumer::{ConsumerSummary, MessageHandler, run, run_until};
pub use lifecycle::{
    EvaluationError, EvaluationService, ProcessError, ProcessOutcome, ProcessResult,
};
pub use resilient::{ReconnectOnce, ResilientStore};
