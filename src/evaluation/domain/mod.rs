//! Domain model for document evaluation tasks.
//!
//! The domain covers the inbound task message, the persisted task record and
//! its status transitions, the grading outcome, and the runtime scoring
//! settings. Infrastructure concerns stay outside of this boundary.

mod assessment;
mod error;
mod ids;
mod message;
mod record;
mod settings;
mod status;

pub use assessment::{Assessment, Score};
pub use error::{MessageDecodeError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use message::TaskMessage;
pub use record::{DocEvaluation, StatusUpdate, TaskRecord};
pub use settings::{
    DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PROMPT, DEFAULT_SECRET_KEY, ENDPOINT_KEY, MODEL_KEY,
    PROMPT_KEY, ResolvedScoringSettings, SECRET_KEY_KEY, SETTING_KEYS, ScoringSettings,
};
pub use status::TaskStatus;
