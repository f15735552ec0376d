//! Runtime scoring settings read from the `config` table.

use secrecy::SecretString;

/// Key of the scoring endpoint base URL.
pub const ENDPOINT_KEY: &str = "openai:endpoint";
/// Key of the scoring API bearer secret.
pub const SECRET_KEY_KEY: &str = "openai:secret_key";
/// Key of the scoring model name.
pub const MODEL_KEY: &str = "openai:model";
/// Key of the grading system prompt.
pub const PROMPT_KEY: &str = "openai:prompt";

/// All keys looked up for a task, in lookup order.
pub const SETTING_KEYS: [&str; 4] = [ENDPOINT_KEY, SECRET_KEY_KEY, MODEL_KEY, PROMPT_KEY];

/// Endpoint used when `openai:endpoint` is unset.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
/// Placeholder secret used when `openai:secret_key` is unset.
pub const DEFAULT_SECRET_KEY: &str = "secret_key_here";
/// Model used when `openai:model` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// System prompt used when `openai:prompt` is unset.
pub const DEFAULT_PROMPT: &str = concat!(
    "This GPT is designed to assess documents based on specific criteria such as the ",
    "document's standardization and content accuracy. It will read documents, score them ",
    "out of 100, and provide a brief evaluation in about 200 Chinese characters. The GPT ",
    "should ignore formatting issues that may arise from conversions from formats like ",
    "Word. Here is an example of a document content:",
);

/// Scoring settings as stored; any value may be absent.
#[derive(Debug, Clone, Default)]
pub struct ScoringSettings {
    /// Scoring endpoint base URL.
    pub endpoint: Option<String>,
    /// Bearer secret for the scoring endpoint.
    pub secret_key: Option<SecretString>,
    /// Model name.
    pub model: Option<String>,
    /// Grading system prompt.
    pub prompt: Option<String>,
}

impl ScoringSettings {
    /// Builds settings from `(key, value)` rows.
    ///
    /// Unknown keys and `NULL` values are ignored.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Option<String>)>) -> Self {
        let mut settings = Self::default();
        for (key, value) in pairs {
            let Some(stored) = value else {
                continue;
            };
            match key.as_str() {
                ENDPOINT_KEY => settings.endpoint = Some(stored),
                SECRET_KEY_KEY => settings.secret_key = Some(SecretString::from(stored)),
                MODEL_KEY => settings.model = Some(stored),
                PROMPT_KEY => settings.prompt = Some(stored),
                _ => {}
            }
        }
        settings
    }

    /// Applies the built-in default to every unset value.
    #[must_use]
    pub fn resolve(&self) -> ResolvedScoringSettings {
        ResolvedScoringSettings {
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            secret_key: self
                .secret_key
                .clone()
                .unwrap_or_else(|| SecretString::from(DEFAULT_SECRET_KEY.to_owned())),
            model: self
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            prompt: self
                .prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT.to_owned()),
        }
    }
}

/// Scoring settings with defaults applied.
#[derive(Debug, Clone)]
pub struct ResolvedScoringSettings {
    /// Scoring endpoint base URL.
    pub endpoint: String,
    /// Bearer secret for the scoring endpoint.
    pub secret_key: SecretString,
    /// Model name.
    pub model: String,
    /// Grading system prompt.
    pub prompt: String,
}
