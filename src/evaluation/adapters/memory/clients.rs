//! Scripted stand-ins for the conversion, download and scoring services.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::evaluation::{
    domain::{Assessment, ScoringSettings},
    ports::{
        ConversionError, ConversionResult, DocumentConverter, DocumentDownloader, DocumentScorer,
        DownloadError, DownloadResult, ScoringError, ScoringResult,
    },
};

/// Queue of canned replies plus a log of the requests that consumed them.
#[derive(Debug)]
struct Script<Request, Reply> {
    replies: VecDeque<Reply>,
    requests: Vec<Request>,
}

impl<Request, Reply> Default for Script<Request, Reply> {
    fn default() -> Self {
        Self {
            replies: VecDeque::new(),
            requests: Vec::new(),
        }
    }
}

type SharedScript<Request, Reply> = Arc<Mutex<Script<Request, Reply>>>;

fn push_reply<Request, Reply>(script: &SharedScript<Request, Reply>, reply: Reply) {
    let mut guard = script
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.replies.push_back(reply);
}

fn take_reply<Request, Reply>(
    script: &SharedScript<Request, Reply>,
    request: Request,
) -> Option<Reply> {
    let mut guard = script
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.requests.push(request);
    guard.replies.pop_front()
}

fn recorded<Request: Clone, Reply>(script: &SharedScript<Request, Reply>) -> Vec<Request> {
    script
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .requests
        .clone()
}

fn script_exhausted() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "no scripted reply left")
}

/// Conversion service replaying queued replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConverter {
    script: SharedScript<(String, Value), ConversionResult<String>>,
}

impl ScriptedConverter {
    /// Creates a converter with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the reply for the next call.
    pub fn push_reply(&self, reply: ConversionResult<String>) {
        push_reply(&self.script, reply);
    }

    /// Returns the `(url, params)` of every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Value)> {
        recorded(&self.script)
    }
}

#[async_trait]
impl DocumentConverter for ScriptedConverter {
    async fn convert(&self, url: &str, params: &Value) -> ConversionResult<String> {
        take_reply(&self.script, (url.to_owned(), params.clone()))
            .unwrap_or_else(|| Err(ConversionError::unreachable(script_exhausted())))
    }
}

/// Download service replaying queued replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDownloader {
    script: SharedScript<String, DownloadResult<String>>,
}

impl ScriptedDownloader {
    /// Creates a downloader with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the reply for the next call.
    pub fn push_reply(&self, reply: DownloadResult<String>) {
        push_reply(&self.script, reply);
    }

    /// Returns the URL of every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        recorded(&self.script)
    }
}

#[async_trait]
impl DocumentDownloader for ScriptedDownloader {
    async fn download(&self, url: &str) -> DownloadResult<String> {
        take_reply(&self.script, url.to_owned())
            .unwrap_or_else(|| Err(DownloadError::unreachable(script_exhausted())))
    }
}

/// Scoring service replaying queued replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScorer {
    script: SharedScript<String, ScoringResult<Option<Assessment>>>,
}

impl ScriptedScorer {
    /// Creates a scorer with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the reply for the next call.
    pub fn push_reply(&self, reply: ScoringResult<Option<Assessment>>) {
        push_reply(&self.script, reply);
    }

    /// Returns the document text of every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        recorded(&self.script)
    }
}

#[async_trait]
impl DocumentScorer for ScriptedScorer {
    async fn score(
        &self,
        document: &str,
        _settings: &ScoringSettings,
    ) -> ScoringResult<Option<Assessment>> {
        take_reply(&self.script, document.to_owned())
            .unwrap_or_else(|| Err(ScoringError::unreachable(script_exhausted())))
    }
}
