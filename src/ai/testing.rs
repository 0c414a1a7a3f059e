//! Test doubles for code built on the gateway

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use super::credential::CredentialSource;
use super::gateway::CompletionGateway;
use super::provider::{CompletionBackend, UpstreamReply, UpstreamRequest};
use super::retry::RecordingSleeper;
use crate::types::{ErrorCategory, LlmError};

/// Backend that replays a fixed script of replies
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Reply used once the script runs out
    repeat: Option<String>,
    calls: AtomicU32,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat: None,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Same reply on every call
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            repeat: Some(text.into()),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn generate(
        &self,
        request: &UpstreamRequest,
        _api_key: &SecretString,
    ) -> Result<UpstreamReply, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let next = self.script.lock().unwrap().pop_front();
        match (next, &self.repeat) {
            (Some(reply), _) => reply.map(UpstreamReply::text_only),
            (None, Some(text)) => Ok(UpstreamReply::text_only(text.clone())),
            (None, None) => Err(LlmError::new(ErrorCategory::Transient, "script exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

pub fn transient(message: &str) -> LlmError {
    LlmError::new(ErrorCategory::Transient, message)
}

/// Gateway over `backend` with a fixed key and a recording sleeper
pub fn gateway_with(backend: &Arc<ScriptedBackend>) -> (CompletionGateway, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::new());
    let gateway = CompletionGateway::new(backend.clone(), CredentialSource::fixed("test-key"))
        .with_sleeper(sleeper.clone());
    (gateway, sleeper)
}
