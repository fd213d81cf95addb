//! Scripted in-memory workers for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use taskpanel_core::{Worker, WorkerFailure, WorkerReply};

/// What a scripted worker does when invoked.
#[derive(Debug, Clone)]
pub(crate) enum Script {
    Succeed(Value),
    Fail(&'static str),
    Panic,
    /// Sleep, then succeed.
    Delay(Duration, Value),
    /// Never settle.
    Hang,
}

/// Shared log of worker labels in completion order.
pub(crate) type CompletionLog = Arc<Mutex<Vec<String>>>;

pub(crate) struct ScriptedWorker {
    label: String,
    script: Script,
    calls: Mutex<Vec<(Value, String)>>,
    completions: Option<CompletionLog>,
}

impl ScriptedWorker {
    pub(crate) fn new(label: &str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            script,
            calls: Mutex::new(Vec::new()),
            completions: None,
        })
    }

    pub(crate) fn logged(label: &str, script: Script, log: &CompletionLog) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            script,
            calls: Mutex::new(Vec::new()),
            completions: Some(Arc::clone(log)),
        })
    }

    pub(crate) fn ok_empty() -> Arc<Self> {
        Self::new("ok", Script::Succeed(json!({})))
    }

    /// (input, instructions) pairs this worker was invoked with.
    pub(crate) fn calls(&self) -> Vec<(Value, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record_completion(&self) {
        if let Some(log) = &self.completions {
            log.lock().unwrap().push(self.label.clone());
        }
    }
}

#[async_trait]
impl Worker for ScriptedWorker {
    async fn process(&self, input: &Value, instructions: &str) -> WorkerReply {
        self.calls
            .lock()
            .unwrap()
            .push((input.clone(), instructions.to_string()));

        let reply = match &self.script {
            Script::Succeed(value) => Ok(value.clone()),
            Script::Fail(message) => Err(WorkerFailure::new(*message).with_raw_output("raw text")),
            Script::Panic => panic!("scripted worker {} panicked", self.label),
            Script::Delay(delay, value) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
            Script::Hang => std::future::pending().await,
        };

        self.record_completion();
        reply
    }
}
