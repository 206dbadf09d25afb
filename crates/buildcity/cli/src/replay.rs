//! Replays a scripted web-view session against a gate.
//!
//! A script is JSON lines. Each line is a gate event (`navigation`,
//! `load_started`, `load_error`, `http_error`) or one of the control steps
//! `{"type":"sleep","ms":N}` and `{"type":"unmount"}`. Blank lines and lines
//! starting with `#` are skipped.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use buildcity_gate::{
    GateEvent, GateOutcome, GateResolver, GateSession, RecordingRouter, RecordingWebView,
    RouterCall, WebViewCall,
};
use buildcity_store::KeyValueStore;
use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Event(GateEvent),
    Sleep(Duration),
    Unmount,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Control {
    Sleep { ms: u64 },
    Unmount,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut steps = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let step = parse_step(line).with_context(|| format!("line {}", index + 1))?;
            steps.push(step);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn parse_step(line: &str) -> anyhow::Result<Step> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    match value.get("type").and_then(|t| t.as_str()) {
        Some("sleep") | Some("unmount") => Ok(match serde_json::from_value(value)? {
            Control::Sleep { ms } => Step::Sleep(Duration::from_millis(ms)),
            Control::Unmount => Step::Unmount,
        }),
        Some(_) => Ok(Step::Event(serde_json::from_value(value)?)),
        None => bail!("missing \"type\" field"),
    }
}

/// What the headless host saw during a replay.
#[derive(Debug)]
pub struct ReplayReport {
    pub outcome: GateOutcome,
    pub web_view: Vec<WebViewCall>,
    pub router: Vec<RouterCall>,
    /// Script steps not delivered because the gate had already finished
    pub skipped: usize,
}

/// Run `script` through a fresh session over `store`.
///
/// The event channel closes once the script is exhausted, so an undecided
/// gate ends as [`GateOutcome::Abandoned`]; end a script with a `sleep` to
/// let the redirect timer fire first.
pub async fn replay(
    resolver: GateResolver,
    store: Arc<dyn KeyValueStore>,
    script: &Script,
) -> anyhow::Result<ReplayReport> {
    let web_view = Arc::new(RecordingWebView::new());
    let router = Arc::new(RecordingRouter::new());
    let session = GateSession::new(resolver, store, web_view.clone(), router.clone());
    let (handle, inbox) = GateSession::channel(script.len());
    let task = tokio::spawn(session.run(inbox));

    let mut skipped = 0;
    for (index, step) in script.steps().iter().enumerate() {
        if task.is_finished() {
            skipped = script.len() - index;
            debug!(skipped, "Gate finished, remaining steps skipped");
            break;
        }
        match step {
            Step::Event(event) => {
                if handle.send(event.clone()).await.is_err() {
                    skipped = script.len() - index;
                    break;
                }
            }
            Step::Sleep(duration) => tokio::time::sleep(*duration).await,
            Step::Unmount => handle.unmount(),
        }
    }
    drop(handle);

    let outcome = task.await.context("gate session panicked")?;
    Ok(ReplayReport {
        outcome,
        web_view: web_view.calls(),
        router: router.calls(),
        skipped,
    })
}
