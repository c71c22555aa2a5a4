//! Bounded wait for host content

use crate::page::PageSource;
use composable_core::config::RenderWaitConfig;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Poll parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderWait {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for RenderWait {
    fn default() -> Self {
        RenderWaitConfig::default().into()
    }
}

impl From<RenderWaitConfig> for RenderWait {
    fn from(config: RenderWaitConfig) -> Self {
        Self {
            timeout: config.timeout(),
            interval: config.interval(),
        }
    }
}

/// How the wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

/// Polls fresh snapshots until rendered content shows up or time runs out
///
/// A snapshot error ends the wait as `Ready` so the conversion that follows
/// reports it.
pub async fn wait_for_content<S: PageSource + ?Sized>(source: &S, wait: RenderWait) -> WaitOutcome {
    let started = Instant::now();
    loop {
        match source.snapshot() {
            Ok(page) if page.has_rendered_content() => {
                debug!("rendered content detected");
                return WaitOutcome::Ready;
            }
            Ok(_) => {}
            Err(e) => {
                debug!("snapshot failed while waiting: {}", e);
                return WaitOutcome::Ready;
            }
        }
        if started.elapsed() > wait.timeout {
            debug!(timeout_ms = wait.timeout.as_millis() as u64, "timed out waiting for content");
            return WaitOutcome::TimedOut;
        }
        sleep(wait.interval).await;
    }
}
