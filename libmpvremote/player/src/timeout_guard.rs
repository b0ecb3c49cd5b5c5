use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeadlineError {
    #[error("{0} did not finish within {1:?}")]
    Elapsed(&'static str, Duration),
    #[error("{0} was aborted: {1}")]
    Aborted(&'static str, String),
}

/// Waits at most `deadline` for `operation`.
///
/// The operation runs on its own task and is not cancelled when the deadline passes. It keeps
/// going in the background and whatever it produces afterwards is dropped. Any writes it performs
/// may therefore still land after the caller has already responded.
pub(crate) async fn run_with_deadline<F, T>(
    label: &'static str,
    operation: F,
    deadline: Duration,
) -> Result<T, DeadlineError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let started = Instant::now();
    let mut handle = tokio::spawn(operation);

    match timeout(deadline, &mut handle).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(DeadlineError::Aborted(label, e.to_string())),
        Err(_) => {
            warn!("{label} exceeded deadline of {deadline:?}");
            tokio::spawn(async move {
                if handle.await.is_ok() {
                    info!(
                        "{label} completed late after {:?}, result discarded",
                        started.elapsed()
                    );
                }
            });
            Err(DeadlineError::Elapsed(label, deadline))
        }
    }
}

#[cfg(test)]
#[path = "./timeout_guard_test.rs"]
mod timeout_guard_test;
