//! Status-poll state machine: Submitted → {Pending, Complete, Failed,
//! TimedOut}.
//!
//! The loop is generic over an async fetch closure so the transitions can be
//! tested against scripted status sequences without a network or real sleeps.
//! The handler awaits this future, so a client disconnect drops it and
//! cancels the remaining poll budget.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::ndaq_client::{JobStatus, NdaqError};

/// Polls until the job completes, fails, or the attempt budget is exhausted.
///
/// Transition rules, checked in order on each attempt:
/// - `Failed` flag set → `GenerationFailed`, remaining budget discarded.
/// - `Complete` flag set with a positive `FileId` → done, returns the id.
/// - anything else (including a transient fetch error) → still pending; the
///   error consumes the attempt and the loop continues.
///
/// At most `max_attempts` polls are made, with a fixed `interval` between
/// them; exhausting the budget yields `GenerationTimeout`.
pub async fn poll_until_complete<F, Fut>(
    max_attempts: u32,
    interval: Duration,
    mut fetch: F,
) -> Result<i64, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus, NdaqError>>,
{
    for attempt in 1..=max_attempts {
        match fetch().await {
            Ok(status) => {
                debug!("status check {attempt}/{max_attempts}: {status:?}");

                if status.failed {
                    return Err(AppError::GenerationFailed);
                }
                if status.complete {
                    if let Some(file_id) = status.file_id {
                        if file_id > 0 {
                            return Ok(file_id);
                        }
                    }
                }
            }
            Err(err) => {
                warn!("status check {attempt}/{max_attempts} failed: {err}");
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(AppError::GenerationTimeout)
}
