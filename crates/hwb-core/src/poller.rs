//! The poll-check-notify loop.
//!
//! One cycle: fetch statuses changed since the cursor, validate the payload,
//! format and send one message per record (in API order), then advance the
//! cursor to the server-reported `current_date`. Any failure aborts the rest of
//! the cycle, leaves the cursor where it was and is reported to the chat once.

use std::{fmt, sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::Cursor,
    errors::{DeliveryError, FetchError, RecordError, ShapeError},
    formatting::{failure_message, format_status},
    messaging::notifier::Notifier,
    ports::HomeworkSource,
    response,
};

/// Where in the cycle a failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Validating,
    Formatting,
    Notifying,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetching => "fetching",
            Self::Validating => "validating",
            Self::Formatting => "formatting",
            Self::Notifying => "notifying",
        })
    }
}

/// Anything that can fail inside one cycle.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl CycleError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Fetch(_) => Stage::Fetching,
            Self::Shape(_) => Stage::Validating,
            Self::Record(_) => Stage::Formatting,
            Self::Delivery(_) => Stage::Notifying,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub records: usize,
    pub sent: usize,
    pub cursor: Cursor,
}

/// Result of one cycle as seen from the loop boundary.
#[derive(Debug)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Failed(CycleError),
}

pub struct PollLoop {
    source: Arc<dyn HomeworkSource>,
    notifier: Notifier,
    interval: Duration,
    cursor: Cursor,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn HomeworkSource>,
        notifier: Notifier,
        interval: Duration,
        cursor: Cursor,
    ) -> Self {
        Self {
            source,
            notifier,
            interval,
            cursor,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Run one cycle. The cursor only moves if every step succeeded.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let from = self.cursor;
        tracing::info!(from_date = from.timestamp(), "requesting homework statuses");
        let payload = self.source.fetch(from).await?;

        let records = response::extract(&payload)?;
        if records.is_empty() {
            tracing::debug!("no status changes since last check");
        }

        let mut sent = 0usize;
        for record in &records {
            let message = format_status(record)?;
            self.notifier.send(&message).await?;
            sent += 1;
        }

        let next = response::current_date(&payload)?;
        if self.cursor.advance_to(next) {
            tracing::debug!(cursor = next, "cursor advanced");
        } else if next < from.timestamp() {
            tracing::warn!(
                cursor = from.timestamp(),
                current_date = next,
                "server reported a date before the cursor; keeping cursor"
            );
        }

        Ok(CycleReport {
            records: records.len(),
            sent,
            cursor: self.cursor,
        })
    }

    /// Run one cycle and contain its failure: log it and tell the chat.
    pub async fn tick(&mut self) -> CycleOutcome {
        match self.run_cycle().await {
            Ok(report) => {
                tracing::info!(
                    records = report.records,
                    sent = report.sent,
                    cursor = report.cursor.timestamp(),
                    "cycle completed"
                );
                CycleOutcome::Completed(report)
            }
            Err(err) => {
                tracing::error!(stage = %err.stage(), error = %err, "cycle failed");
                // Best-effort: a second failure is only logged.
                if let Err(e) = self.notifier.send(&failure_message(&err)).await {
                    tracing::error!(error = %e, "failed to report cycle failure");
                }
                CycleOutcome::Failed(err)
            }
        }
    }

    /// Poll until `cancel` fires. Returns the final cursor.
    ///
    /// A cycle in progress is allowed to finish; only the sleep is interrupted.
    pub async fn run(mut self, cancel: CancellationToken) -> Cursor {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            destination = %self.notifier.destination(),
            cursor = self.cursor.timestamp(),
            "poll loop started"
        );

        loop {
            self.tick().await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        tracing::info!(cursor = self.cursor.timestamp(), "poll loop stopped");
        self.cursor
    }
}
