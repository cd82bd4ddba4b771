// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduled sync loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::SyncEngine;

/// Calls [`SyncEngine::sync_all`] on a fixed interval until cancelled.
///
/// The first sync runs immediately. Ticks that fall due while a sync is
/// still running are delayed, never run concurrently.
pub struct SyncRunner {
    engine: Arc<SyncEngine>,
    interval: Duration,
}

impl SyncRunner {
    pub fn new(engine: Arc<SyncEngine>, interval_secs: u64) -> Self {
        Self {
            engine,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Run until `cancel` fires. Returns the number of completed syncs.
    pub async fn run(&self, cancel: CancellationToken) -> usize {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut completed = 0;

        info!(interval_secs = self.interval.as_secs(), "sync runner started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(completed, "sync runner shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let results = self.engine.sync_all().await;
                    completed += 1;
                    debug!(run = completed, results = results.len(), "scheduled sync finished");
                }
            }
        }
        completed
    }
}
