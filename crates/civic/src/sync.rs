// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `civic sync` and `civic run` command implementations.

use std::io::IsTerminal;

use civic_core::types::{DataType, SyncResult};
use civic_core::CivicError;
use civic_sync::SyncRunner;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::App;

/// Run one sync pass, either over everything or one data type of the local plugin.
pub async fn run_sync(
    app: &App,
    data_type: Option<DataType>,
    json: bool,
    plain: bool,
) -> Result<Vec<SyncResult>, CivicError> {
    let results = match data_type {
        Some(data_type) => vec![app.engine.sync_data_type(data_type).await],
        None => app.engine.sync_all().await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_results(&results, use_color);
    }
    Ok(results)
}

/// Sync on the configured interval until SIGINT or SIGTERM.
pub async fn run_scheduled(app: &App) -> Result<usize, CivicError> {
    let cancel = install_signal_handler();
    let runner = SyncRunner::new(app.engine.clone(), app.config.sync.interval_secs);
    let completed = runner.run(cancel).await;
    info!(completed, "scheduled sync stopped");
    Ok(completed)
}

/// Returns a token cancelled on SIGINT (Ctrl+C) or, on unix, SIGTERM.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, waiting for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

fn print_results(results: &[SyncResult], use_color: bool) {
    println!();
    println!("  civic sync");
    println!("  {}", "-".repeat(60));

    if results.is_empty() {
        println!("    no active plugins");
        println!();
        return;
    }

    for result in results {
        let counts = format!(
            "{} processed ({} created, {} updated)",
            result.items_processed, result.items_created, result.items_updated
        );
        let label = format!("{}/{}", result.plugin, result.data_type);
        if use_color {
            use colored::Colorize;
            let mark = if result.is_success() {
                "✓".green()
            } else {
                "✗".red()
            };
            println!("    {mark} {label:<32} {counts}");
        } else {
            let mark = if result.is_success() { "[OK]  " } else { "[FAIL]" };
            println!("    {mark} {label:<32} {counts}");
        }
        for error in &result.errors {
            println!("           {error}");
        }
    }

    let failed = results.iter().filter(|r| !r.is_success()).count();
    println!();
    println!("  {} results, {failed} with errors", results.len());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use civic_config::CivicConfig;
    use civic_storage::SqliteStore;
    use civic_test_utils::{StaticFetcher, fixtures};
    use serde_json::json;

    async fn app_with_items() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ohio.json"),
            fixtures::descriptor_json("ohio", "oh", &[DataType::Propositions, DataType::Meetings])
                .to_string(),
        )
        .unwrap();
        let mut config = CivicConfig::default();
        config.plugins.directory = dir.path().display().to_string();
        config.plugins.local_region = Some("ohio".to_string());

        let fetcher = StaticFetcher::new()
            .with_items(
                "https://ohio.test/propositions",
                vec![json!({ "externalId": "p1", "title": "Issue 1" })],
            )
            .with_failure("https://ohio.test/meetings", "upstream 503");
        let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
        let app = App::start_with_store(config, store, Arc::new(fetcher))
            .await
            .unwrap();
        (dir, app)
    }

    #[tokio::test]
    async fn sync_reports_each_data_type() {
        let (_dir, app) = app_with_items().await;
        let results = run_sync(&app, None, true, true).await.unwrap();
        assert_eq!(results.len(), 2);

        let props = results
            .iter()
            .find(|r| r.data_type == DataType::Propositions)
            .unwrap();
        assert_eq!(props.items_created, 1);
        let meetings = results
            .iter()
            .find(|r| r.data_type == DataType::Meetings)
            .unwrap();
        assert_eq!(meetings.items_processed, 0);
        assert!(meetings.errors[0].contains("upstream 503"));
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn sync_one_data_type() {
        let (_dir, app) = app_with_items().await;
        let results = run_sync(&app, Some(DataType::Propositions), false, true)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].items_processed, 1);
        app.shutdown().await.unwrap();
    }
}
