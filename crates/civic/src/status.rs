// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `civic plugins` and `civic health` command implementations.

use std::io::IsTerminal;

use civic_core::types::{PluginHealth, Slot};
use civic_core::CivicError;
use civic_plugin::{PluginStatus, PluginSummary};
use civic_sync::SlotOutcome;
use serde::Serialize;

use crate::app::App;

/// Structured output for `civic plugins --json`.
#[derive(Debug, Serialize)]
pub struct PluginsResponse {
    pub discovered: usize,
    pub plugins: Vec<PluginSummary>,
    pub local: SlotOutcome,
    pub federal: SlotOutcome,
    pub warnings: Vec<String>,
}

/// Structured output for `civic health --json`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub local: Option<PluginHealth>,
    pub federal: Option<PluginHealth>,
}

pub async fn run_plugins(app: &App, json: bool, plain: bool) -> Result<PluginsResponse, CivicError> {
    let response = PluginsResponse {
        discovered: app.report.discovered,
        plugins: app.registry.summaries().await,
        local: app.report.local.clone(),
        federal: app.report.federal.clone(),
        warnings: app.report.warnings.clone(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_plugins(&response, use_color);
    }
    Ok(response)
}

/// Health of every occupied slot. Unhealthy when any occupied slot is.
pub async fn run_health(app: &App, json: bool, plain: bool) -> Result<HealthResponse, CivicError> {
    let health = app.registry.get_health().await;
    let healthy = [&health.local, &health.federal]
        .into_iter()
        .flatten()
        .all(|h| h.healthy);
    let response = HealthResponse {
        healthy,
        local: health.local,
        federal: health.federal,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_health(&response, use_color);
    }
    Ok(response)
}

fn print_plugins(response: &PluginsResponse, use_color: bool) {
    println!();
    println!("  civic plugins ({} discovered)", response.discovered);
    println!("  {}", "-".repeat(50));

    if response.plugins.is_empty() {
        println!("    no plugins registered");
    }
    for plugin in &response.plugins {
        let line = format!(
            "{:<8} {} {} ({})",
            plugin.slot, plugin.name, plugin.version, plugin.status
        );
        match (plugin.status, use_color) {
            (PluginStatus::Active, true) => {
                use colored::Colorize;
                println!("    {} {line}", "✓".green());
            }
            (PluginStatus::Error, true) => {
                use colored::Colorize;
                println!("    {} {line}", "✗".red());
            }
            (PluginStatus::Active, false) => println!("    [OK]   {line}"),
            (PluginStatus::Error, false) => println!("    [FAIL] {line}"),
        }
        if let Some(error) = &plugin.last_error {
            println!("           {error}");
        }
    }

    for warning in &response.warnings {
        if use_color {
            use colored::Colorize;
            println!("    {} {warning}", "!".yellow());
        } else {
            println!("    [WARN] {warning}");
        }
    }
    println!();
}

fn print_health(response: &HealthResponse, use_color: bool) {
    println!();
    println!("  civic health");
    println!("  {}", "-".repeat(50));

    for (slot, health) in [(Slot::Local, &response.local), (Slot::Federal, &response.federal)] {
        let Some(health) = health else {
            println!("    {slot:<8} (empty)");
            continue;
        };
        if use_color {
            use colored::Colorize;
            let mark = if health.healthy { "✓".green() } else { "✗".red() };
            println!("    {slot:<8} {mark} {}", health.message);
        } else {
            let mark = if health.healthy { "[OK]  " } else { "[FAIL]" };
            println!("    {slot:<8} {mark} {}", health.message);
        }
    }
    println!();
}
