// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source fetcher serving canned items keyed by URL.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use civic_core::descriptor::DataSource;
use civic_core::traits::SourceFetcher;
use civic_core::CivicError;

/// Returns the items registered for a source URL. Unknown URLs yield no items.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<Vec<Value>, String>>,
    requested: Mutex<Vec<DataSource>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, url: &str, items: Vec<Value>) -> Self {
        self.responses.insert(url.to_string(), Ok(items));
        self
    }

    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// Every source passed to `fetch`, in call order.
    pub async fn requested(&self) -> Vec<DataSource> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch(&self, source: &DataSource) -> Result<Vec<Value>, CivicError> {
        self.requested.lock().await.push(source.clone());
        match self.responses.get(&source.url) {
            Some(Ok(items)) => Ok(items.clone()),
            Some(Err(message)) => Err(CivicError::Internal(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}
