// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source fetcher used by the binary when no upstream integration is linked in.

use async_trait::async_trait;
use serde_json::Value;

use civic_core::descriptor::DataSource;
use civic_core::traits::SourceFetcher;
use civic_core::CivicError;

/// Rejects every fetch. Plugins still load, register and report health;
/// each sync records a per-data-type fetch error instead of writing records.
pub struct UnconfiguredFetcher;

#[async_trait]
impl SourceFetcher for UnconfiguredFetcher {
    async fn fetch(&self, source: &DataSource) -> Result<Vec<Value>, CivicError> {
        Err(CivicError::Internal(format!(
            "no source fetcher configured for {}",
            source.url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn every_fetch_names_the_source() {
        let source: DataSource = serde_json::from_value(json!({
            "url": "https://ca.test/props",
            "dataType": "propositions",
            "contentGoal": "measures"
        }))
        .unwrap();
        let err = UnconfiguredFetcher.fetch(&source).await.unwrap_err();
        assert!(err.to_string().contains("https://ca.test/props"));
    }
}
