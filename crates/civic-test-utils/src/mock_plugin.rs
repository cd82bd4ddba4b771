// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock region plugin for deterministic testing.
//!
//! `MockPlugin` returns pre-configured records, can be told to fail any
//! lifecycle or fetch call, and counts the calls it receives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use civic_core::descriptor::DeclarativeRegionConfig;
use civic_core::records::{CampaignFinanceData, Meeting, Proposition, Representative};
use civic_core::traits::{CampaignFinanceSource, RegionPlugin};
use civic_core::types::{DataType, PluginHealth, RegionInfo};
use civic_core::CivicError;

/// A mock region plugin with configurable results.
pub struct MockPlugin {
    name: String,
    data_types: Vec<DataType>,
    propositions: Mutex<Vec<Proposition>>,
    meetings: Mutex<Vec<Meeting>>,
    representatives: Mutex<Vec<Representative>>,
    campaign_finance: Option<Mutex<CampaignFinanceData>>,
    fetch_failures: HashMap<DataType, String>,
    initialize_failure: Option<String>,
    destroy_failure: Option<String>,
    health_failure: Option<String>,
    initialize_calls: AtomicUsize,
    destroy_calls: AtomicUsize,
    fetch_log: Mutex<Vec<DataType>>,
    initialized_with: Mutex<Option<DeclarativeRegionConfig>>,
}

impl MockPlugin {
    pub const VERSION: &'static str = "0.0.1-mock";

    /// A plugin supporting propositions, meetings, and representatives, with
    /// no records.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data_types: vec![
                DataType::Propositions,
                DataType::Meetings,
                DataType::Representatives,
            ],
            propositions: Mutex::new(Vec::new()),
            meetings: Mutex::new(Vec::new()),
            representatives: Mutex::new(Vec::new()),
            campaign_finance: None,
            fetch_failures: HashMap::new(),
            initialize_failure: None,
            destroy_failure: None,
            health_failure: None,
            initialize_calls: AtomicUsize::new(0),
            destroy_calls: AtomicUsize::new(0),
            fetch_log: Mutex::new(Vec::new()),
            initialized_with: Mutex::new(None),
        }
    }

    pub fn with_data_types(mut self, data_types: Vec<DataType>) -> Self {
        self.data_types = data_types;
        self
    }

    pub fn with_propositions(self, records: Vec<Proposition>) -> Self {
        Self {
            propositions: Mutex::new(records),
            ..self
        }
    }

    pub fn with_meetings(self, records: Vec<Meeting>) -> Self {
        Self {
            meetings: Mutex::new(records),
            ..self
        }
    }

    pub fn with_representatives(self, records: Vec<Representative>) -> Self {
        Self {
            representatives: Mutex::new(records),
            ..self
        }
    }

    /// Enable the campaign finance capability with the given bundle.
    pub fn with_campaign_finance(mut self, data: CampaignFinanceData) -> Self {
        if !self.data_types.contains(&DataType::CampaignFinance) {
            self.data_types.push(DataType::CampaignFinance);
        }
        self.campaign_finance = Some(Mutex::new(data));
        self
    }

    pub fn failing_fetch(mut self, data_type: DataType, message: &str) -> Self {
        self.fetch_failures.insert(data_type, message.to_string());
        self
    }

    pub fn failing_initialize(mut self, message: &str) -> Self {
        self.initialize_failure = Some(message.to_string());
        self
    }

    pub fn failing_destroy(mut self, message: &str) -> Self {
        self.destroy_failure = Some(message.to_string());
        self
    }

    pub fn failing_health(mut self, message: &str) -> Self {
        self.health_failure = Some(message.to_string());
        self
    }

    /// Replace the propositions returned by later fetches.
    pub async fn set_propositions(&self, records: Vec<Proposition>) {
        *self.propositions.lock().await = records;
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls.load(Ordering::SeqCst)
    }

    /// Data types fetched so far, in call order.
    pub async fn fetched(&self) -> Vec<DataType> {
        self.fetch_log.lock().await.clone()
    }

    /// Configuration passed to the most recent `initialize`.
    pub async fn initialized_with(&self) -> Option<DeclarativeRegionConfig> {
        self.initialized_with.lock().await.clone()
    }

    async fn begin_fetch(&self, data_type: DataType) -> Result<(), CivicError> {
        self.fetch_log.lock().await.push(data_type);
        match self.fetch_failures.get(&data_type) {
            Some(message) => Err(CivicError::fetch(&self.name, data_type, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RegionPlugin for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        Self::VERSION
    }

    fn region_info(&self) -> RegionInfo {
        RegionInfo {
            id: self.name.clone(),
            name: self.name.clone(),
            description: format!("Mock region {}", self.name),
            timezone: "UTC".to_string(),
            data_source_urls: Vec::new(),
        }
    }

    fn supported_data_types(&self) -> Vec<DataType> {
        self.data_types.clone()
    }

    async fn fetch_propositions(&self) -> Result<Vec<Proposition>, CivicError> {
        self.begin_fetch(DataType::Propositions).await?;
        Ok(self.propositions.lock().await.clone())
    }

    async fn fetch_meetings(&self) -> Result<Vec<Meeting>, CivicError> {
        self.begin_fetch(DataType::Meetings).await?;
        Ok(self.meetings.lock().await.clone())
    }

    async fn fetch_representatives(&self) -> Result<Vec<Representative>, CivicError> {
        self.begin_fetch(DataType::Representatives).await?;
        Ok(self.representatives.lock().await.clone())
    }

    fn campaign_finance(&self) -> Option<&dyn CampaignFinanceSource> {
        self.campaign_finance
            .as_ref()
            .map(|_| self as &dyn CampaignFinanceSource)
    }

    async fn initialize(&self, config: Option<&DeclarativeRegionConfig>) -> Result<(), CivicError> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        *self.initialized_with.lock().await = config.cloned();
        match &self.initialize_failure {
            Some(message) => Err(CivicError::Internal(message.clone())),
            None => Ok(()),
        }
    }

    async fn health_check(&self) -> Result<PluginHealth, CivicError> {
        match &self.health_failure {
            Some(message) => Err(CivicError::Internal(message.clone())),
            None => Ok(PluginHealth::healthy("mock ok")),
        }
    }

    async fn destroy(&self) -> Result<(), CivicError> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        match &self.destroy_failure {
            Some(message) => Err(CivicError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CampaignFinanceSource for MockPlugin {
    async fn fetch_campaign_finance(&self) -> Result<CampaignFinanceData, CivicError> {
        self.begin_fetch(DataType::CampaignFinance).await?;
        match &self.campaign_finance {
            Some(data) => Ok(data.lock().await.clone()),
            None => Ok(CampaignFinanceData::default()),
        }
    }
}
