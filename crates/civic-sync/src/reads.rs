// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginated read accessors over reconciled collections.

use civic_core::records::{
    Committee, Contribution, Expenditure, ExternalRecord, IndependentExpenditure, Meeting,
    Persisted, Proposition, Representative,
};
use civic_core::traits::StoredRecord;
use civic_core::types::{Collection, Page, PageRequest};
use civic_core::CivicError;
use serde_json::Value;

use crate::engine::SyncEngine;

fn project<R: ExternalRecord>(row: StoredRecord) -> Result<Persisted<R::View>, CivicError> {
    let record: R = serde_json::from_value(row.payload)?;
    Ok(Persisted {
        id: row.id,
        created_at: row.created_at,
        updated_at: row.updated_at,
        record: record.into_view(),
    })
}

macro_rules! accessors {
    ($($list:ident, $single:ident => $record:ty;)*) => {
        impl SyncEngine {
            $(
                pub async fn $list(
                    &self,
                    page: PageRequest,
                ) -> Result<Page<Persisted<<$record as ExternalRecord>::View>>, CivicError> {
                    self.list::<$record>(page).await
                }

                pub async fn $single(
                    &self,
                    id: &str,
                ) -> Result<Option<Persisted<<$record as ExternalRecord>::View>>, CivicError> {
                    self.get::<$record>(id).await
                }
            )*
        }
    };
}

accessors! {
    propositions, proposition => Proposition;
    meetings, meeting => Meeting;
    representatives, representative => Representative;
    committees, committee => Committee;
    contributions, contribution => Contribution;
    expenditures, expenditure => Expenditure;
    independent_expenditures, independent_expenditure => IndependentExpenditure;
}

impl SyncEngine {
    /// One page of `R`, projected for reads. Issues one count and one page query.
    pub async fn list<R: ExternalRecord>(
        &self,
        page: PageRequest,
    ) -> Result<Page<Persisted<R::View>>, CivicError> {
        let total = self.store().count(R::COLLECTION).await?;
        let rows = self
            .store()
            .find_page(R::COLLECTION, page.offset, page.limit)
            .await?;
        let items = rows
            .into_iter()
            .map(project::<R>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total, page))
    }

    pub async fn get<R: ExternalRecord>(
        &self,
        id: &str,
    ) -> Result<Option<Persisted<R::View>>, CivicError> {
        self.store()
            .find_by_id(R::COLLECTION, id)
            .await?
            .map(project::<R>)
            .transpose()
    }

    /// A page of any collection rendered as JSON.
    pub async fn list_json(
        &self,
        collection: Collection,
        page: PageRequest,
    ) -> Result<Page<Value>, CivicError> {
        match collection {
            Collection::Propositions => to_json(self.list::<Proposition>(page).await?),
            Collection::Meetings => to_json(self.list::<Meeting>(page).await?),
            Collection::Representatives => to_json(self.list::<Representative>(page).await?),
            Collection::Committees => to_json(self.list::<Committee>(page).await?),
            Collection::Contributions => to_json(self.list::<Contribution>(page).await?),
            Collection::Expenditures => to_json(self.list::<Expenditure>(page).await?),
            Collection::IndependentExpenditures => {
                to_json(self.list::<IndependentExpenditure>(page).await?)
            }
        }
    }
}

fn to_json<V: serde::Serialize>(page: Page<Persisted<V>>) -> Result<Page<Value>, CivicError> {
    let items = page
        .items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        items,
        total: page.total,
        offset: page.offset,
        limit: page.limit,
        has_more: page.has_more,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use civic_core::types::{DataType, Slot};
    use civic_core::CampaignFinanceData;
    use civic_plugin::PluginRegistry;
    use civic_test_utils::{MemoryRecordStore, MockPlugin, fixtures};
    use serde_json::json;

    async fn synced_engine() -> SyncEngine {
        let mut contribution = fixtures::contribution("k1", "c1", "1234.56");
        contribution.employer = None;
        let plugin = MockPlugin::new("ohio")
            .with_propositions(fixtures::propositions("p", 7))
            .with_campaign_finance(CampaignFinanceData {
                contributions: vec![contribution],
                ..Default::default()
            });
        let registry = Arc::new(PluginRegistry::new());
        registry
            .register(Slot::Local, "ohio", Arc::new(plugin), None)
            .await
            .unwrap();
        let engine = SyncEngine::new(registry, Arc::new(MemoryRecordStore::new()));
        engine.sync_data_type(DataType::Propositions).await;
        engine.sync_data_type(DataType::CampaignFinance).await;
        engine
    }

    #[tokio::test]
    async fn pages_report_has_more() {
        let engine = synced_engine().await;

        let first = engine.propositions(PageRequest::new(0, 5)).await.unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total, 7);
        assert!(first.has_more);

        let last = engine.propositions(PageRequest::new(5, 5)).await.unwrap();
        assert_eq!(last.items.len(), 2);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn maximum_offset_yields_an_empty_last_page() {
        let engine = synced_engine().await;
        let page = engine
            .propositions(PageRequest::new(usize::MAX, 50))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 7);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let engine = synced_engine().await;
        let page = engine.propositions(PageRequest::new(0, 10_000)).await.unwrap();
        assert_eq!(page.limit, 500);
        let page = engine.propositions(PageRequest::new(0, 0)).await.unwrap();
        assert_eq!(page.limit, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn money_is_a_float_and_nulls_are_absent() {
        let engine = synced_engine().await;
        let page = engine.contributions(PageRequest::default()).await.unwrap();
        let view = &page.items[0];
        assert_eq!(view.record.amount, 1234.56);

        let rendered = serde_json::to_value(view).unwrap();
        assert_eq!(rendered["amount"], json!(1234.56));
        assert!(rendered.get("employer").is_none());
        assert!(rendered.get("id").is_some());
    }

    #[tokio::test]
    async fn get_by_id_round_trips_through_list() {
        let engine = synced_engine().await;
        let page = engine.propositions(PageRequest::new(0, 1)).await.unwrap();
        let id = page.items[0].id.clone();

        let found = engine.proposition(&id).await.unwrap().expect("present");
        assert_eq!(found.record.external_id, "p-0");
        assert!(engine.meeting(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_json_covers_every_collection() {
        let engine = synced_engine().await;
        let page = engine
            .list_json(Collection::Contributions, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0]["externalId"], "k1");

        let empty = engine
            .list_json(Collection::IndependentExpenditures, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(empty.total, 0);
        assert!(!empty.has_more);
    }
}
