// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciled record operations.

use std::collections::HashSet;

use chrono::Utc;
use civic_core::traits::{RecordUpsert, StoredRecord};
use civic_core::types::Collection;
use civic_core::CivicError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::queries::{format_ts, parse_json, parse_ts};

const SELECT_COLUMNS: &str = "SELECT id, external_id, payload, created_at, updated_at FROM records";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRecord> {
    let payload: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;
    Ok(StoredRecord {
        id: row.get(0)?,
        external_id: row.get(1)?,
        payload: parse_json(2, &payload)?,
        created_at: parse_ts(3, &created_at)?,
        updated_at: parse_ts(4, &updated_at)?,
    })
}

/// External ids of every record in `collection`.
pub async fn existing_external_ids(
    db: &Database,
    collection: Collection,
) -> Result<HashSet<String>, CivicError> {
    let collection = collection.as_str();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare_cached("SELECT external_id FROM records WHERE collection = ?1")?;
            let ids = stmt
                .query_map(params![collection], |row| row.get(0))?
                .collect::<Result<HashSet<String>, _>>()?;
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

/// Upsert every entry in one transaction, in order.
///
/// Existing rows keep their id and `created_at`; payload and `updated_at`
/// are replaced.
pub async fn upsert_batch(
    db: &Database,
    collection: Collection,
    batch: Vec<RecordUpsert>,
) -> Result<(), CivicError> {
    if batch.is_empty() {
        return Ok(());
    }
    let collection = collection.as_str();
    let now = format_ts(Utc::now());
    let rows = batch
        .into_iter()
        .map(|u| Ok((u.external_id, serde_json::to_string(&u.payload)?)))
        .collect::<Result<Vec<(String, String)>, serde_json::Error>>()?;

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO records (id, collection, external_id, payload, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                     ON CONFLICT (collection, external_id) DO UPDATE SET
                         payload = excluded.payload,
                         updated_at = excluded.updated_at",
                )?;
                for (external_id, payload) in &rows {
                    stmt.execute(params![
                        uuid::Uuid::new_v4().to_string(),
                        collection,
                        external_id,
                        payload,
                        now,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count(db: &Database, collection: Collection) -> Result<usize, CivicError> {
    let collection = collection.as_str();
    db.connection()
        .call(move |conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM records WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )?;
            Ok(n as usize)
        })
        .await
        .map_err(map_tr_err)
}

/// One page of records in insertion order.
pub async fn find_page(
    db: &Database,
    collection: Collection,
    offset: usize,
    limit: usize,
) -> Result<Vec<StoredRecord>, CivicError> {
    let collection = collection.as_str();
    // Clamp rather than wrap: SQLite reads a negative OFFSET as zero.
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "{SELECT_COLUMNS} WHERE collection = ?1 ORDER BY created_at, rowid LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt
                .query_map(params![collection, limit, offset], map_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_by_id(
    db: &Database,
    collection: Collection,
    id: &str,
) -> Result<Option<StoredRecord>, CivicError> {
    let collection = collection.as_str();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "{SELECT_COLUMNS} WHERE collection = ?1 AND id = ?2"
            ))?;
            match stmt.query_row(params![collection, id], map_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
