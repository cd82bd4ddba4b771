// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Region selection operations.

use std::str::FromStr;

use civic_core::types::{RegionSelection, Slot};
use civic_core::CivicError;
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{Database, map_tr_err};
use crate::queries::{format_ts, parse_json, parse_ts};

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RegionSelection> {
    let slot: String = row.get(0)?;
    let descriptor: String = row.get(2)?;
    let updated_at: String = row.get(4)?;
    Ok(RegionSelection {
        slot: Slot::from_str(&slot)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        name: row.get(1)?,
        descriptor: parse_json(2, &descriptor)?,
        active: row.get(3)?,
        updated_at: parse_ts(4, &updated_at)?,
    })
}

/// The active local selection, if any.
pub async fn find_active_local(db: &Database) -> Result<Option<RegionSelection>, CivicError> {
    find_first(
        db,
        "SELECT slot, name, descriptor, active, updated_at FROM region_selections
         WHERE slot = 'local' AND active = 1
         ORDER BY updated_at DESC LIMIT 1",
    )
    .await
}

/// The federal singleton, if any.
pub async fn find_federal(db: &Database) -> Result<Option<RegionSelection>, CivicError> {
    find_first(
        db,
        "SELECT slot, name, descriptor, active, updated_at FROM region_selections
         WHERE slot = 'federal'
         ORDER BY updated_at DESC LIMIT 1",
    )
    .await
}

async fn find_first(db: &Database, sql: &'static str) -> Result<Option<RegionSelection>, CivicError> {
    db.connection()
        .call(move |conn| match conn.query_row(sql, [], map_row) {
            Ok(selection) => Ok(Some(selection)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace a selection.
///
/// Activating a local selection deactivates every other local row, and the
/// federal slot keeps a single row.
pub async fn upsert(db: &Database, selection: &RegionSelection) -> Result<(), CivicError> {
    let slot = selection.slot.to_string();
    let name = selection.name.clone();
    let descriptor = serde_json::to_string(&selection.descriptor)?;
    let active = selection.active;
    let updated_at = format_ts(selection.updated_at);
    let is_federal = selection.slot == Slot::Federal;

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            if is_federal {
                tx.execute(
                    "DELETE FROM region_selections WHERE slot = 'federal' AND name <> ?1",
                    params![name],
                )?;
            } else if active {
                tx.execute(
                    "UPDATE region_selections SET active = 0 WHERE slot = 'local' AND name <> ?1",
                    params![name],
                )?;
            }
            tx.execute(
                "INSERT INTO region_selections (slot, name, descriptor, active, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (slot, name) DO UPDATE SET
                     descriptor = excluded.descriptor,
                     active = excluded.active,
                     updated_at = excluded.updated_at",
                params![slot, name, descriptor, active, updated_at],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
