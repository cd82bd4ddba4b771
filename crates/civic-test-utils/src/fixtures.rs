// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal record and descriptor builders.

use chrono::{TimeZone, Utc};
use civic_core::records::{
    Committee, Contribution, Expenditure, IndependentExpenditure, Meeting, Money, Proposition,
    Representative,
};
use civic_core::types::DataType;
use serde_json::{Value, json};

pub fn proposition(external_id: &str) -> Proposition {
    Proposition {
        external_id: external_id.to_string(),
        title: format!("Measure {external_id}"),
        summary: None,
        status: Some("qualified".to_string()),
        election_date: None,
        category: None,
        source_url: None,
    }
}

/// `count` propositions with ids `prefix-0 .. prefix-{count-1}`.
pub fn propositions(prefix: &str, count: usize) -> Vec<Proposition> {
    (0..count)
        .map(|i| proposition(&format!("{prefix}-{i}")))
        .collect()
}

pub fn meeting(external_id: &str) -> Meeting {
    Meeting {
        external_id: external_id.to_string(),
        title: format!("Council session {external_id}"),
        body: Some("City Council".to_string()),
        scheduled_at: Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap(),
        location: None,
        agenda_url: None,
        minutes_url: None,
        video_url: None,
    }
}

pub fn representative(external_id: &str) -> Representative {
    Representative {
        external_id: external_id.to_string(),
        name: format!("Rep {external_id}"),
        office: "Council Member".to_string(),
        district: None,
        party: None,
        email: None,
        phone: None,
        photo_url: None,
        website: None,
    }
}

pub fn committee(external_id: &str) -> Committee {
    Committee {
        external_id: external_id.to_string(),
        name: format!("Committee {external_id}"),
        committee_type: None,
        candidate_name: None,
        party: None,
        status: None,
    }
}

pub fn contribution(external_id: &str, committee_id: &str, amount: &str) -> Contribution {
    Contribution {
        external_id: external_id.to_string(),
        committee_id: committee_id.to_string(),
        contributor_name: "Pat Donor".to_string(),
        contributor_city: None,
        contributor_state: None,
        contributor_zip: None,
        employer: None,
        occupation: None,
        amount: amount.parse::<Money>().unwrap(),
        date: None,
    }
}

pub fn expenditure(external_id: &str, committee_id: &str, amount: &str) -> Expenditure {
    Expenditure {
        external_id: external_id.to_string(),
        committee_id: committee_id.to_string(),
        payee_name: "Print Shop".to_string(),
        amount: amount.parse::<Money>().unwrap(),
        date: None,
        purpose: None,
    }
}

pub fn independent_expenditure(
    external_id: &str,
    committee_id: &str,
    amount: &str,
) -> IndependentExpenditure {
    IndependentExpenditure {
        external_id: external_id.to_string(),
        committee_id: committee_id.to_string(),
        candidate_name: None,
        support_or_oppose: Some("support".to_string()),
        amount: amount.parse::<Money>().unwrap(),
        date: None,
        description: None,
    }
}

/// A descriptor tree with one source per data type at `https://{name}.test/{type}`.
pub fn descriptor_json(name: &str, region_id: &str, data_types: &[DataType]) -> Value {
    let sources: Vec<Value> = data_types
        .iter()
        .map(|dt| {
            json!({
                "url": format!("https://{name}.test/{dt}"),
                "dataType": dt.to_string(),
                "contentGoal": format!("{dt} for {name}"),
            })
        })
        .collect();
    json!({
        "name": name,
        "displayName": name,
        "description": format!("Test region {name}"),
        "version": "1.0.0",
        "config": {
            "regionId": region_id,
            "dataSources": sources,
        }
    })
}
