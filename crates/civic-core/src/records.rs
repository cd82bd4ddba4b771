// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External civic records and their read projections.
//!
//! Every record carries an `externalId`, the only key that joins a freshly
//! fetched record to its persisted copy. Monetary amounts are held as exact
//! decimal strings ([`Money`]) and only become `f64` in read projections.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Collection;

/// A record type that can be reconciled into a persisted collection.
pub trait ExternalRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the record is persisted in.
    const COLLECTION: Collection;

    /// Read projection returned by accessors.
    type View: Serialize + fmt::Debug + Clone + Send + Sync + 'static;

    fn external_id(&self) -> &str;

    fn into_view(self) -> Self::View;
}

/// An exact decimal amount, stored as its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money(String);

impl Money {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lossy conversion for read projections.
    pub fn to_f64(&self) -> f64 {
        self.0.parse().unwrap_or(0.0)
    }
}

impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (digits, None),
        };
        let valid = !whole.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && frac.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()));
        if valid {
            Ok(Money(trimmed.to_string()))
        } else {
            Err(format!("invalid decimal amount `{s}`"))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount as a number or string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                Ok(Money(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                Ok(Money(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                if v.is_finite() {
                    Ok(Money(v.to_string()))
                } else {
                    Err(E::custom("amount must be finite"))
                }
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// A ballot measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposition {
    pub external_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub election_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// A public meeting of a legislative or administrative body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub external_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// An elected official.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub external_id: String,
    pub name: String,
    pub office: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A campaign committee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    pub external_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A contribution received by a committee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub external_id: String,
    pub committee_id: String,
    pub contributor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Read projection of a [`Contribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionView {
    pub external_id: String,
    pub committee_id: String,
    pub contributor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// A payment made by a committee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    pub external_id: String,
    pub committee_id: String,
    pub payee_name: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Read projection of an [`Expenditure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureView {
    pub external_id: String,
    pub committee_id: String,
    pub payee_name: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Spending for or against a candidate not coordinated with a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndependentExpenditure {
    pub external_id: String,
    pub committee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_or_oppose: Option<String>,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Read projection of an [`IndependentExpenditure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndependentExpenditureView {
    pub external_id: String,
    pub committee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_or_oppose: Option<String>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Everything a provider returns from one campaign finance fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFinanceData {
    #[serde(default)]
    pub committees: Vec<Committee>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    #[serde(default)]
    pub expenditures: Vec<Expenditure>,
    #[serde(default)]
    pub independent_expenditures: Vec<IndependentExpenditure>,
}

impl CampaignFinanceData {
    /// Append another bundle's records to this one.
    pub fn merge(&mut self, other: CampaignFinanceData) {
        self.committees.extend(other.committees);
        self.contributions.extend(other.contributions);
        self.expenditures.extend(other.expenditures);
        self.independent_expenditures
            .extend(other.independent_expenditures);
    }

    pub fn len(&self) -> usize {
        self.committees.len()
            + self.contributions.len()
            + self.expenditures.len()
            + self.independent_expenditures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! identity_view {
    ($record:ty, $collection:expr) => {
        impl ExternalRecord for $record {
            const COLLECTION: Collection = $collection;
            type View = $record;

            fn external_id(&self) -> &str {
                &self.external_id
            }

            fn into_view(self) -> Self::View {
                self
            }
        }
    };
}

identity_view!(Proposition, Collection::Propositions);
identity_view!(Meeting, Collection::Meetings);
identity_view!(Representative, Collection::Representatives);
identity_view!(Committee, Collection::Committees);

impl ExternalRecord for Contribution {
    const COLLECTION: Collection = Collection::Contributions;
    type View = ContributionView;

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn into_view(self) -> ContributionView {
        ContributionView {
            amount: self.amount.to_f64(),
            external_id: self.external_id,
            committee_id: self.committee_id,
            contributor_name: self.contributor_name,
            contributor_city: self.contributor_city,
            contributor_state: self.contributor_state,
            contributor_zip: self.contributor_zip,
            employer: self.employer,
            occupation: self.occupation,
            date: self.date,
        }
    }
}

impl ExternalRecord for Expenditure {
    const COLLECTION: Collection = Collection::Expenditures;
    type View = ExpenditureView;

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn into_view(self) -> ExpenditureView {
        ExpenditureView {
            amount: self.amount.to_f64(),
            external_id: self.external_id,
            committee_id: self.committee_id,
            payee_name: self.payee_name,
            date: self.date,
            purpose: self.purpose,
        }
    }
}

impl ExternalRecord for IndependentExpenditure {
    const COLLECTION: Collection = Collection::IndependentExpenditures;
    type View = IndependentExpenditureView;

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn into_view(self) -> IndependentExpenditureView {
        IndependentExpenditureView {
            amount: self.amount.to_f64(),
            external_id: self.external_id,
            committee_id: self.committee_id,
            candidate_name: self.candidate_name,
            support_or_oppose: self.support_or_oppose,
            date: self.date,
            description: self.description,
        }
    }
}

/// A persisted record projected for reads: storage metadata plus the view fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persisted<V> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: V,
}
