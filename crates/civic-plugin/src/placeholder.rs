// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `${token}` substitution over descriptor configuration trees.
//!
//! The federal descriptor is written once for every region; tokens like
//! `${stateCode}` in its string leaves are filled from the active local
//! region's configuration. Tokens without a substitution are left verbatim.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use civic_core::descriptor::{DeclarativeRegionConfig, RegionPluginDescriptor, scalar_to_string};
use civic_core::CivicError;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::warn;

/// Token name -> replacement text.
pub type Substitutions = HashMap<String, String>;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Return a copy of `tree` with every `${key}` in string leaves replaced.
///
/// Object keys and non-string leaves are never rewritten, and the input is
/// left untouched.
pub fn resolve(tree: &Value, substitutions: &Substitutions) -> Value {
    match tree {
        Value::String(s) => Value::String(resolve_str(s, substitutions)),
        Value::Array(items) => Value::Array(items.iter().map(|v| resolve(v, substitutions)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve(v, substitutions)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn resolve_str(s: &str, substitutions: &Substitutions) -> String {
    if !s.contains("${") {
        return s.to_string();
    }
    TOKEN_PATTERN
        .replace_all(s, |caps: &Captures<'_>| {
            substitutions
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Distinct token names still present in string leaves of `tree`, sorted.
pub fn unresolved_tokens(tree: &Value) -> Vec<String> {
    let mut tokens = BTreeSet::new();
    collect_tokens(tree, &mut tokens);
    tokens.into_iter().collect()
}

fn collect_tokens(tree: &Value, out: &mut BTreeSet<String>) {
    match tree {
        Value::String(s) => {
            for caps in TOKEN_PATTERN.captures_iter(s) {
                out.insert(caps[1].to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_tokens(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_tokens(v, out)),
        _ => {}
    }
}

/// Substitutions offered by a local region configuration.
///
/// `regionId` and `timezone` are always offered when present, plus every
/// scalar extra key (`stateCode`, `fipsCode`, ...).
pub fn substitutions_from(config: &DeclarativeRegionConfig) -> Substitutions {
    let mut subs: Substitutions = config
        .placeholders
        .iter()
        .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
        .collect();
    subs.insert("regionId".to_string(), config.region_id.clone());
    if let Some(tz) = &config.timezone {
        subs.insert("timezone".to_string(), tz.clone());
    }
    subs
}

/// Resolve a typed region configuration.
pub fn resolve_config(
    config: &DeclarativeRegionConfig,
    substitutions: &Substitutions,
) -> Result<DeclarativeRegionConfig, CivicError> {
    let tree = serde_json::to_value(config)?;
    serde_json::from_value(resolve(&tree, substitutions)).map_err(|e| {
        CivicError::Config(format!("region config is invalid after substitution: {e}"))
    })
}

/// A federal descriptor after resolution against the local region.
#[derive(Debug, Clone)]
pub struct FederalResolution {
    pub descriptor: RegionPluginDescriptor,
    /// Token names left verbatim.
    pub unresolved: Vec<String>,
}

/// Resolve the federal descriptor's config against the active local config.
///
/// With no local config the descriptor is returned as-is and a warning is
/// logged; tokens then stay verbatim.
pub fn resolve_federal(
    federal: &RegionPluginDescriptor,
    local: Option<&DeclarativeRegionConfig>,
) -> Result<FederalResolution, CivicError> {
    let substitutions = match local {
        Some(local) => substitutions_from(local),
        None => {
            warn!(
                plugin = %federal.name,
                "no active local region, federal configuration left unresolved"
            );
            Substitutions::new()
        }
    };

    let config = resolve_config(&federal.config, &substitutions)?;
    let unresolved = unresolved_tokens(&serde_json::to_value(&config)?);
    if local.is_some() && !unresolved.is_empty() {
        warn!(
            plugin = %federal.name,
            tokens = ?unresolved,
            "federal configuration references tokens the local region does not define"
        );
    }

    Ok(FederalResolution {
        descriptor: RegionPluginDescriptor {
            config,
            ..federal.clone()
        },
        unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn subs(pairs: &[(&str, &str)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn federal() -> RegionPluginDescriptor {
        serde_json::from_value(json!({
            "name": "federal",
            "displayName": "Federal",
            "description": "Federal sources",
            "version": "1.0.0",
            "config": {
                "regionId": "us",
                "dataSources": [{
                    "url": "https://fec.test/${stateCode}/committees",
                    "dataType": "campaign_finance",
                    "contentGoal": "committees in ${stateCode}",
                    "api": { "queryParams": { "state": "${stateCode}", "cycle": 2024 } }
                }]
            }
        }))
        .unwrap()
    }

    fn local() -> DeclarativeRegionConfig {
        serde_json::from_value(json!({
            "regionId": "ca",
            "stateCode": "CA",
            "fipsCode": 6,
            "dataSources": [
                { "url": "https://ca.test", "dataType": "meetings", "contentGoal": "agendas" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn replaces_tokens_in_nested_strings() {
        let tree = json!({ "api": { "queryParams": { "state": "${stateCode}" } } });
        let out = resolve(&tree, &subs(&[("stateCode", "CA")]));
        assert_eq!(out, json!({ "api": { "queryParams": { "state": "CA" } } }));
    }

    #[test]
    fn unknown_tokens_are_left_verbatim() {
        let tree = json!({ "a": "${unknown}", "b": "x-${stateCode}-${other}" });
        let out = resolve(&tree, &subs(&[("stateCode", "NY")]));
        assert_eq!(out, json!({ "a": "${unknown}", "b": "x-NY-${other}" }));
    }

    #[test]
    fn non_string_leaves_and_keys_are_untouched() {
        let tree = json!({ "${stateCode}": [1, true, null, 2.5] });
        let out = resolve(&tree, &subs(&[("stateCode", "CA")]));
        assert_eq!(out, tree);
    }

    #[test]
    fn input_is_not_mutated() {
        let tree = json!(["${a}"]);
        let _ = resolve(&tree, &subs(&[("a", "1")]));
        assert_eq!(tree, json!(["${a}"]));
    }

    #[test]
    fn malformed_tokens_are_ignored() {
        let tree = json!("${} ${1abc} $stateCode ${state-code}");
        let out = resolve(&tree, &subs(&[("stateCode", "CA")]));
        assert_eq!(out, tree);
    }

    #[test]
    fn unresolved_tokens_are_sorted_and_distinct() {
        let tree = json!({ "a": "${b} ${a}", "c": ["${b}"] });
        assert_eq!(unresolved_tokens(&tree), vec!["a", "b"]);
    }

    #[test]
    fn substitutions_include_region_id_and_scalars() {
        let s = substitutions_from(&local());
        assert_eq!(s.get("regionId").map(String::as_str), Some("ca"));
        assert_eq!(s.get("stateCode").map(String::as_str), Some("CA"));
        assert_eq!(s.get("fipsCode").map(String::as_str), Some("6"));
        assert!(!s.contains_key("dataSources"));
    }

    #[test]
    fn federal_resolves_against_local() {
        let resolved = resolve_federal(&federal(), Some(&local())).unwrap();
        let source = &resolved.descriptor.config.data_sources[0];
        assert_eq!(source.url, "https://fec.test/CA/committees");
        assert_eq!(source.content_goal, "committees in CA");
        assert_eq!(source.param("api/queryParams/state"), Some(&json!("CA")));
        assert_eq!(source.param("api/queryParams/cycle"), Some(&json!(2024)));
        assert!(resolved.unresolved.is_empty());
    }

    #[traced_test]
    #[test]
    fn federal_without_local_keeps_tokens_and_warns() {
        let resolved = resolve_federal(&federal(), None).unwrap();
        assert_eq!(
            resolved.descriptor.config.data_sources[0].param("api/queryParams/state"),
            Some(&json!("${stateCode}"))
        );
        assert_eq!(resolved.unresolved, vec!["stateCode"]);
        assert!(logs_contain("no active local region"));
    }
}
