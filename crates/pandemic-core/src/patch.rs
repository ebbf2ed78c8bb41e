//! Partial updates of an existing `PandemicData` row.
//!
//! Each field of [`EntryPatch`] distinguishes three states: the key was
//! absent from the request (`None`, column untouched), present with `null`
//! (`Some(None)`, column cleared), or present with a value (`Some(Some(v))`).

use serde::{Deserialize, Deserializer, Serialize};

use crate::record::Metrics;

/// The fields an update request may change. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub total_cases:   Option<Option<i64>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub total_deaths:  Option<Option<i64>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub new_cases:     Option<Option<i64>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub new_deaths:    Option<Option<i64>>,
  #[serde(
    rename = "New_recovered",
    default,
    deserialize_with = "present",
    skip_serializing_if = "Option::is_none"
  )]
  pub new_recovered: Option<Option<i64>>,
}

/// Only called when the key exists, so any value (including `null`) maps to
/// `Some`.
fn present<'de, D>(d: D) -> Result<Option<Option<i64>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<i64>::deserialize(d).map(Some)
}

impl EntryPatch {
  /// `true` if the patch would not change any column.
  pub fn is_empty(&self) -> bool {
    self.total_cases.is_none()
      && self.total_deaths.is_none()
      && self.new_cases.is_none()
      && self.new_deaths.is_none()
      && self.new_recovered.is_none()
  }

  /// Merge the patch over `existing`, returning the new column values.
  pub fn apply(&self, existing: &Metrics) -> Metrics {
    Metrics {
      total_cases: self.total_cases.unwrap_or(existing.total_cases),
      total_deaths: self.total_deaths.unwrap_or(existing.total_deaths),
      new_cases: self.new_cases.unwrap_or(existing.new_cases),
      new_deaths: self.new_deaths.unwrap_or(existing.new_deaths),
      new_recovered: self.new_recovered.unwrap_or(existing.new_recovered),
      ..existing.clone()
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn existing() -> Metrics {
    Metrics {
      deaths:           Some(4),
      total_cases:      Some(100),
      total_deaths:     Some(5),
      new_cases:        Some(10),
      new_deaths:       Some(1),
      new_recovered:    Some(2),
      active_cases:     Some(80),
      serious_critical: Some(3),
      true_confirmed:   Some(101),
      ..Metrics::default()
    }
  }

  #[test]
  fn empty_patch_is_identity() {
    let patch = EntryPatch::default();
    assert!(patch.is_empty());
    assert_eq!(patch.apply(&existing()), existing());
  }

  #[test]
  fn supplied_fields_overwrite_and_others_survive() {
    let patch: EntryPatch =
      serde_json::from_value(json!({ "total_cases": 150 })).unwrap();
    let merged = patch.apply(&existing());

    assert_eq!(merged.total_cases, Some(150));
    assert_eq!(merged.total_deaths, Some(5));
    assert_eq!(merged.new_cases, Some(10));
    assert_eq!(merged.active_cases, Some(80));
    assert_eq!(merged.true_confirmed, Some(101));
    assert_eq!(merged.deaths, Some(4));
  }

  #[test]
  fn explicit_null_clears_a_field() {
    let patch: EntryPatch =
      serde_json::from_value(json!({ "new_deaths": null })).unwrap();
    assert_eq!(patch.new_deaths, Some(None));
    assert!(!patch.is_empty());

    let merged = patch.apply(&existing());
    assert_eq!(merged.new_deaths, None);
    assert_eq!(merged.total_deaths, Some(5));
  }

  #[test]
  fn unrecognised_fields_are_ignored() {
    let patch: EntryPatch = serde_json::from_value(json!({
      "active_cases": 1,
      "TrueConfirmed": 2,
      "New_recovered": 9,
    }))
    .unwrap();
    let merged = patch.apply(&existing());

    assert_eq!(merged.new_recovered, Some(9));
    assert_eq!(merged.active_cases, Some(80));
    assert_eq!(merged.true_confirmed, Some(101));
  }

  #[test]
  fn lowercase_new_recovered_is_not_recognised() {
    let patch: EntryPatch =
      serde_json::from_value(json!({ "new_recovered": 9 })).unwrap();
    assert!(patch.is_empty());
  }
}
