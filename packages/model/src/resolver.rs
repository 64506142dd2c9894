//! Entry type resolver
//!
//! Decides which entry variant a raw value is, from its keys alone. The
//! typed validators run afterwards, so a record with a malformed date still
//! resolves to the variant its keys describe and reports the date error
//! there.
//!
//! # Resolution Order
//!
//! Variants are tried in the order Publication, Experience, Education,
//! Normal, OneLine. A record matches a variant when it has every required
//! field of that variant and no field the variant does not allow. A bare
//! string is always a TextEntry.
//!
//! # Examples
//!
//! ```
//! use rendercv_model::entry::{EntryKind, SectionKind};
//! use rendercv_model::resolver::resolve_entry_kind;
//! use serde_json::json;
//!
//! let raw = json!({"company": "ACME", "position": "Engineer", "start_date": "2020-01"});
//! assert_eq!(
//!     resolve_entry_kind(&raw).unwrap(),
//!     (EntryKind::Experience, SectionKind::Experience)
//! );
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::entry::{EntryKind, SectionKind};
use crate::validation::{type_name, FieldPath, ValidationError};

/// Why a raw value matched no entry variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeMismatch {
    /// Not a string and not a mapping
    #[error("an entry must be a string or a mapping, got {found}")]
    NotAnEntry { found: &'static str },

    /// A mapping that fits no variant
    #[error(
        "the entry does not match any entry type; closest is {closest} \
         (missing: {}, unexpected: {})",
        list_or_none(.missing),
        list_or_none(.unexpected)
    )]
    NoMatch {
        closest: EntryKind,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

impl ShapeMismatch {
    /// Shape error at `path`, carrying the offending value.
    pub fn into_validation_error(self, path: FieldPath, input: &Value) -> ValidationError {
        ValidationError::shape(path, self.to_string()).with_input(input.clone())
    }
}

fn list_or_none(fields: &[String]) -> String {
    if fields.is_empty() {
        "none".to_string()
    } else {
        fields.join(", ")
    }
}

/// Entry and section kind of a raw value.
pub fn resolve_entry_kind(value: &Value) -> Result<(EntryKind, SectionKind), ShapeMismatch> {
    let kind = match value {
        Value::String(_) => EntryKind::Text,
        Value::Object(map) => resolve_record(map)?,
        other => {
            return Err(ShapeMismatch::NotAnEntry {
                found: type_name(other),
            })
        }
    };
    tracing::trace!(entry_type = %kind, "Resolved entry type");
    Ok((kind, kind.section_kind()))
}

fn resolve_record(map: &Map<String, Value>) -> Result<EntryKind, ShapeMismatch> {
    // Null values are treated as absent, same as the validators do.
    let keys: Vec<&str> = map
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, _)| k.as_str())
        .collect();

    let candidates = EntryKind::ALL
        .into_iter()
        .filter(|kind| *kind != EntryKind::Text);

    if let Some(kind) = candidates.clone().find(|kind| matches_kind(*kind, &keys)) {
        return Ok(kind);
    }

    // `max_by_key` keeps the last maximum; iterate in reverse so ties go to
    // the higher-priority variant.
    let closest = candidates
        .rev()
        .max_by_key(|kind| {
            keys.iter()
                .filter(|key| kind.allowed_fields().contains(*key))
                .count()
        })
        .unwrap_or(EntryKind::Normal);

    Err(ShapeMismatch::NoMatch {
        closest,
        missing: closest
            .required_fields()
            .iter()
            .filter(|field| !keys.contains(*field))
            .map(|field| (*field).to_string())
            .collect(),
        unexpected: keys
            .iter()
            .filter(|key| !closest.allowed_fields().contains(*key))
            .map(|key| (*key).to_string())
            .collect(),
    })
}

fn matches_kind(kind: EntryKind, keys: &[&str]) -> bool {
    kind.required_fields().iter().all(|field| keys.contains(field))
        && keys.iter().all(|key| kind.allowed_fields().contains(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_resolves_every_variant() {
        let cases = [
            (
                json!({
                    "title": "Paper",
                    "authors": ["J. Doe"],
                    "date": "2020-01",
                    "doi": "10.1109/TASC.2023.3340648"
                }),
                EntryKind::Publication,
                SectionKind::Publication,
            ),
            (
                json!({"company": "ACME", "position": "Engineer", "start_date": "2020-01"}),
                EntryKind::Experience,
                SectionKind::Experience,
            ),
            (
                json!({"institution": "MIT", "area": "Physics", "degree": "PhD"}),
                EntryKind::Education,
                SectionKind::Education,
            ),
            (
                json!({"name": "My Project", "highlights": ["x"]}),
                EntryKind::Normal,
                SectionKind::Normal,
            ),
            (
                json!({"label": "Languages", "details": "English"}),
                EntryKind::OneLine,
                SectionKind::OneLine,
            ),
            (json!("Some text"), EntryKind::Text, SectionKind::Text),
        ];

        for (value, kind, section) in cases {
            assert_eq!(resolve_entry_kind(&value).unwrap(), (kind, section), "{value}");
        }
    }

    #[test]
    fn test_unknown_key_prevents_match() {
        let value = json!({"name": "Project", "company": "ACME"});
        let err = resolve_entry_kind(&value).unwrap_err();
        assert_eq!(
            err,
            ShapeMismatch::NoMatch {
                closest: EntryKind::Experience,
                missing: vec!["position".to_string()],
                unexpected: vec!["name".to_string()],
            }
        );
    }

    #[test]
    fn test_invalid_entry_reports_closest() {
        let value = json!({"this": "is", "an": "invalid", "entry": 10});
        let err = resolve_entry_kind(&value).unwrap_err();
        let ShapeMismatch::NoMatch {
            closest,
            missing,
            unexpected,
        } = err
        else {
            panic!("expected NoMatch");
        };
        assert_eq!(closest, EntryKind::Publication);
        assert_eq!(missing, vec!["title", "authors", "date"]);
        assert_eq!(unexpected.len(), 3);
    }

    #[test]
    fn test_non_entry_values() {
        for value in [json!(10), json!([1]), json!(true), json!(null)] {
            assert!(matches!(
                resolve_entry_kind(&value),
                Err(ShapeMismatch::NotAnEntry { .. })
            ));
        }
    }

    #[test]
    fn test_null_fields_are_ignored() {
        let value = json!({"name": "Project", "location": null});
        assert_eq!(resolve_entry_kind(&value).unwrap().0, EntryKind::Normal);
    }

    #[test]
    fn test_mismatch_message() {
        let value = json!({"label": "Languages"});
        let err = resolve_entry_kind(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the entry does not match any entry type; closest is OneLineEntry \
             (missing: details, unexpected: none)"
        );
    }
}
