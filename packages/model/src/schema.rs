//! JSON Schema export
//!
//! Describes the input document as a draft-07 JSON Schema for editors and
//! other external tooling. The patterns are the ones the validators use.
//! Object keys keep their insertion order, so the output is byte-for-byte
//! stable across calls.
//!
//! The schema checks structure only. Calendar validity, chronology, theme
//! directories and section homogeneity are left to
//! [`RenderCvDataModel::validate`](crate::model::RenderCvDataModel::validate).

use serde_json::{json, Value};

use crate::config;
use crate::cv::{EMAIL_REGEX, PHONE_REGEX};
use crate::entry::EntryKind;
use crate::error::Result;
use crate::publication::DOI_REGEX;
use crate::social::SocialNetworkName;
use crate::theme::{COLOR_REGEX, CUSTOM_THEME_REGEX, DIMENSION_REGEX, TEXT_ALIGNMENTS};

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// The schema of the input document.
pub fn generate_json_schema() -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": "RenderCV",
        "description": "RenderCV input document: CV content and design options.",
        "type": "object",
        "properties": {
            "cv": {"$ref": "#/definitions/CurriculumVitae"},
            "design": {"$ref": "#/definitions/Design"}
        },
        "required": ["cv"],
        "additionalProperties": false,
        "definitions": definitions()
    })
}

/// [`generate_json_schema`], pretty-printed.
pub fn generate_json_schema_string() -> Result<String> {
    Ok(serde_json::to_string_pretty(&generate_json_schema())?)
}

fn definitions() -> Value {
    let date_pattern = r"^[0-9]{4}(-[0-9]{2}(-[0-9]{2})?)?$";
    let year = json!({
        "type": "integer",
        "minimum": config::MIN_YEAR,
        "maximum": config::MAX_YEAR
    });
    let span_properties = json!({
        "start_date": {
            "description": "Start of the period: YYYY-MM-DD, YYYY-MM or YYYY.",
            "anyOf": [year, {"type": "string", "pattern": date_pattern}]
        },
        "end_date": {
            "description": "End of the period, or \"present\" if ongoing.",
            "anyOf": [year, {"type": "string", "pattern": date_pattern}, {"const": config::PRESENT}]
        },
        "date": {
            "description": "A single date or a free-text label. Overrides start_date and end_date.",
            "anyOf": [year, {"type": "string"}]
        },
        "location": {"type": "string"},
        "highlights": {"type": "array", "items": {"type": "string"}},
        "url": {"type": "string", "format": "uri"}
    });

    let with_span = |kind: EntryKind, own: Value| -> Value {
        let mut properties = own;
        if let (Some(own), Some(span)) = (properties.as_object_mut(), span_properties.as_object()) {
            own.extend(span.clone());
        }
        entry_schema(kind, properties)
    };

    let sections_any_of: Vec<Value> = EntryKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "type": "array",
                "items": {"$ref": format!("#/definitions/{}", kind.name())},
                "minItems": 1,
                "maxItems": config::MAX_SECTION_ENTRIES
            })
        })
        .collect();

    let networks: Vec<&str> = SocialNetworkName::ALL.iter().map(|n| n.as_str()).collect();

    json!({
        "PublicationEntry": entry_schema(EntryKind::Publication, json!({
            "title": {"type": "string"},
            "authors": {"type": "array", "items": {"type": "string"}, "minItems": 1},
            "date": {
                "description": "Publication date: YYYY-MM-DD, YYYY-MM or YYYY.",
                "anyOf": [year, {"type": "string", "pattern": date_pattern}]
            },
            "doi": {"type": "string", "pattern": DOI_REGEX},
            "journal": {"type": "string"},
            "url": {"type": "string", "format": "uri"}
        })),
        "ExperienceEntry": with_span(EntryKind::Experience, json!({
            "company": {"type": "string"},
            "position": {"type": "string"}
        })),
        "EducationEntry": with_span(EntryKind::Education, json!({
            "institution": {"type": "string"},
            "area": {"type": "string"},
            "degree": {"type": "string"}
        })),
        "NormalEntry": with_span(EntryKind::Normal, json!({
            "name": {"type": "string"}
        })),
        "OneLineEntry": entry_schema(EntryKind::OneLine, json!({
            "label": {"type": "string"},
            "details": {"type": "string"}
        })),
        "TextEntry": {
            "title": EntryKind::Text.name(),
            "type": "string"
        },
        "SocialNetwork": {
            "type": "object",
            "properties": {
                "network": {"type": "string", "enum": networks},
                "username": {"type": "string"}
            },
            "required": ["network", "username"],
            "additionalProperties": false
        },
        "CurriculumVitae": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "label": {"type": "string"},
                "location": {"type": "string"},
                "email": {"type": "string", "pattern": EMAIL_REGEX},
                "phone": {"type": "string", "pattern": PHONE_REGEX},
                "website": {"type": "string", "format": "uri"},
                "social_networks": {
                    "type": "array",
                    "items": {"$ref": "#/definitions/SocialNetwork"}
                },
                "sections": {
                    "description": "Section title to a non-empty list of entries of one type.",
                    "type": "object",
                    "additionalProperties": {"anyOf": sections_any_of}
                }
            },
            "additionalProperties": false
        },
        "ThemeOptions": {
            "type": "object",
            "properties": {
                "theme": {"type": "string", "enum": config::BUILT_IN_THEMES},
                "font": {"type": "string", "enum": config::AVAILABLE_FONTS},
                "font_size": {"type": "string", "enum": config::AVAILABLE_FONT_SIZES},
                "page_size": {"type": "string", "enum": config::AVAILABLE_PAGE_SIZES},
                "color": {"type": "string", "pattern": COLOR_REGEX},
                "text_alignment": {"type": "string", "enum": TEXT_ALIGNMENTS},
                "header_font_size": {"type": "string", "pattern": DIMENSION_REGEX},
                "date_and_location_width": {"type": "string", "pattern": DIMENSION_REGEX},
                "show_timespan_in": {"type": "array", "items": {"type": "string"}},
                "show_last_updated_date": {"type": "boolean"}
            },
            "additionalProperties": false
        },
        "Design": {
            "type": "object",
            "properties": {
                "theme": {
                    "description": "A built-in theme, or the name of a custom theme directory.",
                    "anyOf": [
                        {"type": "string", "enum": config::BUILT_IN_THEMES},
                        {"type": "string", "pattern": CUSTOM_THEME_REGEX}
                    ],
                    "default": config::DEFAULT_THEME
                }
            },
            "if": {"properties": {"theme": {"enum": config::BUILT_IN_THEMES}}},
            "then": {"$ref": "#/definitions/ThemeOptions"}
        }
    })
}

fn entry_schema(kind: EntryKind, properties: Value) -> Value {
    json!({
        "title": kind.name(),
        "type": "object",
        "properties": properties,
        "required": kind.required_fields(),
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_is_deterministic() {
        assert_eq!(
            generate_json_schema_string().unwrap(),
            generate_json_schema_string().unwrap()
        );
    }

    #[test]
    fn test_every_entry_variant_is_defined() {
        let schema = generate_json_schema();
        for kind in EntryKind::ALL {
            assert!(
                schema["definitions"][kind.name()].is_object(),
                "{kind} missing from schema"
            );
        }
    }

    #[test]
    fn test_entry_fields_match_validators() {
        let schema = generate_json_schema();
        for kind in EntryKind::ALL.into_iter().filter(|k| *k != EntryKind::Text) {
            let definition = &schema["definitions"][kind.name()];
            let mut properties: Vec<&str> = definition["properties"]
                .as_object()
                .unwrap()
                .keys()
                .map(String::as_str)
                .collect();
            let mut allowed = kind.allowed_fields().to_vec();
            properties.sort_unstable();
            allowed.sort_unstable();
            assert_eq!(properties, allowed, "{kind}");
            assert_eq!(definition["additionalProperties"], json!(false));
        }
    }

    #[test]
    fn test_top_level_shape() {
        let schema = generate_json_schema();
        assert_eq!(schema["$schema"], json!(DRAFT_07));
        assert_eq!(schema["required"], json!(["cv"]));
    }
}
