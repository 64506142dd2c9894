//! The `cv` block: identity fields and sections

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::section::{validate_sections, Section};
use crate::social::SocialNetwork;
use crate::validation::{
    parse_http_url, type_name, Collector, FieldPath, Record, ValidationContext, ValidationError,
    ValidationErrors,
};

pub(crate) const EMAIL_REGEX: &str =
    r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

/// `+` and a country code, then digits with optional separators.
pub(crate) const PHONE_REGEX: &str = r"^\+\d[\d ()-]*\d$";

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_REGEX).expect("valid regex"));

const CV_FIELDS: [&str; 8] = [
    "name",
    "label",
    "location",
    "email",
    "phone",
    "website",
    "social_networks",
    "sections",
];

/// A validated curriculum vitae
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurriculumVitae {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    social_networks: Vec<SocialNetwork>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sections: Vec<Section>,
}

impl CurriculumVitae {
    pub fn validate(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, "cv")?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(&CV_FIELDS));
        let name = collector.field(record.optional_string("name"));
        let label = collector.field(record.optional_string("label"));
        let location = collector.field(record.optional_string("location"));
        let email = collector.field(checked(&record, "email", &EMAIL_PATTERN, "an email address"));
        let phone = collector.field(checked(
            &record,
            "phone",
            &PHONE_PATTERN,
            "an international number such as +1 (555) 123-4567",
        ));
        let website = collector.field(record.optional_string("website").and_then(|website| {
            website
                .map(|w| parse_http_url(&w, &record.field_path("website")))
                .transpose()
        }));
        let social_networks = collector.field(validate_social_networks(&record));
        let sections = collector.field(
            record
                .get("sections")
                .map(|raw| validate_sections(raw, &record.field_path("sections"), ctx))
                .transpose(),
        );

        let (
            Some(name),
            Some(label),
            Some(location),
            Some(email),
            Some(phone),
            Some(website),
            Some(social_networks),
            Some(sections),
        ) = (
            name,
            label,
            location,
            email,
            phone,
            website,
            social_networks,
            sections,
        )
        else {
            return Err(collector.into_errors());
        };

        collector.finish(Self {
            name,
            label,
            location,
            email,
            phone,
            website,
            social_networks,
            sections: sections.unwrap_or_default(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn social_networks(&self) -> &[SocialNetwork] {
        &self.social_networks
    }

    /// Sections in input order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section by its input key.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key() == key)
    }
}

fn checked(
    record: &Record<'_>,
    key: &str,
    pattern: &Regex,
    expected: &str,
) -> Result<Option<String>, ValidationError> {
    match record.optional_string(key)? {
        Some(value) if !pattern.is_match(&value) => Err(ValidationError::parse(
            record.field_path(key),
            format!("'{value}' is not valid; expected {expected}"),
        )
        .with_input(value)),
        value => Ok(value),
    }
}

fn validate_social_networks(record: &Record<'_>) -> Result<Vec<SocialNetwork>, ValidationErrors> {
    let path = record.field_path("social_networks");
    let items = match record.get("social_networks") {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::parse(
                path,
                format!("expected a list of social networks, got {}", type_name(other)),
            )
            .with_input(other.clone())
            .into())
        }
    };

    let mut collector = Collector::new();
    let networks: Vec<SocialNetwork> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| collector.field(SocialNetwork::validate(item, &path.index(i))))
        .collect();
    collector.finish(networks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ValidationContext::new(&FixedClock(today), "/nonexistent")
    }

    fn validate(value: &Value) -> Result<CurriculumVitae, ValidationErrors> {
        CurriculumVitae::validate(value, &FieldPath::root().key("cv"), &ctx())
    }

    #[test]
    fn test_name_only() {
        let cv = validate(&json!({"name": "John Doe"})).unwrap();
        assert_eq!(cv.name(), Some("John Doe"));
        assert!(cv.sections().is_empty());
    }

    #[test]
    fn test_identity_fields() {
        let cv = validate(&json!({
            "name": "John Doe",
            "label": "Mechanical Engineer",
            "location": "Istanbul, Türkiye",
            "email": "john.doe@example.com",
            "phone": "+90 (541) 999-99-99",
            "website": "https://example.com",
            "social_networks": [
                {"network": "GitHub", "username": "johndoe"},
                {"network": "Mastodon", "username": "@johndoe"}
            ]
        }))
        .unwrap();
        assert_eq!(cv.website(), Some("https://example.com/"));
        assert_eq!(cv.social_networks().len(), 2);
        assert_eq!(cv.social_networks()[1].url(), "https://mastodon.social/@johndoe");
    }

    #[test]
    fn test_invalid_identity_fields() {
        let errors = validate(&json!({
            "email": "not-an-email",
            "phone": "555-1234",
            "website": "example.com",
            "social_networks": [{"network": "Mastodon", "username": "invalidmastodon"}],
            "hobbies": []
        }))
        .unwrap_err();
        for path in [
            "cv.email",
            "cv.phone",
            "cv.website",
            "cv.social_networks.0.username",
            "cv.hobbies",
        ] {
            assert!(errors.has_error_at(path), "missing error at {path}");
        }
    }

    #[test]
    fn test_errors_from_sections_and_identity_are_combined() {
        let errors = validate(&json!({
            "email": "broken",
            "sections": {
                "experience": [{"company": "ACME", "position": "Dev", "start_date": "2999-01-01"}],
                "misc": [{"this": "is", "an": "invalid", "entry": 10}]
            }
        }))
        .unwrap_err();
        assert!(errors.has_error_at("cv.email"));
        assert!(errors.has_error_at("cv.sections.experience.0.start_date"));
        assert!(errors.has_error_at("cv.sections.misc.0"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_section_lookup() {
        let cv = validate(&json!({
            "name": "John Doe",
            "sections": {"summary": ["Text"]}
        }))
        .unwrap();
        assert_eq!(cv.section("summary").map(Section::title), Some("Summary"));
        assert!(cv.section("missing").is_none());
    }
}
