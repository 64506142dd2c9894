//! Publication entries
//!
//! A publication has a title, a non-empty author list and a single past
//! date. The DOI, when given, must be a well-formed DOI name and is turned
//! into a resolver link by [`PublicationEntry::doi_url`].

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::config;
use crate::date::CanonicalDate;
use crate::entry::EntryKind;
use crate::temporal::validate_explicit_date;
use crate::validation::{
    parse_http_url, Collector, FieldPath, Record, ValidationContext, ValidationError,
    ValidationErrors,
};

/// DOI name: `10.<registrant>/<suffix>`.
pub(crate) const DOI_REGEX: &str = r"^10\.\d{4,9}/\S+$";

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DOI_REGEX).expect("valid regex"));

/// A validated publication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationEntry {
    title: String,
    authors: Vec<String>,
    date: CanonicalDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl PublicationEntry {
    pub fn validate(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, EntryKind::Publication.name())?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(EntryKind::Publication.allowed_fields()));
        let title = collector.field(record.required_string("title"));
        let authors = collector.field(validate_authors(&record));
        let date = collector.field(validate_publication_date(&record, ctx));
        let doi = collector.field(record.optional_string("doi").and_then(|doi| {
            doi.map(|d| validate_doi(&d, &record.field_path("doi")))
                .transpose()
        }));
        let journal = collector.field(record.optional_string("journal"));
        let url = collector.field(record.optional_string("url").and_then(|url| {
            url.map(|u| parse_http_url(&u, &record.field_path("url")))
                .transpose()
        }));

        let (Some(title), Some(authors), Some(date), Some(doi), Some(journal), Some(url)) =
            (title, authors, date, doi, journal, url)
        else {
            return Err(collector.into_errors());
        };

        collector.finish(Self {
            title,
            authors,
            date,
            doi,
            journal,
            url,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn date(&self) -> &CanonicalDate {
        &self.date
    }

    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }

    pub fn journal(&self) -> Option<&str> {
        self.journal.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Resolver link for the DOI, e.g. `https://doi.org/10.1109/...`.
    #[must_use]
    pub fn doi_url(&self) -> Option<String> {
        self.doi
            .as_ref()
            .map(|doi| format!("{}{doi}", config::DOI_URL_PREFIX))
    }

    /// Publication date as displayed, e.g. `"Jan. 2004"`.
    pub fn date_string(&self) -> String {
        self.date.format()
    }
}

fn validate_authors(record: &Record<'_>) -> Result<Vec<String>, ValidationErrors> {
    match record.optional_string_list("authors")? {
        None => Err(ValidationError::shape(record.field_path("authors"), "field required").into()),
        Some(authors) if authors.is_empty() => Err(ValidationError::parse(
            record.field_path("authors"),
            "at least one author is required",
        )
        .into()),
        Some(authors) => Ok(authors),
    }
}

fn validate_publication_date(
    record: &Record<'_>,
    ctx: &ValidationContext,
) -> Result<CanonicalDate, ValidationError> {
    let path = record.field_path("date");
    let Some(raw) = record.get("date") else {
        return Err(ValidationError::shape(path, "field required"));
    };
    validate_explicit_date(raw, &path, ctx.today())
}

/// Check that `raw` is a DOI name such as `10.1109/TASC.2023.3340648`.
pub fn validate_doi(raw: &str, path: &FieldPath) -> Result<String, ValidationError> {
    if DOI_PATTERN.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(ValidationError::parse(
            path.clone(),
            format!(
                "'{raw}' is not a valid DOI; expected something like {}",
                "10.1109/TASC.2023.3340648"
            ),
        )
        .with_input(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ErrorKind, FixedClock};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ValidationContext::new(&FixedClock(today), "/nonexistent")
    }

    fn publication() -> Value {
        json!({
            "title": "Magneto-Thermal Thin Shell Approximation for 3D FEA of No-Insulation Coils",
            "authors": ["Frodo Baggins", "John Doe", "Samwise Gamgee"],
            "date": "2004-01-01",
            "doi": "10.1109/TASC.2023.3340648"
        })
    }

    fn validate(value: &Value) -> Result<PublicationEntry, ValidationErrors> {
        PublicationEntry::validate(value, &FieldPath::root(), &ctx())
    }

    #[test]
    fn test_valid_publication() {
        let entry = validate(&publication()).unwrap();
        assert_eq!(entry.authors().len(), 3);
        assert_eq!(entry.date_string(), "Jan. 2004");
        assert_eq!(entry.journal(), None);
    }

    #[test]
    fn test_doi_url() {
        let entry = validate(&publication()).unwrap();
        assert_eq!(
            entry.doi_url().as_deref(),
            Some("https://doi.org/10.1109/TASC.2023.3340648")
        );
    }

    #[test]
    fn test_no_doi_no_url() {
        let mut value = publication();
        value.as_object_mut().unwrap().remove("doi");
        assert_eq!(validate(&value).unwrap().doi_url(), None);
    }

    #[test]
    fn test_invalid_doi() {
        for doi in ["aaa10.1109/TASC.2023.3340648", "aaa"] {
            let mut value = publication();
            value["doi"] = json!(doi);
            let errors = validate(&value).unwrap_err();
            assert!(errors.has_error_at("doi"), "{doi} should be rejected");
        }
    }

    #[test]
    fn test_invalid_publication_dates() {
        for date in [json!("aaa"), json!(null), json!("3000")] {
            let mut value = publication();
            value["date"] = date.clone();
            let errors = validate(&value).unwrap_err();
            assert!(errors.has_error_at("date"), "{date} should be rejected");
        }
    }

    #[test]
    fn test_present_is_not_a_publication_date() {
        let mut value = publication();
        value["date"] = json!("present");
        let errors = validate(&value).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().kind, ErrorKind::Parse);
    }

    #[test]
    fn test_empty_author_list() {
        let mut value = publication();
        value["authors"] = json!([]);
        assert!(validate(&value).unwrap_err().has_error_at("authors"));
    }

    #[test]
    fn test_errors_are_collected() {
        let value = json!({"title": 5, "date": "aaa", "doi": "bad", "isbn": "x"});
        let errors = validate(&value).unwrap_err();
        for path in ["title", "authors", "date", "doi", "isbn"] {
            assert!(errors.has_error_at(path), "missing error at {path}");
        }
        assert_eq!(errors.len(), 5);
    }
}
