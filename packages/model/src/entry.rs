//! Entry variants
//!
//! A CV section holds entries of exactly one of six shapes. Five are
//! records with a fixed field set; [`TextEntry`] is a bare string.
//! [`Entry`] is the closed sum over all six.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::publication::PublicationEntry;
use crate::temporal::TemporalSpan;
use crate::validation::{
    parse_http_url, type_name, Collector, FieldPath, Record, ValidationContext, ValidationError,
    ValidationErrors,
};

/// Tag of an entry variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryKind {
    #[serde(rename = "PublicationEntry")]
    Publication,
    #[serde(rename = "ExperienceEntry")]
    Experience,
    #[serde(rename = "EducationEntry")]
    Education,
    #[serde(rename = "NormalEntry")]
    Normal,
    #[serde(rename = "OneLineEntry")]
    OneLine,
    #[serde(rename = "TextEntry")]
    Text,
}

impl EntryKind {
    /// All variants, in resolution priority order.
    pub const ALL: [EntryKind; 6] = [
        EntryKind::Publication,
        EntryKind::Experience,
        EntryKind::Education,
        EntryKind::Normal,
        EntryKind::OneLine,
        EntryKind::Text,
    ];

    /// Type name used in error messages and the schema.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Publication => "PublicationEntry",
            Self::Experience => "ExperienceEntry",
            Self::Education => "EducationEntry",
            Self::Normal => "NormalEntry",
            Self::OneLine => "OneLineEntry",
            Self::Text => "TextEntry",
        }
    }

    /// Fields a record must have to be this variant.
    #[must_use]
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Publication => &["title", "authors", "date"],
            Self::Experience => &["company", "position"],
            Self::Education => &["institution", "area"],
            Self::Normal => &["name"],
            Self::OneLine => &["label", "details"],
            Self::Text => &[],
        }
    }

    /// Fields a record may have as this variant, required ones included.
    #[must_use]
    pub fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Publication => &["title", "authors", "date", "doi", "journal", "url"],
            Self::Experience => &[
                "company",
                "position",
                "start_date",
                "end_date",
                "date",
                "location",
                "highlights",
                "url",
            ],
            Self::Education => &[
                "institution",
                "area",
                "degree",
                "start_date",
                "end_date",
                "date",
                "location",
                "highlights",
                "url",
            ],
            Self::Normal => &[
                "name",
                "start_date",
                "end_date",
                "date",
                "location",
                "highlights",
                "url",
            ],
            Self::OneLine => &["label", "details"],
            Self::Text => &[],
        }
    }

    #[must_use]
    pub fn section_kind(&self) -> SectionKind {
        match self {
            Self::Publication => SectionKind::Publication,
            Self::Experience => SectionKind::Experience,
            Self::Education => SectionKind::Education,
            Self::Normal => SectionKind::Normal,
            Self::OneLine => SectionKind::OneLine,
            Self::Text => SectionKind::Text,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag of a section container, one per entry variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionKind {
    #[serde(rename = "SectionWithPublicationEntries")]
    Publication,
    #[serde(rename = "SectionWithExperienceEntries")]
    Experience,
    #[serde(rename = "SectionWithEducationEntries")]
    Education,
    #[serde(rename = "SectionWithNormalEntries")]
    Normal,
    #[serde(rename = "SectionWithOneLineEntries")]
    OneLine,
    #[serde(rename = "SectionWithTextEntries")]
    Text,
}

impl SectionKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Publication => "SectionWithPublicationEntries",
            Self::Experience => "SectionWithExperienceEntries",
            Self::Education => "SectionWithEducationEntries",
            Self::Normal => "SectionWithNormalEntries",
            Self::OneLine => "SectionWithOneLineEntries",
            Self::Text => "SectionWithTextEntries",
        }
    }

    #[must_use]
    pub fn entry_kind(&self) -> EntryKind {
        match self {
            Self::Publication => EntryKind::Publication,
            Self::Experience => EntryKind::Experience,
            Self::Education => EntryKind::Education,
            Self::Normal => EntryKind::Normal,
            Self::OneLine => EntryKind::OneLine,
            Self::Text => EntryKind::Text,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entries that carry a [`TemporalSpan`].
pub trait Timeline {
    fn span(&self) -> &TemporalSpan;

    fn date_string(&self) -> String {
        self.span().date_string()
    }

    fn date_string_only_years(&self) -> String {
        self.span().date_string_only_years()
    }

    fn time_span_string(&self) -> String {
        self.span().time_span_string()
    }
}

/// Fields shared by experience, education and normal entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryBase {
    #[serde(flatten)]
    span: TemporalSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    highlights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl EntryBase {
    fn from_record(record: &Record<'_>, ctx: &ValidationContext) -> Result<Self, ValidationErrors> {
        let mut collector = Collector::new();

        let span = collector.field(TemporalSpan::from_record(record, ctx.today()));
        let location = collector.field(record.optional_string("location"));
        let highlights = collector.field(record.optional_string_list("highlights"));
        let url = collector.field(record.optional_string("url").and_then(|url| {
            url.map(|u| parse_http_url(&u, &record.field_path("url")))
                .transpose()
        }));

        let (Some(span), Some(location), Some(highlights), Some(url)) =
            (span, location, highlights, url)
        else {
            return Err(collector.into_errors());
        };

        collector.finish(Self {
            span,
            location,
            highlights: highlights.unwrap_or_default(),
            url,
        })
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn highlights(&self) -> &[String] {
        &self.highlights
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl Timeline for EntryBase {
    fn span(&self) -> &TemporalSpan {
        &self.span
    }
}

/// Work experience: a company and a position held there
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceEntry {
    company: String,
    position: String,
    #[serde(flatten)]
    base: EntryBase,
}

impl ExperienceEntry {
    pub fn validate(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, EntryKind::Experience.name())?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(EntryKind::Experience.allowed_fields()));
        let company = collector.field(record.required_string("company"));
        let position = collector.field(record.required_string("position"));
        let base = collector.field(EntryBase::from_record(&record, ctx));

        let (Some(company), Some(position), Some(base)) = (company, position, base) else {
            return Err(collector.into_errors());
        };
        collector.finish(Self {
            company,
            position,
            base,
        })
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn base(&self) -> &EntryBase {
        &self.base
    }
}

impl Timeline for ExperienceEntry {
    fn span(&self) -> &TemporalSpan {
        &self.base.span
    }
}

/// Education: an institution, a field of study and an optional degree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationEntry {
    institution: String,
    area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    degree: Option<String>,
    #[serde(flatten)]
    base: EntryBase,
}

impl EducationEntry {
    pub fn validate(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, EntryKind::Education.name())?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(EntryKind::Education.allowed_fields()));
        let institution = collector.field(record.required_string("institution"));
        let area = collector.field(record.required_string("area"));
        let degree = collector.field(record.optional_string("degree"));
        let base = collector.field(EntryBase::from_record(&record, ctx));

        let (Some(institution), Some(area), Some(degree), Some(base)) =
            (institution, area, degree, base)
        else {
            return Err(collector.into_errors());
        };
        collector.finish(Self {
            institution,
            area,
            degree,
            base,
        })
    }

    pub fn institution(&self) -> &str {
        &self.institution
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn degree(&self) -> Option<&str> {
        self.degree.as_deref()
    }

    pub fn base(&self) -> &EntryBase {
        &self.base
    }
}

impl Timeline for EducationEntry {
    fn span(&self) -> &TemporalSpan {
        &self.base.span
    }
}

/// A generic titled entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalEntry {
    name: String,
    #[serde(flatten)]
    base: EntryBase,
}

impl NormalEntry {
    pub fn validate(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, EntryKind::Normal.name())?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(EntryKind::Normal.allowed_fields()));
        let name = collector.field(record.required_string("name"));
        let base = collector.field(EntryBase::from_record(&record, ctx));

        let (Some(name), Some(base)) = (name, base) else {
            return Err(collector.into_errors());
        };
        collector.finish(Self { name, base })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &EntryBase {
        &self.base
    }
}

impl Timeline for NormalEntry {
    fn span(&self) -> &TemporalSpan {
        &self.base.span
    }
}

/// A `label: details` line, e.g. "Languages: English, Dutch"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneLineEntry {
    label: String,
    details: String,
}

impl OneLineEntry {
    pub fn validate(value: &Value, path: &FieldPath) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, EntryKind::OneLine.name())?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(EntryKind::OneLine.allowed_fields()));
        let label = collector.field(record.required_string("label"));
        let details = collector.field(record.required_string("details"));

        let (Some(label), Some(details)) = (label, details) else {
            return Err(collector.into_errors());
        };
        collector.finish(Self { label, details })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

/// A free paragraph of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextEntry(String);

impl TextEntry {
    pub fn validate(value: &Value, path: &FieldPath) -> Result<Self, ValidationError> {
        match value {
            Value::String(text) => Ok(Self(text.clone())),
            other => Err(ValidationError::shape(
                path.clone(),
                format!("TextEntry must be a string, got {}", type_name(other)),
            )
            .with_input(other.clone())),
        }
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Any CV entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Publication(PublicationEntry),
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Normal(NormalEntry),
    OneLine(OneLineEntry),
    Text(TextEntry),
}

impl Entry {
    /// Validate `value` as the given variant.
    pub fn validate_as(
        kind: EntryKind,
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        Ok(match kind {
            EntryKind::Publication => {
                Entry::Publication(PublicationEntry::validate(value, path, ctx)?)
            }
            EntryKind::Experience => {
                Entry::Experience(ExperienceEntry::validate(value, path, ctx)?)
            }
            EntryKind::Education => Entry::Education(EducationEntry::validate(value, path, ctx)?),
            EntryKind::Normal => Entry::Normal(NormalEntry::validate(value, path, ctx)?),
            EntryKind::OneLine => Entry::OneLine(OneLineEntry::validate(value, path)?),
            EntryKind::Text => Entry::Text(TextEntry::validate(value, path)?),
        })
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Publication(_) => EntryKind::Publication,
            Entry::Experience(_) => EntryKind::Experience,
            Entry::Education(_) => EntryKind::Education,
            Entry::Normal(_) => EntryKind::Normal,
            Entry::OneLine(_) => EntryKind::OneLine,
            Entry::Text(_) => EntryKind::Text,
        }
    }

    #[must_use]
    pub fn section_kind(&self) -> SectionKind {
        self.kind().section_kind()
    }

    /// The entry's timeline, for variants that have one.
    pub fn span(&self) -> Option<&TemporalSpan> {
        match self {
            Entry::Experience(e) => Some(e.span()),
            Entry::Education(e) => Some(e.span()),
            Entry::Normal(e) => Some(e.span()),
            Entry::Publication(_) | Entry::OneLine(_) | Entry::Text(_) => None,
        }
    }

    /// Display date of the entry, `""` if it has none.
    pub fn date_string(&self) -> String {
        match self {
            Entry::Publication(p) => p.date_string(),
            other => other.span().map(TemporalSpan::date_string).unwrap_or_default(),
        }
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

    #[test]
    fn test_experience_entry() {
        let value = json!({
            "company": "Some Company",
            "position": "Software Engineer",
            "location": "TX, USA",
            "start_date": "2020-10",
            "end_date": "present",
            "highlights": ["Did this.", "Did that."],
            "url": "https://example.com"
        });
        let entry = ExperienceEntry::validate(&value, &FieldPath::root(), &ctx()).unwrap();
        assert_eq!(entry.company(), "Some Company");
        assert_eq!(entry.position(), "Software Engineer");
        assert_eq!(entry.base().location(), Some("TX, USA"));
        assert_eq!(entry.base().highlights().len(), 2);
        assert_eq!(entry.date_string(), "Oct. 2020 to present");
        assert_eq!(entry.time_span_string(), "3 years 3 months");
    }

    #[test]
    fn test_education_entry() {
        let value = json!({
            "institution": "Boğaziçi University",
            "area": "Mechanical Engineering",
            "degree": "BS",
            "start_date": "2015-09",
            "end_date": "2020-06"
        });
        let entry = EducationEntry::validate(&value, &FieldPath::root(), &ctx()).unwrap();
        assert_eq!(entry.degree(), Some("BS"));
        assert_eq!(entry.date_string(), "Sept. 2015 to June 2020");
        assert_eq!(entry.date_string_only_years(), "2015 to 2020");
    }

    #[test]
    fn test_normal_entry_collects_all_errors() {
        let value = json!({
            "start_date": "2023-01-01",
            "end_date": "2021-01-01",
            "url": "not a url",
            "highlights": "not a list"
        });
        let path = FieldPath::root().key("entry");
        let errors = NormalEntry::validate(&value, &path, &ctx()).unwrap_err();
        assert!(errors.has_error_at("entry.name"));
        assert!(errors.has_error_at("entry.start_date"));
        assert!(errors.has_error_at("entry.url"));
        assert!(errors.has_error_at("entry.highlights"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let value = json!({"name": "Project", "summary": "extra"});
        let errors = NormalEntry::validate(&value, &FieldPath::root(), &ctx()).unwrap_err();
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert_eq!(error.kind, ErrorKind::Shape);
        assert_eq!(error.path.to_string(), "summary");
    }

    #[test]
    fn test_one_line_entry() {
        let value = json!({"label": "Languages", "details": "English, Turkish"});
        let entry = OneLineEntry::validate(&value, &FieldPath::root()).unwrap();
        assert_eq!(entry.label(), "Languages");
        assert_eq!(entry.details(), "English, Turkish");
    }

    #[test]
    fn test_text_entry() {
        let entry = TextEntry::validate(&json!("Some text"), &FieldPath::root()).unwrap();
        assert_eq!(entry.text(), "Some text");
        assert!(TextEntry::validate(&json!(10), &FieldPath::root()).is_err());
    }

    #[test]
    fn test_kind_tables_are_consistent() {
        for kind in EntryKind::ALL {
            for field in kind.required_fields() {
                assert!(
                    kind.allowed_fields().contains(field),
                    "{kind}: required field {field} must be allowed"
                );
            }
            assert_eq!(kind.section_kind().entry_kind(), kind);
        }
        assert_eq!(EntryKind::OneLine.section_kind().name(), "SectionWithOneLineEntries");
    }

    #[test]
    fn test_entry_dispatch() {
        let value = json!({"name": "Project"});
        let entry =
            Entry::validate_as(EntryKind::Normal, &value, &FieldPath::root(), &ctx()).unwrap();
        assert_eq!(entry.kind(), EntryKind::Normal);
        assert_eq!(entry.section_kind(), SectionKind::Normal);
        assert_eq!(entry.date_string(), "");
    }
}
