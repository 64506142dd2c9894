//! CV sections
//!
//! A section is a user-named list of entries that all share one variant.
//! The variant is decided by the first entry that resolves; every later
//! entry must resolve to the same one. Each section's entries live in a
//! typed `Vec`, so a validated section cannot mix variants.

use serde::Serialize;
use serde_json::Value;

use crate::config;
use crate::entry::{
    EducationEntry, Entry, EntryKind, ExperienceEntry, NormalEntry, OneLineEntry, SectionKind,
    TextEntry,
};
use crate::publication::PublicationEntry;
use crate::resolver::resolve_entry_kind;
use crate::validation::{
    type_name, Collector, FieldPath, Record, ValidationContext, ValidationError, ValidationErrors,
};

/// The entries of one section, typed by variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry_type", content = "entries")]
pub enum SectionEntries {
    #[serde(rename = "PublicationEntry")]
    Publication(Vec<PublicationEntry>),
    #[serde(rename = "ExperienceEntry")]
    Experience(Vec<ExperienceEntry>),
    #[serde(rename = "EducationEntry")]
    Education(Vec<EducationEntry>),
    #[serde(rename = "NormalEntry")]
    Normal(Vec<NormalEntry>),
    #[serde(rename = "OneLineEntry")]
    OneLine(Vec<OneLineEntry>),
    #[serde(rename = "TextEntry")]
    Text(Vec<TextEntry>),
}

impl SectionEntries {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Publication(_) => SectionKind::Publication,
            Self::Experience(_) => SectionKind::Experience,
            Self::Education(_) => SectionKind::Education,
            Self::Normal(_) => SectionKind::Normal,
            Self::OneLine(_) => SectionKind::OneLine,
            Self::Text(_) => SectionKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Publication(v) => v.len(),
            Self::Experience(v) => v.len(),
            Self::Education(v) => v.len(),
            Self::Normal(v) => v.len(),
            Self::OneLine(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entries as the untyped [`Entry`] sum, in order.
    pub fn to_entries(&self) -> Vec<Entry> {
        match self {
            Self::Publication(v) => v.iter().cloned().map(Entry::Publication).collect(),
            Self::Experience(v) => v.iter().cloned().map(Entry::Experience).collect(),
            Self::Education(v) => v.iter().cloned().map(Entry::Education).collect(),
            Self::Normal(v) => v.iter().cloned().map(Entry::Normal).collect(),
            Self::OneLine(v) => v.iter().cloned().map(Entry::OneLine).collect(),
            Self::Text(v) => v.iter().cloned().map(Entry::Text).collect(),
        }
    }
}

/// A validated, homogeneous section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    key: String,
    title: String,
    #[serde(flatten)]
    entries: SectionEntries,
}

impl Section {
    /// Validate the entry list stored under `key`.
    pub fn validate(
        key: &str,
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let Value::Array(items) = value else {
            return Err(ValidationError::shape(
                path.clone(),
                format!("a section must be a list of entries, got {}", type_name(value)),
            )
            .with_input(value.clone())
            .into());
        };
        if items.is_empty() {
            return Err(
                ValidationError::shape(path.clone(), "a section needs at least one entry").into(),
            );
        }
        if items.len() > config::MAX_SECTION_ENTRIES {
            return Err(ValidationError::shape(
                path.clone(),
                format!(
                    "a section holds at most {} entries, got {}",
                    config::MAX_SECTION_ENTRIES,
                    items.len()
                ),
            )
            .into());
        }

        let mut collector = Collector::new();
        let mut section_kind: Option<SectionKind> = None;
        let mut resolved: Vec<(usize, &Value)> = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            let entry_path = path.index(i);
            match resolve_entry_kind(item) {
                Err(mismatch) => collector.push(mismatch.into_validation_error(entry_path, item)),
                Ok((_, kind)) => match section_kind {
                    None => {
                        section_kind = Some(kind);
                        resolved.push((i, item));
                    }
                    Some(expected) if expected == kind => resolved.push((i, item)),
                    Some(expected) => collector.push(
                        ValidationError::shape(
                            entry_path,
                            format!(
                                "all entries of a section must have the same type; \
                                 this one is {}, but the section holds {}",
                                kind.entry_kind(),
                                expected.entry_kind()
                            ),
                        )
                        .with_input(item.clone()),
                    ),
                },
            }
        }

        let Some(kind) = section_kind else {
            return Err(collector.into_errors());
        };

        let entries = match kind.entry_kind() {
            EntryKind::Publication => collector
                .field(validate_each(&resolved, path, |v, p| {
                    PublicationEntry::validate(v, p, ctx)
                }))
                .map(SectionEntries::Publication),
            EntryKind::Experience => collector
                .field(validate_each(&resolved, path, |v, p| {
                    ExperienceEntry::validate(v, p, ctx)
                }))
                .map(SectionEntries::Experience),
            EntryKind::Education => collector
                .field(validate_each(&resolved, path, |v, p| {
                    EducationEntry::validate(v, p, ctx)
                }))
                .map(SectionEntries::Education),
            EntryKind::Normal => collector
                .field(validate_each(&resolved, path, |v, p| {
                    NormalEntry::validate(v, p, ctx)
                }))
                .map(SectionEntries::Normal),
            EntryKind::OneLine => collector
                .field(validate_each(&resolved, path, OneLineEntry::validate))
                .map(SectionEntries::OneLine),
            EntryKind::Text => collector
                .field(validate_each(&resolved, path, TextEntry::validate))
                .map(SectionEntries::Text),
        };

        let Some(entries) = entries else {
            return Err(collector.into_errors());
        };

        tracing::debug!(
            section = %key,
            entry_type = %kind.entry_kind(),
            entries = entries.len(),
            "Validated section"
        );

        collector.finish(Self {
            key: key.to_string(),
            title: section_title(key),
            entries,
        })
    }

    /// Key as written in the input, e.g. `"work_experience"`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display title, e.g. `"Work Experience"`.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> SectionKind {
        self.entries.kind()
    }

    pub fn entry_kind(&self) -> EntryKind {
        self.entries.kind().entry_kind()
    }

    pub fn entries(&self) -> &SectionEntries {
        &self.entries
    }
}

/// Validate the `sections` mapping, keeping the input order.
pub fn validate_sections(
    value: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
) -> Result<Vec<Section>, ValidationErrors> {
    let record = Record::from_value(value, path, "sections")?;
    let mut collector = Collector::new();
    let mut sections = Vec::new();

    for key in record.keys() {
        let Some(entries) = record.get(key) else {
            collector.push(ValidationError::shape(
                record.field_path(key),
                "a section must be a list of entries, got null",
            ));
            continue;
        };
        if let Some(section) =
            collector.field(Section::validate(key, entries, &record.field_path(key), ctx))
        {
            sections.push(section);
        }
    }

    collector.finish(sections)
}

/// Display title for a section key.
///
/// Underscores become spaces and all-lowercase words are capitalized.
/// Words with any uppercase letter are kept as written.
///
/// ```
/// use rendercv_model::section::section_title;
///
/// assert_eq!(section_title("arbitrary_title"), "Arbitrary Title");
/// assert_eq!(section_title("IEEE_papers"), "IEEE Papers");
/// ```
pub fn section_title(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            if word.chars().any(char::is_uppercase) {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn validate_each<T, E>(
    items: &[(usize, &Value)],
    path: &FieldPath,
    validate: impl Fn(&Value, &FieldPath) -> Result<T, E>,
) -> Result<Vec<T>, ValidationErrors>
where
    E: Into<ValidationErrors>,
{
    let mut collector = Collector::new();
    let entries: Vec<T> = items
        .iter()
        .filter_map(|(i, item)| collector.field(validate(item, &path.index(*i))))
        .collect();
    collector.finish(entries)
}
