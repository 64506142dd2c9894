//! Theme resolution and the `design` block
//!
//! A theme is either one of the built-in themes or the name of a directory
//! next to the input document that holds the theme's templates.
//!
//! # Resolution Order
//!
//! 1. A built-in name is accepted as is.
//! 2. Any other name must be alphanumeric and name a directory under the
//!    working directory.
//! 3. That directory must hold every template in
//!    [`config::THEME_REQUIRED_FILES`].
//!
//! The initializer file ([`config::THEME_INITIALIZER_FILE`]) declares a
//! custom theme's options. Without it the theme still resolves, but its
//! options are dropped with a warning.
//!
//! Filesystem access goes through [`ThemeFilesystem`], so resolution can be
//! tested without touching the disk.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config;
use crate::validation::{
    Collector, FieldPath, Record, ValidationContext, ValidationError, ValidationErrors,
};

/// `#rrggbb`
pub(crate) const COLOR_REGEX: &str = r"^#[0-9A-Fa-f]{6}$";

/// A LaTeX length such as `4.1cm` or `30 pt`.
pub(crate) const DIMENSION_REGEX: &str = r"^\d+(?:\.\d+)?\s*(?:cm|mm|in|pt|em|ex)$";

/// Custom theme directory names.
pub(crate) const CUSTOM_THEME_REGEX: &str = r"^[A-Za-z0-9]+$";

pub(crate) const TEXT_ALIGNMENTS: [&str; 2] = ["left-aligned", "justified"];

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COLOR_REGEX).expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DIMENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DIMENSION_REGEX).expect("valid regex"));

// =============================================================================
// Filesystem capability
// =============================================================================

/// Read-only view of the filesystem used to find custom themes
pub trait ThemeFilesystem: fmt::Debug {
    /// Whether `path` is an existing directory.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the regular files directly inside `path`.
    fn list_files(&self, path: &Path) -> std::io::Result<Vec<String>>;
}

/// [`ThemeFilesystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl ThemeFilesystem for StdFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// In-memory [`ThemeFilesystem`], for tests and editor integrations
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    directories: BTreeMap<PathBuf, Vec<String>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory holding `files`.
    pub fn with_directory<I, S>(mut self, path: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directories
            .insert(path.into(), files.into_iter().map(Into::into).collect());
        self
    }
}

impl ThemeFilesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.directories.contains_key(path)
    }

    fn list_files(&self, path: &Path) -> std::io::Result<Vec<String>> {
        self.directories.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }
}

// =============================================================================
// Theme resolution
// =============================================================================

/// Where a theme's templates come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThemeSource {
    /// Shipped with the renderer
    BuiltIn,
    /// A directory under the working directory
    Custom {
        directory: PathBuf,
        has_initializer: bool,
    },
}

impl ThemeSource {
    pub fn is_built_in(&self) -> bool {
        matches!(self, ThemeSource::BuiltIn)
    }
}

/// Resolve a theme name against the built-in set and the working directory.
pub fn resolve_theme(
    theme: &str,
    path: &FieldPath,
    ctx: &ValidationContext,
) -> Result<ThemeSource, ValidationError> {
    if config::BUILT_IN_THEMES.contains(&theme) {
        return Ok(ThemeSource::BuiltIn);
    }

    if theme.is_empty() || !theme.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::reference(
            path.clone(),
            format!(
                "'{theme}' is not a built-in theme ({}) and is not a valid custom theme name; \
                 custom theme names may only contain letters and digits",
                config::BUILT_IN_THEMES.join(", ")
            ),
        )
        .with_input(theme));
    }

    let directory = ctx.working_dir().join(theme);
    let fs = ctx.filesystem();
    if !fs.exists(&directory) {
        return Err(ValidationError::reference(
            path.clone(),
            format!(
                "'{theme}' is not a built-in theme ({}) and no custom theme directory \
                 exists at {}",
                config::BUILT_IN_THEMES.join(", "),
                directory.display()
            ),
        )
        .with_input(theme));
    }

    let files = fs.list_files(&directory).map_err(|e| {
        ValidationError::reference(
            path.clone(),
            format!("cannot read custom theme directory {}: {e}", directory.display()),
        )
        .with_input(theme)
    })?;

    let missing: Vec<&str> = config::THEME_REQUIRED_FILES
        .iter()
        .copied()
        .filter(|required| !files.iter().any(|f| f == required))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::reference(
            path.clone(),
            format!(
                "custom theme directory {} is missing: {}",
                directory.display(),
                missing.join(", ")
            ),
        )
        .with_input(theme));
    }

    let has_initializer = files.iter().any(|f| f == config::THEME_INITIALIZER_FILE);
    tracing::debug!(
        theme = %theme,
        directory = %directory.display(),
        has_initializer,
        "Resolved custom theme"
    );

    Ok(ThemeSource::Custom {
        directory,
        has_initializer,
    })
}

// =============================================================================
// Design options
// =============================================================================

/// Options understood by the built-in themes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeOptions {
    pub font: String,
    pub font_size: String,
    pub page_size: String,
    pub color: String,
    pub text_alignment: String,
    pub header_font_size: String,
    pub date_and_location_width: String,
    pub show_timespan_in: Vec<String>,
    pub show_last_updated_date: bool,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            font: "Source Sans 3".to_string(),
            font_size: "10pt".to_string(),
            page_size: "letterpaper".to_string(),
            color: "#004f90".to_string(),
            text_alignment: "justified".to_string(),
            header_font_size: "30pt".to_string(),
            date_and_location_width: "4.1cm".to_string(),
            show_timespan_in: Vec::new(),
            show_last_updated_date: true,
        }
    }
}

impl ThemeOptions {
    /// Option keys, in declaration order.
    pub const FIELDS: [&'static str; 9] = [
        "font",
        "font_size",
        "page_size",
        "color",
        "text_alignment",
        "header_font_size",
        "date_and_location_width",
        "show_timespan_in",
        "show_last_updated_date",
    ];

    /// Validate the option keys of `record`, ignoring `theme`.
    fn from_record(record: &Record<'_>) -> Result<Self, ValidationErrors> {
        let defaults = Self::default();
        let mut allowed = vec!["theme"];
        allowed.extend(Self::FIELDS);

        let mut collector = Collector::new();
        collector.field(record.reject_unknown(&allowed));

        let font = collector.field(one_of(record, "font", &config::AVAILABLE_FONTS));
        let font_size =
            collector.field(one_of(record, "font_size", &config::AVAILABLE_FONT_SIZES));
        let page_size =
            collector.field(one_of(record, "page_size", &config::AVAILABLE_PAGE_SIZES));
        let color = collector.field(matching(
            record,
            "color",
            &COLOR_PATTERN,
            "a color like #004f90",
        ));
        let text_alignment = collector.field(one_of(record, "text_alignment", &TEXT_ALIGNMENTS));
        let header_font_size = collector.field(matching(
            record,
            "header_font_size",
            &DIMENSION_PATTERN,
            "a length like 30pt",
        ));
        let date_and_location_width = collector.field(matching(
            record,
            "date_and_location_width",
            &DIMENSION_PATTERN,
            "a length like 4.1cm",
        ));
        let show_timespan_in = collector.field(record.optional_string_list("show_timespan_in"));
        let show_last_updated_date =
            collector.field(record.optional_bool("show_last_updated_date"));

        let (
            Some(font),
            Some(font_size),
            Some(page_size),
            Some(color),
            Some(text_alignment),
            Some(header_font_size),
            Some(date_and_location_width),
            Some(show_timespan_in),
            Some(show_last_updated_date),
        ) = (
            font,
            font_size,
            page_size,
            color,
            text_alignment,
            header_font_size,
            date_and_location_width,
            show_timespan_in,
            show_last_updated_date,
        )
        else {
            return Err(collector.into_errors());
        };

        collector.finish(Self {
            font: font.unwrap_or(defaults.font),
            font_size: font_size.unwrap_or(defaults.font_size),
            page_size: page_size.unwrap_or(defaults.page_size),
            color: color.unwrap_or(defaults.color),
            text_alignment: text_alignment.unwrap_or(defaults.text_alignment),
            header_font_size: header_font_size.unwrap_or(defaults.header_font_size),
            date_and_location_width: date_and_location_width
                .unwrap_or(defaults.date_and_location_width),
            show_timespan_in: show_timespan_in.unwrap_or(defaults.show_timespan_in),
            show_last_updated_date: show_last_updated_date
                .unwrap_or(defaults.show_last_updated_date),
        })
    }
}

fn one_of(
    record: &Record<'_>,
    key: &str,
    choices: &[&str],
) -> Result<Option<String>, ValidationError> {
    match record.optional_string(key)? {
        Some(value) if !choices.contains(&value.as_str()) => Err(ValidationError::parse(
            record.field_path(key),
            format!("'{value}' is not allowed; expected one of {}", choices.join(", ")),
        )
        .with_input(value)),
        value => Ok(value),
    }
}

fn matching(
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

/// Theme options, typed for built-in themes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DesignOptions {
    BuiltIn(ThemeOptions),
    /// Passed through to the custom theme unchecked
    Custom(Map<String, Value>),
}

/// The validated `design` block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Design {
    theme: String,
    source: ThemeSource,
    options: DesignOptions,
}

impl Default for Design {
    fn default() -> Self {
        Self {
            theme: config::DEFAULT_THEME.to_string(),
            source: ThemeSource::BuiltIn,
            options: DesignOptions::BuiltIn(ThemeOptions::default()),
        }
    }
}

impl Design {
    pub fn validate(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, "design")?;
        let theme = record
            .optional_string("theme")?
            .unwrap_or_else(|| config::DEFAULT_THEME.to_string());
        let source = resolve_theme(&theme, &record.field_path("theme"), ctx)?;

        let options = match &source {
            ThemeSource::BuiltIn => DesignOptions::BuiltIn(ThemeOptions::from_record(&record)?),
            ThemeSource::Custom {
                has_initializer: true,
                ..
            } => DesignOptions::Custom(custom_options(&record)),
            ThemeSource::Custom {
                has_initializer: false,
                directory,
            } => {
                let dropped: Vec<String> =
                    custom_options(&record).into_iter().map(|(k, _)| k).collect();
                if !dropped.is_empty() {
                    tracing::warn!(
                        theme = %theme,
                        directory = %directory.display(),
                        dropped = ?dropped,
                        "Custom theme has no {}; ignoring its design options",
                        config::THEME_INITIALIZER_FILE
                    );
                }
                DesignOptions::Custom(Map::new())
            }
        };

        Ok(Self {
            theme,
            source,
            options,
        })
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn source(&self) -> &ThemeSource {
        &self.source
    }

    pub fn options(&self) -> &DesignOptions {
        &self.options
    }

    /// Typed options of a built-in theme.
    pub fn theme_options(&self) -> Option<&ThemeOptions> {
        match &self.options {
            DesignOptions::BuiltIn(options) => Some(options),
            DesignOptions::Custom(_) => None,
        }
    }
}

/// Every key of the design block except `theme`.
fn custom_options(record: &Record<'_>) -> Map<String, Value> {
    record
        .keys()
        .filter(|key| *key != "theme")
        .filter_map(|key| record.get(key).map(|v| (key.to_string(), v.clone())))
        .collect()
}
