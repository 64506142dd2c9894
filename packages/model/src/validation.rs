//! Validation plumbing shared by every validator
//!
//! Validators never stop at the first problem. Each field validator returns
//! a `Result`, and a [`Collector`] merges those results so that a document
//! with ten problems reports ten errors.
//!
//! # Error Paths
//!
//! Every [`ValidationError`] carries the [`FieldPath`] of the offending
//! value, rendered with dots (e.g. `cv.sections.experience.0.start_date`),
//! so a CLI or editor integration can point at the exact location.
//!
//! # Reference Date
//!
//! "present" and the future-date checks depend on the current date. The
//! [`ValidationContext`] reads its [`Clock`] exactly once, so a single
//! validation pass always sees one consistent "today".

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::theme::{StdFilesystem, ThemeFilesystem};

// =============================================================================
// Field paths
// =============================================================================

/// One step in a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside the input document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a mapping key below this path.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Path of a sequence element below this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed date, DOI, URL, username or identifier
    Parse,
    /// Chronologically inconsistent or future-dated value
    Range,
    /// Record matching no entry type, or a section mixing entry types
    Shape,
    /// Theme that resolves to neither a built-in nor a usable directory
    Reference,
}

/// A single problem at a single location
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: FieldPath,
    pub kind: ErrorKind,
    pub message: String,
    /// The offending raw value, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            input: None,
        }
    }

    pub fn parse(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, path, message)
    }

    pub fn range(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Range, path, message)
    }

    pub fn shape(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Shape, path, message)
    }

    pub fn reference(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference, path, message)
    }

    /// Attach the raw input value that caused the error.
    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// Every problem found in one validation pass, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Whether any error was reported at exactly `path`.
    pub fn has_error_at(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path.to_string() == path)
    }

    /// Human-readable `path: message` lines.
    pub fn lines(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        writeln!(
            f,
            "{count} validation error{}:",
            if count == 1 { "" } else { "s" }
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// =============================================================================
// Collector
// =============================================================================

/// Merges independent field results without short-circuiting.
///
/// ```
/// use rendercv_model::validation::{Collector, FieldPath, ValidationError};
///
/// let mut collector = Collector::new();
/// let a: Option<i32> = collector.field(Ok::<_, ValidationError>(1));
/// let b: Option<i32> = collector.field(Err(ValidationError::parse(FieldPath::root(), "bad")));
/// assert_eq!(a, Some(1));
/// assert_eq!(b, None);
/// assert_eq!(collector.finish(()).unwrap_err().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Collector {
    errors: ValidationErrors,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of a failed field, or hand back its value.
    pub fn field<T, E>(&mut self, result: std::result::Result<T, E>) -> Option<T>
    where
        E: Into<ValidationErrors>,
    {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.errors.extend(errors.into());
                None
            }
        }
    }

    /// Record an error that is not tied to a field result.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` if nothing was recorded, otherwise every recorded error.
    pub fn finish<T>(self, value: T) -> std::result::Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

// =============================================================================
// Raw record access
// =============================================================================

/// Typed read access to one raw mapping of the input document.
///
/// Explicit `null` values are treated the same as missing keys.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    map: &'a Map<String, Value>,
    path: &'a FieldPath,
}

impl<'a> Record<'a> {
    /// View `value` as a record, or fail with a shape error naming `what`.
    pub fn from_value(
        value: &'a Value,
        path: &'a FieldPath,
        what: &str,
    ) -> std::result::Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(ValidationError::shape(
                path.clone(),
                format!("{what} must be a mapping, got {}", type_name(other)),
            )
            .with_input(other.clone())),
        }
    }

    pub fn new(map: &'a Map<String, Value>, path: &'a FieldPath) -> Self {
        Self { map, path }
    }

    pub fn path(&self) -> &FieldPath {
        self.path
    }

    pub fn field_path(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.map.keys().map(String::as_str)
    }

    pub fn required_string(&self, key: &str) -> std::result::Result<String, ValidationError> {
        match self.get(key) {
            Some(value) => self.expect_string(key, value),
            None => Err(ValidationError::shape(
                self.field_path(key),
                "field required",
            )),
        }
    }

    pub fn optional_string(
        &self,
        key: &str,
    ) -> std::result::Result<Option<String>, ValidationError> {
        self.get(key)
            .map(|value| self.expect_string(key, value))
            .transpose()
    }

    pub fn optional_bool(&self, key: &str) -> std::result::Result<Option<bool>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ValidationError::parse(
                self.field_path(key),
                format!("expected a boolean, got {}", type_name(other)),
            )
            .with_input(other.clone())),
        }
    }

    pub fn optional_string_list(
        &self,
        key: &str,
    ) -> std::result::Result<Option<Vec<String>>, ValidationErrors> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let path = self.field_path(key);
        let Value::Array(items) = value else {
            return Err(ValidationError::parse(
                path,
                format!("expected a list of strings, got {}", type_name(value)),
            )
            .with_input(value.clone())
            .into());
        };

        let mut collector = Collector::new();
        let strings: Vec<Option<String>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    collector.push(
                        ValidationError::parse(
                            path.index(i),
                            format!("expected a string, got {}", type_name(other)),
                        )
                        .with_input(other.clone()),
                    );
                    None
                }
            })
            .collect();
        collector.finish(Some(strings.into_iter().flatten().collect()))
    }

    /// One shape error per key that is not in `allowed`.
    pub fn reject_unknown(&self, allowed: &[&str]) -> std::result::Result<(), ValidationErrors> {
        let mut collector = Collector::new();
        for key in self.map.keys() {
            if !allowed.contains(&key.as_str()) {
                collector.push(
                    ValidationError::shape(self.field_path(key), "extra field not permitted")
                        .with_input(self.map[key].clone()),
                );
            }
        }
        collector.finish(())
    }

    fn expect_string(
        &self,
        key: &str,
        value: &Value,
    ) -> std::result::Result<String, ValidationError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValidationError::parse(
                self.field_path(key),
                format!("expected a string, got {}", type_name(other)),
            )
            .with_input(other.clone())),
        }
    }
}

/// Parse an absolute `http`/`https` URL.
pub fn parse_http_url(raw: &str, path: &FieldPath) -> std::result::Result<String, ValidationError> {
    let invalid = |reason: String| {
        ValidationError::parse(path.clone(), format!("invalid URL: {reason}")).with_input(raw)
    };
    let url = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url.to_string()),
        "http" | "https" => Err(invalid("missing host".to_string())),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Short name of a JSON value's type, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

// =============================================================================
// Validation context
// =============================================================================

/// Source of the current date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock that always reports the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Everything a validation pass needs from outside the document.
///
/// Built once per document. The clock is read at construction time and
/// never again.
#[derive(Debug)]
pub struct ValidationContext {
    today: NaiveDate,
    working_dir: PathBuf,
    filesystem: Box<dyn ThemeFilesystem>,
}

impl ValidationContext {
    /// Create a context that resolves custom themes against `working_dir`
    /// on the real filesystem.
    pub fn new(clock: &dyn Clock, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            today: clock.today(),
            working_dir: working_dir.into(),
            filesystem: Box::new(StdFilesystem),
        }
    }

    /// Context for the process's current directory and the system clock.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(&SystemClock, std::env::current_dir()?))
    }

    /// Replace the filesystem used for custom theme lookups.
    pub fn with_filesystem(mut self, filesystem: impl ThemeFilesystem + 'static) -> Self {
        self.filesystem = Box::new(filesystem);
        self
    }

    /// The reference date of this validation pass.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn filesystem(&self) -> &dyn ThemeFilesystem {
        self.filesystem.as_ref()
    }
}
