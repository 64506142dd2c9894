//! Top-level data model and input loading
//!
//! [`RenderCvDataModel::validate`] turns a decoded document into the
//! validated model and reports every problem in the tree at once.
//! [`read_input_file`] is the file boundary in front of it: missing
//! files, unsupported extensions, oversized files and decode failures
//! fail fast as [`ModelError`]s.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config;
use crate::cv::CurriculumVitae;
use crate::error::{ModelError, Result};
use crate::theme::Design;
use crate::validation::{
    Collector, FieldPath, Record, ValidationContext, ValidationError, ValidationErrors,
};

const ROOT_FIELDS: [&str; 2] = ["cv", "design"];

/// The validated document handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderCvDataModel {
    cv: CurriculumVitae,
    design: Design,
}

impl RenderCvDataModel {
    /// Validate a decoded document.
    pub fn validate(
        value: &Value,
        ctx: &ValidationContext,
    ) -> std::result::Result<Self, ValidationErrors> {
        let root = FieldPath::root();
        let record = Record::from_value(value, &root, "the input document")?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(&ROOT_FIELDS));
        let cv = collector.field(match record.get("cv") {
            Some(raw) => CurriculumVitae::validate(raw, &record.field_path("cv"), ctx),
            None => Err(ValidationError::shape(record.field_path("cv"), "field required").into()),
        });
        let design = collector.field(
            record
                .get("design")
                .map(|raw| Design::validate(raw, &record.field_path("design"), ctx))
                .transpose(),
        );

        let (Some(cv), Some(design)) = (cv, design) else {
            let errors = collector.into_errors();
            tracing::debug!(errors = errors.len(), "Input document failed validation");
            return Err(errors);
        };

        let model = collector.finish(Self {
            cv,
            design: design.unwrap_or_default(),
        })?;
        tracing::debug!(
            sections = model.cv.sections().len(),
            theme = %model.design.theme(),
            "Validated input document"
        );
        Ok(model)
    }

    pub fn cv(&self) -> &CurriculumVitae {
        &self.cv
    }

    pub fn design(&self) -> &Design {
        &self.design
    }
}

/// Parse and validate a YAML document.
pub fn from_yaml_str(content: &str, ctx: &ValidationContext) -> Result<RenderCvDataModel> {
    check_size(content.len())?;
    let value: Value = serde_yaml_ng::from_str(content)?;
    Ok(RenderCvDataModel::validate(&value, ctx)?)
}

/// Parse and validate a JSON document.
pub fn from_json_str(content: &str, ctx: &ValidationContext) -> Result<RenderCvDataModel> {
    check_size(content.len())?;
    let value: Value = serde_json::from_str(content)?;
    Ok(RenderCvDataModel::validate(&value, ctx)?)
}

/// Read, decode and validate an input file.
///
/// The format is chosen by extension: `.yaml`/`.yml` or `.json`.
///
/// # Errors
///
/// - [`ModelError::FileNotFound`] if `path` does not exist
/// - [`ModelError::UnsupportedExtension`] for any other extension
/// - [`ModelError::LoadError`] if the file is larger than
///   [`config::MAX_INPUT_SIZE`] or cannot be read
/// - [`ModelError::YamlError`] / [`ModelError::JsonError`] if decoding fails
/// - [`ModelError::Validation`] with every validation problem found
pub fn read_input_file<P: AsRef<Path>>(
    path: P,
    ctx: &ValidationContext,
) -> Result<RenderCvDataModel> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Reading input file");

    if !path.is_file() {
        return Err(ModelError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !config::SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ModelError::UnsupportedExtension(extension));
    }

    let metadata = fs::metadata(path)?;
    let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    check_size(file_size)?;

    let content = fs::read_to_string(path)
        .map_err(|e| ModelError::LoadError(format!("Failed to read input file: {e}")))?;

    if extension == "json" {
        from_json_str(&content, ctx)
    } else {
        from_yaml_str(&content, ctx)
    }
}

fn check_size(size: usize) -> Result<()> {
    if size > config::MAX_INPUT_SIZE {
        tracing::warn!(size, max = config::MAX_INPUT_SIZE, "Input exceeds size limit");
        return Err(ModelError::LoadError(format!(
            "Input exceeds maximum size limit ({} bytes)",
            config::MAX_INPUT_SIZE
        )));
    }
    Ok(())
}
