//! RenderCV data model
//!
//! Validates and normalizes a CV document into a strictly typed model for
//! the renderer. This library provides:
//! - Date parsing and formatting, including the `"present"` marker
//! - Temporal spans with derived date strings and time spans
//! - Publication, social network and identity field validation
//! - Entry type resolution for user-named sections
//! - Built-in and custom theme resolution
//! - Validation errors aggregated across the whole document
//! - JSON Schema export
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rendercv_model::{from_yaml_str, FixedClock, ValidationContext};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let ctx = ValidationContext::new(&FixedClock(today), ".");
//!
//! let yaml = r#"
//! cv:
//!   name: John Doe
//!   sections:
//!     experience:
//!       - company: ACME
//!         position: Engineer
//!         start_date: 2020-01
//! "#;
//!
//! let model = from_yaml_str(yaml, &ctx)?;
//! let section = &model.cv().sections()[0];
//! assert_eq!(section.title(), "Experience");
//! assert_eq!(
//!     section.entries().to_entries()[0].date_string(),
//!     "Jan. 2020 to present"
//! );
//! # Ok::<(), rendercv_model::ModelError>(())
//! ```

pub mod config;
pub mod cv;
pub mod date;
pub mod entry;
pub mod error;
pub mod model;
pub mod publication;
pub mod resolver;
pub mod sample;
pub mod schema;
pub mod section;
pub mod social;
pub mod temporal;
pub mod theme;
pub mod validation;

// Re-export commonly used items
pub use cv::CurriculumVitae;
pub use date::{CanonicalDate, DateError, DateValue, Granularity, RawDate};
pub use entry::{
    EducationEntry, Entry, EntryBase, EntryKind, ExperienceEntry, NormalEntry, OneLineEntry,
    SectionKind, TextEntry, Timeline,
};
pub use error::{ModelError, Result};
pub use model::{from_json_str, from_yaml_str, read_input_file, RenderCvDataModel};
pub use publication::PublicationEntry;
pub use resolver::{resolve_entry_kind, ShapeMismatch};
pub use sample::{sample_data_model, sample_input};
pub use schema::{generate_json_schema, generate_json_schema_string};
pub use section::{Section, SectionEntries};
pub use social::{SocialNetwork, SocialNetworkName};
pub use temporal::{DateField, TemporalSpan};
pub use theme::{
    resolve_theme, Design, DesignOptions, MemoryFilesystem, StdFilesystem, ThemeFilesystem,
    ThemeOptions, ThemeSource,
};
pub use validation::{
    Clock, ErrorKind, FieldPath, FixedClock, SystemClock, ValidationContext, ValidationError,
    ValidationErrors,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
