//! Configuration constants for the RenderCV data model
//!
//! Centralized values used throughout the model for:
//! - Resource limits on input documents
//! - Date range bounds and display tables
//! - Built-in themes and the layout of custom theme directories
//!
//! These are compile-time constants. Values that vary per validation pass
//! (the reference date, the working directory) live in
//! [`crate::validation::ValidationContext`] instead.

/// Maximum input document size in bytes (1 MB).
///
/// Prevents YAML bombs and excessive memory usage during parsing.
/// A CV document is typically a few kilobytes.
pub const MAX_INPUT_SIZE: usize = 1_000_000;

/// Maximum number of entries in a single section.
pub const MAX_SECTION_ENTRIES: usize = 1_000;

/// Earliest year accepted by the date normalizer.
pub const MIN_YEAR: i32 = 1000;

/// Latest year accepted by the date normalizer (four digits).
pub const MAX_YEAR: i32 = 9999;

/// Literal that marks an ongoing period.
pub const PRESENT: &str = "present";

/// Month abbreviations used when rendering dates, January first.
///
/// May, June and July are written out in full.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan.", "Feb.", "Mar.", "Apr.", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.",
    "Dec.",
];

/// Prefix that turns a DOI into a resolvable URL.
pub const DOI_URL_PREFIX: &str = "https://doi.org/";

/// Input file extensions the loader understands.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Themes shipped with the renderer.
pub const BUILT_IN_THEMES: [&str; 4] = ["classic", "moderncv", "sb2nov", "engineeringresumes"];

/// Theme used when the document has no `design` block.
pub const DEFAULT_THEME: &str = "classic";

/// Template files a custom theme directory must contain.
pub const THEME_REQUIRED_FILES: [&str; 10] = [
    "Preamble.j2.tex",
    "Header.j2.tex",
    "SectionBeginning.j2.tex",
    "SectionEnding.j2.tex",
    "PublicationEntry.j2.tex",
    "ExperienceEntry.j2.tex",
    "EducationEntry.j2.tex",
    "NormalEntry.j2.tex",
    "OneLineEntry.j2.tex",
    "TextEntry.j2.tex",
];

/// Optional file that declares a custom theme's options.
pub const THEME_INITIALIZER_FILE: &str = "__init__.py";

/// Fonts the built-in themes can typeset.
pub const AVAILABLE_FONTS: [&str; 5] = [
    "Latin Modern Serif",
    "Latin Modern Sans Serif",
    "Latin Modern Mono",
    "Source Sans 3",
    "Charter",
];

/// Font sizes the built-in themes support.
pub const AVAILABLE_FONT_SIZES: [&str; 3] = ["10pt", "11pt", "12pt"];

/// Paper sizes the built-in themes support.
pub const AVAILABLE_PAGE_SIZES: [&str; 2] = ["a4paper", "letterpaper"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reasonable() {
        assert!(MAX_INPUT_SIZE >= 100_000, "Should allow at least 100KB");
        assert!(MAX_INPUT_SIZE <= 10_000_000, "Should not allow 10MB+");

        assert!(MAX_SECTION_ENTRIES >= 100, "Should allow long sections");

        assert!(MIN_YEAR < MAX_YEAR);
        assert_eq!(MIN_YEAR.to_string().len(), 4);
        assert_eq!(MAX_YEAR.to_string().len(), 4);
    }

    #[test]
    fn test_month_table_quirk() {
        assert_eq!(MONTH_ABBREVIATIONS[4], "May");
        assert_eq!(MONTH_ABBREVIATIONS[5], "June");
        assert_eq!(MONTH_ABBREVIATIONS[6], "July");
        assert_eq!(MONTH_ABBREVIATIONS[8], "Sept.");
    }

    #[test]
    fn test_default_theme_is_built_in() {
        assert!(BUILT_IN_THEMES.contains(&DEFAULT_THEME));
    }
}
