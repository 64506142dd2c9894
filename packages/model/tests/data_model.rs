//! Integration tests for document validation.
//!
//! Exercises the assembled model end to end: entry resolution, homogeneous
//! sections and error aggregation across the whole tree.

mod common;

use common::{
    ctx, education_entry, experience_entry, normal_entry, one_line_entry, publication_entry,
    text_entry,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use rendercv_model::{
    resolve_entry_kind, sample_data_model, Entry, EntryKind, ErrorKind, RenderCvDataModel,
    SectionKind, Timeline,
};

fn document(cv: Value) -> Value {
    json!({"cv": cv})
}

#[test]
fn test_entry_and_section_types() {
    let cases = [
        (publication_entry(), EntryKind::Publication, SectionKind::Publication),
        (experience_entry(), EntryKind::Experience, SectionKind::Experience),
        (education_entry(), EntryKind::Education, SectionKind::Education),
        (normal_entry(), EntryKind::Normal, SectionKind::Normal),
        (one_line_entry(), EntryKind::OneLine, SectionKind::OneLine),
        (text_entry(), EntryKind::Text, SectionKind::Text),
    ];

    for (raw, kind, section_kind) in cases {
        assert_eq!(resolve_entry_kind(&raw).unwrap(), (kind, section_kind));

        // The validated entry resolves to the same types.
        let entry = Entry::validate_as(kind, &raw, &Default::default(), &ctx()).unwrap();
        assert_eq!(entry.kind(), kind);
        assert_eq!(entry.section_kind(), section_kind);
    }
}

#[test]
fn test_sections() {
    let input = document(json!({
        "name": "John Doe",
        "sections": {
            "arbitrary_title": [education_entry(), education_entry()],
            "arbitrary_title_2": [experience_entry(), experience_entry()],
            "arbitrary_title_3": [publication_entry(), publication_entry()],
            "arbitrary_title_4": [normal_entry(), normal_entry()],
            "arbitrary_title_5": [one_line_entry(), one_line_entry()],
            "arbitrary_title_6": [text_entry(), text_entry()]
        }
    }));

    let model = RenderCvDataModel::validate(&input, &ctx()).unwrap();
    let sections = model.cv().sections();
    assert_eq!(sections.len(), 6);
    for section in sections {
        assert_eq!(section.entries().len(), 2);
    }
    assert_eq!(sections[0].title(), "Arbitrary Title");
    assert_eq!(sections[5].title(), "Arbitrary Title 6");
    assert_eq!(sections[2].kind(), SectionKind::Publication);
}

#[test]
fn test_sections_with_invalid_entries() {
    let input = document(json!({
        "name": "John Doe",
        "sections": {
            "section_title": [{"this": "is", "an": "invalid", "entry": 10}]
        }
    }));
    let errors = RenderCvDataModel::validate(&input, &ctx()).unwrap_err();
    let error = errors.iter().next().unwrap();
    assert_eq!(error.kind, ErrorKind::Shape);
    assert_eq!(error.path.to_string(), "cv.sections.section_title.0");
    assert!(error.message.contains("PublicationEntry"), "{}", error.message);
}

#[test]
fn test_mixed_section_is_rejected() {
    let input = document(json!({
        "sections": {"mixed": [education_entry(), experience_entry()]}
    }));
    let errors = RenderCvDataModel::validate(&input, &ctx()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has_error_at("cv.sections.mixed.1"));
}

#[test]
fn test_every_error_in_the_tree_is_reported() {
    let mut bad_experience = experience_entry();
    bad_experience["start_date"] = json!("2023-01-01");
    bad_experience["end_date"] = json!("2021-01-01");

    let mut bad_publication = publication_entry();
    bad_publication["doi"] = json!("aaa");
    bad_publication["date"] = json!("2999");

    let input = json!({
        "cv": {
            "name": "John Doe",
            "email": "not an email",
            "social_networks": [{"network": "Mastodon", "username": "invalidmastodon"}],
            "sections": {
                "experience": [experience_entry(), bad_experience],
                "publications": [bad_publication]
            }
        },
        "design": {"theme": "invalid_theme_name"}
    });

    let errors = RenderCvDataModel::validate(&input, &ctx()).unwrap_err();
    let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "cv.email",
            "cv.social_networks.0.username",
            "cv.sections.experience.1.start_date",
            "cv.sections.publications.0.date",
            "cv.sections.publications.0.doi",
            "design.theme",
        ]
    );

    let report = errors.to_string();
    assert!(report.starts_with("6 validation errors:"));
    for path in &paths {
        assert!(report.contains(&format!("  {path}: ")), "{path} missing from report");
    }
}

#[test]
fn test_errors_carry_the_raw_input() {
    let mut entry = experience_entry();
    entry["start_date"] = json!("aaa");
    let input = document(json!({"sections": {"experience": [entry]}}));

    let errors = RenderCvDataModel::validate(&input, &ctx()).unwrap_err();
    let error = errors.iter().next().unwrap();
    assert_eq!(error.kind, ErrorKind::Parse);
    assert_eq!(error.input, Some(json!("aaa")));
}

#[test]
fn test_derived_strings_through_the_model() {
    let input = document(json!({
        "sections": {
            "experience": [experience_entry()],
            "education": [education_entry()],
            "publications": [publication_entry()],
            "projects": [normal_entry()]
        }
    }));
    let model = RenderCvDataModel::validate(&input, &ctx()).unwrap();
    let cv = model.cv();

    let experience = cv.section("experience").unwrap().entries().to_entries();
    let Entry::Experience(experience) = &experience[0] else {
        panic!("expected an experience entry");
    };
    assert_eq!(experience.date_string(), "Oct. 2020 to present");
    assert_eq!(experience.date_string_only_years(), "2020 to present");
    assert_eq!(experience.time_span_string(), "3 years 3 months");

    let education = cv.section("education").unwrap().entries().to_entries();
    assert_eq!(education[0].date_string(), "Sept. 2015 to June 2020");

    let publications = cv.section("publications").unwrap().entries().to_entries();
    let Entry::Publication(publication) = &publications[0] else {
        panic!("expected a publication entry");
    };
    assert_eq!(publication.date_string(), "Jan. 2004");
    assert_eq!(
        publication.doi_url().as_deref(),
        Some("https://doi.org/10.1109/TASC.2023.3340648")
    );

    let projects = cv.section("projects").unwrap().entries().to_entries();
    assert_eq!(projects[0].date_string(), "Jan. 2020");
}

#[test]
fn test_sample_data_model() {
    let model = sample_data_model("John Doe", &ctx()).unwrap();
    assert_eq!(model.cv().name(), Some("John Doe"));
    assert_eq!(model.design().theme(), "classic");
}

#[test]
fn test_model_serializes_for_the_renderer() {
    let input = document(json!({
        "name": "John Doe",
        "sections": {"skills": [one_line_entry()]}
    }));
    let model = RenderCvDataModel::validate(&input, &ctx()).unwrap();
    let serialized = serde_json::to_value(&model).unwrap();

    assert_eq!(serialized["cv"]["name"], json!("John Doe"));
    assert_eq!(serialized["cv"]["sections"][0]["title"], json!("Skills"));
    assert_eq!(serialized["cv"]["sections"][0]["entry_type"], json!("OneLineEntry"));
    assert_eq!(serialized["design"]["theme"], json!("classic"));
}
