#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::path::Path;

use rendercv_model::config;
use rendercv_model::{FixedClock, ValidationContext};

/// All date-dependent tests run on this day.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn ctx() -> ValidationContext {
    ValidationContext::new(&FixedClock(today()), "/nonexistent")
}

pub fn ctx_in(working_dir: &Path) -> ValidationContext {
    ValidationContext::new(&FixedClock(today()), working_dir)
}

/// Write a custom theme directory with every required template.
pub fn write_theme(root: &Path, name: &str, with_initializer: bool) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for file in config::THEME_REQUIRED_FILES {
        std::fs::write(dir.join(file), "((* raw *))").unwrap();
    }
    if with_initializer {
        std::fs::write(dir.join(config::THEME_INITIALIZER_FILE), "").unwrap();
    }
}

pub fn publication_entry() -> Value {
    json!({
        "title": "Magneto-Thermal Thin Shell Approximation for No-Insulation Coils",
        "authors": ["Frodo Baggins", "John Doe", "Samwise Gamgee"],
        "date": "2004-01-01",
        "doi": "10.1109/TASC.2023.3340648"
    })
}

pub fn experience_entry() -> Value {
    json!({
        "company": "Some Company",
        "location": "TX, USA",
        "position": "Software Engineer",
        "start_date": "2020-10",
        "end_date": "present",
        "highlights": ["Did this.", "Did that."]
    })
}

pub fn education_entry() -> Value {
    json!({
        "institution": "Boğaziçi University",
        "location": "Istanbul, Turkey",
        "degree": "BS",
        "area": "Mechanical Engineering",
        "start_date": "2015-09",
        "end_date": "2020-06",
        "highlights": ["GPA: 3.24/4.00", "Awards: Dean's Honor List, Sportsperson of the Year"]
    })
}

pub fn normal_entry() -> Value {
    json!({
        "name": "My Project",
        "location": "Remote",
        "date": "2020-01-01",
        "highlights": ["Did this.", "Did that."]
    })
}

pub fn one_line_entry() -> Value {
    json!({"label": "Programming Languages", "details": "Python, C++, JavaScript, MATLAB"})
}

pub fn text_entry() -> Value {
    json!("My Text Entry with some **markdown** and [links](https://example.com)!")
}
