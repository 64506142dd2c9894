//! A complete sample document
//!
//! Uses every entry variant and a few social networks. It serves as a
//! starting point for new users and as a fixture for the validators and
//! the schema.

use serde_json::{json, Value};

use crate::model::RenderCvDataModel;
use crate::validation::{ValidationContext, ValidationErrors};

/// Raw sample document for a person called `name`.
pub fn sample_input(name: &str) -> Value {
    let username = sample_username(name);
    json!({
        "cv": {
            "name": name,
            "label": "Mechanical Engineer",
            "location": "Istanbul, Türkiye",
            "email": "john.doe@example.com",
            "phone": "+90 541 999 99 99",
            "website": "https://example.com",
            "social_networks": [
                {"network": "LinkedIn", "username": username},
                {"network": "GitHub", "username": username},
                {"network": "Mastodon", "username": format!("@{username}")}
            ],
            "sections": {
                "summary": [
                    "Mechanical engineer working on numerical methods and finite element tools."
                ],
                "education": [
                    {
                        "institution": "Middle East Technical University",
                        "area": "Mechanical Engineering",
                        "degree": "BS",
                        "location": "Ankara, Türkiye",
                        "start_date": "2018-09",
                        "end_date": "2023-06",
                        "highlights": ["GPA: 3.90/4.00", "Graduated with high honors"]
                    }
                ],
                "experience": [
                    {
                        "company": "Some Company",
                        "position": "Software Engineer",
                        "location": "Istanbul, Türkiye",
                        "start_date": "2023-07",
                        "end_date": "present",
                        "highlights": [
                            "Built a mesh generation tool used across three product lines.",
                            "Cut simulation setup time by 40%."
                        ]
                    },
                    {
                        "company": "Another Company",
                        "position": "Intern",
                        "start_date": "2022-06-01",
                        "end_date": "2022-09-01"
                    }
                ],
                "projects": [
                    {
                        "name": "Open Source FEM Solver",
                        "date": "2021-2022",
                        "url": "https://example.com/solver",
                        "highlights": ["Implemented adaptive mesh refinement."]
                    }
                ],
                "publications": [
                    {
                        "title": "Magneto-Thermal Thin Shell Approximation for No-Insulation Coils",
                        "authors": ["Frodo Baggins", name, "Samwise Gamgee"],
                        "date": "2023-01",
                        "doi": "10.1109/TASC.2023.3340648",
                        "journal": "IEEE Transactions on Applied Superconductivity"
                    }
                ],
                "skills": [
                    {"label": "Languages", "details": "Rust, Python, C++"},
                    {"label": "Tools", "details": "Git, Docker, LaTeX"}
                ]
            }
        },
        "design": {
            "theme": "classic",
            "font": "Source Sans 3",
            "color": "#004f90",
            "show_timespan_in": ["Experience"]
        }
    })
}

/// A handle every network accepts: the ASCII letters and digits of `name`.
fn sample_username(name: &str) -> String {
    let username: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if username.is_empty() {
        "johndoe".to_string()
    } else {
        username
    }
}

/// Validated sample data model for a person called `name`.
pub fn sample_data_model(
    name: &str,
    ctx: &ValidationContext,
) -> Result<RenderCvDataModel, ValidationErrors> {
    RenderCvDataModel::validate(&sample_input(name), ctx)
}
