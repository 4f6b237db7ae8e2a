use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        option_fields::OptionField,
        resource::{new_validation_error, null_as_empty, opaque_id, Direction, OrderBy, Resource},
    },
    fallback,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Data Analysis")]
    DataAnalysis,
    #[serde(rename = "Data Visualization")]
    DataVisualization,
    #[serde(rename = "NLP")]
    Nlp,
    #[serde(rename = "Data Engineering")]
    DataEngineering,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::MachineLearning => "Machine Learning",
            ProjectCategory::DataAnalysis => "Data Analysis",
            ProjectCategory::DataVisualization => "Data Visualization",
            ProjectCategory::Nlp => "NLP",
            ProjectCategory::DataEngineering => "Data Engineering",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub technologies: Vec<String>,
    pub category: ProjectCategory,
    pub github_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProject {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub technologies: Vec<String>,

    pub category: ProjectCategory,

    #[validate(url(message = "GitHub URL must be a valid URL"))]
    pub github_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Live URL must be a valid URL"))]
    pub live_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_url: Option<String>,

    #[serde(default)]
    pub highlights: Vec<String>,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "OptionField::is_unchanged")]
    pub image: OptionField<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "GitHub URL must be a valid URL"))]
    pub github_url: Option<String>,

    #[serde(default, skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub live_url: OptionField<String>,

    #[serde(default, skip_serializing_if = "OptionField::is_unchanged")]
    pub blog_url: OptionField<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let Some(raw) = value.value_ref() {
        url::Url::parse(raw)
            .map_err(|_| new_validation_error("invalid_url", "Live URL must be a valid URL"))?;
    }
    Ok(())
}

impl Resource for Project {
    type New = NewProject;
    type Patch = ProjectPatch;

    const TABLE: &'static str = "projects";
    const PATH: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const ORDER: OrderBy = OrderBy { column: "created_at", direction: Direction::Descending };

    fn id(&self) -> &str {
        &self.id
    }

    fn fallback() -> Vec<Self> {
        fallback::projects()
    }
}
