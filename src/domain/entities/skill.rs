use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        resource::{opaque_id, Direction, OrderBy, Resource},
    },
    fallback,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    Programming,
    #[serde(rename = "ML/AI")]
    MlAi,
    Visualization,
    Cloud,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Programming,
        SkillCategory::MlAi,
        SkillCategory::Visualization,
        SkillCategory::Cloud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Programming => "Programming",
            SkillCategory::MlAi => "ML/AI",
            SkillCategory::Visualization => "Visualization",
            SkillCategory::Cloud => "Cloud",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    pub level: i32,
    pub category: SkillCategory,
    #[serde(default)]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Levels are stored as submitted, without clamping.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSkill {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    pub level: i32,

    pub category: SkillCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SkillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,

    #[serde(default, skip_serializing_if = "OptionField::is_unchanged")]
    pub icon: OptionField<String>,
}

impl Resource for Skill {
    type New = NewSkill;
    type Patch = SkillPatch;

    const TABLE: &'static str = "skills";
    const PATH: &'static str = "skills";
    const LABEL: &'static str = "Skill";
    const ORDER: OrderBy = OrderBy { column: "category", direction: Direction::Ascending };

    fn id(&self) -> &str {
        &self.id
    }

    fn fallback() -> Vec<Self> {
        fallback::skills()
    }
}
