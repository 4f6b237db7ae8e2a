use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::{
    entities::{
        option_fields::OptionField,
        resource::{new_validation_error, null_as_empty, opaque_id, Direction, OrderBy, Resource},
    },
    fallback,
};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(default)]
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBlogPost {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub published: bool,

    /// Derived from the title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BlogPostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    #[serde(default, skip_serializing_if = "OptionField::is_unchanged")]
    pub image: OptionField<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// URL-safe slug: lowercase, non-alphanumeric runs collapsed to one hyphen, no edge hyphens.
pub fn slugify(input: &str) -> String {
    slug::slugify(input)
}

fn slug_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "slug",
        new_validation_error("slug_empty", "Slug cannot be derived; please provide a title with letters or digits"),
    );
    errors
}

/// Explicit non-empty slug wins; otherwise a new title regenerates it.
fn resolve_slug_for_update(slug_field: Option<&str>, title_field: Option<&str>) -> Option<String> {
    match (slug_field, title_field) {
        (Some(s), _) if !s.trim().is_empty() => Some(slugify(s)),
        (_, Some(title)) => Some(slugify(title)),
        _ => None,
    }
}

impl Resource for BlogPost {
    type New = NewBlogPost;
    type Patch = BlogPostPatch;

    const TABLE: &'static str = "blog_posts";
    const PATH: &'static str = "blog";
    const LABEL: &'static str = "Blog post";
    const ORDER: OrderBy = OrderBy { column: "date", direction: Direction::Descending };

    fn id(&self) -> &str {
        &self.id
    }

    fn fallback() -> Vec<Self> {
        fallback::blog_posts()
    }

    fn prepare_new(new: &mut NewBlogPost) -> Result<(), ValidationErrors> {
        let source = match new.slug.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => new.title.as_str(),
        };
        let slug = slugify(source);
        if slug.is_empty() {
            return Err(slug_errors());
        }
        new.slug = Some(slug);
        Ok(())
    }

    fn prepare_patch(patch: &mut BlogPostPatch) -> Result<(), ValidationErrors> {
        let resolved = resolve_slug_for_update(patch.slug.as_deref(), patch.title.as_deref());
        match resolved {
            Some(slug) if slug.is_empty() => Err(slug_errors()),
            other => {
                patch.slug = other;
                Ok(())
            }
        }
    }

    fn unique_slug_of_new(new: &NewBlogPost) -> Option<&str> {
        new.slug.as_deref()
    }

    fn unique_slug_of_patch(patch: &BlogPostPatch) -> Option<&str> {
        patch.slug.as_deref()
    }
}
