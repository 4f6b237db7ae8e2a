use serde::Serialize;

use crate::entities::{
    blog_post::BlogPost,
    project::Project,
    skill::{Skill, SkillCategory},
};

const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: SkillCategory,
    pub count: usize,
    /// Rounded mean level; 0 for an empty category.
    pub average_level: i32,
}

/// Admin dashboard figures computed from the cached collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub project_count: usize,
    pub featured_project_count: usize,
    pub post_count: usize,
    pub published_post_count: usize,
    pub skill_count: usize,
    pub skill_categories: Vec<CategoryStat>,
    pub recent_projects: Vec<Project>,
    pub recent_posts: Vec<BlogPost>,
}

impl DashboardSummary {
    pub fn from_collections(projects: &[Project], posts: &[BlogPost], skills: &[Skill]) -> Self {
        let skill_categories = SkillCategory::ALL
            .iter()
            .map(|&category| {
                let levels: Vec<i64> = skills
                    .iter()
                    .filter(|s| s.category == category)
                    .map(|s| i64::from(s.level))
                    .collect();
                let average_level = if levels.is_empty() {
                    0
                } else {
                    (levels.iter().sum::<i64>() as f64 / levels.len() as f64).round() as i32
                };
                CategoryStat { category, count: levels.len(), average_level }
            })
            .collect();

        let mut recent_projects = projects.to_vec();
        recent_projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_projects.truncate(RECENT_LIMIT);

        let mut recent_posts = posts.to_vec();
        recent_posts.sort_by(|a, b| b.date.cmp(&a.date));
        recent_posts.truncate(RECENT_LIMIT);

        DashboardSummary {
            project_count: projects.len(),
            featured_project_count: projects.iter().filter(|p| p.featured).count(),
            post_count: posts.len(),
            published_post_count: posts.iter().filter(|p| p.published).count(),
            skill_count: skills.len(),
            skill_categories,
            recent_projects,
            recent_posts,
        }
    }
}
