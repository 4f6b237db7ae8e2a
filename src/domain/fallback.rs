//! Records served when the remote store is unconfigured, failing or empty.
//!
//! Built once per process so that repeated reads return identical data.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

use crate::{
    constants::START_TIME,
    entities::{
        blog_post::BlogPost,
        project::{Project, ProjectCategory},
        skill::{Skill, SkillCategory},
    },
};

const PROJECT_IMAGE: &str = "/placeholder.svg?height=300&width=400";
const POST_IMAGE: &str = "/placeholder.svg?height=200&width=300";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static PROJECTS: Lazy<Vec<Project>> = Lazy::new(|| {
    let now = *START_TIME;
    vec![
        Project {
            id: "1".into(),
            title: "Customer Churn Prediction Model".into(),
            description: "Built a machine learning model to predict customer churn using ensemble methods and feature engineering, achieving 94% accuracy.".into(),
            image: Some(PROJECT_IMAGE.into()),
            technologies: strings(&["Python", "scikit-learn", "pandas", "XGBoost", "Matplotlib"]),
            category: ProjectCategory::MachineLearning,
            github_url: "https://github.com/anikettayade/customer-churn-prediction".into(),
            live_url: Some("https://customer-churn-demo.vercel.app".into()),
            blog_url: Some("/blog/customer-churn-prediction".into()),
            highlights: strings(&["94% accuracy on test set", "Reduced false positives by 23%", "Deployed with Flask API"]),
            featured: true,
            created_at: now,
            updated_at: now,
        },
        Project {
            id: "2".into(),
            title: "Sales Forecasting Dashboard".into(),
            description: "Created an interactive Tableau dashboard for sales forecasting using time series analysis and seasonal decomposition.".into(),
            image: Some(PROJECT_IMAGE.into()),
            technologies: strings(&["Tableau", "Python", "SQL", "PostgreSQL", "Time Series"]),
            category: ProjectCategory::DataVisualization,
            github_url: "https://github.com/anikettayade/sales-forecasting".into(),
            live_url: Some("https://public.tableau.com/views/SalesForecasting/Dashboard".into()),
            blog_url: None,
            highlights: strings(&["Real-time data updates", "MAPE < 8% accuracy", "Executive-level insights"]),
            featured: true,
            created_at: now,
            updated_at: now,
        },
        Project {
            id: "3".into(),
            title: "Sentiment Analysis API".into(),
            description: "Developed a REST API for sentiment analysis of social media posts using BERT and deployed on AWS.".into(),
            image: Some(PROJECT_IMAGE.into()),
            technologies: strings(&["Python", "BERT", "FastAPI", "AWS", "Docker"]),
            category: ProjectCategory::Nlp,
            github_url: "https://github.com/anikettayade/sentiment-api".into(),
            live_url: Some("https://sentiment-api.anikettayade.com".into()),
            blog_url: Some("/blog/building-sentiment-analysis-api".into()),
            highlights: strings(&["89% accuracy on test data", "Handles 1000+ requests/min", "Multi-language support"]),
            featured: false,
            created_at: now,
            updated_at: now,
        },
    ]
});

static BLOG_POSTS: Lazy<Vec<BlogPost>> = Lazy::new(|| {
    let now = *START_TIME;
    let days_ago = |days: i64| -> DateTime<Utc> { now - Duration::days(days) };
    vec![
        BlogPost {
            id: "1".into(),
            title: "Building Your First Machine Learning Pipeline".into(),
            content: "A comprehensive guide to creating end-to-end ML pipelines with Python. In this article, we'll explore the essential components of a machine learning pipeline, from data preprocessing to model deployment. We'll cover data validation, feature engineering, model training, evaluation, and deployment strategies. By the end of this guide, you'll have a solid understanding of how to build robust, scalable ML pipelines that can handle real-world data challenges.".into(),
            excerpt: "Learn how to build robust machine learning pipelines from data preprocessing to model deployment, with practical examples and best practices.".into(),
            image: Some(POST_IMAGE.into()),
            date: now,
            tags: strings(&["Machine Learning", "Python", "MLOps", "Tutorial"]),
            published: true,
            slug: "building-your-first-ml-pipeline".into(),
            created_at: now,
            updated_at: now,
        },
        BlogPost {
            id: "2".into(),
            title: "Data Visualization Best Practices for Business Intelligence".into(),
            content: "Effective data visualization techniques for creating compelling business dashboards. This comprehensive guide covers the principles of effective data visualization, color theory, chart selection, and dashboard design. We'll explore how to choose the right visualization for your data, create compelling narratives, and design dashboards that drive business decisions.".into(),
            excerpt: "Discover the principles of effective data visualization and learn how to create dashboards that tell compelling stories with your data.".into(),
            image: Some(POST_IMAGE.into()),
            date: days_ago(7),
            tags: strings(&["Data Visualization", "Tableau", "Business Intelligence", "Design"]),
            published: true,
            slug: "data-visualization-best-practices".into(),
            created_at: now,
            updated_at: now,
        },
        BlogPost {
            id: "3".into(),
            title: "Understanding BERT for Sentiment Analysis".into(),
            content: "Deep dive into BERT architecture and its application in sentiment analysis. This technical article explores the transformer architecture, attention mechanisms, and how BERT revolutionized natural language processing. We'll implement a sentiment analysis model from scratch, fine-tune BERT for our specific use case, and deploy it as a production-ready API.".into(),
            excerpt: "Explore how BERT revolutionized NLP and learn to implement sentiment analysis with state-of-the-art transformer models.".into(),
            image: Some(POST_IMAGE.into()),
            date: days_ago(14),
            tags: strings(&["NLP", "BERT", "Deep Learning", "Sentiment Analysis"]),
            published: true,
            slug: "understanding-bert-sentiment-analysis".into(),
            created_at: now,
            updated_at: now,
        },
    ]
});

static SKILLS: Lazy<Vec<Skill>> = Lazy::new(|| {
    let now = *START_TIME;
    let entries: [(&str, i32, SkillCategory); 16] = [
        ("Python", 95, SkillCategory::Programming),
        ("R", 85, SkillCategory::Programming),
        ("SQL", 90, SkillCategory::Programming),
        ("JavaScript", 75, SkillCategory::Programming),
        ("Machine Learning", 90, SkillCategory::MlAi),
        ("Deep Learning", 85, SkillCategory::MlAi),
        ("NLP", 80, SkillCategory::MlAi),
        ("Computer Vision", 75, SkillCategory::MlAi),
        ("Tableau", 95, SkillCategory::Visualization),
        ("Power BI", 85, SkillCategory::Visualization),
        ("Plotly", 90, SkillCategory::Visualization),
        ("D3.js", 70, SkillCategory::Visualization),
        ("AWS", 80, SkillCategory::Cloud),
        ("Docker", 75, SkillCategory::Cloud),
        ("Git", 90, SkillCategory::Cloud),
        ("Apache Spark", 70, SkillCategory::Cloud),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, level, category))| Skill {
            id: (i + 1).to_string(),
            name: name.into(),
            level,
            category,
            icon: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
});

pub fn projects() -> Vec<Project> {
    PROJECTS.clone()
}

pub fn blog_posts() -> Vec<BlogPost> {
    BLOG_POSTS.clone()
}

pub fn skills() -> Vec<Skill> {
    SKILLS.clone()
}
