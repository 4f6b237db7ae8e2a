
use portfolio_cms::{
    constants::CONTACT_TABLE,
    entities::{blog_post::BlogPost, project::Project, skill::Skill},
    fallback,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

fn rust_skill() -> Value {
    json!({ "name": "Rust", "level": 40, "category": "Programming" })
}

#[actix_rt::test]
async fn unconfigured_store_serves_fallback_collections() {
    let app = TestApp::unconfigured().await;

    let response = app.get("/resources/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let projects: Vec<Project> = response.json().await.unwrap();
    assert_eq!(projects, fallback::projects());
    assert_eq!(projects[0].id, "1");

    let posts: Vec<BlogPost> = app.get("/resources/blog").await.json().await.unwrap();
    assert_eq!(posts, fallback::blog_posts());

    let skills: Vec<Skill> = app.get("/resources/skills").await.json().await.unwrap();
    assert_eq!(skills.len(), 16);
}

#[actix_rt::test]
async fn fallback_reads_are_identical_across_calls() {
    let app = TestApp::unconfigured().await;

    let first = app.get_json("/resources/blog").await;
    let second = app.get_json("/resources/blog").await;

    assert_eq!(first, second);
}

#[actix_rt::test]
async fn failing_store_falls_back_on_read() {
    let app = TestApp::with_failing_store().await;

    let response = app.get("/resources/skills").await;
    assert_eq!(response.status(), StatusCode::OK);
    let skills: Vec<Skill> = response.json().await.unwrap();
    assert_eq!(skills, fallback::skills());

    let response = app.get("/resources/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let projects: Vec<Project> = response.json().await.unwrap();
    assert_eq!(projects, fallback::projects());

    let response = app.get("/resources/blog").await;
    assert_eq!(response.status(), StatusCode::OK);
    let posts: Vec<BlogPost> = response.json().await.unwrap();
    assert_eq!(posts, fallback::blog_posts());
}

#[actix_rt::test]
async fn empty_store_falls_back_on_read() {
    let (app, _backend) = TestApp::with_memory_store().await;

    let projects: Vec<Project> = app.get("/resources/projects").await.json().await.unwrap();

    assert_eq!(projects, fallback::projects());
}

#[actix_rt::test]
async fn create_without_store_is_unavailable() {
    let app = TestApp::unconfigured().await;

    let response = app.post("/resources/skills", &rust_skill()).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Database not configured"));
}

#[actix_rt::test]
async fn update_and_delete_without_store_are_unavailable() {
    let app = TestApp::unconfigured().await;

    let response = app.put("/resources/skills/1", &json!({ "level": 99 })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.delete("/resources/skills/1").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_rt::test]
async fn created_skill_is_listed_instead_of_fallback() {
    let (app, backend) = TestApp::with_memory_store().await;

    let response = app.post("/resources/skills", &rust_skill()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Skill = response.json().await.unwrap();
    assert_eq!(created.name, "Rust");
    assert_eq!(created.level, 40);
    assert!(!created.id.is_empty());

    let skills: Vec<Skill> = app.get("/resources/skills").await.json().await.unwrap();
    assert_eq!(skills, vec![created]);
    assert_eq!(backend.len("skills"), 1);
}

#[actix_rt::test]
async fn writes_only_touch_their_own_collection() {
    let (app, backend) = TestApp::with_memory_store().await;

    app.post("/resources/skills", &rust_skill()).await;

    assert_eq!(backend.len("skills"), 1);
    assert!(backend.is_empty("projects"));
    let projects: Vec<Project> = app.get("/resources/projects").await.json().await.unwrap();
    assert_eq!(projects, fallback::projects());
}

#[actix_rt::test]
async fn update_round_trip_changes_only_given_fields() {
    let (app, _backend) = TestApp::with_memory_store().await;
    let created: Skill = app.post("/resources/skills", &rust_skill()).await.json().await.unwrap();

    let response = app
        .put(&format!("/resources/skills/{}", created.id), &json!({ "level": 77 }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Skill = response.json().await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.level, 77);
    assert_eq!(updated.name, "Rust");
    assert!(updated.updated_at >= created.updated_at);
}

#[actix_rt::test]
async fn patch_is_accepted_as_update() {
    let (app, _backend) = TestApp::with_memory_store().await;
    let created: Skill = app.post("/resources/skills", &rust_skill()).await.json().await.unwrap();

    let response = app
        .client
        .patch(app.url(&format!("/resources/skills/{}", created.id)))
        .json(&json!({ "icon": "🦀" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Skill = response.json().await.unwrap();
    assert_eq!(updated.icon.as_deref(), Some("🦀"));
}

#[actix_rt::test]
async fn update_of_unknown_id_is_not_found_and_creates_nothing() {
    let (app, backend) = TestApp::with_memory_store().await;

    let response = app.put("/resources/skills/9", &json!({ "level": 50 })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(backend.is_empty("skills"));
}

#[actix_rt::test]
async fn delete_removes_row_and_list_falls_back_again() {
    let (app, backend) = TestApp::with_memory_store().await;
    let created: Skill = app.post("/resources/skills", &rust_skill()).await.json().await.unwrap();

    let response = app.delete(&format!("/resources/skills/{}", created.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Skill deleted successfully");

    assert!(backend.is_empty("skills"));
    let skills: Vec<Skill> = app.get("/resources/skills").await.json().await.unwrap();
    assert_eq!(skills, fallback::skills());

    let response = app.delete(&format!("/resources/skills/{}", created.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn blog_slug_is_derived_and_conflicts_are_rejected() {
    let (app, _backend) = TestApp::with_memory_store().await;
    let post = json!({
        "title": "Hello, World: Rust Edition!",
        "content": "Body",
        "excerpt": "Short",
        "published": true
    });

    let response = app.post("/resources/blog", &post).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: BlogPost = response.json().await.unwrap();
    assert_eq!(created.slug, "hello-world-rust-edition");

    let response = app.post("/resources/blog", &post).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let posts: Vec<BlogPost> = app.get("/resources/blog").await.json().await.unwrap();
    assert_eq!(posts.len(), 1);
}

#[actix_rt::test]
async fn renaming_a_post_regenerates_its_slug() {
    let (app, _backend) = TestApp::with_memory_store().await;
    let created: BlogPost = app
        .post("/resources/blog", &json!({ "title": "First Title", "content": "Body" }))
        .await
        .json()
        .await
        .unwrap();

    let updated: BlogPost = app
        .put(&format!("/resources/blog/{}", created.id), &json!({ "title": "Second Title" }))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(updated.slug, "second-title");
}

#[actix_rt::test]
async fn invalid_payloads_are_rejected() {
    let (app, backend) = TestApp::with_memory_store().await;

    let response = app
        .post("/resources/skills", &json!({ "name": "", "level": 10, "category": "Cloud" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "name");

    let response = app
        .post(
            "/resources/projects",
            &json!({
                "title": "Broken",
                "description": "Bad link",
                "category": "NLP",
                "github_url": "not a url"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/resources/skills", &json!({ "name": "Rust", "level": 10, "category": "Gardening" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(backend.is_empty("skills"));
    assert!(backend.is_empty("projects"));
    assert!(backend.is_empty(CONTACT_TABLE));
}

#[actix_rt::test]
async fn failing_store_write_is_a_generic_server_error() {
    let app = TestApp::with_failing_store().await;

    let response = app.post("/resources/skills", &rust_skill()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error: Failed to create skill");
}

#[actix_rt::test]
async fn out_of_range_levels_are_stored_as_given() {
    let (app, _backend) = TestApp::with_memory_store().await;

    let created: Skill = app
        .post("/resources/skills", &json!({ "name": "Overachiever", "level": 150, "category": "ML/AI" }))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(created.level, 150);
}
