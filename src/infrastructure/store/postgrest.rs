use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder, Response, StatusCode,
};
use serde_json::Value;
use url::Url;

use crate::{
    errors::StoreError,
    store::{BackendKind, SelectQuery, StoreBackend},
};

/// Hosted Postgres behind a PostgREST-style REST API (`{url}/rest/v1/{table}`).
pub struct PostgrestBackend {
    client: Client,
    base: Url,
}

impl PostgrestBackend {
    pub fn new(url: &Url, key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut root = url.clone();
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let base = root
            .join("rest/v1/")
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(key)
            .map_err(|_| StoreError::InvalidConfig("store key contains invalid header characters".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| StoreError::InvalidConfig("store key contains invalid header characters".into()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(PostgrestBackend { client, base })
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.base
            .join(table)
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))
    }

    fn by_id(&self, builder: RequestBuilder, id: &str) -> RequestBuilder {
        builder.query(&[("id", format!("eq.{id}"))])
    }
}

/// Non-2xx responses become [`StoreError::Status`] carrying the body's `message` when present.
/// Unique violations (409, or Postgres code `23505`) become [`StoreError::Conflict`].
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<Value>(&body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let message = field("message").unwrap_or(body);
    if status == StatusCode::CONFLICT || field("code").as_deref() == Some("23505") {
        return Err(StoreError::Conflict(message));
    }

    Err(StoreError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl StoreBackend for PostgrestBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgrest
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(filter) = &query.filter {
            params.push((filter.column.to_string(), format!("eq.{}", filter.value)));
        }
        if let Some(order) = &query.order {
            params.push(("order".to_string(), format!("{}.{}", order.column, order.direction.as_str())));
        }

        let response = self
            .client
            .get(self.table_url(query.table)?)
            .query(&params)
            .send()
            .await?;

        Ok(check(response).await?.json::<Vec<Value>>().await?)
    }

    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.table_url(table)?)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let mut rows = check(response).await?.json::<Vec<Value>>().await?;
        if rows.is_empty() {
            return Err(StoreError::Decode("insert returned no rows".into()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: &'static str, id: &str, patch: Value) -> Result<Option<Value>, StoreError> {
        let builder = self
            .client
            .patch(self.table_url(table)?)
            .header("Prefer", "return=representation")
            .json(&patch);

        let response = self.by_id(builder, id).send().await?;
        let rows = check(response).await?.json::<Vec<Value>>().await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError> {
        let builder = self
            .client
            .delete(self.table_url(table)?)
            .header("Prefer", "return=representation");

        let response = self.by_id(builder, id).send().await?;
        let rows = check(response).await?.json::<Vec<Value>>().await?;
        Ok(!rows.is_empty())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self.client.get(self.base.clone()).send().await?;
        check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::{net::TcpListener, sync::Arc};

    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::{
        entities::resource::{Direction, OrderBy},
        store::Filter,
    };

    #[derive(Debug, Clone)]
    struct Seen {
        method: String,
        path: String,
        query: Vec<(String, String)>,
        prefer: Option<String>,
        apikey: Option<String>,
        authorization: Option<String>,
        body: Value,
    }

    impl Seen {
        fn param(&self, name: &str) -> Option<&str> {
            self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
        }
    }

    /// REST server on a random port that records each request and answers with `reply`.
    fn stub(status: u16, reply: Value) -> (PostgrestBackend, Arc<Mutex<Vec<Seen>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            let recorded = recorded.clone();
            let reply = reply.clone();
            App::new().default_service(web::to(move |req: HttpRequest, body: web::Bytes| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    let header = |name: &str| {
                        req.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
                    };
                    recorded.lock().push(Seen {
                        method: req.method().to_string(),
                        path: req.path().to_string(),
                        query: url::form_urlencoded::parse(req.query_string().as_bytes())
                            .into_owned()
                            .collect(),
                        prefer: header("prefer"),
                        apikey: header("apikey"),
                        authorization: header("authorization"),
                        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                    });
                    HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap()).json(reply)
                }
            }))
        })
        .listen(listener)
        .unwrap()
        .workers(1)
        .run();
        tokio::spawn(server);

        let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
        let backend = PostgrestBackend::new(&url, "anon-key", Duration::from_secs(5)).unwrap();
        (backend, seen)
    }

    #[actix_rt::test]
    async fn select_sends_keys_filter_and_order() {
        let (backend, seen) = stub(200, json!([{ "id": 1, "title": "Hello" }]));
        let query = SelectQuery {
            table: "blog_posts",
            filter: Some(Filter { column: "slug", value: "hello".into() }),
            order: Some(OrderBy { column: "date", direction: Direction::Descending }),
        };

        let rows = backend.select(&query).await.unwrap();

        assert_eq!(rows.len(), 1);
        let seen = seen.lock()[0].clone();
        assert_eq!(seen.method, "GET");
        assert_eq!(seen.path, "/rest/v1/blog_posts");
        assert_eq!(seen.param("select"), Some("*"));
        assert_eq!(seen.param("slug"), Some("eq.hello"));
        assert_eq!(seen.param("order"), Some("date.desc"));
        assert_eq!(seen.apikey.as_deref(), Some("anon-key"));
        assert_eq!(seen.authorization.as_deref(), Some("Bearer anon-key"));
    }

    #[actix_rt::test]
    async fn insert_posts_one_row_and_asks_for_it_back() {
        let (backend, seen) = stub(201, json!([{ "id": "7", "name": "Rust" }]));

        let stored = backend.insert("skills", json!({ "name": "Rust" })).await.unwrap();

        assert_eq!(stored["id"], "7");
        let seen = seen.lock()[0].clone();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));
        assert_eq!(seen.body, json!([{ "name": "Rust" }]));
    }

    #[actix_rt::test]
    async fn update_of_unmatched_id_is_none() {
        let (backend, seen) = stub(200, json!([]));

        let updated = backend.update("skills", "42", json!({ "level": 1 })).await.unwrap();

        assert!(updated.is_none());
        let seen = seen.lock()[0].clone();
        assert_eq!(seen.method, "PATCH");
        assert_eq!(seen.param("id"), Some("eq.42"));
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));
        assert_eq!(seen.body, json!({ "level": 1 }));
    }

    #[actix_rt::test]
    async fn delete_reports_whether_a_row_went_away() {
        let (backend, seen) = stub(200, json!([]));

        assert!(!backend.delete("projects", "42").await.unwrap());

        let seen = seen.lock()[0].clone();
        assert_eq!(seen.method, "DELETE");
        assert_eq!(seen.path, "/rest/v1/projects");
        assert_eq!(seen.param("id"), Some("eq.42"));
    }

    #[actix_rt::test]
    async fn error_status_carries_the_body_message() {
        let (backend, _seen) = stub(500, json!({ "message": "relation does not exist" }));

        let err = backend.select(&SelectQuery { table: "skills", filter: None, order: None }).await.unwrap_err();

        assert_eq!(err, StoreError::Status { status: 500, message: "relation does not exist".into() });
    }

    #[actix_rt::test]
    async fn unique_violation_is_a_conflict() {
        let (backend, _seen) = stub(409, json!({ "code": "23505", "message": "duplicate key value" }));

        let err = backend.insert("blog_posts", json!({ "slug": "same" })).await.unwrap_err();

        assert_eq!(err, StoreError::Conflict("duplicate key value".into()));
    }

    #[test]
    fn rest_root_is_appended_to_project_url() {
        let url = Url::parse("https://abc.supabase.co").unwrap();
        let backend = PostgrestBackend::new(&url, "anon-key", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.table_url("skills").unwrap().as_str(), "https://abc.supabase.co/rest/v1/skills");

        let nested = Url::parse("http://localhost:3000/proxy").unwrap();
        let backend = PostgrestBackend::new(&nested, "anon-key", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.table_url("blog_posts").unwrap().as_str(), "http://localhost:3000/proxy/rest/v1/blog_posts");
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let url = Url::parse("https://abc.supabase.co").unwrap();
        assert!(matches!(
            PostgrestBackend::new(&url, "bad\nkey", Duration::from_secs(1)),
            Err(StoreError::InvalidConfig(_))
        ));
    }
}
