//! Common test utilities for integration tests
//!
//! Every [`TestApp`] runs the full router over a fresh in-memory store and a
//! clock pinned to a chosen date.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use fitplan_backend::{
    clock::FixedClock,
    config::{AppConfig, CacheConfig, RedisConfig, ServerConfig},
    routes,
    state::AppState,
    storage::MemoryStore,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const WORKOUT_PLAN_TEXT: &str = "\
**Goal:** Build strength
**Duration:** 4 weeks

**Monday - Lower body**
- Squats: 3 x 5
- Lunges: 3 x 10
**Tuesday - Upper body**
- Bench Press: 3 x 5
- Rows: 3 x 8
**Wednesday**: Rest
**Thursday - Full body**
- Deadlift: 1 x 5
**Friday - Conditioning**
- Running: 20 minutes
**Saturday**
- Yoga - 30 minutes
**Sunday**: Rest and recovery";

/// A plan with no rest days, so a streak can run through a whole week
pub const DAILY_WORKOUT_TEXT: &str = "\
Goal: Move every day
Monday:
- Push-ups: 3 x 10
Tuesday:
- Push-ups: 3 x 10
Wednesday:
- Push-ups: 3 x 10
Thursday:
- Push-ups: 3 x 10
Friday:
- Push-ups: 3 x 10
Saturday:
- Push-ups: 3 x 10
Sunday:
- Push-ups: 3 x 10";

pub const DIET_PLAN_TEXT: &str = "\
Goal: Lean bulk
Sunday:
- Breakfast: Pancakes (450 kcal)
- Dinner: Roast chicken
Monday:
- Breakfast: Oatmeal with berries (350 kcal)
- Lunch: Chicken salad
Tuesday:
- Lunch: Lentil soup
Wednesday:
- Breakfast: Eggs on toast
Thursday:
- Dinner: Stir fry
Friday:
- Lunch: Tuna wrap
Saturday:
- Breakfast: Smoothie";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub clock: Arc<FixedClock>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Create a test application whose "today" is `today`
    pub fn on(today: NaiveDate) -> Self {
        let clock = Arc::new(FixedClock::on(today));
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config(), clock.clone());
        let app = routes::create_router(state);

        Self { app, clock, store }
    }

    /// Create a test application pinned to 2024-01-10
    pub fn new() -> Self {
        Self::on(date(2024, 1, 10))
    }

    /// Fresh user id
    pub fn new_user(&self) -> String {
        format!("user-{}", uuid::Uuid::new_v4())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    fn request(method: &str, path: &str, user: Option<&str>) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user);
        }
        builder
    }

    /// Make a GET request without a user
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send(Self::request("GET", path, None).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request as `user`
    pub async fn get_as(&self, path: &str, user: &str) -> (StatusCode, String) {
        self.send(Self::request("GET", path, Some(user)).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Self::request("POST", path, None)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body as `user`
    pub async fn post_as(&self, path: &str, body: &str, user: &str) -> (StatusCode, String) {
        let request = Self::request("POST", path, Some(user))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a DELETE request as `user`
    pub async fn delete_as(&self, path: &str, user: &str) -> (StatusCode, String) {
        self.send(Self::request("DELETE", path, Some(user)).body(Body::empty()).unwrap())
            .await
    }

    /// Import a plan for `user`, asserting success
    pub async fn import_plan(&self, user: &str, kind: &str, text: &str, start: NaiveDate) {
        let body = serde_json::json!({ "text": text, "start_date": start });
        let (status, body) = self
            .post_as(&format!("/api/v1/plans/{}", kind), &body.to_string(), user)
            .await;
        assert_eq!(status, StatusCode::OK, "import failed: {}", body);
    }

    /// Record a completion for `user`, returning the response body as JSON
    pub async fn complete(&self, user: &str, kind: &str, item: &str, on: NaiveDate) -> serde_json::Value {
        let body = serde_json::json!({ "item": item, "date": on });
        let (status, body) = self
            .post_as(&format!("/api/v1/completions/{}", kind), &body.to_string(), user)
            .await;
        assert_eq!(status, StatusCode::OK, "completion failed: {}", body);
        serde_json::from_str(&body).unwrap()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        redis: RedisConfig {
            enabled: false,
            url: "redis://localhost:6379".to_string(),
            key_prefix: "fitplan-test:".to_string(),
        },
        cache: CacheConfig {
            plan_ttl_secs: 60,
            max_entries: 100,
        },
    }
}
