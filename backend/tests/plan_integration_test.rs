//! Integration tests for plan import, lookup and reset

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{date, TestApp, DIET_PLAN_TEXT, WORKOUT_PLAN_TEXT};
use fitplan_backend::storage::{write_json, CachedEnvelope};
use fitplan_shared::parser::parse_workout_plan;
use serde_json::json;

#[tokio::test]
async fn test_import_requires_user() {
    let app = TestApp::new();
    let body = json!({ "text": WORKOUT_PLAN_TEXT });

    let (status, _) = app.post("/api/v1/plans/workout", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_import_workout_plan() {
    let app = TestApp::new();
    let user = app.new_user();
    let body = json!({ "text": WORKOUT_PLAN_TEXT, "start_date": "2024-01-01" });

    let (status, response) = app
        .post_as("/api/v1/plans/workout", &body.to_string(), &user)
        .await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["plan"]["goal"], "Build strength");
    assert_eq!(response["plan"]["total_weeks"], 4);
    assert_eq!(response["recognized_days"], 7);
    assert_eq!(response["defaulted_rest_days"], 0);
    assert_eq!(response["plan"]["weekly_template"][2]["is_rest_day"], true);
    assert_eq!(
        response["plan"]["weekly_template"][0]["items"][0]["name"],
        "Squats"
    );
}

#[tokio::test]
async fn test_import_diet_plan_uses_sunday_first_template() {
    let app = TestApp::new();
    let user = app.new_user();
    let body = json!({ "text": DIET_PLAN_TEXT });

    let (status, response) = app
        .post_as("/api/v1/plans/meals", &body.to_string(), &user)
        .await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["plan"]["kind"], "diet");
    assert_eq!(response["plan"]["start_date"], "2024-01-10");
    let sunday = &response["plan"]["weekly_template"][0];
    assert_eq!(sunday["day_name"], "Sunday");
    assert_eq!(sunday["items"][0]["meal_type"], "breakfast");
    assert_eq!(sunday["items"][0]["calories"], 450);
}

#[tokio::test]
async fn test_unknown_kind_rejected() {
    let app = TestApp::new();
    let user = app.new_user();
    let body = json!({ "text": WORKOUT_PLAN_TEXT });

    let (status, _) = app
        .post_as("/api/v1/plans/yoga", &body.to_string(), &user)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let app = TestApp::new();
    let user = app.new_user();
    let body = json!({ "text": "" });

    let (status, _) = app
        .post_as("/api/v1/plans/workout", &body.to_string(), &user)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_plan_reports_week_two() {
    let app = TestApp::on(date(2024, 1, 10));
    let user = app.new_user();
    app.import_plan(&user, "workout", WORKOUT_PLAN_TEXT, date(2024, 1, 1))
        .await;

    let (status, response) = app.get_as("/api/v1/plans/workout", &user).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let week = &response["current_week"];
    assert_eq!(week["week_number"], 2);
    assert_eq!(week["total_weeks"], 4);

    let days = week["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2024-01-08");
    assert_eq!(days[0]["day_number"], 8);
    assert_eq!(days[0]["status"], "missed");
    assert_eq!(days[2]["status"], "rest");
    assert_eq!(days[3]["status"], "upcoming");
}

#[tokio::test]
async fn test_get_missing_plan_is_not_found() {
    let app = TestApp::new();
    let user = app.new_user();

    let (status, _) = app.get_as("/api/v1/plans/diet", &user).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plans_are_isolated_per_user() {
    let app = TestApp::new();
    let alice = app.new_user();
    let bob = app.new_user();
    app.import_plan(&alice, "workout", WORKOUT_PLAN_TEXT, date(2024, 1, 1))
        .await;

    let (status, _) = app.get_as("/api/v1/plans/workout", &bob).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plan_stored_under_wrong_user_is_discarded() {
    let app = TestApp::new();
    let bob = app.new_user();

    // A payload under bob's key that was written for another account
    let plan = parse_workout_plan(WORKOUT_PLAN_TEXT, date(2024, 1, 1));
    let envelope = CachedEnvelope::new("someone-else", &plan, Utc::now());
    write_json(app.store.as_ref(), &format!("workout_plan_{}", bob), &envelope)
        .await
        .unwrap();

    let (status, _) = app.get_as("/api/v1/plans/workout", &bob).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_reset_plan() {
    let app = TestApp::new();
    let user = app.new_user();
    app.import_plan(&user, "workout", WORKOUT_PLAN_TEXT, date(2024, 1, 1))
        .await;
    app.complete(&user, "workout", "Squats", date(2024, 1, 8)).await;

    let (status, response) = app.delete_as("/api/v1/plans/workout", &user).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("\"cleared\":true"));

    let (status, _) = app.get_as("/api/v1/plans/workout", &user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Re-importing starts from an empty completion log
    app.import_plan(&user, "workout", WORKOUT_PLAN_TEXT, date(2024, 1, 1))
        .await;
    let (_, response) = app.get_as("/api/v1/plans/workout", &user).await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["current_week"]["days"][0]["completed_items"], 0);
}
