//! Integration tests for the activities API.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mergington_activities::{
    api::{
        create_router, create_router_with_rate_limit, AppState, RateLimitState,
        DEFAULT_ROSTER_CHANGES_PER_MINUTE,
    },
    Registry,
};
use serde_json::Value;
use tower::ServiceExt;

/// Create a test app with a freshly seeded registry.
fn create_test_app() -> Router {
    create_app(Registry::with_default_catalog(), RateLimitState::permissive())
}

fn create_app(registry: Registry, rate_limit: RateLimitState) -> Router {
    let state = AppState::new(registry);
    create_router_with_rate_limit(state, "static", rate_limit)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

async fn participants(app: &Router, activity: &str) -> Vec<String> {
    let (status, json) = send(app, Method::GET, "/activities").await;
    assert_eq!(status, StatusCode::OK);

    json[activity]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_activities() {
    let app = create_test_app();

    let (status, json) = send(&app, Method::GET, "/activities").await;

    assert_eq!(status, StatusCode::OK);
    let activities = json.as_object().unwrap();
    for name in [
        "Basketball Team",
        "Soccer Club",
        "Drama Club",
        "Chess Club",
        "Programming Class",
    ] {
        assert!(activities.contains_key(name), "missing {}", name);
    }
    for activity in activities.values() {
        assert!(activity.get("description").is_some());
        assert!(activity.get("schedule").is_some());
        assert!(activity.get("max_participants").is_some());
        assert!(activity.get("participants").is_some());
    }
}

#[tokio::test]
async fn test_signup() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/activities/Basketball%20Team/signup?email=new@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("new@mergington.edu"));
    assert!(message.contains("Basketball Team"));

    assert!(participants(&app, "Basketball Team")
        .await
        .contains(&"new@mergington.edu".to_string()));
}

#[tokio::test]
async fn test_signup_nonexistent_activity() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/activities/NonExistentActivity/signup?email=test@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Activity not found");
}

#[tokio::test]
async fn test_signup_duplicate() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/activities/Chess%20Club/signup?email=michael@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Student is already signed up");
}

#[tokio::test]
async fn test_signup_missing_email() {
    let app = create_test_app();

    let (status, json) = send(&app, Method::POST, "/activities/Chess%20Club/signup").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_unregister_missing_email() {
    let app = create_test_app();

    let (status, json) = send(&app, Method::DELETE, "/activities/Chess%20Club/unregister").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());
    assert!(participants(&app, "Chess Club")
        .await
        .contains(&"michael@mergington.edu".to_string()));
}

#[tokio::test]
async fn test_unregister() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::DELETE,
        "/activities/Chess%20Club/unregister?email=michael@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("michael@mergington.edu"));
    assert!(message.contains("Chess Club"));

    assert!(!participants(&app, "Chess Club")
        .await
        .contains(&"michael@mergington.edu".to_string()));
}

#[tokio::test]
async fn test_unregister_nonexistent_activity() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::DELETE,
        "/activities/NonExistentActivity/unregister?email=test@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Activity not found");
}

#[tokio::test]
async fn test_unregister_not_signed_up() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::DELETE,
        "/activities/Basketball%20Team/unregister?email=nothere@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Student is not signed up for this activity");
}

#[tokio::test]
async fn test_signup_then_unregister_restores_roster() {
    let app = create_test_app();
    let before = participants(&app, "Drama Club").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/activities/Drama%20Club/signup?email=temp@mergington.edu",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/activities/Drama%20Club/unregister?email=temp@mergington.edu",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(participants(&app, "Drama Club").await, before);
}

fn robotics(max_participants: u32) -> mergington_activities::SeedActivity {
    mergington_activities::SeedActivity {
        name: "Robotics".into(),
        description: "Build robots".into(),
        schedule: "Saturdays, 10:00 AM - 12:00 PM".into(),
        max_participants,
        participants: vec!["ada@mergington.edu".into()],
    }
}

#[tokio::test]
async fn test_signup_past_capacity_allowed_by_default() {
    let app = create_app(Registry::new(vec![robotics(1)]), RateLimitState::permissive());

    let (status, json) = send(
        &app,
        Method::POST,
        "/activities/Robotics/signup?email=grace@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("grace@mergington.edu"));
    assert_eq!(participants(&app, "Robotics").await.len(), 2);
}

#[tokio::test]
async fn test_capacity_enforcement() {
    let registry = Registry::new(vec![robotics(1)]).enforce_capacity(true);
    let app = create_app(registry, RateLimitState::permissive());

    let (status, json) = send(
        &app,
        Method::POST,
        "/activities/Robotics/signup?email=grace@mergington.edu",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Activity is full");
}

#[tokio::test]
async fn test_root_redirects_to_static() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.contains("/static/index.html"));
}

#[tokio::test]
async fn test_static_files_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Mergington</h1>").unwrap();
    let app = create_router(AppState::new(Registry::with_default_catalog()), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/static/index.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<h1>Mergington</h1>");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(
        json["activity_count"],
        Registry::with_default_catalog().count()
    );
    assert!(json["started_at"].is_string());
}

#[tokio::test]
async fn test_roster_changes_are_rate_limited() {
    let app = create_app(Registry::with_default_catalog(), RateLimitState::new(1));

    let (status, _) = send(
        &app,
        Method::POST,
        "/activities/Chess%20Club/signup?email=first@mergington.edu",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        Method::DELETE,
        "/activities/Chess%20Club/unregister?email=first@mergington.edu",
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["detail"], "Rate limit exceeded");

    // Listing and health never draw from the quota
    let (status, _) = send(&app, Method::GET, "/activities").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_listing_survives_heavy_traffic() {
    let app = create_router(AppState::new(Registry::with_default_catalog()), "static");

    for i in 0..(DEFAULT_ROSTER_CHANGES_PER_MINUTE + 100) {
        let (status, _) = send(&app, Method::GET, "/activities").await;
        assert_eq!(status, StatusCode::OK, "listing {} was rejected", i);
    }
}

#[tokio::test]
async fn test_listing_available_after_quota_spent() {
    let app = create_app(Registry::with_default_catalog(), RateLimitState::new(2));

    for email in ["a@mergington.edu", "b@mergington.edu", "c@mergington.edu"] {
        send(
            &app,
            Method::POST,
            &format!("/activities/Art%20Club/signup?email={}", email),
        )
        .await;
    }

    let (status, json) = send(&app, Method::GET, "/activities").await;
    assert_eq!(status, StatusCode::OK);
    let art = participants(&app, "Art Club").await;
    assert!(art.contains(&"b@mergington.edu".to_string()));
    assert!(!art.contains(&"c@mergington.edu".to_string()));
    assert!(json.get("Art Club").is_some());
}

#[tokio::test]
async fn test_zero_quota_disables_rate_limit() {
    let app = create_app(Registry::with_default_catalog(), RateLimitState::new(0));

    for i in 0..50 {
        let uri = format!("/activities/Gym%20Class/signup?email=student{}@mergington.edu", i);
        let (status, _) = send(&app, Method::POST, &uri).await;
        assert_eq!(status, StatusCode::OK);
    }
}
