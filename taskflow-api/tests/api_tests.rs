/// End-to-end tests for the HTTP surface
///
/// Every test drives the real router against an in-memory store.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_root_and_health() {
    let ctx = TestContext::new();

    let response = ctx.send("GET", "/", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "API is running...");

    let response = ctx.send("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["backend"], "memory");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let ctx = TestContext::new();

    let response = ctx.send("GET", "/api/nothing-here", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_register_sets_cookie_and_hides_password() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "alice",
                "email": "Alice@Example.com",
                "password": "secret1",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert!(response.body["token"].is_string());
    assert_eq!(response.body["user"]["email"], "alice@example.com");
    assert!(response.body["user"].get("password").is_none());
    assert!(response.body["user"].get("passwordHash").is_none());

    let cookie = response
        .set_cookie
        .iter()
        .find(|c| c.starts_with("token="))
        .expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_short_passwords() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": "alice", "email": "other@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": "carol", "email": "carol@example.com", "password": "12345" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_cookie_session() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let response = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid credentials");

    let response = ctx
        .send("POST", "/api/auth/login", None, Some(json!({ "email": "alice@example.com" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["token"].as_str().expect("token").to_string();

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = ctx.dispatch(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_logout_overwrites_cookie() {
    let ctx = TestContext::new();

    let response = ctx.send("GET", "/api/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true, "data": {} }));
    assert!(response
        .set_cookie
        .iter()
        .any(|c| c.starts_with("token=none") && c.contains("Max-Age=10")));
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let project_id = ctx.create_project(&alice, "Launch").await;

    let routes = [
        ("GET", "/api/auth/me".to_string()),
        ("GET", "/api/projects".to_string()),
        ("POST", "/api/projects".to_string()),
        ("GET", format!("/api/projects/{}", project_id)),
        ("DELETE", format!("/api/projects/{}", project_id)),
        ("GET", format!("/api/projects/{}/stats", project_id)),
        ("GET", format!("/api/projects/{}/tasks", project_id)),
        ("DELETE", format!("/api/comments/{}", project_id)),
    ];

    for (method, uri) in routes {
        let response = ctx.send(method, &uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response.body["success"], false);
        assert!(response.body.get("data").is_none());
    }

    let response = ctx
        .send("GET", "/api/projects", Some("not-a-jwt"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Not authorized to access this route");

    // The project survived the unauthenticated delete
    let response = ctx
        .send("GET", &format!("/api/projects/{}", project_id), Some(&alice.token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_project_membership_flow() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let bob = ctx.register("bob").await;
    let project_id = ctx.create_project(&alice, "Launch").await;
    let project_uri = format!("/api/projects/{}", project_id);

    let response = ctx.send("GET", "/api/projects", Some(&alice.token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["data"][0]["owner"]["username"], "alice");

    let response = ctx.send("GET", &project_uri, Some(&bob.token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let add_member = format!("{}/add-member", project_uri);
    let response = ctx
        .send("PUT", &add_member, Some(&bob.token), Some(json!({ "email": bob.email })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send("PUT", &add_member, Some(&alice.token), Some(json!({ "email": bob.email })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["members"][0]["id"], bob.id.as_str());

    let response = ctx
        .send("PUT", &add_member, Some(&alice.token), Some(json!({ "email": bob.email })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "User already part of project");

    let response = ctx
        .send(
            "PUT",
            &add_member,
            Some(&alice.token),
            Some(json!({ "email": "nobody@example.com" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "User not found");

    let response = ctx.send("GET", &project_uri, Some(&bob.token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["owner"]["username"], "alice");

    let response = ctx
        .send("PUT", &project_uri, Some(&bob.token), Some(json!({ "title": "Hijacked" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send("PUT", &project_uri, Some(&alice.token), Some(json!({ "title": "Relaunch" })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "Relaunch");
    assert_eq!(response.body["data"]["description"], "Test project");

    let response = ctx.send("DELETE", &project_uri, Some(&alice.token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!({}));

    let response = ctx.send("GET", &project_uri, Some(&alice.token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Project not found");
}

#[tokio::test]
async fn test_project_title_limit() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;

    let response = ctx
        .send(
            "POST",
            "/api/projects",
            Some(&alice.token),
            Some(json!({ "title": "x".repeat(51), "description": "too long" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_malformed_ids_and_bodies() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;

    let response = ctx
        .send("GET", "/api/projects/not-an-id", Some(&alice.token), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Project not found");

    let response = ctx
        .send("DELETE", "/api/tasks/12345", Some(&alice.token), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Task not found");

    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = ctx.dispatch(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_task_and_comment_flow() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let bob = ctx.register("bob").await;
    let project_id = ctx.create_project(&alice, "Launch").await;

    ctx.send(
        "PUT",
        &format!("/api/projects/{}/add-member", project_id),
        Some(&alice.token),
        Some(json!({ "email": bob.email })),
    )
    .await;

    let tasks_uri = format!("/api/projects/{}/tasks", project_id);
    let response = ctx
        .send(
            "POST",
            &tasks_uri,
            Some(&bob.token),
            Some(json!({ "title": "Write docs", "assignedTo": alice.id })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["status"], "To Do");
    assert_eq!(response.body["data"]["priority"], "Medium");
    assert_eq!(response.body["data"]["assignedTo"]["username"], "alice");
    let task_id = response.body["data"]["id"].as_str().unwrap().to_string();
    let task_uri = format!("/api/tasks/{}", task_id);

    for status in ["In Progress", "Done"] {
        let response = ctx
            .send("PUT", &task_uri, Some(&bob.token), Some(json!({ "status": status })))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["status"], status);
    }

    let response = ctx
        .send("PUT", &task_uri, Some(&bob.token), Some(json!({ "status": "Cancelled" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .send("PUT", &task_uri, Some(&alice.token), Some(json!({ "assignedTo": null })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["assignedTo"].is_null());
    assert_eq!(response.body["data"]["status"], "Done");

    let response = ctx.send("GET", &tasks_uri, Some(&alice.token), None).await;
    assert_eq!(response.body["count"], 1);

    let comments_uri = format!("/api/tasks/{}/comments", task_id);
    let response = ctx
        .send("POST", &comments_uri, Some(&bob.token), Some(json!({ "text": "Looks good" })))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["user"]["username"], "bob");
    let comment_uri = format!("/api/comments/{}", response.body["data"]["id"].as_str().unwrap());

    let response = ctx
        .send("POST", &comments_uri, Some(&bob.token), Some(json!({ "text": "   " })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.send("DELETE", &comment_uri, Some(&alice.token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.send("DELETE", &comment_uri, Some(&bob.token), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.send("GET", &comments_uri, Some(&alice.token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 0);

    let response = ctx.send("DELETE", &task_uri, Some(&bob.token), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.send("GET", &comments_uri, Some(&alice.token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_outsider_cannot_touch_tasks() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let mallory = ctx.register("mallory").await;
    let project_id = ctx.create_project(&alice, "Launch").await;
    let tasks_uri = format!("/api/projects/{}/tasks", project_id);

    let response = ctx
        .send("POST", &tasks_uri, Some(&alice.token), Some(json!({ "title": "Plan" })))
        .await;
    let task_uri = format!("/api/tasks/{}", response.body["data"]["id"].as_str().unwrap());

    let response = ctx.send("GET", &tasks_uri, Some(&mallory.token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send("POST", &tasks_uri, Some(&mallory.token), Some(json!({ "title": "Spam" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send("PUT", &task_uri, Some(&mallory.token), Some(json!({ "status": "Done" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send("GET", &format!("{}/comments", task_uri), Some(&mallory.token), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_project_stats() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let project_id = ctx.create_project(&alice, "Launch").await;
    let tasks_uri = format!("/api/projects/{}/tasks", project_id);

    let tasks = [
        json!({ "title": "One", "status": "Done" }),
        json!({ "title": "Two", "status": "In Progress" }),
        json!({ "title": "Three", "dueDate": "2000-01-01T00:00:00Z" }),
        json!({ "title": "Four", "status": "Done" }),
    ];
    for task in tasks {
        let response = ctx.send("POST", &tasks_uri, Some(&alice.token), Some(task)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    }

    let response = ctx
        .send("GET", &format!("/api/projects/{}/stats", project_id), Some(&alice.token), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"],
        json!({
            "total": 4,
            "toDo": 1,
            "inProgress": 1,
            "done": 2,
            "overdue": 1,
            "completionRate": 50,
        })
    );
}
