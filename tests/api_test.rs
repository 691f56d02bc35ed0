//! Integration tests for API endpoints.
//!
//! Requests go through the full router (auth middleware, role guard,
//! handlers) backed by an in-memory SQLite database.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use common::{ids, json_body, seed, TestApp};
use user_directory::domain::{Role, User};
use user_directory::infra::UserRepository;

struct Fixture {
    app: TestApp,
    admin: User,
    editor: User,
    viewer: User,
}

async fn fixture() -> Fixture {
    let app = TestApp::new().await;
    let admin = seed(&app.store, "Root", "root@example.com", Role::Admin, 0).await;
    let editor = seed(&app.store, "Anne Smith", "anne@example.com", Role::Editor, 1).await;
    let viewer = seed(&app.store, "Bob", "bob@example.com", Role::Viewer, 2).await;
    Fixture {
        app,
        admin,
        editor,
        viewer,
    }
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new().await;

    let response = app
        .send(Request::get("/").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["database"]["status"], "healthy");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let f = fixture().await;

    let response = f
        .app
        .send(Request::get("/users").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let f = fixture().await;

    let response = f
        .app
        .send(
            Request::get("/users")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_unauthorized() {
    let f = fixture().await;

    let response = f.app.call("GET", "/users", 999, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_admin_lists_everyone_newest_first() {
    let f = fixture().await;

    let response = f.app.call("GET", "/users", f.admin.id, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(
        ids(&body),
        vec![f.viewer.id as i64, f.editor.id as i64, f.admin.id as i64]
    );
    assert_eq!(body["users"][0]["role"], "viewer");
    assert!(body["users"][0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_non_admins_list_only_themselves() {
    let f = fixture().await;

    for user in [&f.editor, &f.viewer] {
        let response = f.app.call("GET", "/users", user.id, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(ids(&body), vec![user.id as i64]);
    }
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn test_get_own_record() {
    let f = fixture().await;

    let response = f
        .app
        .call("GET", &format!("/users/{}", f.viewer.id), f.viewer.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "bob@example.com");
}

#[tokio::test]
async fn test_get_other_record_as_non_admin_is_forbidden() {
    let f = fixture().await;

    let response = f
        .app
        .call("GET", &format!("/users/{}", f.admin.id), f.editor.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Not authorized to view this user");
}

#[tokio::test]
async fn test_admin_gets_any_record() {
    let f = fixture().await;

    let response = f
        .app
        .call("GET", &format!("/users/{}", f.viewer.id), f.admin.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_missing_user() {
    let f = fixture().await;

    let response = f.app.call("GET", "/users/4242", f.admin.id, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let f = fixture().await;

    let response = f.app.call("GET", "/users/abc", f.admin.id, None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_admin_updates_user() {
    let f = fixture().await;

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.viewer.id),
            f.admin.id,
            Some(json!({ "name": "Robert", "role": "editor" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["user"]["name"], "Robert");
    assert_eq!(body["user"]["role"], "editor");
}

#[tokio::test]
async fn test_update_with_invalid_role_changes_nothing() {
    let f = fixture().await;

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.viewer.id),
            f.admin.id,
            Some(json!({ "name": "Robert", "role": "superuser" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid role");

    let stored = f.app.store.find_by_id(f.viewer.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Bob");
    assert_eq!(stored.role, Role::Viewer);
}

#[tokio::test]
async fn test_whitespace_only_name_is_ignored_whatever_its_length() {
    let f = fixture().await;

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.viewer.id),
            f.admin.id,
            Some(json!({ "name": " ".repeat(120) })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["name"], "Bob");
}

#[tokio::test]
async fn test_name_length_is_checked_after_trimming() {
    let f = fixture().await;
    let name = "a".repeat(98);

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.viewer.id),
            f.admin.id,
            Some(json!({ "name": format!("   {}   ", name) })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let stored = f.app.store.find_by_id(f.viewer.id).await.unwrap().unwrap();
    assert_eq!(stored.name, name);

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.viewer.id),
            f.admin.id,
            Some(json!({ "name": "a".repeat(101) })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Name must be at most 100 characters");
}

#[tokio::test]
async fn test_missing_user_wins_over_invalid_fields() {
    let f = fixture().await;

    let response = f
        .app
        .call(
            "PUT",
            "/users/4242",
            f.admin.id,
            Some(json!({ "name": "a".repeat(101), "role": "owner" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_null_role_is_invalid() {
    let f = fixture().await;

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.viewer.id),
            f.admin.id,
            Some(json!({ "name": "Robert", "role": null })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid role");

    let stored = f.app.store.find_by_id(f.viewer.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Bob");
}

#[tokio::test]
async fn test_malformed_update_body() {
    let f = fixture().await;

    let response = f
        .app
        .send(
            Request::put(format!("/users/{}", f.viewer.id))
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", common::token_for(f.admin.id)),
                )
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("[1, 2"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["message"],
        "Request body must be a JSON object with optional name and role fields"
    );
}

#[tokio::test]
async fn test_update_as_non_admin_is_forbidden() {
    let f = fixture().await;

    let response = f
        .app
        .call(
            "PUT",
            &format!("/users/{}", f.editor.id),
            f.editor.id,
            Some(json!({ "role": "admin" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Admin access required");

    let stored = f.app.store.find_by_id(f.editor.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Editor);
}

#[tokio::test]
async fn test_update_missing_user() {
    let f = fixture().await;

    let response = f
        .app
        .call("PUT", "/users/4242", f.admin.id, Some(json!({ "name": "Ghost" })))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_admin_deletes_user() {
    let f = fixture().await;
    let uri = format!("/users/{}", f.viewer.id);

    let response = f.app.call("DELETE", &uri, f.admin.id, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User Bob (bob@example.com) deleted successfully");

    let response = f.app.call("GET", &uri, f.admin.id, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let f = fixture().await;

    let response = f
        .app
        .call("DELETE", &format!("/users/{}", f.admin.id), f.admin.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Cannot delete your own account");
}

#[tokio::test]
async fn test_delete_as_non_admin_is_forbidden() {
    let f = fixture().await;

    let response = f
        .app
        .call("DELETE", &format!("/users/{}", f.viewer.id), f.editor.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(f.app.store.find_by_id(f.viewer.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_missing_user() {
    let f = fixture().await;

    let response = f.app.call("DELETE", "/users/4242", f.admin.id, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_admin_search() {
    let f = fixture().await;

    let response = f
        .app
        .call("GET", "/users/search?q=ANN", f.admin.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(ids(&body), vec![f.editor.id as i64]);
}

#[tokio::test]
async fn test_blank_search_returns_nothing() {
    let f = fixture().await;

    for uri in ["/users/search?q=", "/users/search?q=%20%20", "/users/search"] {
        let response = f.app.call("GET", uri, f.admin.id, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["count"], 0);
        assert!(body["users"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_search_as_non_admin_is_forbidden() {
    let f = fixture().await;

    let response = f
        .app
        .call("GET", "/users/search?q=bob", f.viewer.id, None)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
