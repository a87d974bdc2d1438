//! User registration, token and `/me` endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_app, PASSWORD};
use serde_json::json;

const CREATE_USER_URL: &str = "/api/user/create/";
const TOKEN_URL: &str = "/api/user/token/";
const ME_URL: &str = "/api/user/me/";

#[tokio::test]
async fn create_user_success() {
    let app = create_test_app().await;
    let payload = json!({
        "email": "test@example.com",
        "password": "testpass123",
        "name": "Test Name",
    });

    let (status, body) = app.call(Method::POST, CREATE_USER_URL, None, Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(body["name"], "Test Name");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let id = body["id"].as_str().unwrap().parse().unwrap();
    let user = app.service.get_user(id).await.unwrap();
    assert!(user.check_password("testpass123"));
}

#[tokio::test]
async fn user_with_email_exists_error() {
    let app = create_test_app().await;
    app.user("test@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            CREATE_USER_URL,
            None,
            Some(json!({"email": "test@EXAMPLE.com", "password": "testpass123"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECIPES_EMAIL_CONFLICT");
}

#[tokio::test]
async fn password_too_short_error() {
    let app = create_test_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            CREATE_USER_URL,
            None,
            Some(json!({"email": "short@example.com", "password": "pw", "name": "Test"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["pointer"], "/password");

    let (status, _) = app
        .call(
            Method::POST,
            TOKEN_URL,
            None,
            Some(json!({"email": "short@example.com", "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "user was not created");
}

#[tokio::test]
async fn missing_email_is_rejected() {
    let app = create_test_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            CREATE_USER_URL,
            None,
            Some(json!({"password": "testpass123"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RECIPES_VALIDATION");
    assert_eq!(body["errors"][0]["pointer"], "/email");
}

#[tokio::test]
async fn create_token_for_user() {
    let app = create_test_app().await;
    app.user("token@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            TOKEN_URL,
            None,
            Some(json!({"email": "token@example.com", "password": PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.len(), 40);

    let (status, me) = app.call(Method::GET, ME_URL, Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "token@example.com");
}

#[tokio::test]
async fn token_rejects_bad_credentials() {
    let app = create_test_app().await;
    app.user("creds@example.com").await;

    for payload in [
        json!({"email": "creds@example.com", "password": "badpass"}),
        json!({"email": "nobody@example.com", "password": PASSWORD}),
        json!({"email": "creds@example.com", "password": ""}),
    ] {
        let (status, body) = app.call(Method::POST, TOKEN_URL, None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "RECIPES_INVALID_CREDENTIALS");
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn retrieve_user_unauthorized() {
    let app = create_test_app().await;
    let (status, body) = app.call(Method::GET, ME_URL, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "RECIPES_UNAUTHORIZED");
}

#[tokio::test]
async fn retrieve_profile_success() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("me@example.com").await;

    let (status, body) = app.call(Method::GET, ME_URL, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": user.id, "email": "me@example.com", "name": "Test user"}));
}

#[tokio::test]
async fn post_me_not_allowed() {
    let app = create_test_app().await;
    let (_, token) = app.user_with_token("post@example.com").await;

    let (status, _) = app
        .call(Method::POST, ME_URL, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn update_user_profile() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("update@example.com").await;

    let (status, body) = app
        .call(
            Method::PATCH,
            ME_URL,
            Some(&token),
            Some(json!({"name": "Updated name", "password": "newpassword123"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Updated name");

    let reloaded = app.service.get_user(user.id).await.unwrap();
    assert!(reloaded.check_password("newpassword123"));
    assert!(!reloaded.check_password(PASSWORD));

    // the issued token keeps working after a password change
    let (status, _) = app.call(Method::GET, ME_URL, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}
