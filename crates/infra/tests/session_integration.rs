//! Session lifecycle against a mock backend

mod support;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use mentiq_common::TokenPair;
use mentiq_domain::constants::CURRENT_USER_KEY;
use mentiq_domain::{Role, User};
use mentiq_infra::api::resources::{AuthApi, MediaApi};
use mentiq_infra::{Session, SessionError};
use serde_json::json;
use support::Harness;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn session(harness: &Harness) -> Session {
    Session::new(
        AuthApi::new(harness.client.clone()),
        MediaApi::new(harness.client.clone()),
        harness.tokens.clone(),
        harness.store.clone(),
    )
}

fn login_response(role: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "tokens": { "access": "a1", "refresh": "r1" },
        "user": { "id": 7, "email": "t@x.io", "name": "Tess", "role": role }
    }))
}

fn cache_user(harness: &Harness, role: Role) -> User {
    let user = User::from_login(
        &json!({ "user": { "id": 7, "email": "t@x.io", "name": "Tess" } }),
        "t@x.io",
        role,
    );
    harness.store.insert(CURRENT_USER_KEY, &serde_json::to_string(&user).unwrap());
    user
}

#[tokio::test]
async fn login_stores_tokens_and_caches_user() {
    let harness = Harness::new().await;
    let session = session(&harness);

    Mock::given(method("POST"))
        .and(path("/v1/auth/login/"))
        .and(body_json(json!({ "email": "t@x.io", "password": "pw" })))
        .respond_with(login_response("teacher"))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = session.login("t@x.io", "pw", Role::Teacher).await.unwrap();

    assert_eq!(user.id, "7");
    assert_eq!(user.name, "Tess");
    assert!(session.is_logged_in());
    assert_eq!(harness.stored_tokens(), Some(TokenPair::new("a1", "r1")));

    let cached: User =
        serde_json::from_str(&harness.store.value(CURRENT_USER_KEY).unwrap()).unwrap();
    assert_eq!(cached, user);

    let requests = harness.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn login_with_wrong_role_is_rejected_and_tokens_cleared() {
    let harness = Harness::new().await;
    let session = session(&harness);

    Mock::given(method("POST"))
        .and(path("/v1/auth/login/"))
        .respond_with(login_response("teacher"))
        .mount(&harness.server)
        .await;

    let err = session.login("t@x.io", "pw", Role::Student).await.unwrap_err();

    assert!(matches!(&err, SessionError::RoleMismatch { role } if role == "teacher"));
    assert!(!session.is_logged_in());
    assert!(harness.stored_tokens().is_none());
    assert!(harness.store.value(CURRENT_USER_KEY).is_none());
}

#[tokio::test]
async fn failed_login_surfaces_backend_message() {
    let harness = Harness::new().await;
    let session = session(&harness);

    Mock::given(method("POST"))
        .and(path("/v1/auth/login/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "No active account found" })),
        )
        .mount(&harness.server)
        .await;

    let err = session.login("t@x.io", "bad", Role::Teacher).await.unwrap_err();

    assert_eq!(err.to_string(), "No active account found");
    assert_eq!(harness.auth_failure_count(), 0);
}

#[tokio::test]
async fn signup_registers_without_signing_in() {
    let harness = Harness::new().await;
    let session = session(&harness);

    Mock::given(method("POST"))
        .and(path("/v1/auth/register/"))
        .and(body_json(json!({
            "email": "s@x.io",
            "password": "pw",
            "password_confirm": "pw",
            "name": "Sam",
            "role": "student"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 12 })))
        .expect(1)
        .mount(&harness.server)
        .await;

    session.signup("s@x.io", "pw", "Sam", Role::Student).await.unwrap();

    assert!(!session.is_logged_in());
    assert!(harness.stored_tokens().is_none());
}

#[tokio::test]
async fn logout_clears_local_state_even_when_server_fails() {
    let harness = Harness::with_tokens("a1", "r1").await;
    cache_user(&harness, Role::Teacher);
    let session = session(&harness);

    Mock::given(method("POST"))
        .and(path("/v1/auth/logout/"))
        .and(body_json(json!({ "refresh": "r1" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&harness.server)
        .await;

    session.logout().await;

    assert!(!session.is_logged_in());
    assert!(harness.stored_tokens().is_none());
    assert!(harness.store.value(CURRENT_USER_KEY).is_none());
}

#[tokio::test]
async fn restore_refreshes_cached_user_from_profile() {
    let harness = Harness::with_tokens("a1", "r1").await;
    cache_user(&harness, Role::Teacher);
    let session = session(&harness);

    Mock::given(method("GET"))
        .and(path("/v1/auth/profile/"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "email": "t@x.io", "name": "Tess Q", "role": "teacher", "bio": "Maths"
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = session.restore().await.expect("session should be restored");

    assert_eq!(user.name, "Tess Q");
    assert_eq!(user.bio, "Maths");
    assert_eq!(session.current_user(), Some(user));
}

#[tokio::test]
async fn restore_with_dead_session_clears_everything() {
    let harness = Harness::with_tokens("a1", "r1").await;
    cache_user(&harness, Role::Student);
    let session = session(&harness);

    Mock::given(method("GET"))
        .and(path("/v1/auth/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;

    assert!(session.restore().await.is_none());

    assert!(!session.is_logged_in());
    assert!(harness.stored_tokens().is_none());
    assert!(harness.store.value(CURRENT_USER_KEY).is_none());
    assert_eq!(harness.auth_failure_count(), 1);
}

#[tokio::test]
async fn restore_without_cache_is_signed_out() {
    let harness = Harness::with_tokens("a1", "r1").await;
    let session = session(&harness);

    assert!(session.restore().await.is_none());
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_profile_uploads_image_first() {
    let harness = Harness::with_tokens("a1", "r1").await;
    cache_user(&harness, Role::Student);
    let session = session(&harness);

    Mock::given(method("GET"))
        .and(path("/v1/auth/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "name": "Tess" })))
        .mount(&harness.server)
        .await;
    session.restore().await.expect("cached user should be restored");

    Mock::given(method("POST"))
        .and(path("/v1/media/upload/"))
        .and(body_string_contains("profile"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "url": "https://cdn/me.jpg" })),
        )
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/auth/profile/"))
        .and(body_json(json!({
            "name": "Tess",
            "bio": "Hello",
            "profile_image": "https://cdn/me.jpg"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bio": "Hello" })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let mut image = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    image.write_all(b"jpeg bytes").unwrap();

    let updated = session.update_profile("Tess", "Hello", Some(image.path())).await.unwrap();

    assert_eq!(updated.profile_image, "https://cdn/me.jpg");
    assert_eq!(updated.bio, "Hello");
    let cached: User =
        serde_json::from_str(&harness.store.value(CURRENT_USER_KEY).unwrap()).unwrap();
    assert_eq!(cached, updated);
}

#[tokio::test]
async fn update_profile_requires_a_user() {
    let harness = Harness::with_tokens("a1", "r1").await;
    let session = session(&harness);

    let err = session.update_profile("X", "", None).await.unwrap_err();
    assert!(matches!(err, SessionError::NotSignedIn));
}

#[tokio::test]
async fn reset_drops_user_and_cache() {
    let harness = Harness::with_tokens("a1", "r1").await;
    cache_user(&harness, Role::Teacher);
    let session = Arc::new(session(&harness));

    Mock::given(method("GET"))
        .and(path("/v1/auth/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .mount(&harness.server)
        .await;
    session.restore().await.unwrap();

    session.reset();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!session.is_logged_in());
    assert!(harness.store.value(CURRENT_USER_KEY).is_none());
}
