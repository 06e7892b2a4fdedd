//! User registration, CRUD and greeting endpoints, including auth gating.

use actix_middleware::JwtAuthMiddleware;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App, Error};
use sqlx::sqlite::SqlitePoolOptions;
use token_core::{TokenSigner, TokenVerifier};

use identity_service::handlers::{tokens, users};
use identity_service::AppState;

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

async fn build_state() -> AppState {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    AppState {
        db: pool,
        signer: TokenSigner::new(TEST_SECRET, 3600, 86400),
        verifier: TokenVerifier::new(TEST_SECRET),
    }
}

fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    let verifier = state.verifier.clone();

    App::new()
        .app_data(web::Data::new(state))
        .route("/token/", web::post().to(tokens::issue_token_pair))
        .service(
            web::resource("/users/")
                .route(web::post().to(users::register_user))
                .route(
                    web::get()
                        .to(users::list_users)
                        .wrap(JwtAuthMiddleware::new(verifier.clone())),
                ),
        )
        .service(
            web::scope("")
                .wrap(JwtAuthMiddleware::new(verifier))
                .route("/hello/", web::get().to(users::hello_user))
                .service(
                    web::resource("/users/{user_id}/")
                        .route(web::get().to(users::get_user))
                        .route(web::put().to(users::update_user))
                        .route(web::delete().to(users::delete_user)),
                ),
        )
}

fn register_payload(username: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "SecurePass123!",
    })
}

/// Registers a user and returns (user_id, access_token).
async fn register_and_login<S>(app: &S, username: &str) -> (i64, String)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let resp = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload(username))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let user_id = created["id"].as_i64().expect("user id");

    let resp = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": username,
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let pair: serde_json::Value = test::read_body_json(resp).await;

    (user_id, pair["access_token"].as_str().unwrap().to_string())
}

#[actix_web::test]
async fn register_creates_user_and_hides_password_hash() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("alice"))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].as_i64().is_some());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn register_invalid_email_returns_400() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(serde_json::json!({
                "username": "valid_user",
                "email": "invalid",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_short_password_returns_400() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(serde_json::json!({
                "username": "valid_user",
                "email": "user@example.com",
                "password": "Sh0rt!",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_weak_password_returns_400() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(serde_json::json!({
                "username": "valid_user",
                "email": "user@example.com",
                "password": "weakpassword",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_duplicate_username_returns_409() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("bob"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("bob"))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
}

#[actix_web::test]
async fn registration_is_open_while_listing_is_gated() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("carol"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/users/").to_request()).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_users_returns_registered_users() {
    let app = test::init_service(build_app(build_state().await)).await;
    let (user_id, token) = register_and_login(&app, "dave").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let listed = body.as_array().expect("user list");
    assert!(listed.iter().any(|u| u["id"].as_i64() == Some(user_id)));
}

#[actix_web::test]
async fn get_update_delete_user_lifecycle() {
    let app = test::init_service(build_app(build_state().await)).await;
    let (user_id, token) = register_and_login(&app, "erin").await;
    let auth = ("Authorization", format!("Bearer {}", token));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "erin");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(auth.clone())
            .set_json(serde_json::json!({ "email": "erin@new.example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "erin@new.example.com");
    assert_eq!(body["username"], "erin");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User deleted successfully!");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(auth)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_password_is_rehashed_and_usable() {
    let app = test::init_service(build_app(build_state().await)).await;
    let (user_id, token) = register_and_login(&app, "frank").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({ "password": "NewSecret456!" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "frank",
                "password": "NewSecret456!",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "frank",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn update_to_taken_username_returns_409() {
    let app = test::init_service(build_app(build_state().await)).await;
    let _ = register_and_login(&app, "grace").await;
    let (user_id, token) = register_and_login(&app, "heidi").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({ "username": "grace" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
}

#[actix_web::test]
async fn hello_greets_by_stored_username() {
    let app = test::init_service(build_app(build_state().await)).await;
    let (_, token) = register_and_login(&app, "ivan").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/hello/")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Hello, ivan!");
}

#[actix_web::test]
async fn hello_without_token_returns_401() {
    let app = test::init_service(build_app(build_state().await)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/hello/").to_request()).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn hello_with_claimless_token_returns_400() {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let app = test::init_service(build_app(build_state().await)).await;

    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": "ghost",
        "iat": now,
        "exp": now + 600,
        "token_type": "access",
        "jti": "test-jti",
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/hello/")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid token: Missing user_id");
}

#[actix_web::test]
async fn tampered_token_returns_401() {
    let app = test::init_service(build_app(build_state().await)).await;
    let (user_id, token) = register_and_login(&app, "judy").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{}/", user_id))
            .insert_header(("Authorization", format!("Bearer {}x", token)))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
