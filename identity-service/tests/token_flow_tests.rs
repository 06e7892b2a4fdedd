//! End-to-end token issuance, refresh and verification flows.

use actix_middleware::JwtAuthMiddleware;
use actix_web::{test, web, App};
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

async fn setup_test_app(
    state: AppState,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let verifier = state.verifier.clone();

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .route("/token/", web::post().to(tokens::issue_token_pair))
            .route("/token/refresh/", web::post().to(tokens::refresh_token))
            .route("/token/verify/", web::post().to(tokens::verify_token))
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
            ),
    )
    .await
}

fn register_payload(username: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "SecurePass123!",
    })
}

#[actix_web::test]
async fn login_returns_token_pair_with_identity_claims() {
    let state = build_state().await;
    let verifier = state.verifier.clone();
    let app = setup_test_app(state).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("alice"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let user_id = created["id"].as_i64().expect("user id");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "alice",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    let access = verifier
        .verify(body["access_token"].as_str().unwrap())
        .expect("access token verifies");
    assert_eq!(access.sub, "alice");
    assert_eq!(access.user_id, Some(user_id));
    assert_eq!(access.token_type, "access");

    let refresh = verifier
        .verify(body["refresh_token"].as_str().unwrap())
        .expect("refresh token verifies");
    assert_eq!(refresh.token_type, "refresh");
    assert_eq!(refresh.user_id, Some(user_id));
}

#[actix_web::test]
async fn login_with_wrong_password_returns_401() {
    let app = setup_test_app(build_state().await).await;

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
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "bob",
                "password": "WrongPass123!",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn login_with_unknown_user_returns_401() {
    let app = setup_test_app(build_state().await).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "nobody",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_returns_fresh_access_token() {
    let state = build_state().await;
    let verifier = state.verifier.clone();
    let app = setup_test_app(state).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("carol"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "carol",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;
    let pair: serde_json::Value = test::read_body_json(resp).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/refresh/")
            .set_json(serde_json::json!({
                "refresh_token": pair["refresh_token"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let claims = verifier
        .verify(body["access_token"].as_str().unwrap())
        .expect("new access token verifies");

    assert_eq!(claims.token_type, "access");
    assert_eq!(claims.sub, "carol");
    assert!(claims.user_id.is_some());
}

#[actix_web::test]
async fn refresh_with_access_token_returns_401() {
    let app = setup_test_app(build_state().await).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("dave"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "dave",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;
    let pair: serde_json::Value = test::read_body_json(resp).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/refresh/")
            .set_json(serde_json::json!({
                "refresh_token": pair["access_token"],
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_with_garbage_returns_401() {
    let app = setup_test_app(build_state().await).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/refresh/")
            .set_json(serde_json::json!({
                "refresh_token": "not.a.token",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_without_identity_claim_returns_400() {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let app = setup_test_app(build_state().await).await;

    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": "ghost",
        "iat": now,
        "exp": now + 600,
        "token_type": "refresh",
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
        test::TestRequest::post()
            .uri("/token/refresh/")
            .set_json(serde_json::json!({ "refresh_token": token }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid token: Missing user_id");
}

#[actix_web::test]
async fn verify_accepts_both_token_types() {
    let app = setup_test_app(build_state().await).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(register_payload("erin"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/")
            .set_json(serde_json::json!({
                "username": "erin",
                "password": "SecurePass123!",
            }))
            .to_request(),
    )
    .await;
    let pair: serde_json::Value = test::read_body_json(resp).await;

    for token in [&pair["access_token"], &pair["refresh_token"]] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/token/verify/")
                .set_json(serde_json::json!({ "token": token }))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    }
}

#[actix_web::test]
async fn verify_rejects_garbage_with_401() {
    let app = setup_test_app(build_state().await).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/verify/")
            .set_json(serde_json::json!({ "token": "garbage" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
