use actix_cors::Cors;
use actix_middleware::JwtAuthMiddleware;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use identity_service::handlers::{tokens, users};
use identity_service::openapi::ApiDoc;
use identity_service::{AppState, Settings};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::io;
use std::str::FromStr;
use token_core::{TokenSigner, TokenVerifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "identity-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("database connection failed: {}", e),
            "service": "identity-service"
        })),
    }
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = match Settings::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting identity-service v{}", env!("CARGO_PKG_VERSION"));

    let connect_options = SqliteConnectOptions::from_str(&settings.database.url)
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid DATABASE_URL: {}", e),
            )
        })?
        .create_if_missing(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to create database pool: {}", e),
            )
        })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to run database migrations: {}", e),
            )
        })?;

    tracing::info!("Connected to database and applied migrations");

    let signer = TokenSigner::new(
        &settings.jwt.secret_key,
        settings.jwt.access_token_expiry_secs,
        settings.jwt.refresh_token_expiry_secs,
    );
    let verifier = TokenVerifier::new(&settings.jwt.secret_key);

    let state = AppState {
        db: db_pool,
        signer,
        verifier: verifier.clone(),
    };

    let bind_address = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in settings.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(openapi_doc))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/api/v1/openapi.json", web::get().to(openapi_json))
            .route("/token/", web::post().to(tokens::issue_token_pair))
            .route("/token/refresh/", web::post().to(tokens::refresh_token))
            .route("/token/verify/", web::post().to(tokens::verify_token))
            // Registration is open; listing requires a token on the same path
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
                    .wrap(JwtAuthMiddleware::new(verifier.clone()))
                    .route("/hello/", web::get().to(users::hello_user))
                    .service(
                        web::resource("/users/{user_id}/")
                            .route(web::get().to(users::get_user))
                            .route(web::put().to(users::update_user))
                            .route(web::delete().to(users::delete_user)),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
