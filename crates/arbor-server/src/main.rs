use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use arbor_api::auth::{self, AppState, AppStateInner};
use arbor_api::middleware::require_auth;
use arbor_api::{engagement, friends, messages, notifications, posts, profiles};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbor=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("ARBOR_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("ARBOR_DB_PATH").unwrap_or_else(|_| "arbor.db".into());
    let host = std::env::var("ARBOR_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("ARBOR_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = arbor_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    // Read endpoints open to everyone
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/posts", get(posts::list_posts))
        .route("/posts/search", get(posts::search_posts))
        .route("/posts/trending", get(posts::trending_posts))
        .route("/posts/{post_id}/comments", get(engagement::post_comments))
        .route(
            "/posts/{post_id}/reactions",
            get(engagement::post_reactions),
        )
        .route("/hashtags/{tag}/posts", get(posts::posts_by_hashtag))
        .with_state(state.clone());

    // Everything that acts as a user requires a verified token
    let protected_routes = Router::new()
        .route("/posts", post(posts::create_post))
        .route("/posts/{post_id}", patch(posts::edit_post))
        .route("/posts/{post_id}", delete(posts::delete_post))
        .route("/posts/{post_id}/pin", post(posts::toggle_pin))
        .route("/posts/{post_id}/like", post(engagement::like_post))
        .route("/posts/{post_id}/like", delete(engagement::unlike_post))
        .route(
            "/posts/{post_id}/reactions",
            post(engagement::react_to_post),
        )
        .route(
            "/posts/{post_id}/comments",
            post(engagement::comment_on_post),
        )
        .route("/users/{username}/posts", get(posts::user_posts))
        .route("/profiles", get(profiles::list_profiles))
        .route("/profiles", post(profiles::create_profile))
        .route("/profiles", patch(profiles::update_profile))
        .route("/profiles/{username}", get(profiles::get_profile))
        .route("/friends", get(friends::list_friends))
        .route("/friends/requests", get(friends::pending_requests))
        .route("/friends/requests", post(friends::send_friend_request))
        .route(
            "/friends/requests/{request_id}/respond",
            post(friends::respond_friend_request),
        )
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/{notification_id}/read",
            post(notifications::mark_read),
        )
        .route("/messages", post(messages::send_message))
        .route("/messages/{other_user_id}", get(messages::conversation))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Arbor server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
