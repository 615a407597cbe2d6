//! Board Router

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::BoardConfig;
use crate::domain::repository::BoardRepository;
use crate::infra::postgres::PgBoardRepository;
use crate::presentation::flash::write_flash_cookie;
use crate::presentation::handlers::{self, BoardAppState};

/// Create the board router with PostgreSQL repository
pub fn board_router(repo: PgBoardRepository, config: BoardConfig) -> Router {
    board_router_generic(repo, config)
}

/// Create a board router for any repository implementation
pub fn board_router_generic<R>(repo: R, config: BoardConfig) -> Router
where
    R: BoardRepository,
{
    let state = BoardAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/register",
            get(handlers::register_form::<R>).post(handlers::register::<R>),
        )
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login::<R>),
        )
        .route("/logout", get(handlers::logout::<R>))
        .route("/users/{username}", get(handlers::show_user::<R>))
        .route("/users/{username}/delete", post(handlers::delete_user::<R>))
        .route(
            "/users/{username}/feedback/add",
            get(handlers::add_feedback_form::<R>).post(handlers::add_feedback::<R>),
        )
        .route(
            "/feedback/{feedback_id}/update",
            get(handlers::update_feedback_form::<R>).post(handlers::update_feedback::<R>),
        )
        .route(
            "/feedback/{feedback_id}/delete",
            post(handlers::delete_feedback::<R>),
        )
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            write_flash_cookie,
        ))
        .with_state(state)
}
