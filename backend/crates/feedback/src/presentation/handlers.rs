//! HTTP Handlers

use axum::{Extension, Form};
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::accounts::AccountService;
use crate::application::authenticator::Authenticator;
use crate::application::config::BoardConfig;
use crate::application::feedback_service::FeedbackService;
use crate::application::session_manager::{IssuedSession, SessionManager};
use crate::domain::repository::BoardRepository;
use crate::domain::value_object::feedback_id::FeedbackId;
use crate::domain::value_object::user_name::UserName;
use crate::error::{FeedbackError, FeedbackResult, FieldErrors};
use crate::presentation::dto::{FeedbackForm, LoginForm, RegisterForm, RegisterValues};
use crate::presentation::extract::{MaybeIdentity, RequireIdentity};
use crate::presentation::flash::{Flash, FlashCookie, IncomingFlash};
use crate::presentation::views::{self, FeedbackFormView};

/// Shared state for board handlers
#[derive(Clone)]
pub struct BoardAppState<R>
where
    R: BoardRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<BoardConfig>,
}

// User names are restricted to URL-safe characters
fn user_path(user_name: &str) -> String {
    format!("/users/{}", user_name)
}

/// Render a page, clearing the flash it consumed
fn page(status: StatusCode, incoming: &IncomingFlash, html: Html<String>) -> Response {
    if incoming.needs_clearing() {
        (status, Extension(FlashCookie::Clear), html).into_response()
    } else {
        (status, html).into_response()
    }
}

/// Set the session cookie and land on the user's page
fn start_session(config: &BoardConfig, issued: &IssuedSession, flash: Flash) -> Response {
    (
        AppendHeaders([(
            SET_COOKIE,
            config.session_cookie().build_set_cookie(&issued.token),
        )]),
        flash.into_cookie(),
        Redirect::to(&user_path(issued.identity.as_str())),
    )
        .into_response()
}

/// Issue a session, ending whatever session the browser already carried
async fn begin_session<R>(
    state: &BoardAppState<R>,
    headers: &HeaderMap,
    user_name: &UserName,
) -> FeedbackResult<IssuedSession>
where
    R: BoardRepository,
{
    let previous = extract_cookie(headers, &state.config.session_cookie_name);
    SessionManager::new(state.repo.clone(), state.config.clone())
        .replace_identity(previous.as_deref(), user_name)
        .await
}

fn parse_feedback_id(raw: &str) -> FeedbackResult<FeedbackId> {
    FeedbackId::parse(raw).ok_or(FeedbackError::FeedbackNotFound)
}

/// GET /
pub async fn root() -> Redirect {
    Redirect::to("/register")
}

// ============================================================================
// Register
// ============================================================================

/// GET /register
pub async fn register_form<R>(
    MaybeIdentity(identity): MaybeIdentity,
    flash: IncomingFlash,
) -> Response
where
    R: BoardRepository,
{
    if let Some(identity) = identity {
        return Redirect::to(&user_path(identity.as_str())).into_response();
    }

    page(
        StatusCode::OK,
        &flash,
        views::register_page(flash.flash(), &RegisterValues::default(), &FieldErrors::new()),
    )
}

/// POST /register
pub async fn register<R>(
    State(state): State<BoardAppState<R>>,
    MaybeIdentity(identity): MaybeIdentity,
    flash: IncomingFlash,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    if let Some(identity) = identity {
        return Ok(Redirect::to(&user_path(identity.as_str())).into_response());
    }

    let (values, input) = form.into_parts();
    let authenticator = Authenticator::new(state.repo.clone(), state.config.clone());

    let (status, errors) = match authenticator.register(input).await {
        Ok(user) => {
            let issued = begin_session(&state, &headers, &user.user_name).await?;
            return Ok(start_session(
                &state.config,
                &issued,
                Flash::success("Welcome! Thank you for creating an account!"),
            ));
        }
        Err(FeedbackError::Validation(errors)) => (StatusCode::UNPROCESSABLE_ENTITY, errors),
        Err(FeedbackError::DuplicateUsername) => {
            let mut errors = FieldErrors::new();
            errors.push("username", "Username taken. Please pick another");
            (StatusCode::CONFLICT, errors)
        }
        Err(e) => return Err(e),
    };

    Ok(page(
        status,
        &flash,
        views::register_page(flash.flash(), &values, &errors),
    ))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// GET /login
pub async fn login_form(flash: IncomingFlash) -> Response {
    page(
        StatusCode::OK,
        &flash,
        views::login_page(flash.flash(), "", &FieldErrors::new()),
    )
}

/// POST /login
pub async fn login<R>(
    State(state): State<BoardAppState<R>>,
    flash: IncomingFlash,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(page(
            StatusCode::UNPROCESSABLE_ENTITY,
            &flash,
            views::login_page(flash.flash(), &form.username, &errors),
        ));
    }

    let LoginForm { username, password } = form;
    let authenticator = Authenticator::new(state.repo.clone(), state.config.clone());

    match authenticator.authenticate(&username, password).await? {
        Some(user) => {
            let issued = begin_session(&state, &headers, &user.user_name).await?;
            Ok(start_session(
                &state.config,
                &issued,
                Flash::primary(format!("Welcome Back, {}", user.user_name)),
            ))
        }
        None => {
            let mut errors = FieldErrors::new();
            errors.push("username", FeedbackError::InvalidCredentials.to_string());
            Ok(page(
                StatusCode::UNAUTHORIZED,
                &flash,
                views::login_page(flash.flash(), &username, &errors),
            ))
        }
    }
}

/// GET /logout
///
/// Safe without a session.
pub async fn logout<R>(
    State(state): State<BoardAppState<R>>,
    headers: HeaderMap,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name);
    let sessions = SessionManager::new(state.repo.clone(), state.config.clone());
    sessions.clear_identity(token.as_deref()).await?;

    Ok((
        AppendHeaders([(SET_COOKIE, state.config.session_cookie().build_delete_cookie())]),
        Redirect::to("/login"),
    )
        .into_response())
}

// ============================================================================
// Users
// ============================================================================

/// GET /users/{username}
pub async fn show_user<R>(
    State(state): State<BoardAppState<R>>,
    RequireIdentity(identity): RequireIdentity,
    flash: IncomingFlash,
    Path(user_name): Path<String>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let accounts = AccountService::new(state.repo.clone());
    let profile = accounts.profile(&user_name).await?;

    Ok(page(
        StatusCode::OK,
        &flash,
        views::user_page(flash.flash(), &identity, &profile),
    ))
}

/// POST /users/{username}/delete
pub async fn delete_user<R>(
    State(state): State<BoardAppState<R>>,
    RequireIdentity(identity): RequireIdentity,
    headers: HeaderMap,
    Path(user_name): Path<String>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let accounts = AccountService::new(state.repo.clone());
    accounts.delete_account(&identity, &user_name).await?;

    let token = extract_cookie(&headers, &state.config.session_cookie_name);
    let sessions = SessionManager::new(state.repo.clone(), state.config.clone());
    sessions.clear_identity(token.as_deref()).await?;

    Ok((
        AppendHeaders([(SET_COOKIE, state.config.session_cookie().build_delete_cookie())]),
        Flash::info("You have successfully deleted your account").into_cookie(),
        Redirect::to("/"),
    )
        .into_response())
}

// ============================================================================
// Feedback
// ============================================================================

/// GET /users/{username}/feedback/add
pub async fn add_feedback_form<R>(
    RequireIdentity(identity): RequireIdentity,
    flash: IncomingFlash,
) -> Response
where
    R: BoardRepository,
{
    let action = format!("{}/feedback/add", user_path(identity.as_str()));
    let view = FeedbackFormView {
        heading: "Add Feedback",
        action: &action,
        submit_label: "Add",
        title: "",
        content: "",
    };

    page(
        StatusCode::OK,
        &flash,
        views::feedback_form_page(flash.flash(), &identity, &view, &FieldErrors::new()),
    )
}

/// POST /users/{username}/feedback/add
///
/// The owner is always the logged-in user, whatever the path says.
pub async fn add_feedback<R>(
    State(state): State<BoardAppState<R>>,
    RequireIdentity(identity): RequireIdentity,
    flash: IncomingFlash,
    Form(form): Form<FeedbackForm>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let service = FeedbackService::new(state.repo.clone());

    match service.add(&identity, form.clone().into()).await {
        Ok(_) => Ok(Flash::success("Feedback posted!").redirect(&user_path(identity.as_str()))),
        Err(FeedbackError::Validation(errors)) => {
            let action = format!("{}/feedback/add", user_path(identity.as_str()));
            let view = FeedbackFormView {
                heading: "Add Feedback",
                action: &action,
                submit_label: "Add",
                title: &form.title,
                content: &form.content,
            };
            Ok(page(
                StatusCode::UNPROCESSABLE_ENTITY,
                &flash,
                views::feedback_form_page(flash.flash(), &identity, &view, &errors),
            ))
        }
        Err(e) => Err(e),
    }
}

/// GET /feedback/{feedback_id}/update
pub async fn update_feedback_form<R>(
    State(state): State<BoardAppState<R>>,
    RequireIdentity(identity): RequireIdentity,
    flash: IncomingFlash,
    Path(feedback_id): Path<String>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let feedback_id = parse_feedback_id(&feedback_id)?;
    let service = FeedbackService::new(state.repo.clone());
    let feedback = service.get_for_edit(&identity, feedback_id).await?;

    let action = format!("/feedback/{}/update", feedback_id);
    let view = FeedbackFormView {
        heading: "Edit Feedback",
        action: &action,
        submit_label: "Update",
        title: feedback.title.as_str(),
        content: feedback.content.as_str(),
    };

    Ok(page(
        StatusCode::OK,
        &flash,
        views::feedback_form_page(flash.flash(), &identity, &view, &FieldErrors::new()),
    ))
}

/// POST /feedback/{feedback_id}/update
pub async fn update_feedback<R>(
    State(state): State<BoardAppState<R>>,
    RequireIdentity(identity): RequireIdentity,
    flash: IncomingFlash,
    Path(feedback_id): Path<String>,
    Form(form): Form<FeedbackForm>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let feedback_id = parse_feedback_id(&feedback_id)?;
    let service = FeedbackService::new(state.repo.clone());

    match service.update(&identity, feedback_id, form.clone().into()).await {
        Ok(_) => Ok(Flash::success("Feedback successfully edited!")
            .redirect(&user_path(identity.as_str()))),
        Err(FeedbackError::Validation(errors)) => {
            let action = format!("/feedback/{}/update", feedback_id);
            let view = FeedbackFormView {
                heading: "Edit Feedback",
                action: &action,
                submit_label: "Update",
                title: &form.title,
                content: &form.content,
            };
            Ok(page(
                StatusCode::UNPROCESSABLE_ENTITY,
                &flash,
                views::feedback_form_page(flash.flash(), &identity, &view, &errors),
            ))
        }
        Err(e) => Err(e),
    }
}

/// POST /feedback/{feedback_id}/delete
pub async fn delete_feedback<R>(
    State(state): State<BoardAppState<R>>,
    RequireIdentity(identity): RequireIdentity,
    Path(feedback_id): Path<String>,
) -> FeedbackResult<Response>
where
    R: BoardRepository,
{
    let feedback_id = parse_feedback_id(&feedback_id)?;
    let service = FeedbackService::new(state.repo.clone());
    service.delete(&identity, feedback_id).await?;

    Ok(Flash::info("Feedback deleted!").redirect(&user_path(identity.as_str())))
}

/// Fallback for unknown paths
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        views::message_page("Not Found", "The requested page does not exist."),
    )
        .into_response()
}
