//! Authorization endpoint handlers.
//!
//! `POST /authorize` processes a credentials submission; every other method
//! renders the sign-in or sign-up form. Request validation runs on every
//! exchange, before anything else.

use crate::authorize::code;
use crate::authorize::params::AuthorizeParams;
use crate::authorize::registrar;
use crate::authorize::state::AuthorizeState;
use crate::authorize::user_store::{self, Credentials};
use crate::error::AuthorizeError;
use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, RawQuery, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::post,
};
use sea_orm::TransactionTrait;
use serde::Deserialize;
use serde_json::json;

/// Sign-in page template.
#[derive(Template)]
#[template(path = "sign_in.html")]
struct SignInTemplate {
    action: String,
    email: String,
    password: String,
    error: String,
    title: &'static str,
}

/// Sign-up page template.
#[derive(Template)]
#[template(path = "sign_up.html")]
struct SignUpTemplate {
    action: String,
    email: String,
    password: String,
    error: String,
    title: &'static str,
}

/// Form data for a credentials submission.
///
/// All fields optional so an incomplete submission re-renders the form
/// instead of failing extraction.
#[derive(Debug, Deserialize)]
struct CredentialsForm {
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

/// Creates the authorization router.
///
/// The fallback keeps the endpoint readable with any method: GET, HEAD, or
/// anything else that is not a submission renders the form.
pub fn router(state: AuthorizeState) -> Router {
    Router::new()
        .route(
            "/authorize",
            post(authorize_submit).fallback(authorize_page),
        )
        .with_state(state)
}

/// Display the sign-in or sign-up form.
#[tracing::instrument(skip(state, query))]
async fn authorize_page(
    State(state): State<AuthorizeState>,
    RawQuery(query): RawQuery,
    Query(params): Query<AuthorizeParams>,
) -> Response {
    if let Err(e) = registrar::validate(state.db.as_ref(), &params).await {
        return validation_error_response(&e);
    }

    render_form(&params, query.as_deref().unwrap_or_default(), "", "", None)
}

/// Handle a credentials submission.
#[tracing::instrument(skip(state, query, form), fields(client_id = %params.client_id))]
async fn authorize_submit(
    State(state): State<AuthorizeState>,
    RawQuery(query): RawQuery,
    Query(params): Query<AuthorizeParams>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    if let Err(e) = registrar::validate(state.db.as_ref(), &params).await {
        return validation_error_response(&e);
    }

    let raw_query = query.unwrap_or_default();
    // Presence was checked during validation.
    let redirect_uri = params.redirect_uri.clone().unwrap_or_default();

    let submitted_password = form.password.clone().unwrap_or_default();
    let email = match form.email.as_deref() {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            return render_form(
                &params,
                &raw_query,
                "",
                &submitted_password,
                Some(AuthorizeError::EmailRequired.user_message()),
            );
        }
    };

    let creds = Credentials {
        email,
        password: form.password.filter(|p| !p.is_empty()),
        confirm_password: form.confirm_password.filter(|p| !p.is_empty()),
    };

    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open transaction");
            return render_form(
                &params,
                &raw_query,
                &creds.email,
                &submitted_password,
                Some(AuthorizeError::Database(e).user_message()),
            );
        }
    };

    let user =
        match user_store::resolve_user(&txn, &state.config.tenant_id, &params, &creds).await {
            Ok(user) => user,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back transaction");
                }
                if matches!(e, AuthorizeError::Hashing(_) | AuthorizeError::Database(_)) {
                    tracing::error!(error = %e, "User resolution failed");
                }
                return render_form(
                    &params,
                    &raw_query,
                    &creds.email,
                    &submitted_password,
                    Some(e.user_message()),
                );
            }
        };

    if let Err(e) = txn.commit().await {
        tracing::error!(error = %e, "Failed to commit transaction");
        return render_form(
            &params,
            &raw_query,
            &creds.email,
            &submitted_password,
            Some(AuthorizeError::Database(e).user_message()),
        );
    }

    let code = match code::issue(
        state.code_secret(),
        &params.client_id,
        &redirect_uri,
        &user.id,
    ) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Failed to sign authorization code");
            return render_form(
                &params,
                &raw_query,
                &creds.email,
                &submitted_password,
                Some(AuthorizeError::Signing(e).user_message()),
            );
        }
    };

    tracing::info!(user_id = %user.id, client_id = %params.client_id, "Authorization code issued");

    let mut destination = format!("{redirect_uri}?code={code}");
    if let Some(state_param) = params.state.as_deref()
        && !state_param.is_empty()
    {
        destination.push_str(&format!("&state={state_param}"));
    }

    found_redirect(&destination)
}

/// Render the view matching the requested flow, pre-filled with the
/// submitted credentials.
fn render_form(
    params: &AuthorizeParams,
    raw_query: &str,
    email: &str,
    password: &str,
    error: Option<String>,
) -> Response {
    let action = if raw_query.is_empty() {
        "/authorize".to_string()
    } else {
        format!("/authorize?{raw_query}")
    };
    let error = error.unwrap_or_default();

    let rendered = if params.sign_up {
        SignUpTemplate {
            action,
            email: email.to_string(),
            password: password.to_string(),
            error,
            title: "Sign up",
        }
        .render()
    } else {
        SignInTemplate {
            action,
            email: email.to_string(),
            password: password.to_string(),
            error,
            title: "Sign in",
        }
        .render()
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render authorize template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Reject a request that failed validation, before any side effect.
fn validation_error_response(err: &AuthorizeError) -> Response {
    let status = if err.is_request_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(error = %err, "Request validation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "error_description": err.user_message(),
        })),
    )
        .into_response()
}

/// Plain 302 with a Location header. `Redirect::to` sends a 303;
/// authorization responses use 302.
fn found_redirect(destination: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, destination.to_string())],
    )
        .into_response()
}
