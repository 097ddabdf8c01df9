//! Auth API routes and the warp filter that guards CMS routes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::AUTHORIZATION;
use warp::http::{HeaderMap, StatusCode};
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

use crate::auth::guard::{authorize, Authenticator, RequestContext, RouteAccess};
use crate::auth::AuthState;
use crate::error::AuthError;
use crate::storage::Credential;
use crate::security_logger::{log_security_event, SecurityEvent};

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Rejection carrying an auth error out of a filter chain
#[derive(Debug)]
pub struct AuthRejection(pub AuthError);

impl warp::reject::Reject for AuthRejection {}

fn reject(err: AuthError) -> Rejection {
    warp::reject::custom(AuthRejection(err))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Stored profile plus the expiry of the token that authenticated the call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Credential,
    pub session_expires_at: i64,
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

/// Runs the authenticator then the authorizer for a route and extracts
/// the resulting [`RequestContext`].
pub fn guard(
    authenticator: Arc<Authenticator>,
    access: RouteAccess,
) -> impl Filter<Extract = (RequestContext,), Error = Rejection> + Clone {
    warp::header::headers_cloned()
        .and(warp::path::full())
        .and_then(move |headers: HeaderMap, path: FullPath| {
            let authenticator = authenticator.clone();
            let access = access.clone();
            async move {
                // A value that is not valid text counts as no token at all
                let authorization = headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok());
                run_pipeline(&authenticator, &access, authorization, path.as_str())
                    .map_err(reject)
            }
        })
}

fn run_pipeline(
    authenticator: &Authenticator,
    access: &RouteAccess,
    authorization: Option<&str>,
    route: &str,
) -> Result<RequestContext, AuthError> {
    let context = authenticator
        .authenticate(authorization, access)
        .map_err(|e| {
            let event = match authorization {
                Some(_) => SecurityEvent::TokenValidationFailed {
                    route: route.to_string(),
                    reason: e.to_string(),
                },
                None => SecurityEvent::UnauthorizedAccess {
                    route: route.to_string(),
                },
            };
            log_security_event(event);
            e
        })?;

    if let Err(e) = authorize(access, &context) {
        match context.identity() {
            Some(identity) => log_security_event(SecurityEvent::PermissionDenied {
                subject_id: identity.subject_id,
                route: route.to_string(),
                required: e.to_string(),
            }),
            None => log_security_event(SecurityEvent::UnauthorizedAccess {
                route: route.to_string(),
            }),
        }
        return Err(e);
    }

    Ok(context)
}

fn with_state(state: AuthState) -> impl Filter<Extract = (AuthState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// All auth routes plus a public health check
pub fn routes(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let register = warp::path!("auth" / "register")
        .and(warp::post())
        .and(json_body::<RegisterRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_register);

    let login = warp::path!("auth" / "login")
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_login);

    let refresh = warp::path!("auth" / "refresh")
        .and(warp::post())
        .and(json_body::<RefreshRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_refresh);

    let change_password = warp::path!("auth" / "change-password")
        .and(warp::post())
        .and(guard(state.authenticator.clone(), RouteAccess::authenticated()))
        .and(json_body::<ChangePasswordRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_change_password);

    let me = warp::path!("auth" / "me")
        .and(warp::get())
        .and(guard(state.authenticator.clone(), RouteAccess::authenticated()))
        .and(with_state(state))
        .and_then(handle_me);

    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    register
        .or(login)
        .or(refresh)
        .or(change_password)
        .or(me)
        .or(health)
}

async fn handle_register(body: RegisterRequest, state: AuthState) -> Result<impl Reply, Rejection> {
    let tokens = state
        .sessions
        .register(&body.email, &body.password, &body.display_name)
        .await
        .map_err(reject)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&tokens),
        StatusCode::CREATED,
    ))
}

async fn handle_login(body: LoginRequest, state: AuthState) -> Result<impl Reply, Rejection> {
    let tokens = state
        .sessions
        .login(&body.email, &body.password)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&tokens))
}

async fn handle_refresh(body: RefreshRequest, state: AuthState) -> Result<impl Reply, Rejection> {
    let tokens = state
        .sessions
        .refresh(&body.refresh_token)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&tokens))
}

async fn handle_change_password(
    context: RequestContext,
    body: ChangePasswordRequest,
    state: AuthState,
) -> Result<impl Reply, Rejection> {
    let identity = context.require_identity().map_err(reject)?;
    state
        .sessions
        .change_password(identity.subject_id, &body.current_password, &body.new_password)
        .await
        .map_err(reject)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn handle_me(context: RequestContext, state: AuthState) -> Result<impl Reply, Rejection> {
    let identity = context.require_identity().map_err(reject)?;
    let profile = state
        .sessions
        .profile(identity.subject_id)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&ProfileResponse {
        profile,
        session_expires_at: identity.expires_at,
    }))
}

/// Turns rejections into JSON error bodies
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(AuthRejection(e)) = err.find::<AuthRejection>() {
        if e.status().is_server_error() {
            log::error!("Request failed: {}", e);
        }
        (e.status(), e.public_message())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large".to_string(),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected a JSON body".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    let body = ErrorResponse {
        status: status.as_u16(),
        message,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
