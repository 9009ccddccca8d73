//! User account and session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, LoginRequest, LoginResponse, UpdateUser, User},
};

use super::{AuthenticatedUser, MessageResponse, SESSION_COOKIE};

/// Create a new user account
#[utoipa::path(
    post,
    path = "/users/create",
    tag = "users",
    security(("session_token" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 409, description = "User with this email already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    user.validate()?;

    let created = state.services.accounts.create_user(&claims, user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = LoginResponse),
        (status = 400, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, user) = state
        .services
        .accounts
        .authenticate(&request.email, &request.password)
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(state.config.auth.session_days));

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            token,
        }),
    ))
}

/// Log out, clearing the session cookie
#[utoipa::path(
    post,
    path = "/users/logout",
    tag = "users",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// List all user profiles
#[utoipa::path(
    get,
    path = "/users/all",
    tag = "users",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "All user profiles, passwords excluded", body = Vec<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_profiles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.accounts.list_profiles(&claims).await?;
    Ok(Json(users))
}

/// Get the authenticated user's own profile
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "users",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "Own profile", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.accounts.get_own_profile(&claims).await?;
    Ok(Json(user))
}

/// Update a user account
#[utoipa::path(
    put,
    path = "/users/profile/{id}",
    tag = "users",
    security(("session_token" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User with this email already exists")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(user): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    user.validate()?;

    let updated = state.services.accounts.update_user(&claims, id, user).await?;
    Ok(Json(updated))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/users/profile/{id}",
    tag = "users",
    security(("session_token" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still has outstanding borrowed copies")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.accounts.delete_user(&claims, id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
