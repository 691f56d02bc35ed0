//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    middleware,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::JsonBody;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{LIST_USERS_FAILED_MESSAGE, USER_UPDATED_MESSAGE};
use crate::domain::UpdateUser;
use crate::errors::AppResult;
use crate::types::{MessageResponse, UserListResponse, UserResponse};

/// User update request
///
/// Fields are checked by the service after the target is found.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    /// New display name (max 100 characters after trimming); blank leaves it unchanged
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New role: admin, editor or viewer
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable, example = "editor")]
    pub role: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            // `"role": null` counts as a supplied role and fails parsing
            role: req.role.map(Option::unwrap_or_default),
        }
    }
}

/// Search query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct SearchParams {
    /// Substring to look for in names and emails (case-insensitive)
    pub q: String,
}

/// Create user routes
///
/// Mutations and search are admin-only; the guard runs before the handler
/// so non-admins never reach the store.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/search",
            get(search_users).route_layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/:id",
            get(get_user).merge(
                put(update_user)
                    .delete(delete_user)
                    .route_layer(middleware::from_fn(require_admin)),
            ),
        )
}

/// List users visible to the caller
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users for admins, only the caller otherwise", body = UserListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Failed to load users from server")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserListResponse>> {
    let users = state
        .user_service
        .list_users(&current_user)
        .await
        .map_err(|e| e.with_server_message(LIST_USERS_FAILED_MESSAGE))?;

    Ok(Json(UserListResponse::success(users)))
}

/// Get user by ID (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not authorized to view this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(&current_user, id).await?;
    Ok(Json(UserResponse::success(user)))
}

/// Update a user's name and/or role (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid role or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(id, payload.into()).await?;

    tracing::info!(admin_id = current_user.id(), user_id = user.id, "User updated");

    Ok(Json(UserResponse::with_message(user, USER_UPDATED_MESSAGE)))
}

/// Delete a user other than the caller (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete your own account"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let user = state.user_service.delete_user(&current_user, id).await?;

    tracing::info!(admin_id = current_user.id(), user_id = user.id, "User deleted");

    Ok(Json(MessageResponse::new(format!(
        "User {} ({}) deleted successfully",
        user.name, user.email
    ))))
}

/// Search users by name or email (admin only)
#[utoipa::path(
    get,
    path = "/users/search",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users, newest first", body = UserListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<UserListResponse>> {
    let users = state.user_service.search_users(&params.q).await?;
    Ok(Json(UserListResponse::success(users)))
}
