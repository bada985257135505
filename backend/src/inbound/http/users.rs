//! Account API handlers.
//!
//! ```text
//! GET        /api/v1/me
//! GET        /api/v1/users?page=N
//! GET        /api/v1/users/{id}
//! PUT|PATCH  /api/v1/users/{id}           {"name":"Ada","avatar":"/a.png"}
//! PUT|PATCH  /api/v1/users/{id}/password  {"password":"current-secret"}
//! PUT|PATCH  /api/v1/users/{id}/account   {"email":"ada@example.org"}
//! ```
//!
//! Handlers are registered through the table in
//! [`routes`](crate::inbound::http::routes), not through attribute macros.

use actix_web::{HttpRequest, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};

use crate::domain::{Avatar, EmailAddress, Error, PlainPassword, ProfileChanges, UserName, UserView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::schemas::{ErrorSchema, UserPageSchema, UserViewSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_user_id, password_field_error, user_field_error,
};

/// Query string for `GET /api/v1/users`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// One-based page number; defaults to 1.
    #[param(minimum = 1, example = 1)]
    pub page: Option<u32>,
}

/// Profile update body. Only `name` and `avatar` are read; other members,
/// including `email` and `password`, are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name.
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    /// New avatar reference.
    #[schema(example = "/avatars/ada.png")]
    pub avatar: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileChanges {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let name = value
            .name
            .map(UserName::new)
            .transpose()
            .map_err(user_field_error)?;
        let avatar = value
            .avatar
            .map(Avatar::new)
            .transpose()
            .map_err(user_field_error)?;
        Ok(Self { name, avatar })
    }
}

/// Password update body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdatePasswordRequest {
    /// Must equal the account's current password.
    #[schema(example = "current-secret", min_length = 8, max_length = 128)]
    pub password: String,
}

/// Email change body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateAccountRequest {
    /// Address to confirm; the current address stays active until then.
    #[schema(example = "countess@example.org")]
    pub email: String,
}

/// Return the authenticated caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Caller's account", body = UserViewSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 404, description = "Caller no longer exists", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getSelf",
    security(("BearerAuth" = []))
)]
pub async fn get_self(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UserView>> {
    let view = state.accounts.get_self(caller.id()).await?;
    Ok(web::Json(view))
}

/// List accounts one page at a time.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of accounts", body = UserPageSchema),
        (status = 422, description = "Invalid page number", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Paginated<UserView>>> {
    let page = query.into_inner().page.unwrap_or(1);
    let listing = state.accounts.list_users(page).await?;
    Ok(web::Json(listing.into_envelope(&req.full_url())))
}

/// Fetch one account by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "Account", body = UserViewSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 422, description = "Malformed id", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserView>> {
    let id = parse_user_id(&path.into_inner())?;
    let view = state.accounts.get_user(&id).await?;
    Ok(web::Json(view))
}

/// Change an account's name and/or avatar.
#[utoipa::path(
    method(put, patch),
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = UserViewSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not allowed to update this account", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("BearerAuth" = []))
)]
pub async fn update_profile(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserView>> {
    let target = parse_user_id(&path.into_inner())?;
    let changes = ProfileChanges::try_from(payload.into_inner())?;
    let view = state
        .account_commands
        .update_profile(caller.id(), &target, changes)
        .await?;
    Ok(web::Json(view))
}

/// Submit the account's current password.
///
/// The call succeeds only when the submitted value equals the current
/// password; the stored hash is then refreshed with a new salt.
#[utoipa::path(
    method(put, patch),
    path = "/api/v1/users/{id}/password",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Account", body = UserViewSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Password mismatch or not allowed", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updatePassword",
    security(("BearerAuth" = []))
)]
pub async fn update_password(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePasswordRequest>,
) -> ApiResult<web::Json<UserView>> {
    let target = parse_user_id(&path.into_inner())?;
    let password = PlainPassword::new(payload.into_inner().password).map_err(password_field_error)?;
    let view = state
        .account_commands
        .update_password(caller.id(), &target, password)
        .await?;
    Ok(web::Json(view))
}

/// Record a pending email change and notify the current address.
#[utoipa::path(
    method(put, patch),
    path = "/api/v1/users/{id}/account",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account with pending email", body = UserViewSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not allowed to update this account", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "requestEmailChange",
    security(("BearerAuth" = []))
)]
pub async fn request_email_change(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateAccountRequest>,
) -> ApiResult<web::Json<UserView>> {
    let target = parse_user_id(&path.into_inner())?;
    let email = EmailAddress::new(payload.into_inner().email).map_err(user_field_error)?;
    let view = state
        .account_commands
        .request_email_change(caller.id(), &target, email)
        .await?;
    Ok(web::Json(view))
}
