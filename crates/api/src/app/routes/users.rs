//! User routes.
//!
//! Two shapes of the same operations coexist, mirroring the public surface:
//! path-param routes (`/api/users/:user_id`) and query-param variants on the
//! collection (`?userId=`). Both share the same data-access functions, so
//! update/delete check existence and yield a clean 404 in either shape.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use ripple_users::{CreateUser, UpdateUser};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_following)
                .post(create_user)
                .put(update_user_by_query)
                .delete(delete_user_by_query),
        )
        .route(
            "/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// GET /api/users/:user_id
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user = services.fetch_user(&user_id.into()).await?;
    Ok((StatusCode::OK, Json(user)).into_response())
}

/// PUT /api/users/:user_id
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
    body: String,
) -> Result<Response, ApiError> {
    let changes = UpdateUser::parse(dto::json_body(&body)?)?;
    let user = services.update_user(&user_id.into(), changes).await?;
    Ok((StatusCode::OK, Json(user)).into_response())
}

/// DELETE /api/users/:user_id
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    services.delete_user(&user_id.into()).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "User deleted successfully" })),
    )
        .into_response())
}

/// GET /api/users?userId=&skip=&take=
pub async fn list_following(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListUsersQuery>,
) -> Result<Response, ApiError> {
    let (user_id, window) = query.parse()?;
    let page = services.following_with_pagination(&user_id, window).await?;
    Ok((StatusCode::OK, Json(page)).into_response())
}

/// POST /api/users
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: String,
) -> Result<Response, ApiError> {
    let input = CreateUser::parse(dto::json_body(&body)?)?;
    let user = services.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// PUT /api/users?userId=
pub async fn update_user_by_query(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::UserIdQuery>,
    body: String,
) -> Result<Response, ApiError> {
    let user_id = query.require()?;
    let changes = UpdateUser::parse(dto::json_body(&body)?)?;
    let user = services.update_user(&user_id, changes).await?;
    Ok((StatusCode::OK, Json(user)).into_response())
}

/// DELETE /api/users?userId=
pub async fn delete_user_by_query(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::UserIdQuery>,
) -> Result<Response, ApiError> {
    let user_id = query.require()?;
    services.delete_user(&user_id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "User deleted successfully" })),
    )
        .into_response())
}
