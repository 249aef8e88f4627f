//! User API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::{success, ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::AppState;

/// GET /api/users - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    success(state.repo.list_users().await?)
}

/// GET /api/users/:id - Get a single user.
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_id(&id)?;

    match state.repo.get_user(id).await? {
        Some(user) => success(user),
        None => Err(AppError::NotFound(format!("User {} not found", id))),
    }
}

/// POST /api/users - Create a new user.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(mut request) = payload.map_err(invalid_body)?;

    request.name = validate_name(&request.name)?;
    request.email = validate_email(&request.email)?;

    let user = state.repo.create_user(&request).await?;
    Ok(ApiResponse::new(user)
        .with_status(StatusCode::CREATED)
        .with_message("User created successfully"))
}

/// PUT /api/users/:id - Update a user.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let Json(mut request) = payload.map_err(invalid_body)?;

    if let Some(name) = &request.name {
        request.name = Some(validate_name(name)?);
    }
    if let Some(email) = &request.email {
        request.email = Some(validate_email(email)?);
    }

    let user = state.repo.update_user(id, &request).await?;
    Ok(ApiResponse::new(user).with_message("User updated successfully"))
}

/// DELETE /api/users/:id - Delete a user.
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id)?;

    state.repo.delete_user(id).await?;
    Ok(ApiResponse::new(()).with_message("User deleted successfully"))
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid user id: {}", raw)))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Result<String, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation(format!("Invalid email: {}", email)));
    }
    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("1.5"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_validation() {
        assert_eq!(validate_name("  Kim  ").unwrap(), "Kim");
        assert!(validate_name("   ").is_err());
        assert_eq!(
            validate_email(" kim@example.com ").unwrap(),
            "kim@example.com"
        );
        assert!(validate_email("").is_err());
        assert!(validate_email("kim.example.com").is_err());
    }
}
