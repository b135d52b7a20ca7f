use crate::auth::{create_token, verify_password};
use crate::db::users;
use crate::http::{ApiError, AppState, LoginRequest, LoginResponse, UserInfo};
use crate::utils::mask_email;
use crate::validation::validate_login;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse, Json};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    validate_login(&req)?;

    let user = users::get_user_by_email(&state.db_pool, &req.email)
        .await
        .map_err(|e| ApiError::internal("Error during login", e))?
        .ok_or_else(|| {
            tracing::info!("Login rejected, unknown account {}", mask_email(&req.email));
            ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })?;

    let password_ok = verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::internal("Error during login", e))?;
    if !password_ok {
        tracing::info!("Login rejected, wrong password for {}", mask_email(&user.email));
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    if let Err(e) = users::update_last_login(&state.db_pool, &user.id).await {
        tracing::warn!("Could not record last login: {}", e);
    }

    let token = create_token(
        &user.id,
        &user.email,
        &user.role,
        &state.jwt_secret,
        state.config.jwt_ttl_hours,
    )
    .map_err(|e| ApiError::internal("Error during login", e))?;

    tracing::info!("Admin login: {}", mask_email(&user.email));

    let response = LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            email: user.email,
            role: user.role,
        },
    };

    Ok((StatusCode::OK, Json(response)))
}
