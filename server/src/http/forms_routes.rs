use crate::db::submissions;
use crate::http::{ApiError, AppState, FormSubmissionRequest, SubmissionCreated, SubmissionList};
use crate::utils::mask_email;
use crate::validation::validate_form_submission;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse, Json};

pub async fn submit_form_handler(
    State(state): State<AppState>,
    payload: Result<Json<FormSubmissionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let submission = validate_form_submission(&req)?;

    tracing::info!("📥 Contact form: service={} email={}", submission.service, mask_email(&submission.email));

    let data = submissions::create_submission(&state.db_pool, submission)
        .await
        .map_err(|e| ApiError::internal("Error submitting form", e))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreated {
            success: true,
            message: "Form submitted successfully".to_string(),
            data,
        }),
    ))
}

pub async fn list_submissions_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = submissions::list_submissions(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error fetching submissions", e))?;

    Ok((StatusCode::OK, Json(SubmissionList { success: true, data })))
}
