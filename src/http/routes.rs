use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::domain::model::{
    Actor, CourseId, Enrollment, EnrollmentFilter, EnrollmentId, EnrollmentStatus, SeatSummary,
};
use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::validate_required_field;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentBody {
    pub course_id: Option<CourseId>,
    /// Accepted for compatibility; the resolved status comes from capacity.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

fn malformed_body(rejection: JsonRejection) -> RegistrarError {
    RegistrarError::validation("body", rejection.body_text())
}

fn malformed_id(rejection: PathRejection) -> RegistrarError {
    RegistrarError::validation("id", rejection.body_text())
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn create_enrollment_handler(
    State(state): State<AppState>,
    actor: Actor,
    body: std::result::Result<Json<CreateEnrollmentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Enrollment>)> {
    let Json(body) = body.map_err(malformed_body)?;
    let course_id = *validate_required_field("courseId", &body.course_id)?;

    if let Some(requested) = &body.status {
        match requested.parse::<EnrollmentStatus>()? {
            EnrollmentStatus::Registered | EnrollmentStatus::Waitlisted => {}
            EnrollmentStatus::Dropped => {
                return Err(RegistrarError::validation(
                    "status",
                    "new enrollments must be registered or waitlisted",
                ))
            }
        }
    }

    let enrollment = state.manager.request_enrollment(actor.id, course_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn update_status_handler(
    State(state): State<AppState>,
    actor: Actor,
    id: std::result::Result<Path<EnrollmentId>, PathRejection>,
    body: std::result::Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<Enrollment>> {
    let Path(id) = id.map_err(malformed_id)?;
    let Json(body) = body.map_err(malformed_body)?;
    let status = validate_required_field("status", &body.status)?;

    let enrollment = state.manager.update_status(&actor, id, status).await?;
    Ok(Json(enrollment))
}

pub async fn get_enrollment_handler(
    State(state): State<AppState>,
    _actor: Actor,
    id: std::result::Result<Path<EnrollmentId>, PathRejection>,
) -> Result<Json<Enrollment>> {
    let Path(id) = id.map_err(malformed_id)?;
    Ok(Json(state.manager.get_enrollment(id).await?))
}

pub async fn list_enrollments_handler(
    State(state): State<AppState>,
    _actor: Actor,
    filter: std::result::Result<Query<EnrollmentFilter>, QueryRejection>,
) -> Result<Json<Vec<Enrollment>>> {
    let Query(filter) =
        filter.map_err(|rejection| RegistrarError::validation("query", rejection.body_text()))?;
    Ok(Json(state.manager.list_enrollments(&filter).await?))
}

pub async fn seats_handler(
    State(state): State<AppState>,
    _actor: Actor,
    course_id: std::result::Result<Path<CourseId>, PathRejection>,
) -> Result<Json<SeatSummary>> {
    let Path(course_id) = course_id.map_err(malformed_id)?;
    Ok(Json(state.manager.seat_summary(course_id).await?))
}
