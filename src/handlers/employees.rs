use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::DeskError;
use crate::middleware::session::RequireSession;
use crate::server::router::DeskState;

#[derive(Debug, Deserialize)]
pub struct EmployeeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub iban: String,
    #[serde(default)]
    pub employee_number: String,
}

/// POST /employees -> 201 with the stored record, 422 when a field is blank.
pub async fn add_employee_handler(
    State(state): State<DeskState>,
    RequireSession(session): RequireSession,
    form: Result<Json<EmployeeForm>, JsonRejection>,
) -> Result<impl IntoResponse, DeskError> {
    let Json(form) = form?;
    let employee = state
        .desk
        .add_employee(&session, &form.name, &form.iban, &form.employee_number)
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /admin/employees
pub async fn list_employees_handler(
    State(state): State<DeskState>,
    RequireSession(session): RequireSession,
) -> Result<impl IntoResponse, DeskError> {
    let employees = state.desk.list_employees(&session).await?;
    Ok(Json(employees))
}

/// DELETE /admin/employees
pub async fn delete_employees_handler(
    State(state): State<DeskState>,
    RequireSession(session): RequireSession,
) -> Result<impl IntoResponse, DeskError> {
    let deleted = state.desk.delete_all_employees(&session).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
