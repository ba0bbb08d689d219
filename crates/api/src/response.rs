//! API response types.

use awards_core::{NominationDetail, ProofView};
use awards_db::entities::nomination::{self, AcademicYear, Category, Department, NominationStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Nomination as sent over the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationResponse {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub reg_no: String,
    pub email: String,
    pub mobile: String,
    pub year: AcademicYear,
    pub department: Department,
    pub category: Category,
    pub title: String,
    pub issuer: String,
    pub date_of_event: String,
    pub meta_data: serde_json::Value,
    pub photo_url: Option<String>,
    pub proof_doc_url: Option<String>,
    pub status: NominationStatus,
    pub created_at: String,
}

impl From<nomination::Model> for NominationResponse {
    fn from(n: nomination::Model) -> Self {
        Self {
            id: n.id,
            student_id: n.student_id,
            student_name: n.student_name,
            reg_no: n.reg_no,
            email: n.email,
            mobile: n.mobile,
            year: n.year,
            department: n.department,
            category: n.category,
            title: n.title,
            issuer: n.issuer,
            date_of_event: n.date_of_event.format("%Y-%m-%d").to_string(),
            meta_data: n.meta_data,
            photo_url: n.photo_url,
            proof_doc_url: n.proof_doc_url,
            status: n.status,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

impl From<&nomination::Model> for NominationResponse {
    fn from(n: &nomination::Model) -> Self {
        n.clone().into()
    }
}

/// Nomination with its proof presentation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationDetailResponse {
    pub nomination: NominationResponse,
    pub proof: ProofView,
}

impl From<NominationDetail> for NominationDetailResponse {
    fn from(detail: NominationDetail) -> Self {
        Self {
            nomination: detail.nomination.into(),
            proof: detail.proof,
        }
    }
}
