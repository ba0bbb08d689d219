//! Meta endpoints.

use awards_core::{CategoryDefinition, category_catalog};
use awards_db::entities::nomination::{AcademicYear, Department};
use axum::{Router, routing::get};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Server metadata response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub name: String,
    pub version: String,
    pub years: Vec<AcademicYear>,
    pub departments: Vec<Department>,
    pub categories: Vec<CategoryDefinition>,
}

/// Get server metadata, including the option lists the form offers.
async fn meta() -> ApiResponse<MetaResponse> {
    ApiResponse::ok(MetaResponse {
        name: "awards".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        years: AcademicYear::ALL.to_vec(),
        departments: Department::ALL.to_vec(),
        categories: category_catalog(),
    })
}

/// Category-specific metadata fields.
async fn categories() -> ApiResponse<Vec<CategoryDefinition>> {
    ApiResponse::ok(category_catalog())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(meta))
        .route("/categories", get(categories))
}
