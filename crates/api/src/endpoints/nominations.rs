//! Nomination submission endpoint.

use awards_common::{AppError, AppResult};
use awards_core::{NominationForm, SubmissionOutcome, UploadFile};
use awards_db::entities::nomination::Category;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::Field},
    routing::post,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::{
    extractors::MaybeIdentity,
    middleware::AppState,
    response::{ApiResponse, NominationResponse},
};

/// Largest accepted multipart body.
const MAX_SUBMISSION_BYTES: usize = 25 * 1024 * 1024;

/// Submission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: String,
    pub nomination: NominationResponse,
    pub warnings: Vec<String>,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            message: outcome.message().to_string(),
            nomination: outcome.nomination.into(),
            warnings: outcome.warnings,
        }
    }
}

async fn text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Read an attached file. Browsers send an empty part when nothing was
/// picked, which counts as no file.
async fn file(field: Field<'_>) -> AppResult<Option<UploadFile>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadFile {
        file_name,
        content_type,
        data: data.to_vec(),
    }))
}

fn parse<T>(value: &str, field: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AppError::Validation(format!("{field}: {e}")))
}

/// `metaData` arrives as a JSON object; non-string values are kept as text.
fn metadata_entries(raw: &str) -> AppResult<Vec<(String, String)>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("metaData: {e}")))?;
    let Value::Object(map) = value else {
        return Err(AppError::Validation(
            "metaData must be a JSON object".to_string(),
        ));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Build a form from multipart fields.
async fn read_form(mut multipart: Multipart) -> AppResult<NominationForm> {
    let mut form = NominationForm::new();
    let mut category = Category::default();
    let mut metadata = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "studentName" => form.student_name = text(field).await?,
            "regNo" => form.reg_no = text(field).await?.trim().to_string(),
            "email" => form.email = text(field).await?,
            "mobile" => form.mobile = text(field).await?,
            "year" => form.year = parse(text(field).await?.trim(), "year")?,
            "department" => form.department = parse(text(field).await?.trim(), "department")?,
            "category" => category = parse(text(field).await?.trim(), "category")?,
            "title" => form.title = text(field).await?,
            "issuer" => form.issuer = text(field).await?,
            "dateOfEvent" => {
                let raw = text(field).await?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    form.date_of_event = Some(
                        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                            .map_err(|e| AppError::Validation(format!("dateOfEvent: {e}")))?,
                    );
                }
            }
            "metaData" => metadata.extend(metadata_entries(&text(field).await?)?),
            "photo" => form.photo = file(field).await?,
            "proof" => form.proof = file(field).await?,
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    // Metadata only makes sense once the category is known.
    form.set_category(category);
    for (key, value) in metadata {
        form.set_metadata(&key, value);
    }

    Ok(form)
}

/// Submit a nomination.
async fn submit(
    MaybeIdentity(identity): MaybeIdentity,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let form = read_form(multipart).await?;
    let outcome = state
        .nomination_service
        .submit(identity.as_ref().map(|i| i.user_id.as_str()), &form)
        .await?;
    Ok(ApiResponse::ok(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_entries() {
        let entries =
            metadata_entries(r#"{"startupName": "Krishi Labs", "fundingAmount": 500000, "x": null}"#)
                .unwrap();
        assert_eq!(
            entries,
            vec![
                ("fundingAmount".to_string(), "500000".to_string()),
                ("startupName".to_string(), "Krishi Labs".to_string()),
            ]
        );
        assert!(metadata_entries("").unwrap().is_empty());
        assert!(matches!(
            metadata_entries("[1, 2]"),
            Err(AppError::Validation(_))
        ));
    }
}
