//! One-shot import of legacy nomination records.
//!
//! Legacy exports are JSON arrays of loosely shaped objects. Every missing
//! field gets a fixed default, every imported record is Approved, and rows
//! are written in atomic batches.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use awards_common::{AppError, AppResult, IdGenerator};
use awards_db::entities::nomination::{
    self, AcademicYear, Category, Department, NominationStatus,
};
use awards_db::repositories::NominationRepository;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::Set;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Largest batch the store accepts in one atomic write.
pub const MAX_BATCH_SIZE: usize = 500;

const LEGACY_STUDENT_ID: &str = "legacy-import";
const DEFAULT_STUDENT_NAME: &str = "Unknown Student";
const DEFAULT_REG_NO: &str = "N/A";
const DEFAULT_TITLE: &str = "Legacy Achievement";
const DEFAULT_ISSUER: &str = "Legacy Record";
const DEFAULT_CATEGORY: Category = Category::CoCurricular;

fn default_date_of_event() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// Read a scalar as text. Legacy exports often hold numbers where text is
/// expected (phone numbers, registration numbers, years); arrays and objects
/// count as missing.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            tracing::warn!(value = %other, "Legacy field is not a scalar, using default");
            None
        }
    })
}

/// One record from a legacy export. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub student_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub student_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reg_no: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mobile: Option<String>,
    /// Roman (`"III"`) or numeric (`3`, `"3"`).
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub department: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub issuer: Option<String>,
    /// A date string or epoch milliseconds.
    pub date_of_event: Option<Value>,
    pub meta_data: Option<Value>,
}

fn parse_year(value: Option<&str>) -> AcademicYear {
    let roman = match value.map(str::trim) {
        Some("1") => Some("I"),
        Some("2") => Some("II"),
        Some("3") => Some("III"),
        Some("4") => Some("IV"),
        other => other,
    };
    parse_or_default(roman, AcademicYear::I, "year")
}

fn parse_or_default<T>(value: Option<&str>, default: T, field: &'static str) -> T
where
    T: std::str::FromStr,
{
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(field, value = raw, "Unrecognised legacy value, using default");
            default
        }),
    }
}

fn parse_date(value: Option<&Value>) -> NaiveDate {
    let parsed = match value {
        None | Some(Value::Null) => return default_date_of_event(),
        Some(Value::String(raw)) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::<FixedOffset>::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.date_naive())
            }),
        Some(Value::Number(millis)) => millis
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!(value = ?value, "Unparseable legacy dateOfEvent, using default");
        default_date_of_event()
    })
}

impl LegacyRecord {
    /// Build the row to insert, filling defaults and forcing Approved.
    #[must_use]
    pub fn into_active_model(
        self,
        id: String,
        now: DateTime<FixedOffset>,
    ) -> nomination::ActiveModel {
        let meta_data = match self.meta_data {
            Some(Value::Object(map)) => Value::Object(map),
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(other) => {
                tracing::warn!(value = %other, "Legacy metaData is not an object, dropping it");
                Value::Object(serde_json::Map::new())
            }
        };

        nomination::ActiveModel {
            id: Set(id),
            student_id: Set(self
                .student_id
                .unwrap_or_else(|| LEGACY_STUDENT_ID.to_string())),
            student_name: Set(self
                .student_name
                .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string())),
            reg_no: Set(self.reg_no.unwrap_or_else(|| DEFAULT_REG_NO.to_string())),
            email: Set(self.email.unwrap_or_default()),
            mobile: Set(self.mobile.unwrap_or_default()),
            year: Set(parse_year(self.year.as_deref())),
            department: Set(parse_or_default(
                self.department.as_deref(),
                Department::Cse,
                "department",
            )),
            category: Set(parse_or_default(
                self.category.as_deref(),
                DEFAULT_CATEGORY,
                "category",
            )),
            title: Set(self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string())),
            issuer: Set(self.issuer.unwrap_or_else(|| DEFAULT_ISSUER.to_string())),
            date_of_event: Set(parse_date(self.date_of_event.as_ref())),
            meta_data: Set(meta_data),
            photo_url: Set(None),
            proof_doc_url: Set(None),
            status: Set(NominationStatus::Approved),
            created_at: Set(now),
        }
    }
}

/// Destination for committed batches.
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Write every row or none of them.
    async fn commit_batch(&self, rows: Vec<nomination::ActiveModel>) -> AppResult<u64>;
}

#[async_trait]
impl BatchSink for NominationRepository {
    async fn commit_batch(&self, rows: Vec<nomination::ActiveModel>) -> AppResult<u64> {
        self.insert_batch(rows).await
    }
}

/// Summary of a finished import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub records: usize,
    pub batches: usize,
}

/// Read a legacy export from disk.
pub async fn load_legacy_records(path: &Path) -> AppResult<Vec<LegacyRecord>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Import(format!("cannot read {}: {e}", path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|e| AppError::Import(format!("{} is not a JSON array of records: {e}", path.display())))
}

/// Writes legacy records into the store.
#[derive(Clone)]
pub struct LegacyImporter {
    sink: Arc<dyn BatchSink>,
    batch_size: usize,
    id_gen: IdGenerator,
}

impl LegacyImporter {
    /// Create an importer. The batch size is capped at [`MAX_BATCH_SIZE`].
    #[must_use]
    pub fn new(sink: Arc<dyn BatchSink>, batch_size: usize) -> Self {
        Self {
            sink,
            batch_size: batch_size.clamp(1, MAX_BATCH_SIZE),
            id_gen: IdGenerator::new(),
        }
    }

    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Import records in order. The first failed batch aborts the run;
    /// batches committed before it stay committed.
    pub async fn import(&self, records: Vec<LegacyRecord>) -> AppResult<ImportReport> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let total = records.len();
        let mut report = ImportReport::default();
        let mut batch = Vec::with_capacity(self.batch_size.min(total));

        for record in records {
            batch.push(record.into_active_model(self.id_gen.generate(), now));
            if batch.len() == self.batch_size {
                self.commit(std::mem::take(&mut batch), &mut report, total)
                    .await?;
            }
        }

        if !batch.is_empty() {
            self.commit(batch, &mut report, total).await?;
        }

        tracing::info!(
            records = report.records,
            batches = report.batches,
            "Legacy import finished"
        );
        Ok(report)
    }

    /// Load a legacy export from `path` and import it.
    pub async fn import_file(&self, path: &Path) -> AppResult<ImportReport> {
        let records = load_legacy_records(path).await?;
        tracing::info!(path = %path.display(), records = records.len(), "Loaded legacy export");
        self.import(records).await
    }

    async fn commit(
        &self,
        rows: Vec<nomination::ActiveModel>,
        report: &mut ImportReport,
        total: usize,
    ) -> AppResult<()> {
        let size = rows.len();
        if let Err(e) = self.sink.commit_batch(rows).await {
            tracing::error!(
                error = %e,
                batch = report.batches + 1,
                committed = report.records,
                total,
                "Legacy batch commit failed"
            );
            return Err(e);
        }

        report.batches += 1;
        report.records += size;
        tracing::info!(
            batch = report.batches,
            size,
            committed = report.records,
            total,
            "Committed legacy batch"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every committed batch; optionally fails one of them.
    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<nomination::ActiveModel>>>,
        fail_on: Option<usize>,
    }

    #[async_trait]
    impl BatchSink for RecordingSink {
        async fn commit_batch(&self, rows: Vec<nomination::ActiveModel>) -> AppResult<u64> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on == Some(batches.len()) {
                return Err(AppError::Database("batch rejected".to_string()));
            }
            let count = rows.len() as u64;
            batches.push(rows);
            Ok(count)
        }
    }

    fn value<T: Into<sea_orm::Value> + Clone>(v: &ActiveValue<T>) -> T {
        match v {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => v.clone(),
            ActiveValue::NotSet => panic!("value not set"),
        }
    }

    fn records(n: usize) -> Vec<LegacyRecord> {
        (0..n)
            .map(|i| LegacyRecord {
                student_name: Some(format!("Student {i}")),
                ..LegacyRecord::default()
            })
            .collect()
    }

    #[test]
    fn test_defaults_for_empty_record() {
        let record: LegacyRecord = serde_json::from_value(json!({})).unwrap();
        let model = record.into_active_model("id1".to_string(), Utc::now().into());

        assert_eq!(value(&model.student_id), "legacy-import");
        assert_eq!(value(&model.student_name), "Unknown Student");
        assert_eq!(value(&model.reg_no), "N/A");
        assert_eq!(value(&model.email), "");
        assert_eq!(value(&model.mobile), "");
        assert_eq!(value(&model.year), AcademicYear::I);
        assert_eq!(value(&model.department), Department::Cse);
        assert_eq!(value(&model.category), Category::CoCurricular);
        assert_eq!(value(&model.title), "Legacy Achievement");
        assert_eq!(value(&model.issuer), "Legacy Record");
        assert_eq!(
            value(&model.date_of_event),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        assert_eq!(value(&model.meta_data), json!({}));
        assert_eq!(value(&model.photo_url), None);
        assert_eq!(value(&model.proof_doc_url), None);
        assert_eq!(value(&model.status), NominationStatus::Approved);
    }

    #[test]
    fn test_present_fields_are_kept() {
        let record: LegacyRecord = serde_json::from_value(json!({
            "studentId": "uid7",
            "studentName": "Ravi Kumar",
            "regNo": "19AI044",
            "year": "IV",
            "department": "AI/ML",
            "category": "Scholarships",
            "dateOfEvent": "2021-06-30",
            "metaData": { "scholarshipName": "Inspire", "legacyNote": "kept" },
            "status": "Rejected",
            "proofDocUrl": "https://old.example/proof.pdf"
        }))
        .unwrap();
        let model = record.into_active_model("id1".to_string(), Utc::now().into());

        assert_eq!(value(&model.student_id), "uid7");
        assert_eq!(value(&model.year), AcademicYear::IV);
        assert_eq!(value(&model.department), Department::AiMl);
        assert_eq!(value(&model.category), Category::Scholarships);
        assert_eq!(
            value(&model.date_of_event),
            NaiveDate::from_ymd_opt(2021, 6, 30).unwrap()
        );
        assert_eq!(
            value(&model.meta_data),
            json!({ "scholarshipName": "Inspire", "legacyNote": "kept" })
        );
        assert_eq!(value(&model.status), NominationStatus::Approved);
        assert_eq!(value(&model.proof_doc_url), None);
    }

    #[tokio::test]
    async fn test_numeric_scalars_are_read_as_text() {
        let path = std::env::temp_dir().join(format!("legacy-{}.json", IdGenerator::new().generate()));
        tokio::fs::write(
            &path,
            br#"[
                {"studentName": "A", "mobile": 9876543210, "regNo": 19104, "year": 3},
                {"studentName": "B", "year": "2", "title": ["not", "text"], "email": true}
            ]"#,
        )
        .await
        .unwrap();

        let records = load_legacy_records(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(records.len(), 2);

        let mut models = records
            .into_iter()
            .map(|r| r.into_active_model("id".to_string(), Utc::now().into()));
        let first = models.next().unwrap();
        assert_eq!(value(&first.mobile), "9876543210");
        assert_eq!(value(&first.reg_no), "19104");
        assert_eq!(value(&first.year), AcademicYear::III);

        let second = models.next().unwrap();
        assert_eq!(value(&second.year), AcademicYear::II);
        assert_eq!(value(&second.title), "Legacy Achievement");
        assert_eq!(value(&second.email), "true");
    }

    #[test]
    fn test_unknown_year_falls_back() {
        assert_eq!(parse_year(Some("7")), AcademicYear::I);
        assert_eq!(parse_year(Some("IV")), AcademicYear::IV);
        assert_eq!(parse_year(None), AcademicYear::I);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            parse_date(Some(&json!("2022-02-03T10:00:00Z"))),
            NaiveDate::from_ymd_opt(2022, 2, 3).unwrap()
        );
        assert_eq!(
            parse_date(Some(&json!(1_640_995_200_000_i64))),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
        );
        assert_eq!(parse_date(Some(&json!("soon"))), default_date_of_event());
        assert_eq!(parse_date(Some(&json!(null))), default_date_of_event());
    }

    #[tokio::test]
    async fn test_batches_of_at_most_500() {
        let sink = Arc::new(RecordingSink::default());
        let importer = LegacyImporter::new(sink.clone(), 500);

        let report = importer.import(records(1201)).await.unwrap();
        assert_eq!(report, ImportReport { records: 1201, batches: 3 });

        let sizes: Vec<usize> = sink.batches.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![500, 500, 201]);
        assert!(sink.batches.lock().unwrap().iter().flatten().all(|row| {
            value(&row.status) == NominationStatus::Approved && value(&row.proof_doc_url).is_none()
        }));
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_empty_batch() {
        let sink = Arc::new(RecordingSink::default());
        let importer = LegacyImporter::new(sink.clone(), 500);

        let report = importer.import(records(1000)).await.unwrap();
        assert_eq!(report.batches, 2);
    }

    #[tokio::test]
    async fn test_empty_import_commits_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let importer = LegacyImporter::new(sink.clone(), 500);

        let report = importer.import(Vec::new()).await.unwrap();
        assert_eq!(report, ImportReport::default());
        assert!(sink.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_is_capped() {
        let sink = Arc::new(RecordingSink::default());
        let importer = LegacyImporter::new(sink.clone(), 10_000);
        assert_eq!(importer.batch_size(), MAX_BATCH_SIZE);

        let small = LegacyImporter::new(sink, 0);
        assert_eq!(small.batch_size(), 1);
    }

    #[tokio::test]
    async fn test_failed_batch_aborts_run() {
        let sink = Arc::new(RecordingSink {
            fail_on: Some(1),
            ..RecordingSink::default()
        });
        let importer = LegacyImporter::new(sink.clone(), 2);

        let result = importer.import(records(5)).await;
        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_import_error() {
        let result = load_legacy_records(Path::new("/nonexistent/legacy.json")).await;
        assert!(matches!(result, Err(AppError::Import(_))));
    }

    #[tokio::test]
    async fn test_invalid_json_is_import_error() {
        let path = std::env::temp_dir().join(format!("legacy-{}.json", IdGenerator::new().generate()));
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let result = load_legacy_records(&path).await;
        assert!(matches!(result, Err(AppError::Import(_))));

        tokio::fs::write(&path, br#"[{"studentName": "A"}, {}]"#).await.unwrap();
        let records = load_legacy_records(&path).await.unwrap();
        assert_eq!(records.len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
