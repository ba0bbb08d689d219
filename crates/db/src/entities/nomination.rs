//! Nomination entity.
//!
//! A nomination is the only record the portal keeps: one student, one
//! achievement, its supporting media, and where it sits in the review
//! workflow.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Review status of a nomination.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum NominationStatus {
    #[sea_orm(string_value = "Pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl NominationStatus {
    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Whether a reviewer may move a record from `self` to `next`.
    ///
    /// Review decisions overwrite each other freely. Only a record still in
    /// the queue can stay Pending; a decided record never goes back.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match next {
            Self::Approved | Self::Rejected => true,
            Self::Pending => matches!(self, Self::Pending),
        }
    }
}

/// Academic year of the student.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
#[derive(Default)]
pub enum AcademicYear {
    #[sea_orm(string_value = "I")]
    #[default]
    I,
    #[sea_orm(string_value = "II")]
    II,
    #[sea_orm(string_value = "III")]
    III,
    #[sea_orm(string_value = "IV")]
    IV,
}

impl AcademicYear {
    /// All years, in order.
    pub const ALL: [Self; 4] = [Self::I, Self::II, Self::III, Self::IV];

    /// Roman numeral label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
        }
    }
}

/// Department of the student.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[derive(Default)]
pub enum Department {
    #[sea_orm(string_value = "CSE")]
    #[serde(rename = "CSE")]
    #[default]
    Cse,
    #[sea_orm(string_value = "AI/ML")]
    #[serde(rename = "AI/ML")]
    AiMl,
}

impl Department {
    /// All departments.
    pub const ALL: [Self; 2] = [Self::Cse, Self::AiMl];

    /// Display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::AiMl => "AI/ML",
        }
    }
}

/// Award category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum Category {
    #[sea_orm(string_value = "Research")]
    #[default]
    Research,
    #[sea_orm(string_value = "Startup")]
    Startup,
    #[sea_orm(string_value = "Internship")]
    Internship,
    #[sea_orm(string_value = "Competitive_Tech")]
    #[serde(rename = "Competitive_Tech")]
    CompetitiveTech,
    #[sea_orm(string_value = "Social_Outreach")]
    #[serde(rename = "Social_Outreach")]
    SocialOutreach,
    #[sea_orm(string_value = "Scholarships")]
    Scholarships,
    #[sea_orm(string_value = "Co_Curricular")]
    #[serde(rename = "Co_Curricular")]
    CoCurricular,
}

impl Category {
    /// All categories, in form order.
    pub const ALL: [Self; 7] = [
        Self::Research,
        Self::Startup,
        Self::Internship,
        Self::CompetitiveTech,
        Self::SocialOutreach,
        Self::Scholarships,
        Self::CoCurricular,
    ];

    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "Research",
            Self::Startup => "Startup",
            Self::Internship => "Internship",
            Self::CompetitiveTech => "Competitive_Tech",
            Self::SocialOutreach => "Social_Outreach",
            Self::Scholarships => "Scholarships",
            Self::CoCurricular => "Co_Curricular",
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ParseEnumError::new($kind, s))
            }
        }
    };
}

impl_str_enum!(
    NominationStatus,
    "status",
    [
        NominationStatus::Pending,
        NominationStatus::Approved,
        NominationStatus::Rejected
    ]
);
impl_str_enum!(
    AcademicYear,
    "year",
    [
        AcademicYear::I,
        AcademicYear::II,
        AcademicYear::III,
        AcademicYear::IV
    ]
);
impl_str_enum!(Department, "department", [Department::Cse, Department::AiMl]);
impl_str_enum!(
    Category,
    "category",
    [
        Category::Research,
        Category::Startup,
        Category::Internship,
        Category::CompetitiveTech,
        Category::SocialOutreach,
        Category::Scholarships,
        Category::CoCurricular
    ]
);

/// Nomination model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nomination")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Submitting user, `anonymous`, or `legacy-import`.
    pub student_id: String,
    pub student_name: String,
    /// Alphanumeric registration number.
    pub reg_no: String,
    pub email: String,
    pub mobile: String,
    pub year: AcademicYear,
    pub department: Department,

    pub category: Category,
    pub title: String,
    pub issuer: String,
    pub date_of_event: Date,

    /// Category-specific fields, keyed by field name.
    #[sea_orm(column_type = "JsonBinary")]
    pub meta_data: Json,

    #[sea_orm(nullable)]
    pub photo_url: Option<String>,
    /// Always set for submitted nominations; null only for legacy rows.
    #[sea_orm(nullable)]
    pub proof_doc_url: Option<String>,

    pub status: NominationStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
