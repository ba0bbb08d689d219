//! Category-specific nomination fields.
//!
//! Each award category asks for its own pair of extra fields. They are
//! modelled as one typed struct per category so a Startup nomination cannot
//! carry a `journalName` by construction. The stored form is a flat JSON
//! object keyed by the camelCase field names.

use awards_db::entities::nomination::Category;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! field_set {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $key, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )+
        }

        impl $name {
            /// Field names this category asks for.
            pub const FIELDS: &'static [&'static str] = &[$($key),+];

            fn set(&mut self, key: &str, value: Option<String>) -> bool {
                match key {
                    $($key => {
                        self.$field = value;
                        true
                    })+
                    _ => false,
                }
            }

            fn to_map(&self) -> Map<String, Value> {
                let mut map = Map::new();
                $(
                    if let Some(value) = &self.$field {
                        map.insert($key.to_string(), Value::String(value.clone()));
                    }
                )+
                map
            }
        }
    };
}

field_set!(
    /// Research publication details.
    ResearchFields { journal_name => "journalName", impact_factor => "impactFactor" }
);
field_set!(
    /// Student startup details.
    StartupFields { startup_name => "startupName", funding_amount => "fundingAmount" }
);
field_set!(
    /// Internship details.
    InternshipFields { company => "company", stipend => "stipend" }
);
field_set!(
    /// Hackathon or programming contest details.
    CompetitiveTechFields { event_name => "eventName", rank => "rank" }
);
field_set!(
    /// Social outreach details.
    SocialOutreachFields { organization => "organization", beneficiaries_reached => "beneficiariesReached" }
);
field_set!(
    /// Scholarship details.
    ScholarshipFields { scholarship_name => "scholarshipName", amount => "amount" }
);
field_set!(
    /// Co-curricular activity details.
    CoCurricularFields { activity => "activity", position => "position" }
);

/// Category-specific metadata, tagged by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "fields")]
pub enum CategoryMetadata {
    Research(ResearchFields),
    Startup(StartupFields),
    Internship(InternshipFields),
    #[serde(rename = "Competitive_Tech")]
    CompetitiveTech(CompetitiveTechFields),
    #[serde(rename = "Social_Outreach")]
    SocialOutreach(SocialOutreachFields),
    Scholarships(ScholarshipFields),
    #[serde(rename = "Co_Curricular")]
    CoCurricular(CoCurricularFields),
}

impl Default for CategoryMetadata {
    fn default() -> Self {
        Self::empty(Category::default())
    }
}

impl CategoryMetadata {
    /// Metadata for `category` with no fields filled in.
    #[must_use]
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Research => Self::Research(ResearchFields::default()),
            Category::Startup => Self::Startup(StartupFields::default()),
            Category::Internship => Self::Internship(InternshipFields::default()),
            Category::CompetitiveTech => Self::CompetitiveTech(CompetitiveTechFields::default()),
            Category::SocialOutreach => Self::SocialOutreach(SocialOutreachFields::default()),
            Category::Scholarships => Self::Scholarships(ScholarshipFields::default()),
            Category::CoCurricular => Self::CoCurricular(CoCurricularFields::default()),
        }
    }

    /// Build metadata from loose key/value pairs.
    ///
    /// Keys outside the category's field set are returned rather than
    /// stored. Blank values count as not provided.
    pub fn from_entries<I, K, V>(category: Category, entries: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut metadata = Self::empty(category);
        let mut ignored = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            if !metadata.set(&key, value.into()) {
                ignored.push(key);
            }
        }
        (metadata, ignored)
    }

    /// The category these fields belong to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Research(_) => Category::Research,
            Self::Startup(_) => Category::Startup,
            Self::Internship(_) => Category::Internship,
            Self::CompetitiveTech(_) => Category::CompetitiveTech,
            Self::SocialOutreach(_) => Category::SocialOutreach,
            Self::Scholarships(_) => Category::Scholarships,
            Self::CoCurricular(_) => Category::CoCurricular,
        }
    }

    /// Field names the form should ask for.
    #[must_use]
    pub const fn requested_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Research(_) => ResearchFields::FIELDS,
            Self::Startup(_) => StartupFields::FIELDS,
            Self::Internship(_) => InternshipFields::FIELDS,
            Self::CompetitiveTech(_) => CompetitiveTechFields::FIELDS,
            Self::SocialOutreach(_) => SocialOutreachFields::FIELDS,
            Self::Scholarships(_) => ScholarshipFields::FIELDS,
            Self::CoCurricular(_) => CoCurricularFields::FIELDS,
        }
    }

    /// Set one field. Returns `false` when the key is not part of this
    /// category's field set.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let value = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };

        match self {
            Self::Research(f) => f.set(key, value),
            Self::Startup(f) => f.set(key, value),
            Self::Internship(f) => f.set(key, value),
            Self::CompetitiveTech(f) => f.set(key, value),
            Self::SocialOutreach(f) => f.set(key, value),
            Self::Scholarships(f) => f.set(key, value),
            Self::CoCurricular(f) => f.set(key, value),
        }
    }

    /// Flat JSON object as stored on the nomination.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map = match self {
            Self::Research(f) => f.to_map(),
            Self::Startup(f) => f.to_map(),
            Self::Internship(f) => f.to_map(),
            Self::CompetitiveTech(f) => f.to_map(),
            Self::SocialOutreach(f) => f.to_map(),
            Self::Scholarships(f) => f.to_map(),
            Self::CoCurricular(f) => f.to_map(),
        };
        Value::Object(map)
    }
}

/// Field names declared for a category.
#[must_use]
pub fn declared_fields(category: Category) -> &'static [&'static str] {
    CategoryMetadata::empty(category).requested_fields()
}

/// One row of the category catalogue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub category: Category,
    pub fields: &'static [&'static str],
}

/// Every category with its field set, in form order.
#[must_use]
pub fn category_catalog() -> Vec<CategoryDefinition> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryDefinition {
            category,
            fields: declared_fields(category),
        })
        .collect()
}
