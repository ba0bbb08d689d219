//! Public wall of fame.
//!
//! Shows approved nominations one at a time as a carousel, optionally
//! narrowed by academic year and category.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use awards_common::AppResult;
use awards_db::entities::nomination::{self, AcademicYear, Category, Department};
use serde::Serialize;

use super::feed::{NominationFeed, NominationQuery, Snapshot, Subscription};

/// Message shown when no approved nomination matches the filters.
pub const EMPTY_WALL_MESSAGE: &str = "No achievements to show yet for this selection.";

/// Placeholder initials when a name yields none.
const FALLBACK_INITIALS: &str = "UA";

/// Either every value or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Filter<T> {
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

/// Initials for a name: the first letter of each of the first two
/// space-separated words, upper-cased.
#[must_use]
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split(' ')
        .filter(|part| !part.is_empty())
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if initials.is_empty() {
        FALLBACK_INITIALS.to_string()
    } else {
        initials
    }
}

/// What the wall shows for one nomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallCard {
    pub id: String,
    pub student_name: String,
    pub year: AcademicYear,
    pub department: Department,
    pub category: Category,
    pub title: String,
    pub issuer: String,
    pub photo_url: Option<String>,
    /// Set when there is no photo.
    pub initials: Option<String>,
}

impl From<&nomination::Model> for WallCard {
    fn from(model: &nomination::Model) -> Self {
        let initials = model
            .photo_url
            .is_none()
            .then(|| initials(&model.student_name));
        Self {
            id: model.id.clone(),
            student_name: model.student_name.clone(),
            year: model.year,
            department: model.department,
            category: model.category,
            title: model.title.clone(),
            issuer: model.issuer.clone(),
            photo_url: model.photo_url.clone(),
            initials,
        }
    }
}

/// Rendered state of the wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum WallView {
    Empty {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Entry {
        card: WallCard,
        index: usize,
        total: usize,
        show_controls: bool,
    },
}

/// Carousel over approved nominations.
#[derive(Debug, Clone, Default)]
pub struct WallOfFame {
    items: Snapshot,
    year: Filter<AcademicYear>,
    category: Filter<Category>,
    index: usize,
}

impl WallOfFame {
    #[must_use]
    pub fn new(items: Snapshot) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Take a new approved snapshot and go back to the first entry.
    pub fn replace_items(&mut self, items: Snapshot) {
        self.items = items;
        self.index = 0;
    }

    pub fn set_year_filter(&mut self, year: Filter<AcademicYear>) {
        self.year = year;
        self.index = 0;
    }

    pub fn set_category_filter(&mut self, category: Filter<Category>) {
        self.category = category;
        self.index = 0;
    }

    #[must_use]
    pub const fn year_filter(&self) -> Filter<AcademicYear> {
        self.year
    }

    #[must_use]
    pub const fn category_filter(&self) -> Filter<Category> {
        self.category
    }

    /// Entries matching both filters, in snapshot order.
    pub fn filtered(&self) -> impl Iterator<Item = &nomination::Model> {
        self.items
            .iter()
            .filter(|item| self.year.matches(&item.year) && self.category.matches(&item.category))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filtered().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered().next().is_none()
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> Option<&nomination::Model> {
        self.filtered().nth(self.index)
    }

    /// Advance, wrapping to the first entry after the last.
    pub fn next(&mut self) {
        let len = self.len();
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    /// Go back, wrapping to the last entry before the first.
    pub fn previous(&mut self) {
        let len = self.len();
        if len > 0 {
            self.index = (self.index + len - 1) % len;
        }
    }

    /// Jump to a position, wrapping when it is past the end.
    pub fn jump_to(&mut self, index: usize) {
        let len = self.len();
        self.index = if len == 0 { 0 } else { index % len };
    }

    /// Navigation is only offered when there is somewhere to go.
    #[must_use]
    pub fn shows_controls(&self) -> bool {
        self.len() > 1
    }

    #[must_use]
    pub fn view(&self) -> WallView {
        match self.current() {
            Some(current) => WallView::Entry {
                card: WallCard::from(current),
                index: self.index,
                total: self.len(),
                show_controls: self.shows_controls(),
            },
            None => WallView::Empty {
                message: EMPTY_WALL_MESSAGE.to_string(),
            },
        }
    }
}

/// Service backing the public wall.
#[derive(Clone)]
pub struct WallService {
    feed: Arc<dyn NominationFeed>,
}

impl WallService {
    #[must_use]
    pub fn new(feed: Arc<dyn NominationFeed>) -> Self {
        Self { feed }
    }

    /// Live view of approved nominations.
    pub async fn subscribe(&self) -> AppResult<Subscription> {
        self.feed.subscribe(NominationQuery::Approved).await
    }

    /// One-off wall view for the given filters and position.
    pub async fn view(
        &self,
        year: Filter<AcademicYear>,
        category: Filter<Category>,
        index: usize,
    ) -> AppResult<WallView> {
        let mut wall = WallOfFame::new(self.feed.snapshot(NominationQuery::Approved).await?);

        wall.set_year_filter(year);
        wall.set_category_filter(category);
        wall.jump_to(index);
        Ok(wall.view())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::feed::tests::{MemorySource, model};
    use crate::services::feed::{ChangeNotifier, LiveFeed};
    use awards_db::entities::nomination::NominationStatus;

    fn approved(id: &str, year: AcademicYear, category: Category) -> nomination::Model {
        let mut m = model(id, NominationStatus::Approved);
        m.year = year;
        m.category = category;
        m
    }

    fn wall(items: Vec<nomination::Model>) -> WallOfFame {
        WallOfFame::new(Arc::new(items))
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("asha rao"), "AR");
        assert_eq!(initials("Ravi Kumar Sharma"), "RK");
        assert_eq!(initials("  priya   s "), "PS");
        assert_eq!(initials("Madonna"), "M");
        assert_eq!(initials(""), "UA");
        assert_eq!(initials("   "), "UA");
    }

    #[test]
    fn test_year_filter_counts_and_resets() {
        let mut wall = wall(vec![
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::I, Category::Startup),
            approved("c", AcademicYear::II, Category::Research),
        ]);
        wall.next();
        wall.next();
        assert_eq!(wall.index(), 2);

        wall.set_year_filter(Filter::Only(AcademicYear::I));
        assert_eq!(wall.len(), 2);
        assert_eq!(wall.index(), 0);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let mut wall = wall(vec![
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::I, Category::Startup),
            approved("c", AcademicYear::II, Category::Startup),
        ]);
        wall.set_year_filter(Filter::Only(AcademicYear::I));
        wall.set_category_filter(Filter::Only(Category::Startup));

        assert_eq!(wall.len(), 1);
        assert_eq!(wall.current().unwrap().id, "b");
        assert!(!wall.shows_controls());
    }

    #[test]
    fn test_category_filter_resets_index() {
        let mut wall = wall(vec![
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::I, Category::Research),
        ]);
        wall.next();
        wall.set_category_filter(Filter::Only(Category::Research));
        assert_eq!(wall.index(), 0);
    }

    #[test]
    fn test_cycling_is_circular() {
        let mut wall = wall(vec![
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::II, Category::Research),
            approved("c", AcademicYear::III, Category::Research),
        ]);

        for _ in 0..3 {
            wall.next();
        }
        assert_eq!(wall.index(), 0);

        wall.previous();
        assert_eq!(wall.index(), 2);
        assert_eq!(wall.current().unwrap().id, "c");
    }

    #[test]
    fn test_new_snapshot_resets_index() {
        let mut wall = wall(vec![
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::I, Category::Research),
        ]);
        wall.next();
        wall.replace_items(Arc::new(vec![
            approved("c", AcademicYear::I, Category::Research),
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::I, Category::Research),
        ]));
        assert_eq!(wall.index(), 0);
        assert_eq!(wall.current().unwrap().id, "c");
    }

    #[test]
    fn test_empty_view() {
        let mut wall = wall(vec![approved("a", AcademicYear::I, Category::Research)]);
        wall.set_year_filter(Filter::Only(AcademicYear::IV));

        wall.next();
        wall.previous();
        assert_eq!(
            wall.view(),
            WallView::Empty {
                message: EMPTY_WALL_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_entry_view_uses_initials_without_photo() {
        let mut with_photo = approved("b", AcademicYear::I, Category::Research);
        with_photo.photo_url = Some("/files/photos/uid1/1-me.png".to_string());
        let mut wall = wall(vec![approved("a", AcademicYear::I, Category::Research), with_photo]);

        let WallView::Entry {
            card,
            total,
            show_controls,
            ..
        } = wall.view()
        else {
            panic!("expected an entry");
        };
        assert_eq!(card.initials.as_deref(), Some("AR"));
        assert_eq!(total, 2);
        assert!(show_controls);

        wall.next();
        let WallView::Entry { card, .. } = wall.view() else {
            panic!("expected an entry");
        };
        assert!(card.initials.is_none());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("All".parse::<Filter<AcademicYear>>().unwrap(), Filter::All);
        assert_eq!("".parse::<Filter<Category>>().unwrap(), Filter::All);
        assert_eq!(
            "Co_Curricular".parse::<Filter<Category>>().unwrap(),
            Filter::Only(Category::CoCurricular)
        );
        assert!("V".parse::<Filter<AcademicYear>>().is_err());
        assert_eq!(Filter::Only(AcademicYear::III).to_string(), "III");
    }

    #[tokio::test]
    async fn test_service_view_only_shows_approved() {
        let source = Arc::new(MemorySource::default());
        source.rows.lock().unwrap().extend([
            approved("a", AcademicYear::I, Category::Research),
            approved("b", AcademicYear::I, Category::Startup),
            model("c", NominationStatus::Pending),
        ]);
        let service = WallService::new(Arc::new(LiveFeed::new(source, ChangeNotifier::default())));

        let view = service
            .view(Filter::Only(AcademicYear::I), Filter::All, 3)
            .await
            .unwrap();
        let WallView::Entry { card, index, total, .. } = view else {
            panic!("expected an entry");
        };
        assert_eq!(total, 2);
        assert_eq!(index, 1);
        assert_eq!(card.id, "b");
    }
}
