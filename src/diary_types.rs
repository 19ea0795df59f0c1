use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

const FILENAME_MAX_LENGTH: usize = 250;

/// Star rating in half-star steps (0, 0.5, 1.0, ... 5.0), stored as the
/// number of half stars so equality and zero checks stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub fn from_half_stars(half_stars: u8) -> Self {
        Rating(half_stars.min(10))
    }

    /// Convert the site's glyph rating ("★★★½") to half stars.
    pub fn from_star_glyphs(glyphs: &str) -> Self {
        let full = glyphs.chars().filter(|c| *c == '★').count() as u8;
        let half = if glyphs.contains('½') { 1 } else { 0 };
        Rating::from_half_stars(full * 2 + half)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

/// One logged movie-watch event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiaryRecord {
    pub title: String,
    pub liked: bool,
    pub rating: Rating,
    pub release_year: String,
}

/// A diary row is either a real entry or the per-year placeholder for a day
/// with nothing logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WatchRecord {
    Entry(DiaryRecord),
    NoActivity(String),
}

impl WatchRecord {
    pub fn is_entry(&self) -> bool {
        matches!(self, WatchRecord::Entry(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub records: Vec<WatchRecord>,
}

impl YearBucket {
    pub fn all_no_activity(&self) -> bool {
        self.records.iter().all(|r| !r.is_entry())
    }
}

/// Ordered year buckets, strictly descending by year. Iteration order is
/// significant: it drives layout order and earliest-year tie-breaks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiaryCollection {
    buckets: Vec<YearBucket>,
}

impl DiaryCollection {
    /// Build from (year, records) pairs; buckets are reordered descending by
    /// year so aggregation is keyed by year, not arrival order.
    pub fn from_buckets(mut pairs: Vec<(i32, Vec<WatchRecord>)>) -> Self {
        pairs.sort_by(|a, b| b.0.cmp(&a.0));
        DiaryCollection {
            buckets: pairs
                .into_iter()
                .map(|(year, records)| YearBucket { year, records })
                .collect(),
        }
    }

    pub fn buckets(&self) -> &[YearBucket] {
        &self.buckets
    }

    pub fn total_entries(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.records.iter().filter(|r| r.is_entry()).count())
            .sum()
    }

    pub fn all_no_activity(&self) -> bool {
        self.total_entries() == 0
    }

    /// All `Entry` records with their bucket year, in collection order.
    pub fn entries(&self) -> impl Iterator<Item = (i32, &DiaryRecord)> {
        self.buckets.iter().flat_map(|bucket| {
            bucket.records.iter().filter_map(move |record| match record {
                WatchRecord::Entry(entry) => Some((bucket.year, entry)),
                WatchRecord::NoActivity(_) => None,
            })
        })
    }
}

/// The movie picked to search a featured still for. At most one per render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedQuery {
    pub display_text: String,
    pub source_year: i32,
    pub raw_title: String,
}

/// Replace anything that is not alphanumeric with `_` and cap the length.
pub fn make_filename_safe(title: &str) -> String {
    static SANITIZER: OnceLock<Regex> = OnceLock::new();
    let re = SANITIZER.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid pattern"));
    let safe = re.replace_all(title, "_");
    safe.chars().take(FILENAME_MAX_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> WatchRecord {
        WatchRecord::Entry(DiaryRecord {
            title: title.to_string(),
            liked: false,
            rating: Rating::from_half_stars(0),
            release_year: "2000".to_string(),
        })
    }

    #[test]
    fn rating_display() {
        assert_eq!(Rating::from_half_stars(8).to_string(), "4");
        assert_eq!(Rating::from_half_stars(9).to_string(), "4.5");
        assert_eq!(Rating::from_half_stars(0).to_string(), "0");
        assert!(Rating::from_half_stars(0).is_zero());
        assert!(!Rating::from_half_stars(1).is_zero());
    }

    #[test]
    fn rating_from_star_glyphs() {
        assert_eq!(Rating::from_star_glyphs("★★★½"), Rating::from_half_stars(7));
        assert_eq!(Rating::from_star_glyphs("★★★★★"), Rating::from_half_stars(10));
        assert_eq!(Rating::from_star_glyphs("½"), Rating::from_half_stars(1));
        assert_eq!(Rating::from_star_glyphs(""), Rating::from_half_stars(0));
    }

    #[test]
    fn collection_orders_buckets_descending() {
        let collection = DiaryCollection::from_buckets(vec![
            (2022, vec![entry("B")]),
            (2024, vec![entry("A")]),
            (2023, vec![WatchRecord::NoActivity("nothing".to_string())]),
        ]);
        let years: Vec<i32> = collection.buckets().iter().map(|b| b.year).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);
        assert_eq!(collection.total_entries(), 2);
        assert!(!collection.all_no_activity());
    }

    #[test]
    fn collection_all_no_activity() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![WatchRecord::NoActivity("nothing".to_string())]),
            (2023, vec![WatchRecord::NoActivity("nothing".to_string())]),
        ]);
        assert!(collection.all_no_activity());
        assert_eq!(collection.entries().count(), 0);
    }

    #[test]
    fn filename_sanitization() {
        assert_eq!(make_filename_safe("Blade Runner 2049"), "Blade_Runner_2049");
        assert_eq!(make_filename_safe("Amélie!"), "Am_lie_");
        let long = "x".repeat(400);
        assert_eq!(make_filename_safe(&long).len(), 250);
    }
}
