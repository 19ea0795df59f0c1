use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use rayon::prelude::*;
use regex::Regex;

use crate::diary_types::{DiaryCollection, DiaryRecord, Rating, WatchRecord};

pub const NO_ACTIVITY_MESSAGE: &str = "No cinema consumed.";

#[derive(Debug, thiserror::Error)]
pub enum DiaryError {
    #[error("Diary request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
}

/// Supplies one day's diary rows for one historical year. A missing diary
/// table is not an error; it yields the `NoActivity` sentinel.
pub trait DiarySource: Send + Sync {
    fn fetch_day(
        &self,
        username: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<WatchRecord>, DiaryError>;
}

/// Fetch the whole historical window (reference year − 1 down to the year
/// after the floor) and aggregate by year key, so output is deterministic
/// regardless of fetch completion order. Per-year failures degrade to
/// `NoActivity`.
pub fn collect_window(
    source: &dyn DiarySource,
    username: &str,
    reference_date: NaiveDate,
    floor_year: i32,
) -> DiaryCollection {
    let years: Vec<i32> = ((floor_year + 1)..reference_date.year()).rev().collect();

    let buckets: Vec<(i32, Vec<WatchRecord>)> = years
        .par_iter()
        .map(|&year| {
            let records = source
                .fetch_day(username, year, reference_date.month(), reference_date.day())
                .unwrap_or_else(|e| {
                    warn!("Diary fetch for {} in {} failed: {}", username, year, e);
                    vec![WatchRecord::NoActivity(NO_ACTIVITY_MESSAGE.to_string())]
                });
            (year, records)
        })
        .collect();

    DiaryCollection::from_buckets(buckets)
}

/// Scrapes the public per-day diary pages.
pub struct LetterboxdSource {
    base_url: String,
}

impl LetterboxdSource {
    pub fn new(base_url: String) -> Self {
        LetterboxdSource { base_url }
    }
}

impl DiarySource for LetterboxdSource {
    fn fetch_day(
        &self,
        username: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<WatchRecord>, DiaryError> {
        let url = format!(
            "{}/{}/films/diary/for/{}/{:02}/{:02}",
            self.base_url, username, year, month, day
        );
        debug!("Fetching diary page {}", url);
        let mut response = ureq::get(&url).call().map_err(Box::new)?;
        let html = response
            .body_mut()
            .read_to_string()
            .map_err(Box::new)?;
        Ok(parse_diary_day(&html))
    }
}

fn diary_row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<tr[^>]*class="[^"]*diary-entry-row[^"]*"[^>]*>(.*?)</tr>"#)
            .expect("valid pattern")
    })
}

fn film_title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)<td[^>]*class="[^"]*td-film-details[^"]*"[^>]*>.*?<h3[^>]*>\s*<a[^>]*>(.*?)</a>"#,
        )
        .expect("valid pattern")
    })
}

fn rating_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<span[^>]*class="[^"]*\brating\b[^"]*"[^>]*>(.*?)</span>"#)
            .expect("valid pattern")
    })
}

fn released_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<td[^>]*class="[^"]*td-released[^"]*"[^>]*>\s*<span[^>]*>(.*?)</span>"#)
            .expect("valid pattern")
    })
}

/// Extract the day's watch records from a diary page. No diary table means
/// nothing was logged that day in that year.
pub fn parse_diary_day(html: &str) -> Vec<WatchRecord> {
    if !html.contains(r#"id="diary-table""#) {
        return vec![WatchRecord::NoActivity(NO_ACTIVITY_MESSAGE.to_string())];
    }

    let mut records = Vec::new();
    for row in diary_row_re().captures_iter(html) {
        let row_html = &row[1];
        let Some(title) = film_title_re()
            .captures(row_html)
            .map(|c| c[1].trim().to_string())
        else {
            continue;
        };

        let rating = rating_re()
            .captures(row_html)
            .map(|c| Rating::from_star_glyphs(c[1].trim()))
            .unwrap_or_else(|| Rating::from_half_stars(0));

        let release_year = released_re()
            .captures(row_html)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();

        records.push(WatchRecord::Entry(DiaryRecord {
            title,
            liked: row_html.contains("icon-liked"),
            rating,
            release_year,
        }));
    }

    if records.is_empty() {
        return vec![WatchRecord::NoActivity(NO_ACTIVITY_MESSAGE.to_string())];
    }
    records
}
