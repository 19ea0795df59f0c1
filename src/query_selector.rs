use crate::diary_types::{DiaryCollection, DiaryRecord, SelectedQuery};

/// Pick the one movie the featured still is searched for.
///
/// Priority: a lone entry wins outright; then a lone liked entry; then the
/// liked entry from the earliest year; then any entry from the earliest
/// year. Ties within a year go to the first-encountered record.
pub fn select_thumbnail_query(collection: &DiaryCollection) -> Option<SelectedQuery> {
    let entries: Vec<(i32, &DiaryRecord)> = collection.entries().collect();

    let (year, record) = match entries.as_slice() {
        [] => return None,
        [only] => *only,
        _ => {
            let liked: Vec<(i32, &DiaryRecord)> =
                entries.iter().copied().filter(|(_, r)| r.liked).collect();
            match liked.as_slice() {
                [only] => *only,
                [] => earliest(&entries)?,
                _ => earliest(&liked)?,
            }
        }
    };

    Some(SelectedQuery {
        display_text: format!("{} ({})", record.title, record.release_year),
        source_year: year,
        raw_title: record.title.clone(),
    })
}

fn earliest<'a>(entries: &[(i32, &'a DiaryRecord)]) -> Option<(i32, &'a DiaryRecord)> {
    // min_by_key keeps the first of equal keys, which preserves
    // first-encountered order within a bucket.
    entries.iter().copied().min_by_key(|(year, _)| *year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary_types::{Rating, WatchRecord};

    fn entry(title: &str, liked: bool) -> WatchRecord {
        WatchRecord::Entry(DiaryRecord {
            title: title.to_string(),
            liked,
            rating: Rating::from_half_stars(6),
            release_year: "2010".to_string(),
        })
    }

    #[test]
    fn empty_collection_selects_nothing() {
        let collection = DiaryCollection::from_buckets(vec![(
            2024,
            vec![WatchRecord::NoActivity("No cinema consumed.".to_string())],
        )]);
        assert_eq!(select_thumbnail_query(&collection), None);
    }

    #[test]
    fn single_entry_wins() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![entry("Alien", false)]),
            (2023, vec![WatchRecord::NoActivity("No cinema consumed.".to_string())]),
        ]);
        let query = select_thumbnail_query(&collection).expect("selected");
        assert_eq!(query.display_text, "Alien (2010)");
        assert_eq!(query.source_year, 2024);
        assert_eq!(query.raw_title, "Alien");
    }

    #[test]
    fn single_liked_among_many_wins() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![entry("Alien", false), entry("Aliens", true)]),
            (2022, vec![entry("Alien 3", false)]),
        ]);
        let query = select_thumbnail_query(&collection).expect("selected");
        assert_eq!(query.raw_title, "Aliens");
        assert_eq!(query.source_year, 2024);
    }

    #[test]
    fn multiple_liked_resolve_to_earliest_year() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![entry("Alien", true)]),
            (2021, vec![entry("Blade Runner", true), entry("Stalker", true)]),
        ]);
        let query = select_thumbnail_query(&collection).expect("selected");
        // Earliest year, first-encountered within the bucket.
        assert_eq!(query.raw_title, "Blade Runner");
        assert_eq!(query.source_year, 2021);
    }

    #[test]
    fn none_liked_resolves_to_earliest_year() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![entry("Alien", false)]),
            (2020, vec![entry("Solaris", false), entry("Stalker", false)]),
        ]);
        let query = select_thumbnail_query(&collection).expect("selected");
        assert_eq!(query.raw_title, "Solaris");
        assert_eq!(query.source_year, 2020);
    }
}
