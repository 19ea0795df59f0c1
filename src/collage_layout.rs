use crate::diary_types::{DiaryCollection, WatchRecord};
use crate::fonts::{FontRole, TextMeasure};

pub const CANVAS_WIDTH: u32 = 1872;
pub const CANVAS_HEIGHT: u32 = 1404;

/// Fraction of the canvas height where each column starts.
const COLUMN_TOP_FRACTION: f32 = 0.40;
const TITLE_WRAP_CHARS: usize = 30;
const YEAR_LABEL_INDENT: f32 = 50.0;
const YEAR_LABEL_ADVANCE: f32 = 40.0;
const LINE_ADVANCE: f32 = 50.0;
const RECORD_ADVANCE: f32 = 50.0;
const BUCKET_GAP: f32 = 40.0;
const RELEASED_GAP: f32 = 10.0;
const RATING_GAP: f32 = 20.0;
const HEART_GAP: f32 = 10.0;

pub const COLOR_TEXT: [u8; 4] = [255, 255, 255, 255];
pub const COLOR_YEAR_LABEL: [u8; 4] = [0x00, 0xe0, 0x54, 255];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        role: FontRole,
        color: [u8; 4],
    },
    Heart {
        x: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub origin_x: f32,
    pub column_spacing: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            origin_x: 225.0,
            column_spacing: (CANVAS_WIDTH / 2) as f32,
        }
    }
}

/// Explicit layout position, threaded through the algorithm instead of
/// mutable counters living outside it.
#[derive(Debug, Clone, Copy)]
struct LayoutCursor {
    column_x: f32,
    y: f32,
    count_in_column: usize,
}

/// Greedy two-line title wrap. Returns the first line and, for titles over
/// the wrap limit, the remainder. A first word longer than the limit yields
/// an empty first line with the whole title on the second.
pub fn split_title(title: &str) -> (String, Option<String>) {
    if title.chars().count() <= TITLE_WRAP_CHARS {
        return (title.to_string(), None);
    }
    let mut line = String::new();
    for word in title.split_whitespace() {
        if line.chars().count() + word.chars().count() <= TITLE_WRAP_CHARS {
            line.push_str(word);
            line.push(' ');
        } else {
            break;
        }
    }
    let first = line.trim_end().to_string();
    let second = title
        .chars()
        .skip(first.chars().count())
        .collect::<String>()
        .trim()
        .to_string();
    (first, Some(second))
}

/// Place every diary entry into the two-column collage and emit draw
/// commands. Pure: pixel work happens in the renderer.
pub fn layout_collage(
    collection: &DiaryCollection,
    params: &LayoutParams,
    metrics: &dyn TextMeasure,
) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    let total = collection.total_entries();
    let column_top = COLUMN_TOP_FRACTION * params.canvas_height as f32;
    let mut cursor = LayoutCursor {
        column_x: params.origin_x,
        y: column_top,
        count_in_column: 0,
    };

    // Nothing watched on this day in any year: render only the placeholder
    // messages.
    if total == 0 {
        for bucket in collection.buckets() {
            for record in &bucket.records {
                if let WatchRecord::NoActivity(message) = record {
                    ops.push(DrawOp::Text {
                        x: cursor.column_x,
                        y: cursor.y,
                        text: message.clone(),
                        role: FontRole::EntryTitle,
                        color: COLOR_TEXT,
                    });
                    cursor.y += RECORD_ADVANCE;
                }
            }
        }
        return ops;
    }

    // Odd totals put the extra record in the first column.
    let first_column_size = total.div_ceil(2);

    for bucket in collection.buckets() {
        // Years with no activity disappear entirely when anything was
        // watched: no placeholder, no year label.
        if bucket.all_no_activity() {
            continue;
        }

        ops.push(DrawOp::Text {
            x: cursor.column_x - YEAR_LABEL_INDENT,
            y: cursor.y,
            text: bucket.year.to_string(),
            role: FontRole::YearLabel,
            color: COLOR_YEAR_LABEL,
        });
        cursor.y += YEAR_LABEL_ADVANCE;

        for record in &bucket.records {
            let WatchRecord::Entry(entry) = record else {
                continue;
            };

            let (first_line, second_line) = split_title(&entry.title);
            ops.push(DrawOp::Text {
                x: cursor.column_x,
                y: cursor.y,
                text: first_line.clone(),
                role: FontRole::EntryTitle,
                color: COLOR_TEXT,
            });
            let last_line = match second_line {
                Some(second) => {
                    cursor.y += LINE_ADVANCE;
                    ops.push(DrawOp::Text {
                        x: cursor.column_x,
                        y: cursor.y,
                        text: second.clone(),
                        role: FontRole::EntryTitle,
                        color: COLOR_TEXT,
                    });
                    second
                }
                None => first_line,
            };

            let last_line_width = metrics.line_width(&last_line, FontRole::EntryTitle);
            let released = format!("({})", entry.release_year);
            let released_width = metrics.line_width(&released, FontRole::EntryTitle);
            ops.push(DrawOp::Text {
                x: cursor.column_x + last_line_width + RELEASED_GAP,
                y: cursor.y,
                text: released,
                role: FontRole::EntryTitle,
                color: COLOR_TEXT,
            });

            if !entry.rating.is_zero() {
                ops.push(DrawOp::Text {
                    x: cursor.column_x + last_line_width + released_width + RATING_GAP,
                    y: cursor.y,
                    text: format!("{} stars", entry.rating),
                    role: FontRole::EntryTitle,
                    color: COLOR_TEXT,
                });
            }

            if entry.liked {
                ops.push(DrawOp::Heart {
                    x: cursor.column_x + last_line_width + released_width + RELEASED_GAP + HEART_GAP,
                    y: cursor.y,
                });
            }

            cursor.y += RECORD_ADVANCE;
            cursor.count_in_column += 1;

            // The switch may land mid-bucket; the year label is not
            // re-emitted for the continuation.
            if cursor.count_in_column == first_column_size {
                cursor.column_x += params.column_spacing;
                cursor.y = column_top;
                cursor.count_in_column = 0;
            }
        }

        cursor.y += BUCKET_GAP;
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary_types::{DiaryCollection, DiaryRecord, Rating, WatchRecord};

    /// Fixed-width metrics: every char is 10px wide, every extent 20px tall.
    pub struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn line_width(&self, text: &str, _role: FontRole) -> f32 {
            text.chars().count() as f32 * 10.0
        }

        fn text_extent(&self, text: &str, role: FontRole) -> (f32, f32) {
            (self.line_width(text, role), 20.0)
        }
    }

    fn entry(title: &str, liked: bool, half_stars: u8, year: &str) -> WatchRecord {
        WatchRecord::Entry(DiaryRecord {
            title: title.to_string(),
            liked,
            rating: Rating::from_half_stars(half_stars),
            release_year: year.to_string(),
        })
    }

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Heart { .. } => None,
            })
            .collect()
    }

    #[test]
    fn short_title_single_line() {
        assert_eq!(split_title("Heat"), ("Heat".to_string(), None));
        let exactly_30 = "a".repeat(30);
        assert_eq!(split_title(&exactly_30), (exactly_30.clone(), None));
    }

    #[test]
    fn long_title_rejoins_to_original() {
        let title = "A Long Movie Title That Exceeds Thirty Characters";
        let (first, second) = split_title(title);
        let second = second.expect("two lines");
        assert!(first.chars().count() <= 30);
        assert_eq!(format!("{} {}", first, second), title);
    }

    #[test]
    fn oversized_first_word_yields_empty_first_line() {
        let title = "Supercalifragilisticexpialidociousfilm the sequel";
        let (first, second) = split_title(title);
        assert_eq!(first, "");
        assert_eq!(second.as_deref(), Some(title));
    }

    #[test]
    fn column_split_is_ceil_half() {
        let records: Vec<WatchRecord> = (0..5).map(|i| entry(&format!("M{}", i), false, 0, "2001")).collect();
        let collection = DiaryCollection::from_buckets(vec![(2024, records)]);
        let params = LayoutParams::default();
        let ops = layout_collage(&collection, &params, &FixedMeasure);

        let first_column_titles = ops
            .iter()
            .filter(|op| {
                matches!(op, DrawOp::Text { x, text, .. }
                    if *x == params.origin_x && text.starts_with('M'))
            })
            .count();
        let second_column_titles = ops
            .iter()
            .filter(|op| {
                matches!(op, DrawOp::Text { x, text, .. }
                    if *x == params.origin_x + params.column_spacing && text.starts_with('M'))
            })
            .count();
        assert_eq!(first_column_titles, 3); // ceil(5 / 2)
        assert_eq!(second_column_titles, 2);
    }

    #[test]
    fn second_column_restarts_at_top() {
        let records: Vec<WatchRecord> = (0..4).map(|i| entry(&format!("M{}", i), false, 0, "2001")).collect();
        let collection = DiaryCollection::from_buckets(vec![(2024, records)]);
        let params = LayoutParams::default();
        let ops = layout_collage(&collection, &params, &FixedMeasure);

        let column_top = 0.40 * params.canvas_height as f32;
        let m2 = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, y, text, .. } if text == "M2" => Some((*x, *y)),
                _ => None,
            })
            .expect("M2 placed");
        assert_eq!(m2.0, params.origin_x + params.column_spacing);
        assert_eq!(m2.1, column_top);
    }

    #[test]
    fn all_no_activity_renders_placeholders_only() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![WatchRecord::NoActivity("No cinema consumed.".to_string())]),
            (2023, vec![WatchRecord::NoActivity("No cinema consumed.".to_string())]),
        ]);
        let ops = layout_collage(&collection, &LayoutParams::default(), &FixedMeasure);
        assert_eq!(texts(&ops), vec!["No cinema consumed.", "No cinema consumed."]);
        assert!(ops.iter().all(|op| matches!(op, DrawOp::Text { .. })));
    }

    #[test]
    fn no_activity_bucket_skipped_when_entries_exist() {
        let collection = DiaryCollection::from_buckets(vec![
            (2024, vec![entry("Heat", false, 0, "1995")]),
            (2023, vec![WatchRecord::NoActivity("No cinema consumed.".to_string())]),
        ]);
        let ops = layout_collage(&collection, &LayoutParams::default(), &FixedMeasure);
        let labels = texts(&ops);
        assert!(labels.contains(&"2024"));
        assert!(!labels.contains(&"2023"));
        assert!(!labels.contains(&"No cinema consumed."));
    }

    #[test]
    fn entry_annotations_follow_measured_widths() {
        let collection = DiaryCollection::from_buckets(vec![(
            2024,
            vec![entry("Heat", true, 9, "1995")],
        )]);
        let params = LayoutParams::default();
        let ops = layout_collage(&collection, &params, &FixedMeasure);

        // "Heat" is 40px wide, "(1995)" is 60px wide under FixedMeasure.
        let released_x = params.origin_x + 40.0 + 10.0;
        let rating_x = params.origin_x + 40.0 + 60.0 + 20.0;
        let heart_x = params.origin_x + 40.0 + 60.0 + 10.0 + 10.0;

        assert!(ops.iter().any(|op| matches!(op, DrawOp::Text { x, text, .. }
            if text == "(1995)" && *x == released_x)));
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Text { x, text, .. }
            if text == "4.5 stars" && *x == rating_x)));
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Heart { x, .. } if *x == heart_x)));
    }

    #[test]
    fn unrated_entry_has_no_stars_text() {
        let collection =
            DiaryCollection::from_buckets(vec![(2024, vec![entry("Heat", false, 0, "1995")])]);
        let ops = layout_collage(&collection, &LayoutParams::default(), &FixedMeasure);
        assert!(!texts(&ops).iter().any(|t| t.ends_with("stars")));
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Heart { .. })));
    }

    #[test]
    fn two_line_title_advances_between_lines() {
        let title = "A Long Movie Title That Exceeds Thirty Characters";
        let collection =
            DiaryCollection::from_buckets(vec![(2024, vec![entry(title, false, 0, "2020")])]);
        let params = LayoutParams::default();
        let ops = layout_collage(&collection, &params, &FixedMeasure);

        let (first, second) = split_title(title);
        let second = second.expect("two lines");
        let first_y = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { y, text, .. } if *text == first => Some(*y),
                _ => None,
            })
            .expect("first line placed");
        let second_y = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { y, text, .. } if *text == second => Some(*y),
                _ => None,
            })
            .expect("second line placed");
        assert_eq!(second_y - first_y, 50.0);

        // Release year hangs off the second line's width.
        let released_x = params.origin_x + second.chars().count() as f32 * 10.0 + 10.0;
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Text { x, text, .. }
            if text == "(2020)" && *x == released_x)));
    }
}
