//! Reading plan input and resolution against the text store
//!
//! Plans come from outside as already-structured data (a yearly calendar of
//! book/chapter ranges). This module only looks them up by date and turns
//! ranges into display labels and chapter texts.

use crate::books::display_name;
use crate::error::Result;
use crate::store::TextStore;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleRange {
    pub book: String,
    pub start_chapter: u32,
    pub end_chapter: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReading {
    pub ranges: Vec<BibleRange>,
    #[serde(default)]
    pub completed: bool,
}

/// Day of month ("1".."31") to reading
pub type MonthlyPlan = HashMap<String, DailyReading>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPlan {
    pub id: String,
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    /// Month ("1".."12") to that month's plan
    pub months: HashMap<String, MonthlyPlan>,
}

/// One chapter of a reading, verses in numeric order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterText {
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<VerseText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseText {
    pub verse: String,
    pub text: String,
}

impl ReadingPlan {
    pub fn reading_for(&self, month: u32, day: u32) -> Option<&DailyReading> {
        self.months.get(&month.to_string())?.get(&day.to_string())
    }

    pub fn reading_for_date(&self, date: NaiveDate) -> Option<&DailyReading> {
        self.reading_for(date.month(), date.day())
    }
}

impl BibleRange {
    pub fn chapters(&self) -> impl Iterator<Item = u32> {
        self.start_chapter..=self.end_chapter
    }

    /// "창세기 1-3장", or "창세기 1장" for a single chapter
    pub fn label(&self) -> String {
        let name = display_name(&self.book).unwrap_or(self.book.as_str());
        if self.start_chapter == self.end_chapter {
            format!("{} {}장", name, self.start_chapter)
        } else {
            format!("{} {}-{}장", name, self.start_chapter, self.end_chapter)
        }
    }
}

impl DailyReading {
    pub fn label(&self) -> String {
        self.ranges
            .iter()
            .map(BibleRange::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Load every chapter of `range` from the store.
///
/// Chapters absent from the corpus are skipped; an uninitialized store is
/// an error.
pub fn load_range(store: &TextStore, range: &BibleRange) -> Result<Vec<ChapterText>> {
    let mut chapters = Vec::new();

    for chapter in range.chapters() {
        match store.get_chapter(&range.book, &chapter.to_string()) {
            Ok(found) => chapters.push(ChapterText {
                book: range.book.clone(),
                chapter,
                verses: found
                    .sorted_verses()
                    .into_iter()
                    .map(|(verse, text)| VerseText { verse: verse.to_string(), text: text.to_string() })
                    .collect(),
            }),
            Err(e) if e.is_not_found() => {
                warn!(book = %range.book, chapter, error = %e, "skipping missing chapter");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(chapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ReadingPlan {
        serde_json::from_str(
            r#"{
                "id": "default-2025",
                "name": "1년 1독",
                "year": 2025,
                "months": {
                    "1": {
                        "1": {"ranges": [{"book": "창", "startChapter": 1, "endChapter": 3}]},
                        "2": {"ranges": [
                            {"book": "창", "startChapter": 4, "endChapter": 4},
                            {"book": "마", "startChapter": 1, "endChapter": 2}
                        ], "completed": true}
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_reading_lookup() {
        let plan = plan();
        let day = plan.reading_for(1, 1).unwrap();
        assert_eq!(day.ranges.len(), 1);
        assert!(!day.completed);
        assert!(plan.reading_for(1, 2).unwrap().completed);
        assert!(plan.reading_for(2, 1).is_none());

        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(plan.reading_for_date(date), plan.reading_for(1, 2));
    }

    #[test]
    fn test_labels() {
        let plan = plan();
        assert_eq!(plan.reading_for(1, 1).unwrap().label(), "창세기 1-3장");
        assert_eq!(plan.reading_for(1, 2).unwrap().label(), "창세기 4장, 마태복음 1-2장");

        let unknown = BibleRange { book: "X".into(), start_chapter: 1, end_chapter: 1 };
        assert_eq!(unknown.label(), "X 1장");
    }

    #[test]
    fn test_range_chapters() {
        let range = BibleRange { book: "창".into(), start_chapter: 1, end_chapter: 3 };
        assert_eq!(range.chapters().collect::<Vec<_>>(), vec![1, 2, 3]);
        let empty = BibleRange { book: "창".into(), start_chapter: 3, end_chapter: 1 };
        assert_eq!(empty.chapters().count(), 0);
    }
}
