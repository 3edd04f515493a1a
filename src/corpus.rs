//! Corpus types: book → chapter → verse, in source order

use crate::error::{Location, Result, TextStoreError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Short canonical book code, e.g. "창" or "요일"
pub type BookId = String;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub books: IndexMap<BookId, Book>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub chapters: IndexMap<String, Chapter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub verses: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub text: String,
}

impl Corpus {
    pub fn book(&self, book: &str) -> Result<&Book> {
        self.books.get(book).ok_or_else(|| {
            TextStoreError::NotFound(Location::Book { book: book.to_string() })
        })
    }

    pub fn chapter(&self, book: &str, chapter: &str) -> Result<&Chapter> {
        self.book(book)?.chapters.get(chapter).ok_or_else(|| {
            TextStoreError::NotFound(Location::Chapter {
                book: book.to_string(),
                chapter: chapter.to_string(),
            })
        })
    }

    pub fn verse(&self, book: &str, chapter: &str, verse: &str) -> Result<&str> {
        let missing = || {
            TextStoreError::NotFound(Location::Verse {
                book: book.to_string(),
                chapter: chapter.to_string(),
                verse: verse.to_string(),
            })
        };
        let chapter_ref = self
            .books
            .get(book)
            .and_then(|b| b.chapters.get(chapter))
            .ok_or_else(missing)?;
        chapter_ref.verses.get(verse).map(String::as_str).ok_or_else(missing)
    }

    /// Literal, case-sensitive substring scan in traversal order.
    /// An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for (book_id, book) in &self.books {
            for (chapter_num, chapter) in &book.chapters {
                for (verse_num, text) in &chapter.verses {
                    if text.contains(query) {
                        results.push(SearchResult {
                            book: book_id.clone(),
                            chapter: chapter_num.clone(),
                            verse: verse_num.clone(),
                            text: text.clone(),
                        });
                    }
                }
            }
        }
        results
    }

    pub fn verse_count(&self) -> usize {
        self.books
            .values()
            .flat_map(|b| b.chapters.values())
            .map(|c| c.verses.len())
            .sum()
    }

    /// True when the corpus has at least one verse.
    pub fn is_usable(&self) -> bool {
        self.books
            .values()
            .flat_map(|b| b.chapters.values())
            .any(|c| !c.verses.is_empty())
    }
}

impl Book {
    /// Chapters ordered by numeric chapter number.
    pub fn sorted_chapters(&self) -> Vec<(&str, &Chapter)> {
        let mut chapters: Vec<(&str, &Chapter)> =
            self.chapters.iter().map(|(k, v)| (k.as_str(), v)).collect();
        chapters.sort_by(|a, b| numeric_key_cmp(a.0, b.0));
        chapters
    }
}

impl Chapter {
    /// Verses ordered by numeric verse number, for display.
    pub fn sorted_verses(&self) -> Vec<(&str, &str)> {
        let mut verses: Vec<(&str, &str)> = self
            .verses
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        verses.sort_by(|a, b| numeric_key_cmp(a.0, b.0));
        verses
    }
}

/// Numeric keys first in numeric order, anything unparsable after them by string.
fn numeric_key_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
