use std::fmt;
use std::str::FromStr;

use super::book::Book;

/// 検索対象のフィールド。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Self::Title => book.title(),
            Self::Author => book.author(),
            Self::Genre => book.genre(),
        }
    }

    /// `needle` は小文字化済みであること。
    pub(crate) fn matches(&self, book: &Book, needle: &str) -> bool {
        self.value_of(book).to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search field: '{0}'. Use: title, author, genre")]
pub struct ParseSearchFieldError(pub String);

impl FromStr for SearchField {
    type Err = ParseSearchFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "genre" => Ok(Self::Genre),
            _ => Err(ParseSearchFieldError(s.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Genre => "Genre",
        };
        f.write_str(name)
    }
}
