use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::book::{Book, NewBook};
use super::search::SearchField;
use super::stats::LibraryStats;
use crate::domain::error::DomainError;

/// 蔵書 — 集約ルート。挿入順を保持し、重複も許可する。
///
/// 永続化時はレコードの配列としてそのままシリアライズされる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 末尾に追加し、そのインデックスを返す。入力の検証は行わない。
    pub fn add(&mut self, req: NewBook, added_date: NaiveDateTime) -> usize {
        self.books.push(Book::new(req, added_date));
        self.books.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Book, DomainError> {
        self.check_index(index)?;
        Ok(self.books.remove(index))
    }

    pub fn set_read_status(&mut self, index: usize, read_status: bool) -> Result<(), DomainError> {
        self.book_mut(index)?.set_read_status(read_status);
        Ok(())
    }

    /// 既読/未読を反転し、反転後の状態を返す。
    pub fn toggle_read_status(&mut self, index: usize) -> Result<bool, DomainError> {
        let book = self.book_mut(index)?;
        let status = !book.is_read();
        book.set_read_status(status);
        Ok(status)
    }

    /// 大文字小文字を区別しない部分一致検索。元のインデックスと共に返す。
    /// 空文字列は全件に一致する。
    pub fn search_indexed(&self, term: &str, field: SearchField) -> Vec<(usize, &Book)> {
        let needle = term.to_lowercase();
        self.books
            .iter()
            .enumerate()
            .filter(|(_, book)| field.matches(book, &needle))
            .collect()
    }

    pub fn search(&self, term: &str, field: SearchField) -> Vec<&Book> {
        self.search_indexed(term, field)
            .into_iter()
            .map(|(_, book)| book)
            .collect()
    }

    pub fn statistics(&self) -> LibraryStats {
        LibraryStats::compute(&self.books)
    }

    // --- Private helpers ---

    fn check_index(&self, index: usize) -> Result<(), DomainError> {
        if index < self.books.len() {
            Ok(())
        } else {
            Err(DomainError::IndexOutOfRange {
                index,
                len: self.books.len(),
            })
        }
    }

    fn book_mut(&mut self, index: usize) -> Result<&mut Book, DomainError> {
        let len = self.books.len();
        self.books
            .get_mut(index)
            .ok_or(DomainError::IndexOutOfRange { index, len })
    }
}
