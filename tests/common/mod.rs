//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bookshelf_mcp::application::store::LibraryStore;
use bookshelf_mcp::domain::model::book::NewBook;
use bookshelf_mcp::domain::model::library::Library;
use bookshelf_mcp::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("simulated write failure")]
    WriteFailed,
    #[error("corrupt data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// ファイルI/O不要のインメモリリポジトリ。
/// Cloneしたハンドル同士で保存内容と失敗フラグを共有する。
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    stored: Rc<RefCell<Option<String>>>,
    fail_saves: Rc<Cell<bool>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降のsaveを失敗させる / 成功に戻す。
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn corrupt(&self) {
        *self.stored.borrow_mut() = Some("{ not json".to_string());
    }

    /// 現在保存されている内容。
    pub fn persisted(&self) -> Option<Library> {
        self.stored
            .borrow()
            .as_deref()
            .map(|json| serde_json::from_str(json).unwrap())
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        match self.stored.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(InMemoryError::WriteFailed);
        }
        let json = serde_json::to_string(library)?;
        *self.stored.borrow_mut() = Some(json);
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn new_book(title: &str, author: &str, year: Option<i32>, genre: &str, read: bool) -> NewBook {
    NewBook {
        title: title.into(),
        author: author.into(),
        publication_year: year,
        genre: genre.into(),
        read_status: read,
    }
}

/// 標準的なテスト用蔵書:
/// ```text
/// 0. Dune              Frank Herbert      1965 Fiction    read
/// 1. Cosmos            Carl Sagan         1980 Science    unread
/// 2. Sapiens           Yuval Noah Harari  2011 Nonfiction read
/// 3. Dune Messiah      Frank Herbert      1969 Fiction    unread
/// ```
pub fn standard_books() -> Vec<NewBook> {
    vec![
        new_book("Dune", "Frank Herbert", Some(1965), "Fiction", true),
        new_book("Cosmos", "Carl Sagan", Some(1980), "Science", false),
        new_book("Sapiens", "Yuval Noah Harari", Some(2011), "Nonfiction", true),
        new_book("Dune Messiah", "Frank Herbert", Some(1969), "Fiction", false),
    ]
}

/// InMemoryRepoに蔵書を積んだStoreと、Repoのハンドルを返す。
pub fn store_with(books: Vec<NewBook>) -> (LibraryStore<InMemoryRepo>, InMemoryRepo) {
    let repo = InMemoryRepo::new();
    let mut store = LibraryStore::new(repo.clone());
    for book in books {
        store.add(book).unwrap();
    }
    (store, repo)
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}

/// 蔵書内の書名一覧。
pub fn titles(library: &Library) -> Vec<String> {
    library
        .books()
        .iter()
        .map(|b| b.title().to_string())
        .collect()
}
