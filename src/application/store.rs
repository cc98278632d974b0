use tracing::{debug, info, warn};

use crate::domain::model::book::{self, Book, NewBook};
use crate::domain::model::library::Library;
use crate::domain::model::search::SearchField;
use crate::domain::model::stats::LibraryStats;
use crate::domain::repository::LibraryRepository;

use super::error::StoreError;

/// 蔵書に対するユースケース。
///
/// メモリ上の `Library` を所有し、変更のたびに全体を保存する。
/// 保存に失敗した場合もメモリ上の変更は巻き戻さない（次の保存で追いつく）。
pub struct LibraryStore<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> LibraryStore<R> {
    /// 空の蔵書でStoreを作る。読み込みは行わない。
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            library: Library::new(),
        }
    }

    /// 起動時の読み込みを行う。失敗時は警告を出して空の蔵書で始める。
    pub fn open(repo: R) -> Self {
        let mut store = Self::new(repo);
        if let Err(e) = store.load() {
            warn!(error = %e, "starting with an empty library");
        }
        store
    }

    /// 保存データでメモリ上の蔵書を置き換える。
    /// データが存在しなければ何もせず `false` を返す。
    pub fn load(&mut self) -> Result<bool, StoreError> {
        let loaded = self
            .repo
            .load()
            .map_err(|e| StoreError::StorageRead(Box::new(e)))?;
        match loaded {
            Some(library) => {
                info!(books = library.len(), "library loaded");
                self.library = library;
                Ok(true)
            }
            None => {
                debug!("no saved library found");
                Ok(false)
            }
        }
    }

    pub fn save(&self) -> Result<(), StoreError> {
        self.repo.save(&self.library).map_err(|e| {
            warn!(error = %e, books = self.library.len(), "failed to save library");
            StoreError::StorageWrite(Box::new(e))
        })?;
        debug!(books = self.library.len(), "library saved");
        Ok(())
    }

    /// 書籍を追加して保存する。追加先のインデックスを返す。
    pub fn add(&mut self, req: NewBook) -> Result<usize, StoreError> {
        req.validate(book::current_year())?;
        let title = req.title.clone();
        let index = self.library.add(req, book::now());
        info!(index, title = %title, "book added");
        self.save()?;
        Ok(index)
    }

    /// 書籍を削除して保存する。範囲外なら何もしない。
    pub fn remove(&mut self, index: usize) -> Result<Book, StoreError> {
        let removed = self.library.remove(index)?;
        info!(index, title = %removed.title(), "book removed");
        self.save()?;
        Ok(removed)
    }

    pub fn update_read_status(&mut self, index: usize, read_status: bool) -> Result<(), StoreError> {
        self.library.set_read_status(index, read_status)?;
        info!(index, read_status, "read status updated");
        self.save()
    }

    /// 既読/未読を反転して保存し、反転後の状態を返す。
    pub fn toggle_read_status(&mut self, index: usize) -> Result<bool, StoreError> {
        let read_status = self.library.toggle_read_status(index)?;
        info!(index, read_status, "read status toggled");
        self.save()?;
        Ok(read_status)
    }

    pub fn search(&self, term: &str, field: SearchField) -> Vec<&Book> {
        self.library.search(term, field)
    }

    pub fn search_indexed(&self, term: &str, field: SearchField) -> Vec<(usize, &Book)> {
        let hits = self.library.search_indexed(term, field);
        debug!(term, %field, hits = hits.len(), "search");
        hits
    }

    pub fn statistics(&self) -> LibraryStats {
        let stats = self.library.statistics();
        debug!(total = stats.total_books, read = stats.read_books, "statistics computed");
        stats
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn books(&self) -> &[Book] {
        self.library.books()
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.library.get(index)
    }

    pub fn len(&self) -> usize {
        self.library.len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }
}
