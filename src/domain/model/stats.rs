use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::book::Book;

/// ラベルごとの冊数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

/// 出版年代ごとの冊数（`decade` は10の倍数）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecadeCount {
    pub decade: i32,
    pub count: usize,
}

/// 蔵書全体の集計結果。
///
/// `genre_counts` / `author_counts` は冊数の降順（同数は初出順）、
/// `decade_counts` は年代の昇順に並ぶ。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    pub total_books: usize,
    pub read_books: usize,
    pub unread_books: usize,
    pub percent_read: f64,
    pub genre_counts: Vec<CountEntry>,
    pub author_counts: Vec<CountEntry>,
    pub decade_counts: Vec<DecadeCount>,
}

impl LibraryStats {
    pub fn compute(books: &[Book]) -> Self {
        let total_books = books.len();
        let read_books = books.iter().filter(|b| b.is_read()).count();
        let percent_read = if total_books == 0 {
            0.0
        } else {
            read_books as f64 / total_books as f64 * 100.0
        };

        let mut decades: BTreeMap<i32, usize> = BTreeMap::new();
        for year in books.iter().filter_map(Book::publication_year) {
            *decades.entry(decade_of(year)).or_insert(0) += 1;
        }

        Self {
            total_books,
            read_books,
            unread_books: total_books - read_books,
            percent_read,
            genre_counts: tally(books.iter().map(Book::genre)),
            author_counts: tally(books.iter().map(Book::author)),
            decade_counts: decades
                .into_iter()
                .map(|(decade, count)| DecadeCount { decade, count })
                .collect(),
        }
    }

    /// 冊数上位 `n` 人の著者。
    pub fn top_authors(&self, n: usize) -> &[CountEntry] {
        &self.author_counts[..n.min(self.author_counts.len())]
    }
}

/// 出版年を10年単位に切り下げる（負の年も床関数で扱う）。
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CountEntry> {
    let mut entries: Vec<CountEntry> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    for label in labels {
        match positions.get(label) {
            Some(&pos) => entries[pos].count += 1,
            None => {
                positions.insert(label, entries.len());
                entries.push(CountEntry {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }
    // sort_by は安定ソート: 同数は初出順のまま
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
