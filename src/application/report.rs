use crate::domain::model::book::Book;
use crate::domain::model::stats::LibraryStats;

/// 統計画面で表示する著者の上位件数
pub const TOP_AUTHORS: usize = 5;

/// 蔵書/検索結果 → Markdown への変換
pub struct ReportRenderer;

impl ReportRenderer {
    /// 書籍カードの一覧を描画する。番号は蔵書内の元のインデックス。
    pub fn render_listing(heading: &str, books: &[(usize, &Book)]) -> String {
        let mut buf = format!("# {} ({})\n\n", heading, books.len());
        for (index, book) in books {
            Self::render_card(*index, book, &mut buf);
        }
        buf
    }

    /// 集計結果を描画する。
    pub fn render_statistics(stats: &LibraryStats) -> String {
        let mut buf = String::from("# Library Statistics\n\n");
        buf.push_str(&format!("- Total books: {}\n", stats.total_books));
        buf.push_str(&format!("- Books read: {}\n", stats.read_books));
        buf.push_str(&format!("- Books unread: {}\n", stats.unread_books));
        buf.push_str(&format!("- Read percentage: {:.1}%\n", stats.percent_read));

        if !stats.genre_counts.is_empty() {
            buf.push_str("\n## Books by Genre\n\n");
            for entry in &stats.genre_counts {
                buf.push_str(&format!("- {}: {}\n", entry.label, entry.count));
            }
        }

        if !stats.decade_counts.is_empty() {
            buf.push_str("\n## Books by Publication Decade\n\n");
            for entry in &stats.decade_counts {
                buf.push_str(&format!("- {}s: {}\n", entry.decade, entry.count));
            }
        }

        let top = stats.top_authors(TOP_AUTHORS);
        if !top.is_empty() {
            buf.push_str("\n## Top Authors\n\n");
            for entry in top {
                let unit = if entry.count > 1 { "books" } else { "book" };
                buf.push_str(&format!("- **{}**: {} {}\n", entry.label, entry.count, unit));
            }
        }

        buf
    }

    fn render_card(index: usize, book: &Book, buf: &mut String) {
        let year = book
            .publication_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let badge = if book.is_read() { "Read" } else { "Unread" };

        // 番号付きリストにすると描画側で振り直されるため、インデックスは角括弧で示す
        buf.push_str(&format!("- [{}] **{}** [{}]\n", index, book.title(), badge));
        buf.push_str(&format!("  - Author: {}\n", book.author()));
        buf.push_str(&format!("  - Publication Year: {}\n", year));
        buf.push_str(&format!("  - Genre: {}\n", book.genre()));
    }
}
