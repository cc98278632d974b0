//! MCP Server for bookshelf-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryStore
//!
//! 8 tools: book_add, book_list, book_remove, book_set_read, book_toggle_read,
//! book_search, library_stats, library_reload

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::error::StoreError;
use crate::application::report::ReportRenderer;
use crate::application::store::LibraryStore;
use crate::domain::model::book::{Book, NewBook, SUGGESTED_GENRES};
use crate::domain::model::search::SearchField;
use crate::infra::json_store::JsonLibraryRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは蔵書JSONファイル。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    info!(path = %library_path.display(), "starting bookshelf-mcp");
    let server = BookshelfMcpServer::new(library_path);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type Store = LibraryStore<JsonLibraryRepository>;

#[derive(Clone)]
struct BookshelfMcpServer {
    store: Arc<Mutex<Store>>,
    tool_router: ToolRouter<Self>,
}

impl BookshelfMcpServer {
    fn new(library_path: PathBuf) -> Self {
        let repo = JsonLibraryRepository::new(library_path);
        Self {
            store: Arc::new(Mutex::new(LibraryStore::open(repo))),
            tool_router: Self::tool_router(),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, McpError> {
        self.store
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    /// 呼び出し側の誤り（範囲外・入力不備）はinvalid_params、保存/読込失敗はinternal_error。
    fn to_mcp_error(e: StoreError) -> McpError {
        match e {
            StoreError::Domain(_) => McpError::invalid_params(format!("{e}"), None),
            StoreError::StorageRead(_) | StoreError::StorageWrite(_) => {
                McpError::internal_error(format!("{e}"), None)
            }
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for BookshelfMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bookshelf-mcp".to_string(),
                title: Some("Bookshelf MCP — Personal Library Manager".to_string()),
                description: Some(
                    "Track your books: add, remove, search, mark read/unread, and view statistics."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal book library.\n\
                 \n\
                 Books are addressed by their index as shown by `book_list` or `book_search` \
                 (0-based). Indices shift after `book_remove`, so list again before acting.\n\
                 \n\
                 Tools: `book_list`, `book_add`, `book_remove`, `book_set_read`/`book_toggle_read`, \
                 `book_search`, `library_stats`. `library_reload` re-reads the library file."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

/// 負のインデックスは範囲外として扱う。
fn to_index(index: i64) -> Result<usize, McpError> {
    usize::try_from(index).map_err(|_| {
        McpError::invalid_params(format!("index {index} out of range (must be >= 0)"), None)
    })
}

fn parse_search_field(s: &str) -> Result<SearchField, McpError> {
    s.parse::<SearchField>()
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn describe(index: usize, book: &Book) -> String {
    format!("[{}] {} by {}", index, book.title(), book.author())
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookAddRequest {
    #[schemars(description = "Book title (required, non-empty)")]
    pub title: String,
    #[schemars(description = "Author (required, non-empty)")]
    pub author: String,
    #[schemars(description = "Publication year, 1000 to the current year. Omit if unknown.")]
    pub publication_year: Option<i32>,
    #[schemars(
        description = "Genre label, e.g. Fiction, Non-Fiction, Science, Technology, Fantasy, History, Programming, Others. Any text is accepted."
    )]
    pub genre: String,
    #[schemars(description = "Whether the book has been read (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookIndexRequest {
    #[schemars(description = "Book index from `book_list` or `book_search` output (0-based)")]
    pub index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookSetReadRequest {
    #[schemars(description = "Book index from `book_list` or `book_search` output (0-based)")]
    pub index: i64,
    #[schemars(description = "true = read, false = unread")]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookSearchRequest {
    #[schemars(description = "Search term (case-insensitive substring). Empty matches every book.")]
    #[serde(default)]
    pub term: String,
    #[schemars(description = "Field to search: title, author, or genre")]
    pub field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpLibraryStatsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpLibraryReloadRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl BookshelfMcpServer {
    #[tool(
        name = "book_add",
        description = "Add a book to the library. Title and author are required. The book is appended at the end and the library is saved.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_add(
        &self,
        Parameters(req): Parameters<McpBookAddRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        let new_book = NewBook {
            title: req.title.trim().to_string(),
            author: req.author.trim().to_string(),
            publication_year: req.publication_year,
            genre: req.genre.trim().to_string(),
            read_status: req.read,
        };

        let index = store.add(new_book).map_err(Self::to_mcp_error)?;
        let summary = store
            .get(index)
            .map(|b| describe(index, b))
            .unwrap_or_else(|| index.to_string());

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Added: {summary}"
        ))]))
    }

    #[tool(
        name = "book_list",
        description = "List every book in the library with its index, author, year, genre, and read status.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_list(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpBookListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store()?;
        if store.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "Your library is empty. Use `book_add` to get started. Suggested genres: {}",
                SUGGESTED_GENRES.join(", ")
            ))]));
        }

        let books: Vec<(usize, &Book)> = store.books().iter().enumerate().collect();
        let output = ReportRenderer::render_listing("Your Library", &books);
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "book_remove",
        description = "Remove the book at the given index. Indices of later books shift down by one.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_remove(
        &self,
        Parameters(req): Parameters<McpBookIndexRequest>,
    ) -> Result<CallToolResult, McpError> {
        let index = to_index(req.index)?;
        let mut store = self.store()?;
        let removed = store.remove(index).map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Removed: {}",
            describe(index, &removed)
        ))]))
    }

    #[tool(
        name = "book_set_read",
        description = "Mark the book at the given index as read or unread.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn book_set_read(
        &self,
        Parameters(req): Parameters<McpBookSetReadRequest>,
    ) -> Result<CallToolResult, McpError> {
        let index = to_index(req.index)?;
        let mut store = self.store()?;
        store
            .update_read_status(index, req.read)
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            status_message(&store, index, req.read),
        )]))
    }

    #[tool(
        name = "book_toggle_read",
        description = "Flip the read status of the book at the given index (Mark as Read / Mark as Unread).",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_toggle_read(
        &self,
        Parameters(req): Parameters<McpBookIndexRequest>,
    ) -> Result<CallToolResult, McpError> {
        let index = to_index(req.index)?;
        let mut store = self.store()?;
        let read = store
            .toggle_read_status(index)
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            status_message(&store, index, read),
        )]))
    }

    #[tool(
        name = "book_search",
        description = "Search books by title, author, or genre (case-insensitive substring). Results keep library order and show the index to use with other tools.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_search(
        &self,
        Parameters(req): Parameters<McpBookSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field = parse_search_field(&req.field)?;
        let store = self.store()?;
        let hits = store.search_indexed(&req.term, field);

        if hits.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "No books found matching '{}' in {}.",
                req.term, field
            ))]));
        }

        let heading = format!("Search Results: {} contains '{}'", field, req.term);
        let output = ReportRenderer::render_listing(&heading, &hits);
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "library_stats",
        description = "Show library statistics: totals, read percentage, books by genre and publication decade, and top authors.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn library_stats(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpLibraryStatsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store()?;
        if store.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Your library is empty. Add some books to see stats!",
            )]));
        }

        let output = ReportRenderer::render_statistics(&store.statistics());
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "library_reload",
        description = "Re-read the library file, replacing the in-memory library. Unsaved changes are discarded.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn library_reload(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpLibraryReloadRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        let found = store.load().map_err(Self::to_mcp_error)?;

        let message = if found {
            format!("Reloaded: {} books", store.len())
        } else {
            format!("No library file yet; keeping {} books in memory", store.len())
        };
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }
}

fn status_message(store: &Store, index: usize, read: bool) -> String {
    let label = if read { "Read" } else { "Unread" };
    match store.get(index) {
        Some(book) => format!("Marked as {label}: {}", describe(index, book)),
        None => format!("Marked as {label}: {index}"),
    }
}

// =============================================================================
// Tests
// =============================================================================
