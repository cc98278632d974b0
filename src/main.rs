use clap::Parser;

use bookshelf_mcp::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    bookshelf_mcp::logging::init(config.log_format);

    bookshelf_mcp::interface::mcp::run(config.library).await
}
