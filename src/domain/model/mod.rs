pub mod book;
pub mod library;
pub mod search;
pub mod stats;
