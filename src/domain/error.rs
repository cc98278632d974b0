#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("index {index} out of range (library has {len} books)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{0} must be a single line")]
    MultiLineField(&'static str),

    #[error("publication year {year} out of range (1000-{max})")]
    YearOutOfRange { year: i32, max: i32 },
}
