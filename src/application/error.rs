use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to read library: {0}")]
    StorageRead(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to save library: {0}")]
    StorageWrite(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// 呼び出し側の古いインデックスなど、想定内の失敗かどうか。
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::IndexOutOfRange { .. })
        )
    }
}
