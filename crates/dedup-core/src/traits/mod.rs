mod archive_store;
mod content_store;
mod similarity_oracle;

pub use archive_store::IArchiveStore;
pub use content_store::IContentStore;
pub use similarity_oracle::ISimilarityOracle;
