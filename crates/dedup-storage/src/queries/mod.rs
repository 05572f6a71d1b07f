pub mod archive_ops;
pub mod content_ops;
