/// JSON-file storage backend.
pub mod json;
/// Entity definitions shared with storage backends.
pub mod models;
/// Storage abstraction layer.
pub mod storage;
