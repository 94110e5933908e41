pub mod completion;
pub mod prompt_builder;
pub mod temp_store;
pub mod text_extractor;
pub mod upload_filter;

pub use completion::{CompletionClient, CompletionError, GeminiClient};
pub use temp_store::{StoredUpload, TempFileStore};
pub use text_extractor::{DocumentTextExtractor, ExtractionError, TextExtractor};
pub use upload_filter::{DocumentKind, UploadFilter};
