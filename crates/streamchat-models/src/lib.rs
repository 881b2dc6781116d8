// Models module - data structures for API communication
pub mod types;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use types::{Message, Role, deserialize_string_or_null};
pub use requests::{ChatRequest, StreamOptions};
pub use responses::{
    Usage,
    StreamChunk, StreamChoice, StreamDelta,
    OllamaTagsResponse, OllamaModelEntry, OllamaShowResponse, OllamaModelDetails,
};
