//! AI-backed content generation for the pipeline's content stage.
//!
//! Asks a chat-completion API for product copy, asks an image API for
//! artwork, and writes both into the artifact store where the merger and the
//! visual stage pick them up.

pub mod error;
pub mod openai;
pub mod parse;

pub use error::ContentError;
pub use openai::OpenAiContentClient;
pub use parse::parse_product_record;
