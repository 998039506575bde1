//! Marine debris classification.
//!
//! The primary path sends the photo and a fixed instruction prompt to a
//! multimodal model behind the `VisionClient` seam and parses its JSON
//! verdict. Any failure on that path (no credential, unreadable image,
//! transport, bad status, malformed reply) is returned as a `ClassifyError`;
//! `DebrisClassifier::classify` then substitutes the keyword fallback.

pub mod classifier;
pub mod fallback;
pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod types;

pub use classifier::DebrisClassifier;
pub use fallback::fallback_classification;
pub use gemini::GeminiClient;
pub use parser::parse_classification;
pub use prompt::build_prompt;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("No API credential configured for the classification service")]
    MissingCredential,

    #[error("Cannot read image: {0}")]
    ImageRead(#[from] std::io::Error),

    #[error("Classification service unreachable: {0}")]
    Transport(String),

    #[error("Classification service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed classification response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
