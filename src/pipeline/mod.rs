//! Submission pipeline: validate → store upload → translate → classify →
//! geocode → persist.

pub mod submission;
pub mod upload;

pub use submission::*;
pub use upload::{allowed_file, sanitize_filename, stored_file_name};

use std::path::PathBuf;

use thiserror::Error;

use crate::classify::ClassifyError;
use crate::db::DatabaseError;
use crate::geocode::GeocodeError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Cannot build classification client: {0}")]
    Classifier(#[from] ClassifyError),

    #[error("Cannot build geocoding client: {0}")]
    Geocoder(#[from] GeocodeError),
}
