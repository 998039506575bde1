use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classify::{DebrisClassifier, GeminiClient};
use crate::config::AppConfig;
use crate::db::DebrisStore;
use crate::geocode::{GeocodeCache, JsonFileStore, NominatimClient, RequestThrottle, ReverseGeocoder};
use crate::models::{DebrisRecord, NewDebrisRecord};
use crate::translate::{IdentityTranslator, Translator};

use super::upload::{allowed_file, numbered_file_name, stored_file_name};
use super::PipelineError;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// An uploaded file as received from the form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Raw submission fields. Coordinates stay as text until the pipeline
/// parses them.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub photo: Option<Upload>,
    pub description: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Why a submission was turned away. Rejections leave nothing behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoPhoto,
    InvalidCoordinates,
    InvalidPhoto,
    NotDebris,
}

impl Rejection {
    pub const ALL: [Rejection; 4] = [
        Self::NoPhoto,
        Self::InvalidCoordinates,
        Self::InvalidPhoto,
        Self::NotDebris,
    ];

    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoPhoto => "No photo provided",
            Self::InvalidCoordinates => "Invalid GPS coordinates",
            Self::InvalidPhoto => "Invalid or missing photo",
            Self::NotDebris => "Image does not contain marine debris",
        }
    }

    /// Stable identifier, safe to carry in a cookie.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoPhoto => "no_photo",
            Self::InvalidCoordinates => "invalid_gps",
            Self::InvalidPhoto => "invalid_photo",
            Self::NotDebris => "not_debris",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted(DebrisRecord),
    Rejected(Rejection),
}

// ═══════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════

/// Runs one submission to completion. Every step blocks; call it from a
/// blocking worker.
pub struct SubmissionPipeline {
    upload_dir: PathBuf,
    translator: Box<dyn Translator>,
    classifier: DebrisClassifier,
    geocoder: ReverseGeocoder,
    store: Arc<DebrisStore>,
}

impl SubmissionPipeline {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        classifier: DebrisClassifier,
        geocoder: ReverseGeocoder,
        store: Arc<DebrisStore>,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            translator: Box::new(IdentityTranslator),
            classifier,
            geocoder,
            store,
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Wire up the production collaborators from configuration.
    ///
    /// A missing classification credential is not an error: the classifier
    /// then always uses the keyword fallback.
    pub fn from_config(config: &AppConfig, store: Arc<DebrisStore>) -> Result<Self, PipelineError> {
        let classifier = match &config.gemini_api_key {
            Some(key) => {
                let client =
                    GeminiClient::new(&config.gemini_base_url, &config.gemini_model, key)?;
                tracing::info!(model = %config.gemini_model, "Vision classification enabled");
                DebrisClassifier::new(Arc::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set, classification uses keyword fallback only");
                DebrisClassifier::fallback_only()
            }
        };

        let nominatim =
            NominatimClient::new(&config.nominatim_base_url, &config.nominatim_user_agent)?;
        let cache = GeocodeCache::load(Box::new(JsonFileStore::new(&config.geocode_cache_path)));
        let geocoder = ReverseGeocoder::new(
            Box::new(nominatim),
            cache,
            RequestThrottle::new(config.nominatim_min_interval),
        );

        Ok(Self::new(&config.upload_dir, classifier, geocoder, store))
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn submit(&self, form: SubmissionForm) -> Result<SubmissionOutcome, PipelineError> {
        // 1. Photo field present
        let Some(photo) = form.photo else {
            return Ok(self.reject(Rejection::NoPhoto));
        };

        // 2. Coordinates parse
        let (Some(lat), Some(lon)) = (
            parse_coordinate(form.lat.as_deref()),
            parse_coordinate(form.lon.as_deref()),
        ) else {
            return Ok(self.reject(Rejection::InvalidCoordinates));
        };

        // 3. Photo has a name with an allowed extension
        if photo.filename.is_empty() || !allowed_file(&photo.filename) {
            return Ok(self.reject(Rejection::InvalidPhoto));
        }

        // 4. Store the upload
        let file_path = self.save_upload(&photo)?;

        // 5. Translate
        let description = self.translator.translate(&form.description);

        // 6. Classify
        let classification = self.classifier.classify(&file_path, &description);
        if !classification.is_debris {
            std::fs::remove_file(&file_path).map_err(|source| PipelineError::Io {
                path: file_path.clone(),
                source,
            })?;
            return Ok(self.reject(Rejection::NotDebris));
        }

        // 7. Geocode
        let country = self.geocoder.resolve(lat, lon);

        // 8. Persist
        let new_record = NewDebrisRecord {
            file_path: file_path.to_string_lossy().into_owned(),
            categories: classification.categories,
            gps_lat: lat,
            gps_lon: lon,
            country,
            description,
        };

        let record = match self.store.insert(&new_record).and_then(|id| self.store.get(id)) {
            Ok(record) => record,
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_file(&file_path) {
                    tracing::warn!(path = %file_path.display(), error = %cleanup, "Failed to remove orphaned upload");
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            id = record.id,
            categories = %record.categories,
            country = %record.country,
            "Debris submission accepted"
        );

        Ok(SubmissionOutcome::Accepted(record))
    }

    fn save_upload(&self, photo: &Upload) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.upload_dir).map_err(|source| PipelineError::Io {
            path: self.upload_dir.clone(),
            source,
        })?;

        let name = stored_file_name(&photo.filename, &chrono::Local::now());
        let path = write_new_file(&self.upload_dir, &name, &photo.bytes)?;

        tracing::debug!(path = %path.display(), size = photo.bytes.len(), "Upload stored");
        Ok(path)
    }

    fn reject(&self, rejection: Rejection) -> SubmissionOutcome {
        tracing::info!(reason = rejection.code(), "Submission rejected");
        SubmissionOutcome::Rejected(rejection)
    }
}

/// Upper bound on `name_N.ext` alternatives tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Write `bytes` to a file in `dir` that did not exist before. Taken names
/// get a numeric suffix, so an earlier upload is never overwritten.
fn write_new_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, PipelineError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = match attempt {
            0 => name.to_string(),
            n => numbered_file_name(name, n),
        };
        let path = dir.join(candidate);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes).map_err(|source| PipelineError::Io {
                    path: path.clone(),
                    source,
                })?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(PipelineError::Io { path, source }),
        }
    }

    Err(PipelineError::Io {
        path: dir.join(name),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free upload name"),
    })
}

/// Parse a decimal coordinate string; surrounding whitespace is allowed.
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok()
}
