use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ClassifyError;

/// NOAA marine debris categories offered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebrisCategory {
    Plastic,
    Metal,
    Glass,
    Rubber,
    #[serde(rename = "Processed Wood")]
    ProcessedWood,
    Fabric,
    Other,
}

impl DebrisCategory {
    pub const ALL: [DebrisCategory; 7] = [
        Self::Plastic,
        Self::Metal,
        Self::Glass,
        Self::Rubber,
        Self::ProcessedWood,
        Self::Fabric,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plastic => "Plastic",
            Self::Metal => "Metal",
            Self::Glass => "Glass",
            Self::Rubber => "Rubber",
            Self::ProcessedWood => "Processed Wood",
            Self::Fabric => "Fabric",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for DebrisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one photo. Category names are kept as the model returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub is_debris: bool,
    pub categories: Vec<String>,
}

impl Classification {
    pub fn not_debris() -> Self {
        Self {
            is_debris: false,
            categories: Vec::new(),
        }
    }
}

/// Image payload passed to a `VisionClient`.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    /// MIME type guessed from the file extension; anything that is not an
    /// image type is sent as JPEG.
    pub fn from_path(path: &Path, data: Vec<u8>) -> Self {
        let mime_type = mime_guess::from_path(path)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());
        Self { mime_type, data }
    }
}

/// Multimodal model seam: one prompt plus one image in, raw reply text out.
pub trait VisionClient: Send + Sync {
    fn generate_with_image(&self, prompt: &str, image: &InlineImage) -> Result<String, ClassifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_categories_in_noaa_order() {
        let names: Vec<&str> = DebrisCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["Plastic", "Metal", "Glass", "Rubber", "Processed Wood", "Fabric", "Other"]
        );
    }

    #[test]
    fn processed_wood_serializes_with_space() {
        let json = serde_json::to_string(&DebrisCategory::ProcessedWood).unwrap();
        assert_eq!(json, "\"Processed Wood\"");
    }

    #[test]
    fn mime_guessed_from_extension() {
        assert_eq!(InlineImage::from_path(Path::new("a.png"), vec![]).mime_type, "image/png");
        assert_eq!(InlineImage::from_path(Path::new("a.GIF"), vec![]).mime_type, "image/gif");
        assert_eq!(InlineImage::from_path(Path::new("a.jpeg"), vec![]).mime_type, "image/jpeg");
    }

    #[test]
    fn non_image_extension_defaults_to_jpeg() {
        assert_eq!(InlineImage::from_path(Path::new("a.txt"), vec![]).mime_type, "image/jpeg");
        assert_eq!(InlineImage::from_path(Path::new("noext"), vec![]).mime_type, "image/jpeg");
    }
}
