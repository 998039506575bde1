use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Country recorded when reverse geocoding yields nothing usable.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A persisted submission that was accepted as marine debris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisRecord {
    pub id: i64,
    pub file_path: String,
    /// Comma-joined category names, e.g. `"Plastic,Metal"`.
    pub categories: String,
    pub gps_lat: f64,
    pub gps_lon: f64,
    pub country: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl DebrisRecord {
    /// Category names split back out of the stored comma-joined form.
    pub fn category_list(&self) -> Vec<&str> {
        self.categories
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// File name component of the stored path, used to build the public URL.
    pub fn file_name(&self) -> Option<&str> {
        std::path::Path::new(&self.file_path)
            .file_name()
            .and_then(|n| n.to_str())
    }
}

/// Insert payload. `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDebrisRecord {
    pub file_path: String,
    pub categories: Vec<String>,
    pub gps_lat: f64,
    pub gps_lon: f64,
    pub country: String,
    pub description: String,
}

impl NewDebrisRecord {
    pub fn joined_categories(&self) -> String {
        self.categories.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(categories: &str) -> DebrisRecord {
        DebrisRecord {
            id: 1,
            file_path: "Uploads/20240101_120000_bottle.jpg".into(),
            categories: categories.into(),
            gps_lat: 34.05,
            gps_lon: -118.25,
            country: UNKNOWN_COUNTRY.into(),
            description: "plastic bottle".into(),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn category_list_splits_joined_form() {
        assert_eq!(
            record("Plastic,Processed Wood").category_list(),
            vec!["Plastic", "Processed Wood"]
        );
    }

    #[test]
    fn category_list_empty_string_is_empty() {
        assert!(record("").category_list().is_empty());
    }

    #[test]
    fn file_name_strips_directory() {
        assert_eq!(record("Plastic").file_name(), Some("20240101_120000_bottle.jpg"));
    }

    #[test]
    fn joined_categories_uses_commas_without_spaces() {
        let new = NewDebrisRecord {
            file_path: "x.jpg".into(),
            categories: vec!["Plastic".into(), "Metal".into()],
            gps_lat: 0.0,
            gps_lon: 0.0,
            country: "Chile".into(),
            description: String::new(),
        };
        assert_eq!(new.joined_categories(), "Plastic,Metal");
    }
}
