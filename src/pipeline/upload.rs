//! Upload naming and validation helpers.

use chrono::{DateTime, TimeZone};

use crate::config::ALLOWED_EXTENSIONS;

/// Longest stored file name, extension included.
const MAX_FILENAME_LEN: usize = 100;

/// True when `filename` has an extension from the allowed image set
/// (case-insensitive).
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Sanitize a filename: removes path traversal and special characters.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Over-long names are shortened from the stem so the extension survives.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Remove consecutive dots (path traversal prevention)
    let mut sanitized = sanitized.replace("..", "");
    while sanitized.starts_with('.') {
        sanitized.remove(0);
    }

    let sanitized = truncate_keeping_extension(&sanitized, MAX_FILENAME_LEN);

    if sanitized.is_empty() {
        "upload".into()
    } else {
        sanitized
    }
}

/// Stored name for an upload: `YYYYmmdd_HHMMSS_<original>`, sanitized.
pub fn stored_file_name<Tz>(original: &str, received_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    sanitize_filename(&format!(
        "{}_{}",
        received_at.format("%Y%m%d_%H%M%S"),
        original
    ))
}

// Input is ASCII after sanitizing, so byte slicing is safe.
fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() + 1 < max => {
            let keep = max - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..max].to_string(),
    }
}

/// Alternative name for the `n`th collision: `name_n.ext`.
pub fn numbered_file_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{n}.{ext}"),
        None => format!("{name}_{n}"),
    }
}
