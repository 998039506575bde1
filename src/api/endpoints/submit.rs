//! Submission form handler.

use axum::extract::{Multipart, State};
use axum::response::Response;

use crate::api::error::ApiError;
use crate::api::flash::{self, Flash};
use crate::api::types::AppState;
use crate::pipeline::{SubmissionForm, SubmissionOutcome, Upload};

/// `POST /submit`: runs the submission pipeline on a blocking worker and
/// redirects back to the listing with the outcome as a flash message.
pub async fn submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;

    let pipeline = state.pipeline.clone();
    let outcome = tokio::task::spawn_blocking(move || pipeline.submit(form)).await??;

    let flash = match outcome {
        SubmissionOutcome::Accepted(_) => Flash::Submitted,
        SubmissionOutcome::Rejected(rejection) => Flash::Rejected(rejection),
    };
    Ok(flash::redirect_with(flash, "/"))
}

/// Collect the known fields; anything else is skipped.
///
/// Only a file part (one with a filename, possibly empty) counts as the
/// photo; a plain text part named `photo` is ignored like any other field.
async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, ApiError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "photo" => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read upload bytes: {e}");
                    ApiError::from(e)
                })?;
                form.photo = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "description" => form.description = field.text().await?,
            "lat" => form.lat = Some(field.text().await?),
            "lon" => form.lon = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}
