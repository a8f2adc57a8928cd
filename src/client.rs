//! Browser-side calls to the review API.
use gloo_net::http::{Request, Response};
use leptos::logging::log;
use thiserror::Error;
use web_sys::{File, FormData};

use crate::models::review::{Review, ReviewDraft, IMAGE_FIELD};

pub const REVIEWS_ENDPOINT: &str = "/api/reviews";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("could not build form data")]
    FormData,
    #[error("server responded with status {0}")]
    Status(u16),
}

/// Packs every draft field, plus the image if one was picked, as multipart form data.
pub fn build_form_data(draft: &ReviewDraft, image: Option<&File>) -> Result<FormData, ClientError> {
    let form = FormData::new().map_err(|_| ClientError::FormData)?;
    for (name, value) in draft.entries() {
        form.append_with_str(name, value)
            .map_err(|_| ClientError::FormData)?;
    }
    if let Some(file) = image {
        form.append_with_blob_and_filename(IMAGE_FIELD, file, &file.name())
            .map_err(|_| ClientError::FormData)?;
    }
    Ok(form)
}

pub async fn submit_review(draft: &ReviewDraft, image: Option<&File>) -> Result<(), ClientError> {
    let form = build_form_data(draft, image)?;
    // The browser fills in the multipart boundary header itself
    let response = Request::post(REVIEWS_ENDPOINT).body(form)?.send().await?;
    ensure_success(&response)?;
    log!("[CLIENT] Review submitted");
    Ok(())
}

pub async fn fetch_reviews() -> Result<Vec<Review>, ClientError> {
    let response = Request::get(REVIEWS_ENDPOINT).send().await?;
    ensure_success(&response)?;
    Ok(response.json::<Vec<Review>>().await?)
}

pub async fn delete_review(id: &str) -> Result<(), ClientError> {
    let response = Request::delete(&format!("{REVIEWS_ENDPOINT}/{id}"))
        .send()
        .await?;
    ensure_success(&response)?;
    log!("[CLIENT] Review {} deleted", id);
    Ok(())
}

fn ensure_success(response: &Response) -> Result<(), ClientError> {
    if response.ok() {
        Ok(())
    } else {
        Err(ClientError::Status(response.status()))
    }
}
