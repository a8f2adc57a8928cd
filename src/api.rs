use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use leptos::logging::{error, log};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::ReviewError;
use crate::models::review::{FieldError, Review, IMAGE_FIELD};
use crate::service::ReviewService;
use crate::uploads::IncomingImage;

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    review: Option<&'a Review>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<&'static str>,
}

/// Text fields and the optional image of one multipart submission.
#[derive(Debug, Default)]
pub struct Submission {
    pub fields: HashMap<String, String>,
    pub image: Option<IncomingImage>,
}

/// Registers the review routes; mounted under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reviews", web::get().to(get_reviews))
        .route("/reviews", web::post().to(create_review))
        .route("/reviews/{id}", web::delete().to(delete_review));
}

pub async fn create_review(service: web::Data<ReviewService>, payload: Multipart) -> HttpResponse {
    log!("[API] Received review submission");

    let result = match read_submission(payload).await {
        Ok(submission) => service.create(&submission.fields, submission.image).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(review) => {
            log!("[API] Successfully saved review ID: {}", review.id);
            HttpResponse::Created().json(MessageBody {
                message: "Review added successfully",
                review: Some(&review),
            })
        }
        Err(e) => failure("Error adding review", &e),
    }
}

pub async fn get_reviews(service: web::Data<ReviewService>) -> HttpResponse {
    match service.list().await {
        Ok(reviews) => {
            log!("[API] Returning {} reviews", reviews.len());
            HttpResponse::Ok().json(reviews)
        }
        Err(e) => failure("Error fetching reviews", &e),
    }
}

pub async fn delete_review(
    service: web::Data<ReviewService>,
    id: web::Path<String>,
) -> HttpResponse {
    let id = id.into_inner();
    log!("[API] Received delete request for review: {}", id);

    match service.delete(&id).await {
        Ok(_) => HttpResponse::Ok().json(MessageBody {
            message: "Review deleted successfully",
            review: None,
        }),
        Err(e) => failure("Error deleting review", &e),
    }
}

fn failure(message: &str, err: &ReviewError) -> HttpResponse {
    let fields = match err {
        ReviewError::NotFound(_) => {
            return HttpResponse::NotFound().json(ErrorBody {
                message: "Review not found",
                error: None,
                fields: Vec::new(),
            })
        }
        ReviewError::Validation(errors) => errors.iter().map(FieldError::field).collect(),
        _ => Vec::new(),
    };

    let mut response = if err.is_client_error() {
        log!("[API] Rejected submission: {}", err);
        HttpResponse::BadRequest()
    } else {
        error!("[API] {}: {}", message, err);
        HttpResponse::InternalServerError()
    };
    response.json(ErrorBody {
        message,
        error: Some(err.to_string()),
        fields,
    })
}

/// Drains the multipart stream into text fields plus at most one image.
pub async fn read_submission(mut payload: Multipart) -> Result<Submission, ReviewError> {
    let mut submission = Submission::default();

    while let Some(field) = payload.try_next().await.map_err(payload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_string);
        let bytes = read_field(field).await?;

        if name == IMAGE_FIELD {
            // Browsers send an empty part when no file was picked
            let Some(original_name) = filename.filter(|name| !name.is_empty()) else {
                continue;
            };
            if submission.image.is_some() {
                return Err(ReviewError::Payload(format!(
                    "at most one `{IMAGE_FIELD}` file is accepted"
                )));
            }
            submission.image = Some(IncomingImage {
                original_name,
                bytes,
            });
        } else if !name.is_empty() {
            let value = String::from_utf8(bytes).map_err(|_| {
                ReviewError::Payload(format!("field `{name}` is not valid UTF-8"))
            })?;
            submission.fields.insert(name, value);
        }
    }

    Ok(submission)
}

async fn read_field(mut field: Field) -> Result<Vec<u8>, ReviewError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(payload_error)? {
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn payload_error(e: actix_multipart::MultipartError) -> ReviewError {
    ReviewError::Payload(e.to_string())
}
