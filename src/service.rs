use chrono::{SubsecRound, Utc};
use leptos::logging::{log, warn};
use std::collections::HashMap;

use crate::db::Database;
use crate::error::ReviewError;
use crate::models::review::{NewReview, Review};
use crate::uploads::{IncomingImage, UploadStore};

/// Create, list and delete reviews over an injected store handle and upload directory.
#[derive(Debug, Clone)]
pub struct ReviewService {
    db: Database,
    uploads: UploadStore,
}

impl ReviewService {
    pub fn new(db: Database, uploads: UploadStore) -> Self {
        ReviewService { db, uploads }
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    /// Validates, stores the optional image, then inserts the record.
    ///
    /// Nothing touches disk or database unless validation passes. If the
    /// insert fails after an image was written, the image is removed again.
    pub async fn create(
        &self,
        fields: &HashMap<String, String>,
        image: Option<IncomingImage>,
    ) -> Result<Review, ReviewError> {
        let new_review = NewReview::from_fields(fields).map_err(ReviewError::Validation)?;

        let reference = match image {
            Some(image) => Some(self.uploads.save(&image).await?),
            None => None,
        };

        // Timestamps are stored with microsecond precision
        let review = Review::new(new_review, reference, Utc::now().trunc_subsecs(6));
        if let Err(e) = self.db.insert_review(&review).await {
            if let Some(reference) = &review.image {
                warn!(
                    "[SERVICE] Insert failed, discarding stored image {}",
                    reference
                );
                self.uploads.remove_with_retry(reference).await;
            }
            return Err(e.into());
        }

        log!("[SERVICE] Created review {}", review.id);
        Ok(review)
    }

    pub async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        Ok(self.db.get_reviews().await?)
    }

    /// Deletes the record, then makes a best-effort attempt at its image.
    pub async fn delete(&self, id: &str) -> Result<Review, ReviewError> {
        let review = self
            .db
            .delete_review(id)
            .await?
            .ok_or_else(|| ReviewError::NotFound(id.to_string()))?;

        if let Some(reference) = &review.image {
            if !self.uploads.remove_with_retry(reference).await {
                warn!(
                    "[SERVICE] Review {} deleted but image {} was left behind",
                    review.id, reference
                );
            }
        }

        log!("[SERVICE] Deleted review {}", review.id);
        Ok(review)
    }
}
