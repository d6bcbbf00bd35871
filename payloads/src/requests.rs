use crate::MovieId;
use serde::{Deserialize, Serialize};

pub const COMMENT_MAX_LEN: usize = 1000;
pub const REVIEW_RATING_MIN: u8 = 1;
pub const REVIEW_RATING_MAX: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub movie_id: MovieId,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavorite {
    pub movie_id: MovieId,
}

/// Validation result for reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidation {
    Valid,
    RatingOutOfRange,
    EmptyComment,
    CommentTooLong,
}

impl ReviewValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::RatingOutOfRange => {
                Some("La puntuación debe estar entre 1 y 5")
            }
            Self::EmptyComment => Some("El comentario no puede estar vacío"),
            Self::CommentTooLong => {
                Some("El comentario no puede superar los 1000 caracteres")
            }
        }
    }
}

/// Validate a review before sending it.
///
/// Rules:
/// - rating between 1 and 5
/// - non-blank comment of at most 1000 characters
pub fn validate_review(review: &CreateReview) -> ReviewValidation {
    if !(REVIEW_RATING_MIN..=REVIEW_RATING_MAX).contains(&review.rating) {
        return ReviewValidation::RatingOutOfRange;
    }
    let comment = review.comment.trim();
    if comment.is_empty() {
        return ReviewValidation::EmptyComment;
    }
    if comment.chars().count() > COMMENT_MAX_LEN {
        return ReviewValidation::CommentTooLong;
    }
    ReviewValidation::Valid
}
