use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::reviews::repo::Review;

pub const MIN_COMMENT_CHARS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            profile_id: r.profile_id,
            reviewer_id: r.reviewer_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

pub fn validate_review(rating: i32, comment: &str) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::validation("Rating must be between 1 and 5"));
    }
    if comment.trim().chars().count() < MIN_COMMENT_CHARS {
        return Err(ApiError::validation(
            "Comment must be at least 10 characters long",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(validate_review(6, "Sehr gute Arbeit!").is_err());
        assert!(validate_review(0, "Sehr gute Arbeit!").is_err());
        assert!(validate_review(-1, "Sehr gute Arbeit!").is_err());
    }

    #[test]
    fn five_star_review_with_real_comment_passes() {
        assert!(validate_review(5, "Sehr gute Arbeit!").is_ok());
        assert!(validate_review(1, "Leider unzuverlässig.").is_ok());
    }

    #[test]
    fn short_comment_is_rejected() {
        assert!(validate_review(4, "Top!").is_err());
        // whitespace does not count toward the minimum
        assert!(validate_review(4, "   a       b   ").is_err());
    }

    #[test]
    fn comment_length_counts_characters_not_bytes() {
        // ten umlauts: well over ten bytes, exactly ten characters
        assert!(validate_review(3, "öäüöäüöäüö").is_ok());
    }
}
