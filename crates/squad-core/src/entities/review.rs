//! Review entity - a customer's rating of the pro who played their order

use chrono::{DateTime, Utc};

use crate::entities::{Order, OrderStatus};
use crate::error::DomainError;
use crate::value_objects::Id;

/// One review per order, written by its customer about its pro
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: Id,
    pub order_id: Id,
    pub reviewer_id: Id,
    pub reviewee_id: Id,
    /// 1 to 5 stars
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub const MIN_RATING: i16 = 1;
    pub const MAX_RATING: i16 = 5;
    pub const MAX_COMMENT_LENGTH: usize = 1000;

    /// Review a finished order.
    ///
    /// Only the customer may write it, and only once the order is completed.
    /// A blank comment is stored as `None`.
    pub fn for_order(
        order: &Order,
        reviewer_id: Id,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Self, DomainError> {
        if order.customer_id != reviewer_id {
            return Err(DomainError::NotOrderCustomer);
        }
        if order.status != OrderStatus::Completed {
            return Err(DomainError::OrderNotReviewable(order.status));
        }
        let reviewee_id = order
            .pro_id
            .ok_or(DomainError::OrderNotReviewable(order.status))?;

        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(DomainError::ValidationError(format!(
                "rating must be between {} and {}",
                Self::MIN_RATING,
                Self::MAX_RATING
            )));
        }

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if comment
            .as_ref()
            .is_some_and(|c| c.chars().count() > Self::MAX_COMMENT_LENGTH)
        {
            return Err(DomainError::ContentTooLong {
                max: Self::MAX_COMMENT_LENGTH,
            });
        }

        Ok(Self {
            id: Id::new(),
            order_id: order.id,
            reviewer_id,
            reviewee_id,
            rating,
            comment,
            created_at: Utc::now(),
        })
    }
}

/// Mean rating rounded to one decimal, `None` without reviews
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    let mean = sum as f64 / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
