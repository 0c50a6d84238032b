//! Review service
//!
//! Customers rate the pro once their order is completed. Reviews are public
//! on the pro's profile; staff may list and remove any of them.

use squad_core::{average_rating, DomainError, Id, Review};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    CreateReviewRequest, ProfileReviewsResponse, ProfileSummary, ReviewResponse, ReviewsQuery,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Most reviews shown on a profile
pub const MAX_PROFILE_REVIEWS: i64 = 100;

const DEFAULT_MODERATION_LIMIT: i64 = 50;

/// Review service
pub struct ReviewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Review the pro of a completed order. One review per order.
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        reviewer_id: Id,
        order_id: Id,
        request: CreateReviewRequest,
    ) -> ServiceResult<ReviewResponse> {
        request.validate()?;
        let reviewer = AccessService::new(self.ctx).profile(reviewer_id).await?;

        let order = self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        let review = Review::for_order(&order, reviewer_id, request.rating, request.comment)?;
        self.ctx.review_repo().create(&review).await?;

        info!(
            review_id = %review.id,
            order_id = %order_id,
            reviewee_id = %review.reviewee_id,
            rating = review.rating,
            "Review created"
        );

        let mut response = ReviewResponse::from(&review);
        response.reviewer = Some(ProfileSummary::from(&reviewer));
        Ok(response)
    }

    /// Reviews about a profile, newest first, with the average rating
    #[instrument(skip(self))]
    pub async fn list_for_profile(&self, profile_id: Id) -> ServiceResult<ProfileReviewsResponse> {
        self.ctx
            .profile_repo()
            .find_by_id(profile_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(profile_id))?;

        let reviews = self
            .ctx
            .review_repo()
            .list_for_reviewee(profile_id, MAX_PROFILE_REVIEWS)
            .await?;

        Ok(ProfileReviewsResponse {
            profile_id,
            count: reviews.len(),
            average_rating: average_rating(&reviews),
            reviews: self.with_reviewers(&reviews).await?,
        })
    }

    /// Staff: every review, newest first
    #[instrument(skip(self))]
    pub async fn list_all(
        &self,
        staff_id: Id,
        query: &ReviewsQuery,
    ) -> ServiceResult<Vec<ReviewResponse>> {
        AccessService::new(self.ctx).require_staff(staff_id).await?;

        let limit = query
            .limit
            .unwrap_or(DEFAULT_MODERATION_LIMIT)
            .clamp(1, MAX_PROFILE_REVIEWS);
        let reviews = self
            .ctx
            .review_repo()
            .list(limit, query.offset.unwrap_or(0).max(0))
            .await?;
        self.with_reviewers(&reviews).await
    }

    /// Staff: remove a review
    #[instrument(skip(self))]
    pub async fn delete(&self, staff_id: Id, review_id: Id) -> ServiceResult<()> {
        AccessService::new(self.ctx).require_staff(staff_id).await?;

        if !self.ctx.review_repo().delete(review_id).await? {
            return Err(DomainError::ReviewNotFound(review_id).into());
        }
        info!(review_id = %review_id, staff_id = %staff_id, "Review removed");
        Ok(())
    }

    async fn with_reviewers(&self, reviews: &[Review]) -> ServiceResult<Vec<ReviewResponse>> {
        let mut ids: Vec<Id> = reviews.iter().map(|r| r.reviewer_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let people = self.ctx.profile_repo().find_many(&ids).await?;

        Ok(reviews
            .iter()
            .map(|review| {
                let mut response = ReviewResponse::from(review);
                response.reviewer = people
                    .iter()
                    .find(|p| p.id == review.reviewer_id)
                    .map(ProfileSummary::from);
                response
            })
            .collect())
    }
}
