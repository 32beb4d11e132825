mod summary;

use serde::{Deserialize, Serialize};

pub use saw_roc::num::round_decimals;
pub use saw_roc::{
    ArrayVec, Criterion, CriterionId, Error, EvaluationResult, Evaluator, Normalized, RankedItem,
};
pub use crate::summary::{format_count, ChannelSummary, PerformanceLabel};

pub static CRITERIA: [Criterion; 6] = [
    Criterion::benefit("C1", "Views", "views"),
    Criterion::benefit("C2", "Likes", "likes"),
    Criterion::benefit("C3", "Comments", "comments"),
    Criterion::benefit("C4", "Watch Time", "watchTimeMinutes"),
    Criterion::benefit("C5", "Subscribers Gained", "subscribersGained"),
    Criterion::benefit("C6", "Engagement Rate", "engagementRate"),
];

pub static REGISTRY: saw_roc::Registry = saw_roc::Registry::new(&CRITERIA);

static EVALUATOR: Evaluator = Evaluator::new(&REGISTRY);

/// Per-video statistics, as delivered by whatever fetched them. Counts the source could not
/// provide are expected to be 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub published_at: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub watch_time_minutes: u64,
    pub subscribers_gained: u64,
    /// `(likes + comments) / views` as a percentage.
    pub engagement_rate: f64,
}

impl Video {
    /// Build a video, deriving the engagement rate from the raw counts.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        views: u64,
        likes: u64,
        comments: u64,
        watch_time_minutes: u64,
        subscribers_gained: u64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            published_at: String::new(),
            views,
            likes,
            comments,
            watch_time_minutes,
            subscribers_gained,
            engagement_rate: engagement_rate(views, likes, comments),
        }
    }
}

impl saw_roc::Item for Video {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn value(&self, key: &str) -> f64 {
        match key {
            "views" => self.views as f64,
            "likes" => self.likes as f64,
            "comments" => self.comments as f64,
            "watchTimeMinutes" => self.watch_time_minutes as f64,
            "subscribersGained" => self.subscribers_gained as f64,
            "engagementRate" => self.engagement_rate,
            _ => 0.0,
        }
    }
}

/// `(likes + comments) / views × 100`, or 0 for a video without views.
pub fn engagement_rate(views: u64, likes: u64, comments: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes as f64 + comments as f64) / views as f64 * 100.0
}

/// Criterion ids in registry order, `C1` through `C6`.
pub fn default_priority() -> ArrayVec<CriterionId, 6> {
    REGISTRY.ids().collect()
}

/// Rank `videos` with ROC weights over `priority_order` (most important first).
pub fn evaluate<S: AsRef<str>>(
    videos: &[Video],
    priority_order: &[S],
) -> Result<EvaluationResult<String>, Error> {
    let result = EVALUATOR.evaluate(videos, priority_order);
    if let Err(err) = &result {
        tracing::warn!(%err, videos = videos.len(), "evaluation rejected");
    }
    result
}
