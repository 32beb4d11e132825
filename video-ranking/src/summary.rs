use serde::Serialize;

use crate::Video;

/// Qualitative bucket for a ranked video. The top-ranked video is always `Best`, regardless of its
/// absolute score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PerformanceLabel {
    Best,
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceLabel {
    pub fn classify(score: f64, rank: usize) -> Self {
        if rank == 1 {
            Self::Best
        } else if score >= 0.75 {
            Self::VeryGood
        } else if score >= 0.5 {
            Self::Good
        } else if score >= 0.3 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }
}

impl std::fmt::Display for PerformanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Best => "best",
            Self::VeryGood => "very good",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsImprovement => "needs improvement",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub total_views: u64,
    pub total_watch_time_minutes: u64,
    pub subscriber_count: u64,
    pub avg_engagement_rate: f64,
    pub video_count: usize,
}

impl ChannelSummary {
    pub fn from_videos(videos: &[Video], subscriber_count: u64) -> Self {
        let avg_engagement_rate = match videos.len() {
            0 => 0.0,
            n => videos.iter().map(|v| v.engagement_rate).sum::<f64>() / n as f64,
        };
        let total_views = saturating_total(videos.iter().map(|v| v.views));
        let total_watch_time_minutes =
            saturating_total(videos.iter().map(|v| v.watch_time_minutes));
        Self {
            total_views,
            total_watch_time_minutes,
            subscriber_count,
            avg_engagement_rate,
            video_count: videos.len(),
        }
    }
}

fn saturating_total(counts: impl Iterator<Item = u64>) -> u64 {
    counts.fold(0, u64::saturating_add)
}

/// Compact rendering of a count: `1.2M`, `3.4K`, or the plain number below one thousand.
pub fn format_count(n: u64) -> String {
    match n {
        1_000_000.. => format!("{:.1}M", n as f64 / 1e6),
        1_000.. => format!("{:.1}K", n as f64 / 1e3),
        _ => n.to_string(),
    }
}
