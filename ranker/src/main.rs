use std::io::{stdin, BufRead as _};

use anyhow::{bail, Context as _};
use clap::Parser;
use rand::{rngs::SmallRng, Rng, SeedableRng as _};
use tracing_subscriber::EnvFilter;
use video_ranking::{
    default_priority, evaluate, format_count, round_decimals, ChannelSummary, EvaluationResult,
    PerformanceLabel, Video,
};

const HEADER: &str = "id,title,views,likes,comments,watch_time_minutes,subscribers_gained";

/// Rank videos read as CSV from stdin using SAW scores over ROC weights.
#[derive(Debug, Parser)]
struct Args {
    /// Criterion ids, most important first. Defaults to registry order (C1..C6).
    #[arg(long, env = "RANKER_PRIORITY", value_delimiter = ',')]
    priority: Vec<String>,
    /// Print the full evaluation result as JSON instead of tables.
    #[arg(long)]
    json: bool,
    /// Decimal places for printed scores and weights.
    #[arg(long, default_value_t = 4)]
    decimals: u32,
    /// Channel subscriber count shown in the summary line.
    #[arg(long, env = "RANKER_SUBSCRIBERS", default_value_t = 0)]
    subscribers: u64,
    /// Generate this many random videos instead of reading stdin.
    #[arg(long)]
    synthetic: Option<usize>,
    /// Seed for `--synthetic`.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let videos = match args.synthetic {
        Some(count) => synthetic_videos(count, args.seed),
        None => read_videos()?,
    };
    tracing::info!(videos = videos.len(), "loaded videos");

    let priority: Vec<String> = if args.priority.is_empty() {
        default_priority().iter().map(|id| id.to_string()).collect()
    } else {
        args.priority.clone()
    };
    let result = evaluate(&videos, &priority).context("evaluate videos")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_report(&videos, &result, &args);
    Ok(())
}

fn read_videos() -> anyhow::Result<Vec<Video>> {
    let mut videos = Vec::new();
    for (index, line) in stdin().lock().lines().enumerate() {
        let line = line.context("read stdin")?;
        if line.trim().is_empty() || line.starts_with(HEADER) {
            continue;
        }
        let video = parse_line(&line).with_context(|| format!("line {}", index + 1))?;
        videos.push(video);
    }
    Ok(videos)
}

/// Parse `id,title,views,likes,comments,watch_time_minutes,subscribers_gained`. The title may
/// itself contain commas, so the numeric fields are taken from the end of the line. Only the
/// padding around the whole title is dropped; its inner text is kept as written.
fn parse_line(line: &str) -> anyhow::Result<Video> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 7 {
        bail!("expected at least 7 fields, got {}", fields.len());
    }
    let (head, counts) = fields.split_at(fields.len() - 5);
    let count = |i: usize, name: &str| -> anyhow::Result<u64> {
        let field = counts[i].trim();
        field.parse().with_context(|| format!("{name}: {field:?}"))
    };
    let title = head[1..].join(",");
    Ok(Video::new(
        head[0].trim(),
        title.trim(),
        count(0, "views")?,
        count(1, "likes")?,
        count(2, "comments")?,
        count(3, "watch_time_minutes")?,
        count(4, "subscribers_gained")?,
    ))
}

fn synthetic_videos(count: usize, seed: Option<u64>) -> Vec<Video> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    (0..count)
        .map(|i| {
            let views: u64 = rng.gen_range(0..=250_000);
            let likes = rng.gen_range(0..=views / 10);
            let comments = rng.gen_range(0..=views / 50);
            let watch_time_minutes = (views as f64 * rng.gen_range(0.5..6.0)) as u64;
            let subscribers_gained = rng.gen_range(0..=views / 500);
            Video::new(
                format!("synthetic-{i}"),
                format!("Synthetic video {i}"),
                views,
                likes,
                comments,
                watch_time_minutes,
                subscribers_gained,
            )
        })
        .collect()
}

fn print_report(videos: &[Video], result: &EvaluationResult<String>, args: &Args) {
    let places = args.decimals;
    let summary = ChannelSummary::from_videos(videos, args.subscribers);
    println!(
        "videos: {}, views: {}, watch_time_min: {}, subscribers: {}, avg_engagement: {:.2}%",
        summary.video_count,
        format_count(summary.total_views),
        format_count(summary.total_watch_time_minutes),
        format_count(summary.subscriber_count),
        summary.avg_engagement_rate,
    );

    println!();
    for criterion in &result.ordered_criteria {
        let weight = result.weight_map[criterion.id].as_f64();
        println!(
            "{:<3} {:<20} w={}",
            criterion.id,
            criterion.name,
            round_decimals(weight, places)
        );
    }

    println!();
    let titles = |id: &str| {
        videos
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.title.as_str())
            .unwrap_or_default()
    };
    for ranked in &result.ranking {
        let label = PerformanceLabel::classify(ranked.score.as_f64(), ranked.rank);
        let contributions: Vec<String> = result
            .ordered_criteria
            .iter()
            .map(|c| {
                let contribution = ranked.contributions[c.id].as_f64();
                format!("{}={}", c.id, round_decimals(contribution, places))
            })
            .collect();
        println!(
            "{:>3}. {:<8} {:<18} {} [{}] {}",
            ranked.rank,
            round_decimals(ranked.score.as_f64(), places),
            label.to_string(),
            ranked.item_id,
            contributions.join(" "),
            titles(&ranked.item_id),
        );
    }

    let podium = result.podium::<3>();
    let podium: Vec<&str> = podium.iter().map(|r| r.item_id.as_str()).collect();
    println!();
    println!("top: {}", podium.join(", "));
    tracing::debug!(ranked = result.ranking.len(), "printed report");
}
