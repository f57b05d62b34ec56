//! 統計ダッシュボード（テキスト表示）

use crate::client::ApiClient;
use crate::error::Result;
use bias_tagger_common::dashboard::{
    bias_bars, count_label, split_bias_types, tag_count, tagged_percentage, truncate_text,
    NO_BIAS_TAGS_MESSAGE, NO_TAGGED_IMAGES_MESSAGE,
};
use bias_tagger_common::{display_name, Statistics};
use std::fmt::Write as _;
use std::time::Duration;

const BAR_WIDTH: usize = 30;
const PROMPT_PREVIEW_CHARS: usize = 50;

/// 統計をテキストに整形
pub fn render_statistics(stats: &Statistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📊 Tagging statistics");
    let _ = writeln!(out, "  Total images:   {}", stats.total_images);
    let _ = writeln!(out, "  Total views:    {}", stats.total_views);
    let _ = writeln!(out, "  Tagged images:  {}", stats.tagged_images);
    let _ = writeln!(out, "  Bias rate:      {}%", tagged_percentage(stats));

    let _ = writeln!(out, "\nBias types");
    let rows = bias_bars(&stats.bias_types);
    if rows.is_empty() {
        let _ = writeln!(out, "  {}", NO_BIAS_TAGS_MESSAGE);
    } else {
        let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
        for row in &rows {
            let _ = writeln!(
                out,
                "  {:<width$}  {:<bar$}  {}",
                row.label,
                bar(row.ratio),
                count_label(row.count, "tag"),
                width = label_width,
                bar = BAR_WIDTH,
            );
        }
    }

    let _ = writeln!(out, "\nMost tagged image");
    match &stats.most_tagged {
        Some(image) => {
            let _ = writeln!(out, "  {} ({})", image.url, count_label(tag_count(image), "tag"));
            let _ = writeln!(
                out,
                "  Prompt: {}",
                image.prompt.as_deref().unwrap_or("No prompt available")
            );
            let _ = writeln!(out, "  Detected biases: {}", bias_list(image.bias_types.as_deref()));
        }
        None => {
            let _ = writeln!(out, "  {}", NO_TAGGED_IMAGES_MESSAGE);
        }
    }

    let _ = writeln!(out, "\nRecently tagged");
    if stats.recent_tagged.is_empty() {
        let _ = writeln!(out, "  {}", NO_TAGGED_IMAGES_MESSAGE);
    } else {
        for image in &stats.recent_tagged {
            let prompt = truncate_text(image.prompt.as_deref().unwrap_or("No prompt"), PROMPT_PREVIEW_CHARS);
            let _ = writeln!(out, "  - {}  [{}]", prompt, bias_list(image.bias_types.as_deref()));
        }
    }

    out
}

fn bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

fn bias_list(csv: Option<&str>) -> String {
    let names: Vec<String> = split_bias_types(csv).iter().map(|b| display_name(b)).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// 統計を取得して表示（`watch` 指定時は一定間隔で更新）
pub async fn run_stats(client: &ApiClient, watch: Option<Duration>, json: bool) -> Result<()> {
    loop {
        let stats = client.statistics().await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print!("{}", render_statistics(&stats));
        }

        let Some(interval) = watch else { break };
        println!(
            "\nUpdated {}, refreshing every {}s (Ctrl+C to stop)\n",
            chrono::Local::now().format("%H:%M:%S"),
            interval.as_secs()
        );
        tokio::time::sleep(interval).await;
    }

    Ok(())
}
