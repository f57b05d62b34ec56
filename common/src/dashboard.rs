//! ダッシュボード集計（CLI/WASM共通）
//!
//! 統計値を画面表示用の値に変換する。描画は各クライアントが行う。

use crate::bias::display_name;
use crate::types::{BiasTypeCount, Statistics, TaggedImage};

pub const NO_BIAS_TAGS_MESSAGE: &str = "No bias tags yet";
pub const NO_TAGGED_IMAGES_MESSAGE: &str = "No tagged images yet";

/// 棒グラフ1行分
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub bias_type: String,
    pub label: String,
    pub count: u64,
    /// 最大値に対する比率（0.0〜1.0）
    pub ratio: f64,
}

impl BarRow {
    pub fn percent(&self) -> f64 {
        self.ratio * 100.0
    }
}

/// タグ付け率（%）
pub fn tagged_percentage(stats: &Statistics) -> u32 {
    if stats.total_images == 0 {
        return 0;
    }
    ((stats.tagged_images as f64 / stats.total_images as f64) * 100.0).round() as u32
}

/// バイアス種別の棒グラフ（最大件数を100%として換算）
pub fn bias_bars(bias_types: &[BiasTypeCount]) -> Vec<BarRow> {
    let max = bias_types.iter().map(|b| b.count).max().unwrap_or(0);
    bias_types
        .iter()
        .map(|b| BarRow {
            bias_type: b.bias_type.clone(),
            label: display_name(&b.bias_type),
            count: b.count,
            ratio: if max == 0 { 0.0 } else { b.count as f64 / max as f64 },
        })
        .collect()
}

/// カンマ区切りのバイアス種別を分割
pub fn split_bias_types(csv: Option<&str>) -> Vec<String> {
    csv.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 画像に付いたタグ数（`tag_count` がなければ種別数）
pub fn tag_count(image: &TaggedImage) -> u64 {
    image
        .tag_count
        .unwrap_or_else(|| split_bias_types(image.bias_types.as_deref()).len() as u64)
}

/// "1 tag" / "3 tags"
pub fn count_label(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// 指定文字数で切り詰め
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
