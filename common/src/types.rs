//! レビュー対象・判定・統計の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ReviewItem: サーバーから受け取るレビュー対象画像
//! - Decision: オペレーターのタグ判定
//! - Statistics: ダッシュボード用の集計値

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// レビュー対象の画像（セッションからは読み取り専用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReviewItem")]
pub struct ReviewItem {
    /// 送信キーとなるID
    pub id: String,
    /// 表示用の画像URL
    pub media_url: String,
    pub prompt: Option<String>,
    /// 既存のタグ（順序を保持）
    pub tags: Vec<String>,
}

/// サーバーが返す生の画像レコード
///
/// `media_url` が無ければ `url` を使い、`tags` は配列以外なら空扱い。
/// IDは送信キーなので、文字列か数値でなければ受け付けない。
#[derive(Deserialize)]
struct RawReviewItem {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    media_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    tags: Value,
}

impl TryFrom<RawReviewItem> for ReviewItem {
    type Error = String;

    fn try_from(raw: RawReviewItem) -> Result<Self, Self::Error> {
        let id = match raw.id {
            Value::String(s) if !s.trim().is_empty() => s,
            Value::Number(n) => n.to_string(),
            other => return Err(format!("review item without a usable id: {}", other)),
        };

        let media_url = raw
            .media_url
            .filter(|u| !u.is_empty())
            .or(raw.url)
            .unwrap_or_default();

        let tags = match raw.tags {
            Value::Array(values) => values
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            id,
            media_url,
            prompt: raw.prompt.filter(|p| !p.trim().is_empty()),
            tags,
        })
    }
}

impl ReviewItem {
    /// 画面表示用のプロンプト
    pub fn prompt_or_default(&self) -> &str {
        self.prompt.as_deref().unwrap_or("No prompt available")
    }

    /// 画面表示用のタグ一覧
    pub fn tags_label(&self) -> String {
        if self.tags.is_empty() {
            "None".to_string()
        } else {
            self.tags.join(", ")
        }
    }
}

/// 判定の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// バイアスカテゴリを付けて送信
    Tag,
    /// バイアスなしとしてスキップ
    Skip,
}

/// オペレーターの判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub image_id: String,
    /// 空にならない（スキップはIDのみ送る）
    pub bias_tags: Vec<String>,
    pub notes: Option<String>,
}

impl Decision {
    /// タグ判定を作成
    ///
    /// タグはトリムして空要素と重複を除く（最初に選んだ順を保持）。
    pub fn tag<I, S>(image_id: impl Into<String>, bias_tags: I, notes: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            image_id: image_id.into(),
            bias_tags: normalize_tags(bias_tags),
            notes: normalize_notes(notes),
        }
    }
}

/// タグ選択の正規化
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// バイアス種別ごとの件数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasTypeCount {
    pub bias_type: String,
    pub count: u64,
}

/// タグ付け済み画像（最近のタグ付け / 最多タグ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggedImage {
    pub id: Value,
    pub url: String,
    pub prompt: Option<String>,
    /// カンマ区切りのバイアス種別
    pub bias_types: Option<String>,
    pub tag_count: Option<u64>,
}

/// ダッシュボード統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub total_images: u64,
    pub total_views: u64,
    pub tagged_images: u64,
    pub bias_types: Vec<BiasTypeCount>,
    pub recent_tagged: Vec<TaggedImage>,
    pub most_tagged: Option<TaggedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_item_prefers_media_url() {
        let json = r#"{"id":"a1","media_url":"/i/a1.jpg","url":"/old/a1.jpg","prompt":"p","tags":[]}"#;
        let item: ReviewItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "a1");
        assert_eq!(item.media_url, "/i/a1.jpg");
        assert_eq!(item.prompt.as_deref(), Some("p"));
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_review_item_falls_back_to_url() {
        let json = r#"{"id":"a2","url":"/images/a2.jpg","prompt":null,"tags":["portrait","studio"]}"#;
        let item: ReviewItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.media_url, "/images/a2.jpg");
        assert_eq!(item.prompt, None);
        assert_eq!(item.tags, vec!["portrait", "studio"]);
        assert_eq!(item.tags_label(), "portrait, studio");
    }

    #[test]
    fn test_review_item_tolerates_odd_wire_values() {
        // tagsが文字列のまま、idが数値のケース
        let json = r#"{"id":42,"url":"/images/42.jpg","prompt":"  ","tags":"","source":"sora"}"#;
        let item: ReviewItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "42");
        assert_eq!(item.prompt, None);
        assert!(item.tags.is_empty());
        assert_eq!(item.tags_label(), "None");
        assert_eq!(item.prompt_or_default(), "No prompt available");
    }

    #[test]
    fn test_review_item_requires_id() {
        for json in [
            r#"{"media_url":"/x.jpg"}"#,
            r#"{"id":null,"media_url":"/x.jpg"}"#,
            r#"{"id":"  ","media_url":"/x.jpg"}"#,
            r#"{"id":{"k":1},"media_url":"/x.jpg"}"#,
        ] {
            assert!(serde_json::from_str::<ReviewItem>(json).is_err(), "{}", json);
        }
    }

    #[test]
    fn test_review_item_serialized_form_reads_back() {
        let item = ReviewItem {
            id: "a3".into(),
            media_url: "/i/a3.jpg".into(),
            prompt: Some("a cat".into()),
            tags: vec!["animal".into()],
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: ReviewItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_decision_tag_normalizes() {
        let d = Decision::tag("a1", [" age ", "", "gender", "age"], "  looks off ");
        assert_eq!(d.bias_tags, vec!["age", "gender"]);
        assert_eq!(d.notes.as_deref(), Some("looks off"));
    }


    #[test]
    fn test_statistics_defaults_missing_fields() {
        let stats: Statistics = serde_json::from_str(r#"{"total_images":10,"most_tagged":null}"#).unwrap();
        assert_eq!(stats.total_images, 10);
        assert_eq!(stats.total_views, 0);
        assert!(stats.bias_types.is_empty());
        assert!(stats.most_tagged.is_none());
    }
}
