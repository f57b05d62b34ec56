//! 統計ダッシュボード
//!
//! 表示時に取得し、以降は一定間隔で再取得する。

use crate::api::BrowserApi;
use crate::session::{show_notice, Toast};
use bias_tagger_common::dashboard::{
    bias_bars, count_label, split_bias_types, tag_count, tagged_percentage, truncate_text,
    NO_BIAS_TAGS_MESSAGE, NO_TAGGED_IMAGES_MESSAGE,
};
use bias_tagger_common::types::TaggedImage;
use bias_tagger_common::{display_name, Notice, Statistics};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);
const PROMPT_PREVIEW_CHARS: usize = 50;

#[component]
pub fn Dashboard(set_toast: WriteSignal<Option<Toast>>) -> impl IntoView {
    let (stats, set_stats) = signal(None::<Statistics>);
    let (loading, set_loading) = signal(false);

    let refresh = move || {
        set_loading.set(true);
        spawn_local(async move {
            match BrowserApi::same_origin().statistics().await {
                Ok(s) => set_stats.set(Some(s)),
                Err(e) => show_notice(set_toast, Notice::error(format!("Error loading statistics: {}", e))),
            }
            set_loading.set(false);
        });
    };

    refresh();
    if let Ok(handle) = set_interval_with_handle(refresh, REFRESH_INTERVAL) {
        on_cleanup(move || handle.clear());
    }

    view! {
        <div class="dashboard">
            <Show when=move || loading.get() && stats.with(Option::is_none)>
                <div class="loading">"Loading statistics..."</div>
            </Show>
            {move || stats.get().map(|s| view! { <StatsView stats=s /> })}
        </div>
    }
}

#[component]
fn StatsView(stats: Statistics) -> impl IntoView {
    let bars = bias_bars(&stats.bias_types);
    let percentage = tagged_percentage(&stats);

    view! {
        <div class="stats-grid">
            <StatCard label="Total Images" value=stats.total_images.to_string() />
            <StatCard label="Total Views" value=stats.total_views.to_string() />
            <StatCard label="Tagged Images" value=stats.tagged_images.to_string() />
            <StatCard label="Bias Rate" value=format!("{}%", percentage) />
        </div>

        <section class="chart-section">
            <h2>"Bias Types"</h2>
            {if bars.is_empty() {
                view! { <p class="empty">{NO_BIAS_TAGS_MESSAGE}</p> }.into_any()
            } else {
                bars.into_iter()
                    .map(|row| {
                        view! {
                            <div class="bias-bar">
                                <div class="bias-bar-label">
                                    <span>{row.label.clone()}</span>
                                    <span>{count_label(row.count, "tag")}</span>
                                </div>
                                <div class="bias-bar-track">
                                    <div class="bias-bar-fill" style=format!("width: {}%", row.percent()) />
                                </div>
                            </div>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </section>

        <section class="most-tagged">
            <h2>"Most Tagged Image"</h2>
            {match stats.most_tagged {
                Some(image) => view! { <MostTagged image=image /> }.into_any(),
                None => view! { <p class="empty">{NO_TAGGED_IMAGES_MESSAGE}</p> }.into_any(),
            }}
        </section>

        <section class="recent">
            <h2>"Recently Tagged"</h2>
            {if stats.recent_tagged.is_empty() {
                view! { <p class="empty">{NO_TAGGED_IMAGES_MESSAGE}</p> }.into_any()
            } else {
                view! {
                    <div class="image-grid">
                        {stats.recent_tagged.into_iter().map(|image| view! { <RecentCard image=image /> }).collect_view()}
                    </div>
                }
                .into_any()
            }}
        </section>
    }
}

#[component]
fn StatCard(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="stat-card">
            <div class="stat-value">{value}</div>
            <div class="stat-label">{label}</div>
        </div>
    }
}

#[component]
fn MostTagged(image: TaggedImage) -> impl IntoView {
    let count = count_label(tag_count(&image), "tag");
    let prompt = image.prompt.clone().unwrap_or_else(|| "No prompt available".to_string());

    view! {
        <div class="most-tagged-content">
            <div class="most-tagged-image-wrapper">
                <img src=image.url.clone() alt=prompt.clone() />
                <div class="tag-count-badge">{count}</div>
            </div>
            <div class="most-tagged-info">
                <div class="info-row">
                    <strong>"Prompt: "</strong>
                    {prompt}
                </div>
                <div class="info-row">
                    <strong>"Detected Biases:"</strong>
                    <BiasTags csv=image.bias_types />
                </div>
            </div>
        </div>
    }
}

#[component]
fn RecentCard(image: TaggedImage) -> impl IntoView {
    let prompt = image.prompt.clone().unwrap_or_else(|| "No prompt".to_string());

    view! {
        <div class="image-card">
            <img src=image.url.clone() alt=prompt.clone() />
            <div class="image-card-info">
                <div class="image-card-prompt">{truncate_text(&prompt, PROMPT_PREVIEW_CHARS)}</div>
                <BiasTags csv=image.bias_types />
            </div>
        </div>
    }
}

#[component]
fn BiasTags(csv: Option<String>) -> impl IntoView {
    view! {
        <div class="bias-tags-list">
            {split_bias_types(csv.as_deref())
                .iter()
                .map(|b| view! { <span class="bias-tag">{display_name(b)}</span> })
                .collect_view()}
        </div>
    }
}
