use bias_tagger::{cli, client, config, dashboard, error, review};
use clap::Parser;
use cli::{Cli, Commands};
use client::ApiClient;
use config::Config;
use error::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;

    match cli.command {
        Commands::Review { limit } => {
            println!("🏷  bias-tagger - レビュー\n");

            let server = config.resolve_server(cli.server.as_deref())?;
            let client = ApiClient::new(&server, &config)?;
            let summary = review::run_review(client, &config, limit).await?;

            println!("\n✅ レビュー終了: {}枚を判定", summary.tagged);
        }

        Commands::Stats { watch, interval, json } => {
            let server = config.resolve_server(cli.server.as_deref())?;
            let client = ApiClient::new(&server, &config)?;
            let refresh = watch.then(|| {
                interval
                    .map(|s| Duration::from_secs(s.max(1)))
                    .unwrap_or_else(|| config.refresh_interval())
            });

            dashboard::run_stats(&client, refresh, json).await?;
        }

        Commands::Seed => {
            println!("🌱 bias-tagger - モックデータ読み込み\n");

            let server = config.resolve_server(cli.server.as_deref())?;
            let client = ApiClient::new(&server, &config)?;
            let response = client.load_mock_data().await?;

            match response.count {
                Some(count) => println!("✔ {} ({}件)", response.message, count),
                None => println!("✔ {}", response.message),
            }
        }

        Commands::Config { set_server, set_timeout, show } => {
            let mut changed = false;

            if let Some(url) = set_server {
                config.set_server_url(&url)?;
                changed = true;
                println!("✔ 接続先サーバーを設定しました: {}", config.server_url);
            }

            if let Some(seconds) = set_timeout {
                config.request_timeout_seconds = seconds;
                changed = true;
                if seconds == 0 {
                    println!("✔ タイムアウトを無効にしました");
                } else {
                    println!("✔ タイムアウトを設定しました: {}秒", seconds);
                }
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  サーバー: {}", config.server_url);
                if let Ok(env) = std::env::var(config::SERVER_ENV_VAR) {
                    println!("  ({} で上書き: {})", config::SERVER_ENV_VAR, env);
                }
                match config.request_timeout() {
                    Some(timeout) => println!("  タイムアウト: {}秒", timeout.as_secs()),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  送信後の待ち時間: {}ms", config.pacing_delay_ms);
                println!("  統計の更新間隔: {}秒", config.refresh_interval().as_secs());
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
