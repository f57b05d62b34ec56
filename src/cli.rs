use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bias-tagger")]
#[command(about = "AI生成画像のバイアスタグ付けレビュークライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 接続先サーバー（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を1枚ずつレビューしてバイアスタグを送信
    Review {
        /// この件数を判定したら終了
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// タグ付け統計を表示
    Stats {
        /// 一定間隔で再表示
        #[arg(short, long)]
        watch: bool,

        /// 更新間隔（秒、省略時は設定値）
        #[arg(short, long)]
        interval: Option<u64>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// サーバーにモックデータを読み込ませる
    Seed,

    /// 設定を表示/編集
    Config {
        /// 接続先サーバーを設定
        #[arg(long)]
        set_server: Option<String>,

        /// HTTPタイムアウト（秒、0で無効）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
