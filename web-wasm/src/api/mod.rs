//! タグ付けサーバーAPI（ブラウザ側）

pub mod tagger;

pub use tagger::BrowserApi;
