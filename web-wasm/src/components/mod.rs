pub mod dashboard;
pub mod header;
pub mod notice;
pub mod progress;
pub mod review_panel;
