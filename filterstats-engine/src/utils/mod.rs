//! 工具模块：日志格式化等通用能力
pub mod log_format;

pub use log_format::{preview_compact, top_counts};
