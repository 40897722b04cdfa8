//! 报告输出：JSON 统计文件 + 自包含 HTML 页面
pub mod html;
pub mod json;

pub use html::{escape_html, format_count, generate_html, sorted_counts, write_html};
pub use json::{parse_json, read_json, write_json};

use std::path::Path;

use crate::error::StatsResult;

/// 写文件前创建父目录
pub(crate) fn ensure_parent_dir(path: &Path) -> StatsResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
