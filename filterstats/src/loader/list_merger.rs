//! 多个过滤列表合并去重

use rustc_hash::FxHashSet;

/// 按行拆分（`\n` / `\r\n`）、裁剪空白、丢弃空行，按首次出现顺序去重
pub fn merge_and_deduplicate<I, S>(contents: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut rules = Vec::new();

    for content in contents {
        for line in content.as_ref().lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || seen.contains(trimmed) {
                continue;
            }
            seen.insert(trimmed.to_string());
            rules.push(trimmed.to_string());
        }
    }

    rules
}
