use rustc_hash::FxHashMap;
use std::fmt::{self, Write};

// ======================== 核心：零堆分配字符串格式化 ========================
/// 空白字符折叠 + 截断，用于日志中预览规则原文
/// 不创建 String，遍历到最大长度立即终止
#[inline(always)]
pub fn preview_compact<'a>(s: &'a str, max_len: usize) -> impl fmt::Display + 'a {
    struct CompactView<'a> {
        source: &'a str,
        max_length: usize,
    }

    impl<'a> fmt::Display for CompactView<'a> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut char_count = 0;
            let mut last_was_whitespace = false;

            for ch in self.source.chars() {
                if char_count >= self.max_length {
                    f.write_str("…")?;
                    break;
                }

                if ch.is_whitespace() {
                    if !last_was_whitespace {
                        f.write_char(' ')?;
                        char_count += 1;
                        last_was_whitespace = true;
                    }
                } else {
                    f.write_char(ch)?;
                    char_count += 1;
                    last_was_whitespace = false;
                }
            }
            Ok(())
        }
    }

    CompactView {
        source: s,
        max_length: max_len,
    }
}

// ======================== 衍生：计数表日志格式化 ========================
/// 按计数降序取前 N 项，格式：[name=count, ...] (distinct: N)
/// 计数相同按键名排序，保证日志输出稳定
pub fn top_counts(counts: &FxHashMap<String, u64>, limit: usize) -> String {
    if counts.is_empty() {
        return "[empty]".to_string();
    }

    const MAX_KEY_LEN: usize = 30;

    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut result = String::with_capacity(limit * (MAX_KEY_LEN + 8) + 24);
    result.push('[');
    for (idx, (key, count)) in entries.iter().take(limit).enumerate() {
        if idx > 0 {
            result.push_str(", ");
        }
        // 写入 String 不会失败
        let _ = write!(result, "{}={}", preview_compact(key, MAX_KEY_LEN), count);
    }
    result.push(']');

    if entries.len() > limit {
        let _ = write!(result, " (distinct: {})", entries.len());
    }

    result
}
