//! 规则文本的底层切分工具：修饰符列表、脚本片段参数、ABP 片段调用
//! 所有函数只做切分，不做语义校验；返回的片段均为原文切片

const ESCAPE: char = '\\';

/// 按逗号切分修饰符列表
/// 不切分的位置：
/// 1. 被 `\` 转义的逗号
/// 2. `/.../` 正则取值内部的逗号（正则须紧跟在 `=`、`|`、`~` 之后开始，且后面还有闭合的 `/`）
pub fn split_modifier_list(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_regex = false;
    let mut escaped = false;
    let mut prev: Option<char> = None;

    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
            prev = Some(c);
            continue;
        }
        match c {
            ESCAPE => escaped = true,
            '/' if in_regex => in_regex = false,
            '/' if matches!(prev, Some('=') | Some('|') | Some('~'))
                && text[idx + 1..].contains('/') =>
            {
                in_regex = true
            }
            ',' if !in_regex => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
        prev = Some(c);
    }
    parts.push(&text[start..]);
    parts
}

/// 按顶层分隔符切分，感知引号与转义；引号本身保留在原文中
fn split_outside_quotes(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == ESCAPE {
            escaped = true;
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if is_separator(c) => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// 切分 `name(arg1, arg2)` 括号内的参数
/// 空白参数记为 None；整个参数区为空时返回空列表
pub fn split_call_arguments(inner: &str) -> Vec<Option<String>> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    split_outside_quotes(inner, |c| c == ',')
        .into_iter()
        .map(str::trim)
        .map(|arg| (!arg.is_empty()).then(|| arg.to_string()))
        .collect()
}

/// 切分 ABP 片段：`;` 分隔多次调用，每次调用内按空白分隔参数，空调用丢弃
pub fn split_snippet_calls(body: &str) -> Vec<Vec<Option<String>>> {
    split_outside_quotes(body, |c| c == ';')
        .into_iter()
        .filter_map(|call| {
            let params: Vec<Option<String>> = split_outside_quotes(call.trim(), char::is_whitespace)
                .into_iter()
                .filter(|p| !p.is_empty())
                .map(|p| Some(p.to_string()))
                .collect();
            (!params.is_empty()).then_some(params)
        })
        .collect()
}
