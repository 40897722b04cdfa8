//! 广告过滤规则文本解析器
//! 把一行规则文本解析为 RuleNode 语法树，覆盖 AdGuard / uBlock Origin / Adblock Plus 三种方言的常见写法
//! 识别顺序：空行 → 注释 → 显式网络规则前缀 → 装饰分隔符 → 兜底网络规则

use once_cell::sync::Lazy;
use regex::Regex;

use super::params::{split_call_arguments, split_modifier_list, split_snippet_calls};
use crate::core::{
    AdblockSyntax, CommentKind, CommentRule, CosmeticRule, CosmeticSubtype, InvalidRule, Modifier,
    NetworkRule, ParameterList, ParsedRule, RuleNode, ScriptletBody,
};
use crate::error::{CoreError, CoreResult};
use crate::utils::preview_compact;

/// 装饰规则分隔符，同一位置按此顺序取最长匹配
const COSMETIC_SEPARATORS: [&str; 12] = [
    "#@$?#", "#$?#", "#@?#", "#@$#", "#@%#", "$@$", "#?#", "#$#", "#%#", "#@#", "##", "$$",
];

/// 已知的过滤列表元数据头（小写比较）
const METADATA_HEADERS: [&str; 12] = [
    "title",
    "description",
    "homepage",
    "expires",
    "version",
    "last modified",
    "last updated",
    "timeupdated",
    "checksum",
    "license",
    "licence",
    "redirect",
];

const EXCEPTION_PREFIX: &str = "@@";
const UBO_SCRIPTLET_PREFIX: &str = "+js(";
const ADG_SCRIPTLET_PREFIX: &str = "//scriptlet(";
const MODIFIER_PREFIX_OPEN: &str = "[$";

/// 修饰符名称：可选 `~` 取反 + 字母数字/下划线/连字符
static MODIFIER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^~?[A-Za-z0-9_-]+$").unwrap_or_else(|e| panic!("invalid modifier name regex: {}", e))
});

/// `! Key: value` 元数据行
static METADATA_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^!\s*([A-Za-z][A-Za-z ]*?)\s*:\s*\S")
        .unwrap_or_else(|e| panic!("invalid metadata regex: {}", e))
});

/// 解析选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// 宽容模式：解析失败时产出 RuleNode::Invalid 而不是错误
    pub tolerant: bool,
}

/// 批量解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// 与输入一一对应
    pub rules: Vec<ParsedRule>,
    /// 每条失败规则一条：`Failed to parse "<raw>": <message>`
    pub errors: Vec<String>,
}

/// 规则文本解析器
#[derive(Debug, Clone, Default)]
pub struct AdblockRuleParser {
    options: ParserOptions,
}

impl AdblockRuleParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// 宽容模式解析器
    pub fn tolerant() -> Self {
        Self::new(ParserOptions { tolerant: true })
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// 解析单行规则文本
    pub fn parse(&self, text: &str) -> CoreResult<RuleNode> {
        match parse_line(text.trim()) {
            Err(err) if self.options.tolerant => Ok(RuleNode::Invalid(InvalidRule {
                raw: text.to_string(),
                error: err.to_string(),
            })),
            other => other,
        }
    }

    /// 解析单行并包装为 ParsedRule，失败不会中断
    pub fn parse_rule(&self, text: &str) -> ParsedRule {
        match self.parse(text) {
            Ok(node) => ParsedRule::parsed(text, node),
            Err(err) => ParsedRule::failed(text, err.to_string()),
        }
    }

    /// 批量解析，顺序与输入一致
    pub fn parse_rules<I, S>(&self, texts: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = ParseResult::default();
        for text in texts {
            let text = text.as_ref();
            let parsed = self.parse_rule(text);
            match (&parsed.node, &parsed.error) {
                (_, Some(err)) => {
                    log::trace!("规则解析失败：{} -> {}", preview_compact(text, 80), err);
                    result.errors.push(format!("Failed to parse \"{}\": {}", text, err));
                }
                (Some(node), None) => {
                    log::trace!("[{}] {}", node.category_name(), preview_compact(text, 80));
                }
                (None, None) => {}
            }
            result.rules.push(parsed);
        }
        log::debug!(
            "规则解析完成：total={}, failed={}, tolerant={}",
            result.rules.len(),
            result.errors.len(),
            self.options.tolerant
        );
        result
    }
}

/// 以严格模式解析单行规则
pub fn parse_rule(text: &str) -> ParsedRule {
    AdblockRuleParser::default().parse_rule(text)
}

/// 以严格模式批量解析
pub fn parse_rules<I, S>(texts: I) -> ParseResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    AdblockRuleParser::default().parse_rules(texts)
}

// ===================== 分派 =====================

fn parse_line(line: &str) -> CoreResult<RuleNode> {
    if line.is_empty() {
        return Err(CoreError::EmptyRule);
    }
    if let Some(comment) = parse_comment(line) {
        return Ok(RuleNode::Comment(comment));
    }
    if line.starts_with(EXCEPTION_PREFIX) || line.starts_with('|') {
        return parse_network(line).map(RuleNode::Network);
    }
    if line.starts_with(MODIFIER_PREFIX_OPEN) {
        return parse_prefixed_cosmetic(line).map(RuleNode::Cosmetic);
    }
    match find_cosmetic_separator(line) {
        Some((pos, separator)) => {
            parse_cosmetic(line, pos, separator, Vec::new(), false).map(RuleNode::Cosmetic)
        }
        None => parse_network(line).map(RuleNode::Network),
    }
}

// ===================== 注释 =====================

fn parse_comment(line: &str) -> Option<CommentRule> {
    let kind = if let Some(rest) = line.strip_prefix('!') {
        if rest
            .strip_prefix('#')
            .and_then(|r| r.chars().next())
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            CommentKind::PreProcessor
        } else if rest
            .strip_prefix('+')
            .is_some_and(|r| r.is_empty() || r.starts_with(char::is_whitespace))
        {
            CommentKind::Hint
        } else if is_metadata(line) {
            CommentKind::Metadata
        } else {
            CommentKind::Simple
        }
    } else if line.starts_with('[') && line.ends_with(']') && !line.starts_with(MODIFIER_PREFIX_OPEN) {
        CommentKind::Agent
    } else if line.starts_with('#') && !starts_with_separator(line) {
        CommentKind::Simple
    } else {
        return None;
    };

    Some(CommentRule {
        kind,
        text: line.to_string(),
    })
}

fn is_metadata(line: &str) -> bool {
    METADATA_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|key| METADATA_HEADERS.contains(&key.as_str().to_ascii_lowercase().as_str()))
}

// ===================== 装饰规则 =====================

fn separator_at(text: &str) -> Option<&'static str> {
    COSMETIC_SEPARATORS
        .iter()
        .copied()
        .find(|sep| text.starts_with(*sep))
}

fn starts_with_separator(line: &str) -> bool {
    separator_at(line).is_some()
}

/// 最早出现的装饰分隔符（位置, 分隔符）
fn find_cosmetic_separator(line: &str) -> Option<(usize, &'static str)> {
    line.char_indices()
        .filter(|(_, c)| *c == '#' || *c == '$')
        .find_map(|(idx, _)| separator_at(&line[idx..]).map(|sep| (idx, sep)))
}

/// `[$mod1,mod2=value]example.com##body`
fn parse_prefixed_cosmetic(line: &str) -> CoreResult<CosmeticRule> {
    let inner_start = MODIFIER_PREFIX_OPEN.len();
    let close = find_unescaped(line, ']', inner_start)
        .ok_or_else(|| CoreError::parse("Unclosed modifier list"))?;

    let modifiers = parse_modifier_list(&line[inner_start..close])?;
    let rest = &line[close + 1..];
    let (pos, separator) = find_cosmetic_separator(rest)
        .ok_or_else(|| CoreError::parse("Missing cosmetic separator after modifier list"))?;

    parse_cosmetic(rest, pos, separator, modifiers, true)
}

fn parse_cosmetic(
    line: &str,
    pos: usize,
    separator: &'static str,
    modifiers: Vec<Modifier>,
    has_modifier_prefix: bool,
) -> CoreResult<CosmeticRule> {
    let domains = parse_domain_list(&line[..pos])?;
    let body = line[pos + separator.len()..].trim();
    if body.is_empty() {
        return Err(CoreError::parse("Empty cosmetic rule body"));
    }

    let (subtype, mut syntax, scriptlet) = classify_cosmetic_body(separator, body)?;
    if has_modifier_prefix {
        syntax = AdblockSyntax::AdGuard;
    }

    Ok(CosmeticRule {
        subtype,
        syntax,
        separator: separator.to_string(),
        domains,
        body: body.to_string(),
        modifiers,
        scriptlet,
    })
}

fn parse_domain_list(text: &str) -> CoreResult<Vec<String>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|domain| {
            if domain.is_empty() || domain.contains(char::is_whitespace) {
                Err(CoreError::parse(format!("Invalid domain \"{}\"", domain)))
            } else {
                Ok(domain.to_string())
            }
        })
        .collect()
}

type CosmeticShape = (CosmeticSubtype, AdblockSyntax, Option<ScriptletBody>);

fn classify_cosmetic_body(separator: &str, body: &str) -> CoreResult<CosmeticShape> {
    use AdblockSyntax::{AdGuard, AdblockPlus, Common, UblockOrigin};
    use CosmeticSubtype::{CssInjection, ElementHiding, HtmlFiltering, JsInjection, ScriptletInjection};

    let shape = match separator {
        "##" | "#@#" => {
            if body.starts_with(UBO_SCRIPTLET_PREFIX) {
                let params = parse_call(body, UBO_SCRIPTLET_PREFIX)?;
                (ScriptletInjection, UblockOrigin, Some(single_call(params)))
            } else if body.starts_with('^') {
                (HtmlFiltering, UblockOrigin, None)
            } else if body.contains(":style(") || body.contains(":remove()") {
                (CssInjection, UblockOrigin, None)
            } else {
                (ElementHiding, Common, None)
            }
        }
        "#?#" | "#@?#" => {
            if is_css_block(body) {
                (CssInjection, AdGuard, None)
            } else {
                (ElementHiding, AdGuard, None)
            }
        }
        "#$#" | "#@$#" => {
            if is_css_block(body) {
                (CssInjection, AdGuard, None)
            } else {
                let calls = split_snippet_calls(body)
                    .into_iter()
                    .map(ParameterList::new)
                    .collect();
                (ScriptletInjection, AdblockPlus, Some(ScriptletBody { children: calls }))
            }
        }
        "#$?#" | "#@$?#" => (CssInjection, AdGuard, None),
        "#%#" | "#@%#" => {
            if body.starts_with(ADG_SCRIPTLET_PREFIX) {
                let params = parse_call(body, ADG_SCRIPTLET_PREFIX)?;
                (ScriptletInjection, AdGuard, Some(single_call(params)))
            } else {
                (JsInjection, AdGuard, None)
            }
        }
        "$$" | "$@$" => (HtmlFiltering, AdGuard, None),
        other => {
            return Err(CoreError::parse(format!(
                "Unsupported cosmetic separator \"{}\"",
                other
            )))
        }
    };
    Ok(shape)
}

/// `selector { declarations }`
fn is_css_block(body: &str) -> bool {
    body.ends_with('}') && body.find('{').is_some_and(|open| open > 0)
}

/// `prefix args )`
fn parse_call(body: &str, prefix: &str) -> CoreResult<Vec<Option<String>>> {
    let inner = body[prefix.len()..]
        .strip_suffix(')')
        .ok_or_else(|| CoreError::parse("Unterminated scriptlet call"))?;
    Ok(split_call_arguments(inner))
}

fn single_call(params: Vec<Option<String>>) -> ScriptletBody {
    ScriptletBody {
        children: vec![ParameterList::new(params)],
    }
}

// ===================== 网络规则 =====================

fn parse_network(line: &str) -> CoreResult<NetworkRule> {
    let (exception, rest) = match line.strip_prefix(EXCEPTION_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    if rest.trim().is_empty() {
        return Err(CoreError::parse("Empty network rule"));
    }
    if ends_with_unescaped_dollar(rest) {
        return Err(CoreError::parse("Empty modifier list"));
    }

    let (pattern, modifiers) = match find_modifier_start(rest) {
        Some(dollar) => (&rest[..dollar], parse_modifier_list(&rest[dollar + 1..])?),
        None => (rest, Vec::new()),
    };

    Ok(NetworkRule {
        exception,
        pattern: pattern.to_string(),
        modifiers,
    })
}

fn is_escaped(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .rev()
        .take_while(|c| *c == '\\')
        .count()
        % 2
        == 1
}

fn find_unescaped(text: &str, needle: char, from: usize) -> Option<usize> {
    text.char_indices()
        .skip_while(|(idx, _)| *idx < from)
        .find(|(idx, c)| *c == needle && !is_escaped(text, *idx))
        .map(|(idx, _)| idx)
}

fn ends_with_unescaped_dollar(text: &str) -> bool {
    text.ends_with('$') && !is_escaped(text, text.len() - 1)
}

/// 从右向左找第一个尾部可以解析为修饰符列表的 `$`
fn find_modifier_start(text: &str) -> Option<usize> {
    text.char_indices()
        .rev()
        .filter(|(idx, c)| *c == '$' && !is_escaped(text, *idx))
        .map(|(idx, _)| idx)
        .find(|idx| looks_like_modifier_list(&text[idx + 1..]))
}

/// 每个名称要么为空（稍后报错），要么符合修饰符名称格式，且至少有一个有效名称
fn looks_like_modifier_list(tail: &str) -> bool {
    let names: Vec<&str> = split_modifier_list(tail)
        .into_iter()
        .map(|part| modifier_name_part(part).trim())
        .collect();
    names.iter().any(|name| !name.is_empty())
        && names
            .iter()
            .all(|name| name.is_empty() || MODIFIER_NAME.is_match(name))
}

fn modifier_name_part(part: &str) -> &str {
    part.split_once('=').map_or(part, |(name, _)| name)
}

fn parse_modifier_list(text: &str) -> CoreResult<Vec<Modifier>> {
    if text.trim().is_empty() {
        return Err(CoreError::parse("Empty modifier list"));
    }
    split_modifier_list(text)
        .into_iter()
        .map(parse_modifier)
        .collect()
}

fn parse_modifier(part: &str) -> CoreResult<Modifier> {
    let (raw_name, value) = match part.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
        None => (part.trim(), None),
    };
    let (exception, name) = match raw_name.strip_prefix('~') {
        Some(name) => (true, name),
        None => (false, raw_name),
    };
    if name.is_empty() {
        return Err(CoreError::parse("Empty modifier name"));
    }

    Ok(Modifier {
        name: name.to_string(),
        value,
        exception,
    })
}
