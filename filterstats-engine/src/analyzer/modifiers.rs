//! 修饰符分析器
//! 职责：
//! 1. 从网络/装饰规则中提取修饰符列表
//! 2. 统计每个修饰符名称的出现次数
//! 3. 对 domain/to/from/denyallow 的取值逐个域名细分为 plain/tld/regex

use super::RuleAnalyzer;
use crate::core::{DomainValueKind, Modifier, ModifierStats, RuleNode, DOMAIN_BEARING_MODIFIERS};

/// 域名列表分隔符
const DOMAIN_LIST_SEPARATOR: char = '|';
/// 例外域名前缀，分类时忽略
const DOMAIN_EXCEPTION_MARKER: char = '~';

/// 修饰符分析器
#[derive(Debug, Default)]
pub struct ModifierAnalyzer;

impl ModifierAnalyzer {
    /// 提取修饰符：只有网络规则和装饰规则携带修饰符，其余类别返回空切片
    pub fn extract(node: &RuleNode) -> &[Modifier] {
        match node {
            RuleNode::Network(rule) => &rule.modifiers,
            RuleNode::Cosmetic(rule) => &rule.modifiers,
            RuleNode::Comment(_) | RuleNode::Invalid(_) => &[],
        }
    }

    /// 是否为携带域名列表的修饰符
    #[inline]
    pub fn is_domain_bearing(name: &str) -> bool {
        DOMAIN_BEARING_MODIFIERS.contains(&name)
    }

    /// 单个域名取值分类
    /// - 首尾均为 `/` → regex
    /// - 包含 `.*` → tld
    /// - 其余 → plain
    pub fn classify_domain_value(token: &str) -> DomainValueKind {
        if token.starts_with('/') && token.ends_with('/') {
            DomainValueKind::Regex
        } else if token.contains(".*") {
            DomainValueKind::Tld
        } else {
            DomainValueKind::Plain
        }
    }

    /// 拆分域名列表：按 `|` 切分、去空白、丢弃空项，并去掉每项开头的一个 `~`
    pub fn split_domain_list(value: &str) -> impl Iterator<Item = &str> {
        value
            .split(DOMAIN_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| token.strip_prefix(DOMAIN_EXCEPTION_MARKER).unwrap_or(token))
    }

    fn record(stats: &mut ModifierStats, modifier: &Modifier) {
        *stats.counts.entry(modifier.name.clone()).or_insert(0) += 1;

        if !Self::is_domain_bearing(&modifier.name) {
            return;
        }
        let Some(value) = modifier.value.as_deref() else {
            return;
        };

        let bucket = stats
            .domain_modifiers
            .entry(modifier.name.clone())
            .or_default();
        for token in Self::split_domain_list(value) {
            bucket.bump(Self::classify_domain_value(token));
        }
    }
}

impl RuleAnalyzer for ModifierAnalyzer {
    const TYPE_NAME: &'static str = "Modifiers";
    type Output = ModifierStats;

    fn observe(acc: &mut ModifierStats, node: Option<&RuleNode>) {
        let Some(node) = node else {
            return;
        };
        for modifier in Self::extract(node) {
            Self::record(acc, modifier);
        }
    }
}
