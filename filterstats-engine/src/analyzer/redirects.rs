//! 重定向资源分析器
//! 只检查网络规则；每条规则只取修饰符顺序中的第一个重定向类修饰符

use once_cell::sync::Lazy;
use regex::Regex;

use super::RuleAnalyzer;
use crate::core::{RedirectStats, RuleNode};

/// 重定向类修饰符
pub const REDIRECT_MODIFIERS: [&str; 3] = ["redirect", "redirect-rule", "rewrite"];

/// 修饰符无取值时的占位资源名
const UNKNOWN_RESOURCE: &str = "unknown";

/// 末尾优先级后缀 `:<数字>`（如 `noopjs:42`）
static PRIORITY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":\d+$").unwrap_or_else(|e| panic!("invalid redirect priority regex: {}", e))
});

/// 重定向资源分析器
#[derive(Debug, Default)]
pub struct RedirectAnalyzer;

impl RedirectAnalyzer {
    /// 提取首个重定向资源（已归一化）
    pub fn extract(node: &RuleNode) -> Option<String> {
        let RuleNode::Network(rule) = node else {
            return None;
        };

        let modifier = rule
            .modifiers
            .iter()
            .find(|m| REDIRECT_MODIFIERS.contains(&m.name.as_str()))?;

        let raw = modifier
            .value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_RESOURCE);

        Some(Self::normalize_resource(raw).to_string())
    }

    /// 去掉一个末尾优先级后缀；没有后缀时原样返回
    pub fn normalize_resource(resource: &str) -> &str {
        match PRIORITY_SUFFIX.find(resource) {
            Some(m) => &resource[..m.start()],
            None => resource,
        }
    }
}

impl RuleAnalyzer for RedirectAnalyzer {
    const TYPE_NAME: &'static str = "Redirects";
    type Output = RedirectStats;

    fn observe(acc: &mut RedirectStats, node: Option<&RuleNode>) {
        let Some(resource) = node.and_then(Self::extract) else {
            return;
        };
        acc.total += 1;
        *acc.by_resource.entry(resource).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AdblockSyntax, CosmeticRule, CosmeticSubtype, Modifier, NetworkRule};

    fn network_with(modifiers: Vec<Modifier>) -> RuleNode {
        RuleNode::Network(NetworkRule {
            exception: false,
            pattern: "||example.org/ads.js".to_string(),
            modifiers,
        })
    }

    #[test]
    fn test_priority_suffix_is_stripped() {
        let node = network_with(vec![Modifier::new("redirect", Some("noopjs:42".to_string()))]);
        let stats = RedirectAnalyzer::analyze([Some(&node)]);

        assert_eq!(stats.total, 1);
        assert_eq!(stats.by_resource["noopjs"], 1);
        assert!(!stats.by_resource.contains_key("noopjs:42"));
    }

    #[test]
    fn test_normalize_resource() {
        assert_eq!(RedirectAnalyzer::normalize_resource("noopjs"), "noopjs");
        assert_eq!(RedirectAnalyzer::normalize_resource("noop.js:5"), "noop.js");
        // 只剥离一个后缀
        assert_eq!(RedirectAnalyzer::normalize_resource("a:1:2"), "a:1");
        // 非数字后缀保持不变
        assert_eq!(RedirectAnalyzer::normalize_resource("abp-resource:blank-js"), "abp-resource:blank-js");
        assert_eq!(RedirectAnalyzer::normalize_resource("noopjs:"), "noopjs:");
    }

    #[test]
    fn test_first_redirect_modifier_wins() {
        let node = network_with(vec![
            Modifier::new("script", None),
            Modifier::new("redirect-rule", Some("noop.txt".to_string())),
            Modifier::new("redirect", Some("noopjs".to_string())),
        ]);
        let stats = RedirectAnalyzer::analyze([Some(&node)]);

        assert_eq!(stats.total, 1);
        assert_eq!(stats.by_resource.len(), 1);
        assert_eq!(stats.by_resource["noop.txt"], 1);
    }

    #[test]
    fn test_missing_value_is_unknown() {
        let node = network_with(vec![Modifier::new("rewrite", None)]);
        assert_eq!(RedirectAnalyzer::extract(&node).as_deref(), Some("unknown"));
    }

    #[test]
    fn test_cosmetic_rules_are_ignored() {
        let node = RuleNode::Cosmetic(CosmeticRule {
            subtype: CosmeticSubtype::ElementHiding,
            syntax: AdblockSyntax::AdGuard,
            separator: "##".to_string(),
            domains: vec![],
            body: ".ad".to_string(),
            modifiers: vec![Modifier::new("redirect", Some("noopjs".to_string()))],
            scriptlet: None,
        });
        let stats = RedirectAnalyzer::analyze([Some(&node), None]);
        assert_eq!(stats, RedirectStats::default());
    }
}
