//! 网络规则模式形状分类器
//! 形状分类：
//! 1. regex：首尾均为 `/` 且长度大于 2
//! 2. domainPath：`||` 开头，域名之后紧跟 `/`
//! 3. domainOnly：`||` 开头，域名之后为空、`^` 或 `$`
//! 4. urlPart：其余一切

use super::RuleAnalyzer;
use crate::core::{NetworkPatternStats, PatternShape, RuleNode};

/// 域名锚点前缀
const DOMAIN_ANCHOR: &str = "||";
/// 域名结束候选字符
const DOMAIN_END_CHARS: [char; 3] = ['^', '/', '$'];

/// 网络规则模式形状分类器
#[derive(Debug, Default)]
pub struct NetworkPatternAnalyzer;

impl NetworkPatternAnalyzer {
    /// 模式形状分类（全函数，对裁剪后的模式求值）
    pub fn classify(pattern: &str) -> PatternShape {
        let trimmed = pattern.trim();

        if trimmed.len() > 2 && trimmed.starts_with('/') && trimmed.ends_with('/') {
            return PatternShape::Regex;
        }

        let Some(after_anchor) = trimmed.strip_prefix(DOMAIN_ANCHOR) else {
            return PatternShape::UrlPart;
        };

        // 三个候选字符中最早出现的位置，都不存在时为末尾
        let domain_end = after_anchor
            .find(&DOMAIN_END_CHARS[..])
            .unwrap_or(after_anchor.len());

        if after_anchor[domain_end..].starts_with('/') {
            PatternShape::DomainPath
        } else {
            PatternShape::DomainOnly
        }
    }
}

impl RuleAnalyzer for NetworkPatternAnalyzer {
    const TYPE_NAME: &'static str = "NetworkPatterns";
    type Output = NetworkPatternStats;

    fn observe(acc: &mut NetworkPatternStats, node: Option<&RuleNode>) {
        let Some(RuleNode::Network(rule)) = node else {
            return;
        };
        if rule.pattern.is_empty() {
            return;
        }

        let shape = Self::classify(&rule.pattern);
        let target = if rule.exception {
            &mut acc.exception
        } else {
            &mut acc.blocking
        };
        target.bump(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NetworkRule, PatternCounts};

    fn network(pattern: &str, exception: bool) -> RuleNode {
        RuleNode::Network(NetworkRule {
            exception,
            pattern: pattern.to_string(),
            modifiers: vec![],
        })
    }

    #[test]
    fn test_classify_examples() {
        assert_eq!(NetworkPatternAnalyzer::classify("||example.org^"), PatternShape::DomainOnly);
        assert_eq!(NetworkPatternAnalyzer::classify("||example.org/somepath"), PatternShape::DomainPath);
        assert_eq!(NetworkPatternAnalyzer::classify("/ads\\.js/"), PatternShape::Regex);
        assert_eq!(NetworkPatternAnalyzer::classify("banner.gif"), PatternShape::UrlPart);
    }

    #[test]
    fn test_classify_edges() {
        assert_eq!(NetworkPatternAnalyzer::classify("||example.org"), PatternShape::DomainOnly);
        assert_eq!(NetworkPatternAnalyzer::classify("||example.org$script"), PatternShape::DomainOnly);
        // `^` 先于 `/` 出现，仍视为仅域名
        assert_eq!(NetworkPatternAnalyzer::classify("||example.org^/path"), PatternShape::DomainOnly);
        assert_eq!(NetworkPatternAnalyzer::classify("  ||example.org/ "), PatternShape::DomainPath);
        // 长度不足 3 的 `//` 不是正则
        assert_eq!(NetworkPatternAnalyzer::classify("//"), PatternShape::UrlPart);
        assert_eq!(NetworkPatternAnalyzer::classify("|https://ads."), PatternShape::UrlPart);
        assert_eq!(NetworkPatternAnalyzer::classify("||"), PatternShape::DomainOnly);
    }

    #[test]
    fn test_polarity_split_and_empty_patterns_skipped() {
        let nodes = [
            network("||a.com^", false),
            network("||b.com/x", false),
            network("/track[0-9]+/", false),
            network("||ok.com^", true),
            network("ad.gif", true),
            network("", false),
        ];
        let stats = NetworkPatternAnalyzer::analyze(nodes.iter().map(Some));

        assert_eq!(
            stats.blocking,
            PatternCounts { domain_only: 1, domain_path: 1, regex: 1, url_part: 0 }
        );
        assert_eq!(
            stats.exception,
            PatternCounts { domain_only: 1, domain_path: 0, regex: 0, url_part: 1 }
        );
    }
}
