//! 脚本片段分析器
//! 从脚本注入规则中取出脚本片段名称与语法方言，三项计数（total/byName/bySyntax）同增同减

use super::RuleAnalyzer;
use crate::core::{CosmeticSubtype, RuleNode, ScriptletStats, ScriptletSyntax};

/// 首个参数原文缺失时使用的占位名
const UNKNOWN_SCRIPTLET: &str = "unknown";

/// 单条规则的脚本片段信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptletInfo {
    pub name: String,
    pub syntax: ScriptletSyntax,
}

/// 脚本片段分析器
#[derive(Debug, Default)]
pub struct ScriptletAnalyzer;

impl ScriptletAnalyzer {
    /// 提取脚本片段名称与方言
    /// 规则体缺失、参数组为空、首组参数为空时返回 None（不计数）
    pub fn extract(node: &RuleNode) -> Option<ScriptletInfo> {
        let RuleNode::Cosmetic(rule) = node else {
            return None;
        };
        if rule.subtype != CosmeticSubtype::ScriptletInjection {
            return None;
        }

        let first_list = rule.scriptlet.as_ref()?.children.first()?;
        let first_param = first_list.children.first()?;

        let raw_name = first_param
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .unwrap_or(UNKNOWN_SCRIPTLET);

        Some(ScriptletInfo {
            name: Self::strip_quotes(raw_name).to_string(),
            syntax: ScriptletSyntax::from(rule.syntax),
        })
    }

    /// 去掉名称两端的引号：首尾各一个 `'` 或 `"`，两端都有才去除
    pub fn strip_quotes(raw: &str) -> &str {
        let is_quote = |c: char| c == '\'' || c == '"';
        let mut chars = raw.chars();
        match (chars.next(), chars.next_back()) {
            (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
                &raw[first.len_utf8()..raw.len() - last.len_utf8()]
            }
            _ => raw,
        }
    }
}

impl RuleAnalyzer for ScriptletAnalyzer {
    const TYPE_NAME: &'static str = "Scriptlets";
    type Output = ScriptletStats;

    fn observe(acc: &mut ScriptletStats, node: Option<&RuleNode>) {
        let Some(info) = node.and_then(Self::extract) else {
            return;
        };
        acc.total += 1;
        *acc.by_name.entry(info.name).or_insert(0) += 1;
        acc.by_syntax.bump(info.syntax);
    }
}
