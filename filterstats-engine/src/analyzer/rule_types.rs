//! 规则类型分类器
//! 把每条规则归入唯一的类型叶子桶，解析失败或无法识别的一律计入 invalid

use super::RuleAnalyzer;
use crate::core::{CommentRule, CosmeticRule, CosmeticSubtype, RuleNode, RuleTypeCounts};

/// 规则类型分类器
#[derive(Debug, Default)]
pub struct RuleTypeAnalyzer;

impl RuleTypeAnalyzer {
    /// 单条规则归类，直接更新计数表（全函数，不会失败）
    pub fn categorize(node: Option<&RuleNode>, counts: &mut RuleTypeCounts) {
        match node {
            None | Some(RuleNode::Invalid(_)) => counts.invalid += 1,
            Some(RuleNode::Network(rule)) => {
                if rule.exception {
                    counts.network.exception += 1;
                } else {
                    counts.network.blocking += 1;
                }
            }
            Some(RuleNode::Cosmetic(rule)) => Self::categorize_cosmetic(rule, counts),
            Some(RuleNode::Comment(rule)) => Self::categorize_comment(rule, counts),
        }
    }

    /// 装饰规则：例外与否只看分隔符是否含 `@`
    fn categorize_cosmetic(rule: &CosmeticRule, counts: &mut RuleTypeCounts) {
        let is_exception = rule.separator_indicates_exception();

        match rule.subtype {
            CosmeticSubtype::ScriptletInjection => counts.scriptlet.bump(is_exception),
            CosmeticSubtype::HtmlFiltering => counts.html_filtering.bump(is_exception),
            CosmeticSubtype::JsInjection => counts.script.bump(is_exception),
            CosmeticSubtype::CssInjection => {
                if is_exception {
                    counts.cosmetic.css_injection_exception += 1;
                } else {
                    counts.cosmetic.css_injection += 1;
                }
            }
            // 未识别子类型沿用元素隐藏桶
            CosmeticSubtype::ElementHiding | CosmeticSubtype::Other => {
                if is_exception {
                    counts.cosmetic.element_hiding_exception += 1;
                } else {
                    counts.cosmetic.element_hiding += 1;
                }
            }
        }
    }

    fn categorize_comment(rule: &CommentRule, counts: &mut RuleTypeCounts) {
        if rule.is_preprocessor_directive() {
            counts.preprocessor += 1;
        } else {
            counts.comments += 1;
        }
    }
}

impl RuleAnalyzer for RuleTypeAnalyzer {
    const TYPE_NAME: &'static str = "RuleTypes";
    type Output = RuleTypeCounts;

    fn observe(acc: &mut RuleTypeCounts, node: Option<&RuleNode>) {
        Self::categorize(node, acc);
    }
}
