//! 规则分类器
//! 每个分类器都是对语法树序列的一次纯折叠：累加器在单次遍历中构建，遍历结束即为最终结果，
//! 分类器之间不共享任何可变状态，可以任意顺序、任意并发地执行

use crate::core::RuleNode;

pub mod modifiers;
pub mod network_patterns;
pub mod redirects;
pub mod rule_types;
pub mod scriptlets;

pub use modifiers::ModifierAnalyzer;
pub use network_patterns::NetworkPatternAnalyzer;
pub use redirects::RedirectAnalyzer;
pub use rule_types::RuleTypeAnalyzer;
pub use scriptlets::ScriptletAnalyzer;

/// 所有分类器的通用抽象特质
pub trait RuleAnalyzer {
    /// 分类器名称，用于日志标准化输出
    const TYPE_NAME: &'static str;

    /// 累加器类型，Default 即空统计
    type Output: Default;

    /// 处理单条规则（None 表示解析失败），各分类器唯一的差异化实现点
    fn observe(acc: &mut Self::Output, node: Option<&RuleNode>);

    /// 通用折叠骨架：空累加器 → 逐条 observe → 返回成品
    fn analyze<'a, I>(nodes: I) -> Self::Output
    where
        I: IntoIterator<Item = Option<&'a RuleNode>>,
    {
        let mut acc = Self::Output::default();
        let mut seen = 0usize;
        for node in nodes {
            Self::observe(&mut acc, node);
            seen += 1;
        }
        log::trace!("[{}] analyzed {} rule(s)", Self::TYPE_NAME, seen);
        acc
    }
}
