mod enums;
mod rule;
mod stats;

// 导出常用项
pub use enums::{
    AdblockSyntax, CommentKind, CosmeticSubtype, DomainValueKind, PatternShape, ScriptletSyntax,
};
pub use rule::{
    CommentRule, CosmeticRule, InvalidRule, Modifier, NetworkRule, ParameterList, ParsedRule,
    RuleNode, ScriptletBody,
};
pub use stats::{
    CosmeticCounts, DomainValueCounts, GroupStatistics, ModifierStats, NetworkCounts,
    NetworkPatternStats, PatternCounts, RedirectStats, RuleExceptionCounts, RuleTypeCounts,
    ScriptletStats, Statistics, SyntaxCounts, DOMAIN_BEARING_MODIFIERS,
};
