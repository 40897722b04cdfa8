// 核心公共结构体+枚举（语法树与统计结果）
pub mod core;
// 五个规则分类器
pub mod analyzer;
// 分组聚合
pub mod aggregator;
// 规则源解析（过滤列表文本）
pub mod source;
// 内核错误
pub mod error;
// 日志辅助
pub mod utils;

// 顶层导出常用类型
pub use core::{
    AdblockSyntax, CommentKind, CosmeticSubtype, GroupStatistics, Modifier, ParsedRule, RuleNode,
    RuleTypeCounts, Statistics,
};
pub use aggregator::GroupAggregator;
pub use analyzer::RuleAnalyzer;
pub use error::{CoreError, CoreResult};
pub use source::{parse_rule, parse_rules, AdblockRuleParser, ParseResult, ParserOptions};
