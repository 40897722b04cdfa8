//! 规则源解析：把过滤列表的原始行解析为 RuleNode 语法树

pub mod adblock;
mod params;

pub use adblock::{parse_rule, parse_rules, AdblockRuleParser, ParseResult, ParserOptions};
