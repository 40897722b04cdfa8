//! 统计结果结构定义
//! 字段名即报告的对外契约（JSON/HTML 渲染直接消费），序列化时保持 camelCase
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::enums::{DomainValueKind, PatternShape, ScriptletSyntax};

/// 携带域名列表取值的修饰符，统计前预置为零
pub const DOMAIN_BEARING_MODIFIERS: [&str; 4] = ["domain", "to", "from", "denyallow"];

/// 规则/例外 成对计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleExceptionCounts {
    pub rules: u64,
    pub exceptions: u64,
}

impl RuleExceptionCounts {
    #[inline]
    pub fn bump(&mut self, exception: bool) {
        if exception {
            self.exceptions += 1;
        } else {
            self.rules += 1;
        }
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.rules + self.exceptions
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkCounts {
    pub blocking: u64,
    pub exception: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CosmeticCounts {
    pub element_hiding: u64,
    pub element_hiding_exception: u64,
    pub css_injection: u64,
    pub css_injection_exception: u64,
}

/// 规则类型分类计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleTypeCounts {
    pub network: NetworkCounts,
    pub cosmetic: CosmeticCounts,
    pub scriptlet: RuleExceptionCounts,
    pub script: RuleExceptionCounts,
    pub html_filtering: RuleExceptionCounts,
    pub comments: u64,
    pub preprocessor: u64,
    pub invalid: u64,
}

impl RuleTypeCounts {
    pub fn network_total(&self) -> u64 {
        self.network.blocking + self.network.exception
    }

    pub fn cosmetic_total(&self) -> u64 {
        self.cosmetic.element_hiding
            + self.cosmetic.element_hiding_exception
            + self.cosmetic.css_injection
            + self.cosmetic.css_injection_exception
    }

    pub fn scriptlet_total(&self) -> u64 {
        self.scriptlet.total()
    }

    pub fn script_total(&self) -> u64 {
        self.script.total()
    }

    pub fn html_filtering_total(&self) -> u64 {
        self.html_filtering.total()
    }

    /// 所有叶子桶之和，等于输入规则条数
    pub fn total(&self) -> u64 {
        self.network_total()
            + self.cosmetic_total()
            + self.scriptlet_total()
            + self.script_total()
            + self.html_filtering_total()
            + self.comments
            + self.preprocessor
            + self.invalid
    }
}

/// 单个域名类修饰符的取值分类计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainValueCounts {
    pub plain: u64,
    pub tld: u64,
    pub regex: u64,
}

impl DomainValueCounts {
    #[inline]
    pub fn bump(&mut self, kind: DomainValueKind) {
        match kind {
            DomainValueKind::Plain => self.plain += 1,
            DomainValueKind::Tld => self.tld += 1,
            DomainValueKind::Regex => self.regex += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.plain + self.tld + self.regex
    }
}

/// 修饰符使用统计
/// 反序列化同时接受旧版统计文件的扁平 `名称 → 次数` 映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ModifierStatsRepr")]
pub struct ModifierStats {
    pub counts: FxHashMap<String, u64>,
    pub domain_modifiers: FxHashMap<String, DomainValueCounts>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StructuredModifiers {
    #[serde(default)]
    counts: FxHashMap<String, u64>,
    #[serde(default)]
    domain_modifiers: FxHashMap<String, DomainValueCounts>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModifierStatsRepr {
    Structured(StructuredModifiers),
    Flat(FxHashMap<String, u64>),
}

impl From<ModifierStatsRepr> for ModifierStats {
    fn from(repr: ModifierStatsRepr) -> Self {
        let mut stats = ModifierStats::default();
        match repr {
            ModifierStatsRepr::Structured(s) => {
                stats.counts = s.counts;
                stats.domain_modifiers.extend(s.domain_modifiers);
            }
            ModifierStatsRepr::Flat(counts) => stats.counts = counts,
        }
        stats
    }
}

impl Default for ModifierStats {
    fn default() -> Self {
        let domain_modifiers = DOMAIN_BEARING_MODIFIERS
            .iter()
            .map(|name| (name.to_string(), DomainValueCounts::default()))
            .collect();

        Self {
            counts: FxHashMap::default(),
            domain_modifiers,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxCounts {
    pub adguard: u64,
    pub ublock: u64,
    pub abp: u64,
}

impl SyntaxCounts {
    #[inline]
    pub fn bump(&mut self, syntax: ScriptletSyntax) {
        match syntax {
            ScriptletSyntax::Adguard => self.adguard += 1,
            ScriptletSyntax::Ublock => self.ublock += 1,
            ScriptletSyntax::Abp => self.abp += 1,
        }
    }
}

/// 脚本片段统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptletStats {
    pub total: u64,
    pub by_name: FxHashMap<String, u64>,
    pub by_syntax: SyntaxCounts,
}

/// 重定向资源统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedirectStats {
    pub total: u64,
    pub by_resource: FxHashMap<String, u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternCounts {
    pub domain_only: u64,
    pub domain_path: u64,
    pub regex: u64,
    pub url_part: u64,
}

impl PatternCounts {
    #[inline]
    pub fn bump(&mut self, shape: PatternShape) {
        match shape {
            PatternShape::DomainOnly => self.domain_only += 1,
            PatternShape::DomainPath => self.domain_path += 1,
            PatternShape::Regex => self.regex += 1,
            PatternShape::UrlPart => self.url_part += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.domain_only + self.domain_path + self.regex + self.url_part
    }
}

/// 网络规则模式形状统计，按拦截/例外分开
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkPatternStats {
    pub blocking: PatternCounts,
    pub exception: PatternCounts,
}

/// 单个过滤器分组的汇总统计
/// 反序列化时缺失的字段取零值，兼容旧版本产出的统计文件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupStatistics {
    pub name: String,
    pub source_urls: Vec<String>,
    pub total_rules: u64,
    pub rule_types: RuleTypeCounts,
    pub modifiers: ModifierStats,
    pub scriptlets: ScriptletStats,
    pub redirects: RedirectStats,
    pub network_patterns: NetworkPatternStats,
    pub errors: Vec<String>,
}

/// 一次完整运行的统计产物
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub generated_at: String,
    pub groups: Vec<GroupStatistics>,
}

impl Statistics {
    /// 所有分组的规则总数
    pub fn total_rules(&self) -> u64 {
        self.groups.iter().map(|g| g.total_rules).sum()
    }
}
