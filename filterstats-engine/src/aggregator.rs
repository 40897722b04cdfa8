use crate::{
    analyzer::{
        ModifierAnalyzer, NetworkPatternAnalyzer, RedirectAnalyzer, RuleAnalyzer,
        RuleTypeAnalyzer, ScriptletAnalyzer,
    },
    core::{GroupStatistics, ParsedRule, RuleNode},
    utils::top_counts,
};

/// 日志中展示的热门项数量
const LOG_TOP_N: usize = 5;

/// 分组聚合器，核心职责：对一个过滤器分组的规则序列各跑一遍全部分类器，组装汇总统计
/// 无内部状态，不同分组可以并行聚合
#[derive(Debug, Default)]
pub struct GroupAggregator;

impl GroupAggregator {
    /// 聚合单个分组
    /// 参数：
    /// - name: 分组名称
    /// - source_urls: 分组的规则源地址
    /// - rules: 解析结果序列（解析失败的条目 node 为 None）
    /// - carried_errors: 上游（下载/解析）错误，原样带入结果
    pub fn aggregate(
        &self,
        name: &str,
        source_urls: &[String],
        rules: &[ParsedRule],
        carried_errors: Vec<String>,
    ) -> GroupStatistics {
        let nodes = || rules.iter().map(ParsedRule::node);
        self.aggregate_nodes(name, source_urls, nodes, carried_errors)
    }

    /// 直接对语法树序列聚合；`nodes` 每次调用都要产出同一序列
    pub fn aggregate_nodes<'a, F, I>(
        &self,
        name: &str,
        source_urls: &[String],
        nodes: F,
        carried_errors: Vec<String>,
    ) -> GroupStatistics
    where
        F: Fn() -> I,
        I: Iterator<Item = Option<&'a RuleNode>>,
    {
        let rule_types = RuleTypeAnalyzer::analyze(nodes());
        let modifiers = ModifierAnalyzer::analyze(nodes());
        let scriptlets = ScriptletAnalyzer::analyze(nodes());
        let redirects = RedirectAnalyzer::analyze(nodes());
        let network_patterns = NetworkPatternAnalyzer::analyze(nodes());

        let stats = GroupStatistics {
            name: name.to_string(),
            source_urls: source_urls.to_vec(),
            total_rules: nodes().count() as u64,
            rule_types,
            modifiers,
            scriptlets,
            redirects,
            network_patterns,
            errors: carried_errors,
        };

        log::debug!(
            "分组[{}]聚合完成：rules={}, network={}, cosmetic={}, scriptlet={}, script={}, html={}, comments={}, preprocessor={}, invalid={}, errors={}",
            stats.name,
            stats.total_rules,
            stats.rule_types.network_total(),
            stats.rule_types.cosmetic_total(),
            stats.rule_types.scriptlet_total(),
            stats.rule_types.script_total(),
            stats.rule_types.html_filtering_total(),
            stats.rule_types.comments,
            stats.rule_types.preprocessor,
            stats.rule_types.invalid,
            stats.errors.len(),
        );
        log::debug!(
            "分组[{}]热门项：modifiers={} | scriptlets={} | redirects={}",
            stats.name,
            top_counts(&stats.modifiers.counts, LOG_TOP_N),
            top_counts(&stats.scriptlets.by_name, LOG_TOP_N),
            top_counts(&stats.redirects.by_resource, LOG_TOP_N),
        );

        stats
    }
}
