use filterstats_engine::core::{PatternCounts, ScriptletSyntax};
use filterstats_engine::{parse_rules, GroupAggregator};

const SAMPLE_RULES: [&str; 8] = [
    "||example.org^",
    "||test.com/ads/banner.js",
    "/track[0-9]+/",
    "@@||ok.com^",
    "example.com##.ad",
    "example.com#@#.ad",
    "! a comment",
    "!#if x",
];

#[test]
fn sample_list_end_to_end() {
    let parsed = parse_rules(SAMPLE_RULES);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

    let urls = vec!["https://example.com/filter.txt".to_string()];
    let stats = GroupAggregator.aggregate("Sample", &urls, &parsed.rules, parsed.errors);
    let types = &stats.rule_types;

    assert_eq!(stats.total_rules, 8);
    assert_eq!(types.network.blocking, 3);
    assert_eq!(types.network.exception, 1);
    assert_eq!(types.cosmetic.element_hiding, 1);
    assert_eq!(types.cosmetic.element_hiding_exception, 1);
    assert_eq!(types.comments, 1);
    assert_eq!(types.preprocessor, 1);
    assert_eq!(types.invalid, 0);
    assert_eq!(types.total(), 8);

    assert_eq!(
        stats.network_patterns.blocking,
        PatternCounts { domain_only: 1, domain_path: 1, regex: 1, url_part: 0 }
    );
    assert_eq!(stats.network_patterns.exception.domain_only, 1);
}

#[test]
fn modifiers_scriptlets_and_redirects_from_text() {
    let parsed = parse_rules([
        "||cdn.example.org/ads.js$script,redirect=noopjs:42,domain=a.com|b.*|/re/",
        "||tracker.net^$redirect-rule=noopjs",
        "example.com##+js('set-constant', foo, 1)",
        "example.com#%#//scriptlet('abort-on-property-read', 'x')",
        "example.com#$#log hello",
        "example.com##",
    ]);
    assert_eq!(parsed.errors, vec!["Failed to parse \"example.com##\": Empty cosmetic rule body".to_string()]);

    let stats = GroupAggregator.aggregate("Mixed", &[], &parsed.rules, parsed.errors.clone());

    assert_eq!(stats.modifiers.counts["script"], 1);
    assert_eq!(stats.modifiers.counts["redirect"], 1);
    let domain = &stats.modifiers.domain_modifiers["domain"];
    assert_eq!((domain.plain, domain.tld, domain.regex), (1, 1, 1));

    assert_eq!(stats.redirects.total, 2);
    assert_eq!(stats.redirects.by_resource["noopjs"], 2);
    assert!(!stats.redirects.by_resource.contains_key("noopjs:42"));

    assert_eq!(stats.scriptlets.total, 3);
    assert_eq!(stats.scriptlets.by_name["set-constant"], 1);
    assert_eq!(stats.scriptlets.by_name["abort-on-property-read"], 1);
    assert_eq!(stats.scriptlets.by_name["log"], 1);
    assert_eq!(stats.scriptlets.by_syntax.ublock, 1);
    assert_eq!(stats.scriptlets.by_syntax.adguard, 1);
    assert_eq!(stats.scriptlets.by_syntax.abp, 1);
    assert_eq!(ScriptletSyntax::from(filterstats_engine::AdblockSyntax::Common), ScriptletSyntax::Ublock);

    assert_eq!(stats.rule_types.invalid, 1);
    assert_eq!(stats.errors.len(), 1);
}

#[test]
fn statistics_serialize_with_camel_case_names() {
    let parsed = parse_rules(SAMPLE_RULES);
    let stats = GroupAggregator.aggregate("Sample", &[], &parsed.rules, Vec::new());
    let json = serde_json::to_value(&stats).unwrap();

    assert_eq!(json["totalRules"], 8);
    assert_eq!(json["ruleTypes"]["cosmetic"]["elementHidingException"], 1);
    assert_eq!(json["ruleTypes"]["htmlFiltering"]["rules"], 0);
    assert_eq!(json["networkPatterns"]["blocking"]["domainOnly"], 1);
    assert_eq!(json["modifiers"]["domainModifiers"]["denyallow"]["plain"], 0);
    assert_eq!(json["scriptlets"]["bySyntax"]["abp"], 0);
    assert!(json["sourceUrls"].as_array().unwrap().is_empty());
}
