//! HTML 报告渲染
//! 输出单文件页面（内联样式，无外部资源）：总览表 + 每个分组一个可折叠区块

use std::fmt::{self, Display, Formatter, Write as _};
use std::path::Path;

use filterstats_engine::core::{GroupStatistics, PatternCounts, DOMAIN_BEARING_MODIFIERS};
use filterstats_engine::Statistics;
use rustc_hash::FxHashMap;

use super::ensure_parent_dir;
use crate::error::StatsResult;

/// 每个分组最多展示的错误条数
const MAX_ERRORS_SHOWN: usize = 100;

const STYLE: &str = r#"
:root { --bg: #0f1115; --panel: #171a21; --line: #2a2f3a; --fg: #d4d8e0; --muted: #8a92a3; --accent: #6cb6ff; --warn: #e3b341; --bad: #ff6b6b; }
* { box-sizing: border-box; }
body { margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); font: 14px/1.55 system-ui, -apple-system, "Segoe UI", sans-serif; }
header { text-align: center; border-bottom: 1px solid var(--line); margin-bottom: 1.5rem; padding-bottom: 1rem; }
h1 { margin: 0 0 .4rem; font-size: 1.8rem; }
.muted { color: var(--muted); }
.controls { display: flex; gap: .5rem; justify-content: center; margin-bottom: 1.5rem; }
.controls button { background: var(--panel); color: var(--accent); border: 1px solid var(--line); border-radius: 6px; padding: .4rem .9rem; cursor: pointer; }
.controls button:hover { background: var(--accent); color: var(--bg); }
section.overview, details.group { background: var(--panel); border: 1px solid var(--line); border-radius: 8px; margin-bottom: 1rem; }
section.overview { padding: 1.25rem; }
section.overview h2 { margin-top: 0; color: var(--accent); font-size: 1.2rem; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: .45rem .8rem; border-bottom: 1px solid var(--line); text-align: left; }
th { color: var(--muted); font-weight: 600; }
td.num { text-align: right; font-family: ui-monospace, monospace; }
tr:hover td { background: rgba(108, 182, 255, .05); }
a { color: var(--accent); text-decoration: none; }
a:hover { text-decoration: underline; }
.badge { background: var(--bad); color: #fff; border-radius: 10px; padding: .1rem .5rem; font-size: .8rem; }
details.group > summary { display: flex; flex-wrap: wrap; gap: 1rem; align-items: center; padding: 1rem 1.25rem; cursor: pointer; }
details.group > summary h2 { margin: 0; font-size: 1.1rem; color: var(--accent); }
.pills { display: flex; flex-wrap: wrap; gap: .4rem; margin-left: auto; }
.pill { background: var(--bg); border-radius: 4px; padding: .2rem .55rem; font-size: .8rem; color: var(--muted); }
.pill strong { color: var(--fg); }
.group-body { padding: 0 1.25rem 1.25rem; }
details.sub { background: var(--bg); border: 1px solid var(--line); border-radius: 6px; margin-bottom: .6rem; }
details.sub > summary { padding: .6rem 1rem; cursor: pointer; color: var(--muted); }
details.sub > summary:hover { color: var(--fg); }
details.sub.errors > summary { color: var(--warn); }
.syntax { display: flex; gap: 2rem; padding: .6rem 1rem; border-bottom: 1px solid var(--line); }
ul.errors { list-style: none; margin: 0; padding: 1rem; max-height: 220px; overflow-y: auto; font: .8rem ui-monospace, monospace; }
ul.errors li { color: var(--bad); margin-bottom: .3rem; }
footer { text-align: center; color: var(--muted); border-top: 1px solid var(--line); margin-top: 1rem; padding-top: 1.5rem; }
@media (max-width: 768px) { body { padding: 1rem; } details.group > summary { flex-direction: column; align-items: flex-start; } .pills { margin-left: 0; } }
"#;

/// 转义 `& < > " '`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// 千分位分隔的整数
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 按计数降序、键升序排序
pub fn sorted_counts(map: &FxHashMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// 渲染完整 HTML 页面
pub fn generate_html(stats: &Statistics) -> String {
    HtmlReport(stats).to_string()
}

/// 渲染并写出 HTML 报告
pub fn write_html(stats: &Statistics, path: impl AsRef<Path>) -> StatsResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    std::fs::write(path, generate_html(stats))?;
    log::debug!("HTML 报告已写入：{}", path.display());
    Ok(())
}

struct HtmlReport<'a>(&'a Statistics);

impl Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">\n<head>")?;
        writeln!(f, "<meta charset=\"UTF-8\">")?;
        writeln!(f, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
        writeln!(f, "<title>Filter Rules Statistics</title>")?;
        writeln!(f, "<style>{}</style>\n</head>\n<body>", STYLE)?;
        writeln!(f, "<header>\n<h1>Filter Rules Statistics</h1>")?;
        writeln!(
            f,
            "<p class=\"muted\">Generated: {}</p>\n</header>",
            escape_html(&stats.generated_at)
        )?;
        writeln!(f, "<div class=\"controls\">")?;
        writeln!(
            f,
            "<button onclick=\"document.querySelectorAll('details.group').forEach(d => d.open = true)\">Expand All</button>"
        )?;
        writeln!(
            f,
            "<button onclick=\"document.querySelectorAll('details.group').forEach(d => d.open = false)\">Collapse All</button>"
        )?;
        writeln!(f, "</div>")?;

        write_overview(f, &stats.groups)?;

        writeln!(f, "<main>")?;
        for (index, group) in stats.groups.iter().enumerate() {
            write_group(f, group, index)?;
        }
        writeln!(f, "</main>")?;
        writeln!(
            f,
            "<footer>{} rules in {} group(s)</footer>\n</body>\n</html>",
            format_count(stats.total_rules()),
            stats.groups.len()
        )
    }
}

fn write_overview(f: &mut Formatter<'_>, groups: &[GroupStatistics]) -> fmt::Result {
    writeln!(f, "<section class=\"overview\">\n<h2>Overview</h2>\n<table>")?;
    writeln!(
        f,
        "<thead><tr><th>Filter</th><th>Total</th><th>Network</th><th>Cosmetic</th><th>Scriptlet</th><th>Script</th><th>Modifiers</th><th>Errors</th></tr></thead>"
    )?;
    writeln!(f, "<tbody>")?;
    for (index, group) in groups.iter().enumerate() {
        let types = &group.rule_types;
        let errors = if group.errors.is_empty() {
            "-".to_string()
        } else {
            format!("<span class=\"badge\">{}</span>", format_count(group.errors.len() as u64))
        };
        writeln!(
            f,
            "<tr><td><a href=\"#group-{}\">{}</a></td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            index,
            escape_html(&group.name),
            format_count(group.total_rules),
            format_count(types.network_total()),
            format_count(types.cosmetic_total()),
            format_count(types.scriptlet_total()),
            format_count(types.script_total()),
            format_count(group.modifiers.counts.len() as u64),
            errors,
        )?;
    }
    writeln!(f, "</tbody>\n</table>\n</section>")
}

fn write_group(f: &mut Formatter<'_>, group: &GroupStatistics, index: usize) -> fmt::Result {
    let types = &group.rule_types;
    writeln!(f, "<details class=\"group\" id=\"group-{}\">", index)?;
    writeln!(f, "<summary><h2>{}</h2><div class=\"pills\">", escape_html(&group.name))?;
    writeln!(f, "<span class=\"pill\"><strong>{}</strong> rules</span>", format_count(group.total_rules))?;
    for (count, label) in [
        (types.network_total(), "network"),
        (types.cosmetic_total(), "cosmetic"),
        (types.scriptlet_total(), "scriptlet"),
        (types.script_total(), "script"),
    ] {
        writeln!(f, "<span class=\"pill\">{} {}</span>", format_count(count), label)?;
    }
    writeln!(f, "</div></summary>\n<div class=\"group-body\">")?;

    if !group.source_urls.is_empty() {
        writeln!(f, "<details class=\"sub\">\n<summary>Sources ({})</summary>\n<ul>", group.source_urls.len())?;
        for url in &group.source_urls {
            let url = escape_html(url);
            writeln!(f, "<li><a href=\"{0}\">{0}</a></li>", url)?;
        }
        writeln!(f, "</ul>\n</details>")?;
    }

    write_rule_types(f, group)?;
    write_modifiers(f, group)?;
    write_domain_modifiers(f, group)?;
    write_network_patterns(f, group)?;
    write_scriptlets(f, group)?;
    write_keyed_table(
        f,
        &format!("Redirects ({})", format_count(group.redirects.total)),
        "Resource",
        &group.redirects.by_resource,
        group.redirects.total > 0,
    )?;
    write_errors(f, &group.errors)?;

    writeln!(f, "</div>\n</details>")
}

fn write_rule_types(f: &mut Formatter<'_>, group: &GroupStatistics) -> fmt::Result {
    let t = &group.rule_types;
    let rows: [(&str, &str, u64); 15] = [
        ("Network", "Blocking", t.network.blocking),
        ("Network", "Exception", t.network.exception),
        ("Cosmetic", "Element Hiding", t.cosmetic.element_hiding),
        ("Cosmetic", "Element Hiding Exception", t.cosmetic.element_hiding_exception),
        ("Cosmetic", "CSS Injection", t.cosmetic.css_injection),
        ("Cosmetic", "CSS Injection Exception", t.cosmetic.css_injection_exception),
        ("Scriptlet", "Rules", t.scriptlet.rules),
        ("Scriptlet", "Exceptions", t.scriptlet.exceptions),
        ("Script", "Rules", t.script.rules),
        ("Script", "Exceptions", t.script.exceptions),
        ("HTML Filtering", "Rules", t.html_filtering.rules),
        ("HTML Filtering", "Exceptions", t.html_filtering.exceptions),
        ("Comments", "", t.comments),
        ("Preprocessor Directives", "", t.preprocessor),
        ("Invalid/Unparseable", "", t.invalid),
    ];

    writeln!(f, "<details class=\"sub\" open>\n<summary>Rule Types</summary>\n<table>")?;
    writeln!(f, "<thead><tr><th>Category</th><th>Type</th><th>Count</th></tr></thead>\n<tbody>")?;
    for (category, kind, count) in rows {
        if kind.is_empty() {
            writeln!(f, "<tr><td colspan=\"2\">{}</td><td class=\"num\">{}</td></tr>", category, format_count(count))?;
        } else {
            writeln!(
                f,
                "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                category,
                kind,
                format_count(count)
            )?;
        }
    }
    writeln!(f, "</tbody>\n</table>\n</details>")
}

fn write_modifiers(f: &mut Formatter<'_>, group: &GroupStatistics) -> fmt::Result {
    let counts = &group.modifiers.counts;
    write_keyed_table(
        f,
        &format!("Modifiers ({})", format_count(counts.len() as u64)),
        "Modifier",
        counts,
        !counts.is_empty(),
    )
}

fn write_domain_modifiers(f: &mut Formatter<'_>, group: &GroupStatistics) -> fmt::Result {
    let domain_modifiers = &group.modifiers.domain_modifiers;
    if domain_modifiers.values().all(|c| c.total() == 0) {
        return Ok(());
    }

    // 预置的四个修饰符固定顺序在前，其余按名称排序
    let mut names: Vec<&str> = DOMAIN_BEARING_MODIFIERS
        .iter()
        .copied()
        .filter(|name| domain_modifiers.contains_key(*name))
        .collect();
    let mut extra: Vec<&str> = domain_modifiers
        .keys()
        .map(String::as_str)
        .filter(|name| !DOMAIN_BEARING_MODIFIERS.contains(name))
        .collect();
    extra.sort_unstable();
    names.extend(extra);

    writeln!(f, "<details class=\"sub\">\n<summary>Domain Modifiers</summary>\n<table>")?;
    writeln!(
        f,
        "<thead><tr><th>Modifier</th><th>Plain</th><th>TLD</th><th>Regex</th></tr></thead>\n<tbody>"
    )?;
    for name in names {
        let Some(counts) = domain_modifiers.get(name) else {
            continue;
        };
        writeln!(
            f,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape_html(name),
            format_count(counts.plain),
            format_count(counts.tld),
            format_count(counts.regex)
        )?;
    }
    writeln!(f, "</tbody>\n</table>\n</details>")
}

fn write_network_patterns(f: &mut Formatter<'_>, group: &GroupStatistics) -> fmt::Result {
    let patterns = &group.network_patterns;
    if patterns.blocking.total() + patterns.exception.total() == 0 {
        return Ok(());
    }

    let row = |counts: &PatternCounts| -> [u64; 4] {
        [counts.domain_only, counts.domain_path, counts.regex, counts.url_part]
    };
    let blocking = row(&patterns.blocking);
    let exception = row(&patterns.exception);

    writeln!(f, "<details class=\"sub\">\n<summary>Network Patterns</summary>\n<table>")?;
    writeln!(f, "<thead><tr><th>Shape</th><th>Blocking</th><th>Exception</th></tr></thead>\n<tbody>")?;
    for (i, label) in ["Domain only", "Domain + path", "Regex", "URL part"].iter().enumerate() {
        writeln!(
            f,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            label,
            format_count(blocking[i]),
            format_count(exception[i])
        )?;
    }
    writeln!(f, "</tbody>\n</table>\n</details>")
}

fn write_scriptlets(f: &mut Formatter<'_>, group: &GroupStatistics) -> fmt::Result {
    let scriptlets = &group.scriptlets;
    if scriptlets.total == 0 {
        return Ok(());
    }

    writeln!(
        f,
        "<details class=\"sub\">\n<summary>Scriptlets ({})</summary>",
        format_count(scriptlets.total)
    )?;
    writeln!(
        f,
        "<div class=\"syntax\"><span><strong>AdGuard:</strong> {}</span><span><strong>uBlock:</strong> {}</span><span><strong>ABP:</strong> {}</span></div>",
        format_count(scriptlets.by_syntax.adguard),
        format_count(scriptlets.by_syntax.ublock),
        format_count(scriptlets.by_syntax.abp)
    )?;
    write_count_rows(f, "Scriptlet", &scriptlets.by_name)?;
    writeln!(f, "</details>")
}

/// 可折叠的 键/计数 表格；`visible` 为 false 时不输出
fn write_keyed_table(
    f: &mut Formatter<'_>,
    title: &str,
    key_header: &str,
    map: &FxHashMap<String, u64>,
    visible: bool,
) -> fmt::Result {
    if !visible {
        return Ok(());
    }
    writeln!(f, "<details class=\"sub\">\n<summary>{}</summary>", title)?;
    write_count_rows(f, key_header, map)?;
    writeln!(f, "</details>")
}

fn write_count_rows(f: &mut Formatter<'_>, key_header: &str, map: &FxHashMap<String, u64>) -> fmt::Result {
    writeln!(f, "<table>\n<thead><tr><th>{}</th><th>Count</th></tr></thead>\n<tbody>", key_header)?;
    for (key, count) in sorted_counts(map) {
        writeln!(
            f,
            "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
            escape_html(key),
            format_count(count)
        )?;
    }
    writeln!(f, "</tbody>\n</table>")
}

fn write_errors(f: &mut Formatter<'_>, errors: &[String]) -> fmt::Result {
    if errors.is_empty() {
        return Ok(());
    }

    let mut items = String::new();
    for error in errors.iter().take(MAX_ERRORS_SHOWN) {
        writeln!(items, "<li>{}</li>", escape_html(error))?;
    }
    if errors.len() > MAX_ERRORS_SHOWN {
        writeln!(items, "<li>... and {} more</li>", errors.len() - MAX_ERRORS_SHOWN)?;
    }

    writeln!(
        f,
        "<details class=\"sub errors\">\n<summary>Errors ({})</summary>\n<ul class=\"errors\">\n{}</ul>\n</details>",
        format_count(errors.len() as u64),
        items
    )
}
