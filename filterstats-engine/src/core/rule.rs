use serde::{Deserialize, Serialize};

use super::enums::{AdblockSyntax, CommentKind, CosmeticSubtype};

/// 规则修饰符（`$name=value` / `[$name=value]`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// 修饰符名称，不含取反前缀 `~`
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    /// 名称带 `~` 前缀（如 `~third-party`）
    #[serde(default)]
    pub exception: bool,
}

impl Modifier {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            exception: false,
        }
    }
}

/// 脚本片段的一组参数，`None` 表示位置存在但原文缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    pub children: Vec<Option<String>>,
}

impl ParameterList {
    pub fn new(children: Vec<Option<String>>) -> Self {
        Self { children }
    }
}

/// 脚本片段规则体：ABP 片段允许 `;` 串联多次调用，其余方言只有一组参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptletBody {
    pub children: Vec<ParameterList>,
}

/// 网络规则
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRule {
    /// `@@` 白名单规则
    pub exception: bool,
    pub pattern: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

/// 装饰规则（元素隐藏/CSS注入/脚本片段/HTML过滤/JS注入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticRule {
    pub subtype: CosmeticSubtype,
    #[serde(default)]
    pub syntax: AdblockSyntax,
    /// 原始分隔符，如 `##`、`#@#`、`#%#`
    pub separator: String,
    #[serde(default)]
    pub domains: Vec<String>,
    pub body: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub scriptlet: Option<ScriptletBody>,
}

impl CosmeticRule {
    /// 分隔符含 `@` 即为例外规则（`#@#`、`#@%#`、`$@$` ...）
    #[inline]
    pub fn separator_indicates_exception(&self) -> bool {
        self.separator.contains('@')
    }
}

/// 注释规则
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRule {
    pub kind: CommentKind,
    pub text: String,
}

impl CommentRule {
    #[inline]
    pub fn is_preprocessor_directive(&self) -> bool {
        self.kind == CommentKind::PreProcessor
    }
}

/// 宽容模式下无法解析的规则
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRule {
    pub raw: String,
    pub error: String,
}

/// 规则语法树：按类别打标签的和类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum RuleNode {
    Network(NetworkRule),
    Cosmetic(CosmeticRule),
    Comment(CommentRule),
    Invalid(InvalidRule),
}

impl RuleNode {
    /// 类别名称，仅用于日志
    pub fn category_name(&self) -> &'static str {
        match self {
            RuleNode::Network(_) => "Network",
            RuleNode::Cosmetic(_) => "Cosmetic",
            RuleNode::Comment(_) => "Comment",
            RuleNode::Invalid(_) => "Invalid",
        }
    }
}

/// 单条原始规则的解析结果
/// 约束：`node` 为 None 当且仅当 `error` 为 Some
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRule {
    pub raw: String,
    pub node: Option<RuleNode>,
    pub error: Option<String>,
}

impl ParsedRule {
    pub fn parsed(raw: impl Into<String>, node: RuleNode) -> Self {
        Self {
            raw: raw.into(),
            node: Some(node),
            error: None,
        }
    }

    pub fn failed(raw: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            node: None,
            error: Some(error.into()),
        }
    }

    #[inline]
    pub fn node(&self) -> Option<&RuleNode> {
        self.node.as_ref()
    }
}
