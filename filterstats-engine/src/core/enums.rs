use serde::{Deserialize, Serialize};

/// 装饰规则子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CosmeticSubtype {
    ElementHiding,
    CssInjection,
    ScriptletInjection,
    HtmlFiltering,
    JsInjection,
    /// 上游解析器给出的其它子类型（统计时按元素隐藏处理）
    Other,
}

/// 解析器识别出的规则语法方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AdblockSyntax {
    /// 通用语法，无法确定具体引擎
    #[default]
    Common,
    AdGuard,
    UblockOrigin,
    AdblockPlus,
}

/// 注释规则种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommentKind {
    #[default]
    Simple,
    /// `!+ NOT_OPTIMIZED` 形式的提示注释
    Hint,
    /// `[Adblock Plus 2.0]` 形式的代理声明
    Agent,
    /// `! Title: ...` 形式的元数据
    Metadata,
    /// `!#if` / `!#endif` 等预处理指令
    PreProcessor,
}

/// 脚本片段统计使用的方言桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptletSyntax {
    Adguard,
    Ublock,
    Abp,
}

impl From<AdblockSyntax> for ScriptletSyntax {
    /// AdGuard -> adguard，AdblockPlus -> abp，其余（含缺省）一律归入 ublock
    fn from(syntax: AdblockSyntax) -> Self {
        match syntax {
            AdblockSyntax::AdGuard => ScriptletSyntax::Adguard,
            AdblockSyntax::AdblockPlus => ScriptletSyntax::Abp,
            AdblockSyntax::Common | AdblockSyntax::UblockOrigin => ScriptletSyntax::Ublock,
        }
    }
}

/// 网络规则匹配模式的形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternShape {
    /// `||example.org^`
    DomainOnly,
    /// `||example.org/path`
    DomainPath,
    /// `/regex/`
    Regex,
    /// 其余一切 URL 片段
    UrlPart,
}

/// 域名类修饰符取值的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainValueKind {
    Plain,
    /// 含 `.*` 的通配顶级域
    Tld,
    Regex,
}
