//! filterstats-engine 内核错误定义
//! 分类器均为全函数，不会失败；唯一的错误来源是规则文本解析
use thiserror::Error;

/// 内核核心错误枚举
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ===================== 解析相关错误 =====================
    /// 规则文本解析失败（语法不合法/结构残缺）
    #[error("{0}")]
    RuleParseError(String),

    /// 规则为空（裁剪后无任何内容）
    #[error("Empty rule")]
    EmptyRule,
}

impl CoreError {
    /// 快捷构造解析错误
    pub fn parse(msg: impl Into<String>) -> Self {
        CoreError::RuleParseError(msg.into())
    }
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
