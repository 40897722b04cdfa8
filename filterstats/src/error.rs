//! 全局错误类型定义
use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum FilterStatsError {
    // 配置相关错误（消息即对用户展示的完整文本）
    #[error("{0}")]
    ConfigError(String),

    // 下载相关错误
    #[error("{0}")]
    NetworkError(String),

    // 报告相关错误（读取统计文件、渲染）
    #[error("{0}")]
    ReportError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),

    #[error("异步任务执行失败：{0}")]
    AsyncTaskError(String),
}

// 全局Result类型
pub type StatsResult<T> = Result<T, FilterStatsError>;
