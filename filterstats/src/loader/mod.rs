//! 过滤列表加载模块
//! 统一导出下载、合并相关组件
pub mod group_loader;
pub mod list_merger;
pub mod remote_fetcher;

pub use group_loader::{DownloadResult, GroupLoader};
pub use list_merger::merge_and_deduplicate;
pub use remote_fetcher::RemoteRuleFetcher;
