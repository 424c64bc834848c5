// ==========================================
// MRL 数据导入驾驶舱 - 表格追加 Repository Trait
// ==========================================
// 职责: 定义"记录 → 表格新行"的追加接口（不包含实现）
// 红线: 只追加，不改写已有行
// ==========================================

use crate::domain::mrl::MrlRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// TabularAppender Trait
// ==========================================
// 用途: 把待提交批次写入持久化表格
// 实现者: XlsxTabularAppender
#[async_trait]
pub trait TabularAppender: Send + Sync {
    /// 将记录依次追加到目标工作表最后一行之后
    ///
    /// # 参数
    /// - records: 待追加记录（为空时不触碰文件）
    ///
    /// # 返回
    /// - Ok(usize): 写入行数（等于 records.len()）
    /// - Err(RepositoryError::FileNotFound): 目标文件不存在
    /// - Err(RepositoryError::Io): 读写失败
    async fn append(&self, records: &[MrlRecord]) -> RepositoryResult<usize>;
}
