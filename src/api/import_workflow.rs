// ==========================================
// MRL 数据导入驾驶舱 - 导入/提交工作流
// ==========================================
// 两步契约:
//   import: 解析 → 有效记录暂存（无有效记录则清空暂存）
//   submit: 暂存检查 → 追加到工作簿 → 成功后清空
// 并发: 暂存替换与 "检查-追加-清空" 共用一把提交锁，
//       避免重复追加或误清新导入的批次；
//       提交在独立任务中持锁执行，取消 submit 不会释放尚未完成的写入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::mrl::ValidationReport;
use crate::importer::XmlImportParser;
use crate::repository::TabularAppender;
use crate::session::PendingBatch;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn, Instrument};

pub struct ImportWorkflow {
    parser: Box<dyn XmlImportParser>,
    pending: Arc<PendingBatch>,
    appender: Arc<dyn TabularAppender>,
    commit_lock: Arc<Mutex<()>>,
}

impl ImportWorkflow {
    /// 创建工作流
    ///
    /// # 参数
    /// - parser: XML 解析器
    /// - pending: 进程内共享的暂存槽
    /// - appender: 目标工作簿追加器
    pub fn new(
        parser: Box<dyn XmlImportParser>,
        pending: Arc<PendingBatch>,
        appender: Arc<dyn TabularAppender>,
    ) -> Self {
        Self {
            parser,
            pending,
            appender,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn pending(&self) -> &Arc<PendingBatch> {
        &self.pending
    }

    /// 导入 XML 文件
    ///
    /// 报告原样返回；有效记录整体替换暂存批次，否则清空暂存
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn import(&self, bytes: &[u8], filename: &str) -> ValidationReport {
        let report = self.parser.parse(bytes, filename);

        let _guard = self.commit_lock.lock().await;
        if report.valid_records.is_empty() {
            self.pending.clear();
            warn!(errors = report.errors.len(), "无有效记录，已清空待提交批次");
        } else {
            let batch_id = self
                .pending
                .stage(report.valid_records.clone(), Some(filename));
            info!(
                batch_id = batch_id.as_deref().unwrap_or_default(),
                total = report.total_records,
                valid = report.valid_records_count,
                invalid = report.invalid_records_count,
                "导入完成，有效记录已暂存"
            );
        }

        report
    }

    /// 提交暂存批次
    ///
    /// 检查-追加-清空在独立任务中持锁完成，调用方放弃等待也不会中断
    ///
    /// # 返回
    /// - Ok(n): 追加的行数，暂存已清空
    /// - Err(ApiError::NoPendingData): 无暂存数据（工作簿未被访问）
    /// - Err(ApiError::StorageMissing / StorageIo): 追加失败，暂存保持不变
    #[instrument(skip(self))]
    pub async fn submit(&self) -> ApiResult<usize> {
        let lock = Arc::clone(&self.commit_lock);
        let pending = Arc::clone(&self.pending);
        let appender = Arc::clone(&self.appender);

        let task = tokio::spawn(
            async move {
                let _guard = lock.lock_owned().await;
                commit_pending(&pending, appender.as_ref()).await
            }
            .in_current_span(),
        );

        task.await
            .map_err(|e| ApiError::InternalError(format!("提交任务异常: {}", e)))?
    }
}

/// 检查 → 追加 → 清空（调用方持有提交锁）
async fn commit_pending(pending: &PendingBatch, appender: &dyn TabularAppender) -> ApiResult<usize> {
    let Some(snapshot) = pending.snapshot() else {
        warn!("提交时没有待提交数据");
        return Err(ApiError::NoPendingData);
    };

    match appender.append(&snapshot.records).await {
        Ok(written) => {
            pending.clear();
            info!(batch_id = %snapshot.batch_id, rows = written, "批次已提交");
            Ok(written)
        }
        Err(e) => {
            error!(batch_id = %snapshot.batch_id, error = %e, "批次提交失败，保留待提交数据");
            Err(e.into())
        }
    }
}
