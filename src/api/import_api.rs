// ==========================================
// MRL 数据导入驾驶舱 - 导入API
// ==========================================
// 职责: 封装导入/提交流程，输出与传输层无关的响应
//   import: 始终返回校验报告（成功状态）
//   submit: 返回响应体 + 建议状态码（400 客户端错误 / 500 服务端错误）
// ==========================================

use crate::api::error::{ApiError, ApiResult, ErrorCategory};
use crate::api::import_workflow::ImportWorkflow;
use crate::domain::mrl::ValidationReport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 提交响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub appended_rows: usize,
}

impl SubmitResponse {
    pub fn appended(rows: usize) -> Self {
        Self {
            success: true,
            message: format!("Successfully appended {} record(s) to the Excel file.", rows),
            appended_rows: rows,
        }
    }

    pub fn failed(err: &ApiError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            appended_rows: 0,
        }
    }
}

/// 提交结果（响应体 + 传输层提示）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub status_code: u16,
    /// 失败时的错误类别
    pub category: Option<ErrorCategory>,
    /// 失败时的稳定错误代码
    pub error_code: Option<&'static str>,
    pub response: SubmitResponse,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        self.response.success
    }
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    workflow: Arc<ImportWorkflow>,
}

impl ImportApi {
    pub fn new(workflow: Arc<ImportWorkflow>) -> Self {
        Self { workflow }
    }

    /// 导入上传的 XML 内容
    pub async fn import_xml(&self, bytes: &[u8], filename: &str) -> ValidationReport {
        self.workflow.import(bytes, filename).await
    }

    /// 从本地路径导入 XML 文件
    ///
    /// # 返回
    /// - Err(ApiError::InternalError): 文件无法读取
    pub async fn import_file(&self, path: &Path) -> ApiResult<ValidationReport> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::InternalError(format!("无法读取文件 {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(self.import_xml(&bytes, &filename).await)
    }

    /// 提交暂存批次
    pub async fn submit(&self) -> SubmitOutcome {
        match self.workflow.submit().await {
            Ok(rows) => {
                info!(rows = rows, "提交成功");
                SubmitOutcome {
                    status_code: 200,
                    category: None,
                    error_code: None,
                    response: SubmitResponse::appended(rows),
                }
            }
            Err(err) => SubmitOutcome {
                status_code: err.status_code(),
                category: Some(err.category()),
                error_code: Some(err.code()),
                response: SubmitResponse::failed(&err),
            },
        }
    }
}
