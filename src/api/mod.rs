// ==========================================
// MRL 数据导入驾驶舱 - API 层
// ==========================================
// 职责: 导入/提交两步流程，供 CLI 或传输层调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod import_workflow;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorCategory};
pub use import_api::{ImportApi, SubmitOutcome, SubmitResponse};
pub use import_workflow::ImportWorkflow;
