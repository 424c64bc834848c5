// ==========================================
// MRL 数据导入驾驶舱 - API层错误类型
// ==========================================
// 职责: 定义提交流程错误，区分客户端错误与服务端错误
// 转换: RepositoryError → ApiError（保留底层原因）
// ==========================================

use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 错误类别（传输层据此选择状态码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    ClientError,
    ServerError,
}

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 客户端错误
    // ==========================================
    #[error("No valid imported data found. Please import a valid XML file first.")]
    NoPendingData,

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("Failed to append data: {0}")]
    StorageMissing(String),

    #[error("IO error while appending data to Excel: {0}")]
    StorageIo(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::NoPendingData => ErrorCategory::ClientError,
            ApiError::StorageMissing(_)
            | ApiError::StorageIo(_)
            | ApiError::InternalError(_) => ErrorCategory::ServerError,
        }
    }

    /// 建议的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::ClientError => 400,
            ErrorCategory::ServerError => 500,
        }
    }

    /// 稳定的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NoPendingData => "NO_PENDING_DATA",
            ApiError::StorageMissing(_) => "STORAGE_MISSING",
            ApiError::StorageIo(_) => "STORAGE_IO",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::FileNotFound(_) => ApiError::StorageMissing(err.to_string()),
            RepositoryError::Io(cause) => ApiError::StorageIo(cause),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::FileNotFound("/data/mrl.xlsx".to_string()).into();
        assert!(matches!(api_err, ApiError::StorageMissing(_)));
        assert_eq!(
            api_err.to_string(),
            "Failed to append data: Excel file not found at path: /data/mrl.xlsx"
        );
        assert_eq!(api_err.status_code(), 500);

        let api_err: ApiError = RepositoryError::Io("disk full".to_string()).into();
        assert_eq!(
            api_err.to_string(),
            "IO error while appending data to Excel: disk full"
        );
        assert_eq!(api_err.code(), "STORAGE_IO");
        assert_eq!(api_err.category(), ErrorCategory::ServerError);
    }

    #[test]
    fn test_no_pending_data_is_client_error() {
        let err = ApiError::NoPendingData;
        assert_eq!(err.category(), ErrorCategory::ClientError);
        assert_eq!(err.status_code(), 400);
    }
}
