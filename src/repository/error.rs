// ==========================================
// MRL 数据导入驾驶舱 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 目标文件缺失（不可重试）/ 读写失败（携带底层原因）
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Excel file not found at path: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Io(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for RepositoryError {
    fn from(err: calamine::XlsxError) -> Self {
        RepositoryError::Io(format!("failed to read workbook: {}", err))
    }
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for RepositoryError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        RepositoryError::Io(format!("failed to write workbook: {}", err))
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
