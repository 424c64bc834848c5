// ==========================================
// MRL 数据导入驾驶舱 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 文件级拒绝（ImportError）/ 记录级拒绝（RecordRejection）
// ==========================================

use thiserror::Error;

/// 文件级拒绝：终止本次导入，报告中只保留这一条错误
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No file uploaded or file is empty.")]
    EmptyUpload,

    #[error("Invalid file type. Please upload an XML file.")]
    UnsupportedFileType(String),

    #[error("Failed to read XML file: {0}")]
    XmlReadError(String),

    #[error("XML file does not contain any <Record> entries.")]
    NoRecords,
}

// 实现 From<quick_xml::Error>
impl From<quick_xml::Error> for ImportError {
    fn from(err: quick_xml::Error) -> Self {
        ImportError::XmlReadError(err.to_string())
    }
}

/// 记录级拒绝：只丢弃当前记录，不影响其余记录
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    #[error("Record {position}: MaterialId, Plant, and MRLNumber are required.")]
    MissingRequiredFields { position: usize },

    #[error("Record {position}: Invalid date format (expected yyyy-MM-dd).")]
    InvalidDateFormat { position: usize },
}

impl RecordRejection {
    /// 记录在文档中的位置（从 1 开始）
    pub fn position(&self) -> usize {
        match self {
            RecordRejection::MissingRequiredFields { position }
            | RecordRejection::InvalidDateFormat { position } => *position,
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            ImportError::EmptyUpload.to_string(),
            "No file uploaded or file is empty."
        );
        assert_eq!(
            ImportError::NoRecords.to_string(),
            "XML file does not contain any <Record> entries."
        );
        assert_eq!(
            RecordRejection::MissingRequiredFields { position: 2 }.to_string(),
            "Record 2: MaterialId, Plant, and MRLNumber are required."
        );
        assert_eq!(
            RecordRejection::InvalidDateFormat { position: 7 }.to_string(),
            "Record 7: Invalid date format (expected yyyy-MM-dd)."
        );
    }
}
