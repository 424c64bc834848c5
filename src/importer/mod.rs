// ==========================================
// MRL 数据导入驾驶舱 - 导入层
// ==========================================
// 职责: 上传的 XML 文件 → 校验报告
// 流程: 上传检查 → XML 解码 → 逐条校验 → 汇总
// ==========================================

// 模块声明
pub mod error;
pub mod mrl_importer_trait;
pub mod record_validator;
pub mod xml_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult, RecordRejection};
pub use record_validator::MrlRecordValidator;
pub use xml_parser::MrlXmlParser;

// 重导出 Trait 接口
pub use mrl_importer_trait::{RecordValidator, XmlImportParser};
