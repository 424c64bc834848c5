// ==========================================
// MRL 数据导入驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义导入/提交流程共享的领域类型
// 红线: 不含文件访问逻辑
// ==========================================

pub mod mrl;

// 重导出核心类型
pub use mrl::{
    MrlRecord, RawMrlRecord, ValidationReport, DATE_FORMAT, DEFAULT_SHEET_NAME, SHEET_HEADER,
};
