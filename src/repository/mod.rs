// ==========================================
// MRL 数据导入驾驶舱 - 数据仓储层
// ==========================================
// 职责: 持久化表格文件的访问，屏蔽文件格式细节
// 红线: Repository 不含校验规则，只追加不改写
// ==========================================

pub mod error;
pub mod mrl_sheet_repo;
pub mod mrl_sheet_repo_impl;
pub mod xlsx_workbook;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use mrl_sheet_repo::TabularAppender;
pub use mrl_sheet_repo_impl::XlsxTabularAppender;
pub use xlsx_workbook::{CellValue, SheetData, WorkbookData};
