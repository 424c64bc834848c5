// ==========================================
// MRL 数据导入驾驶舱 - 核心库
// ==========================================
// 流程: XML 上传 → 逐条校验 → 暂存 → 确认后追加到 Excel
// 技术栈: Rust + quick-xml + calamine/rust_xlsxwriter
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与校验报告
pub mod domain;

// 导入层 - XML 解析与记录校验
pub mod importer;

// 会话层 - 待提交批次
pub mod session;

// 数据仓储层 - Excel 工作簿
pub mod repository;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 导入/提交
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{MrlRecord, RawMrlRecord, ValidationReport};
pub use api::{ApiError, ImportApi, ImportWorkflow, SubmitOutcome, SubmitResponse};
pub use app::AppState;
pub use config::MrlConfig;
pub use session::PendingBatch;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "MRL 数据导入驾驶舱";
