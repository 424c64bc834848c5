// ==========================================
// MRL 数据导入驾驶舱 - 配置层
// ==========================================
// 职责: 目标工作簿路径与工作表名称
// ==========================================

pub mod mrl_config;

pub use mrl_config::{default_excel_path, ConfigError, MrlConfig};
