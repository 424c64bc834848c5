// ==========================================
// MRL 数据导入驾驶舱 - 应用层
// ==========================================
// 职责: 组件装配，连接入口与各层
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
