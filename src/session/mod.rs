// ==========================================
// MRL 数据导入驾驶舱 - 会话层
// ==========================================
// 职责: 导入与提交之间的暂存
// ==========================================

pub mod pending_batch;

pub use pending_batch::{BatchSnapshot, PendingBatch};
