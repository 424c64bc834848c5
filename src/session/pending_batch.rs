// ==========================================
// MRL 数据导入驾驶舱 - 待提交批次
// ==========================================
// 职责: 进程内单槽缓存，保存最近一次导入的有效记录
// 语义: 整体替换 / 读取 / 清空，后写者胜
// 生命周期: 启动时为空；不持久化
// ==========================================

use crate::domain::mrl::MrlRecord;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// BatchSnapshot - 批次快照（不可变）
// ==========================================
#[derive(Debug, Clone)]
pub struct BatchSnapshot {
    pub batch_id: String,            // 批次 ID（UUID v4）
    pub source_file: Option<String>, // 来源文件名
    pub staged_at: DateTime<Utc>,    // 暂存时间
    pub records: Arc<Vec<MrlRecord>>, // 有效记录（非空）
}

// ==========================================
// PendingBatch - 单槽存储
// ==========================================
#[derive(Debug, Default)]
pub struct PendingBatch {
    slot: RwLock<Option<BatchSnapshot>>,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 整体替换快照；空列表等价于 clear()
    pub fn replace(&self, records: Vec<MrlRecord>) {
        self.stage(records, None);
    }

    /// 整体替换快照并记录来源文件
    ///
    /// # 返回
    /// - Some(batch_id): 已暂存
    /// - None: 列表为空，槽位已清空
    pub fn stage(&self, records: Vec<MrlRecord>, source_file: Option<&str>) -> Option<String> {
        if records.is_empty() {
            self.clear();
            return None;
        }

        let snapshot = BatchSnapshot {
            batch_id: Uuid::new_v4().to_string(),
            source_file: source_file.map(str::to_string),
            staged_at: Utc::now(),
            records: Arc::new(records),
        };
        let batch_id = snapshot.batch_id.clone();
        let count = snapshot.records.len();

        *self.write() = Some(snapshot);
        info!(batch_id = %batch_id, records = count, "待提交批次已替换");
        Some(batch_id)
    }

    /// 当前快照中的记录（无快照时为空列表）
    pub fn current(&self) -> Arc<Vec<MrlRecord>> {
        self.read()
            .as_ref()
            .map(|s| Arc::clone(&s.records))
            .unwrap_or_default()
    }

    /// 完整快照（含批次元数据）
    pub fn snapshot(&self) -> Option<BatchSnapshot> {
        self.read().clone()
    }

    pub fn has_records(&self) -> bool {
        self.read()
            .as_ref()
            .is_some_and(|s| !s.records.is_empty())
    }

    pub fn clear(&self) {
        if let Some(previous) = self.write().take() {
            debug!(batch_id = %previous.batch_id, "待提交批次已清空");
        }
    }

    // 槽位只保存不可变快照，锁中毒后数据仍然完整
    fn read(&self) -> RwLockReadGuard<'_, Option<BatchSnapshot>> {
        self.slot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<BatchSnapshot>> {
        self.slot.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mrl::RawMrlRecord;
    use crate::importer::{MrlRecordValidator, RecordValidator};

    fn records(ids: &[&str]) -> Vec<MrlRecord> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let raw = RawMrlRecord {
                    material_id: Some(id.to_string()),
                    plant: Some("P100".to_string()),
                    mrl_number: Some("MRL".to_string()),
                    ..Default::default()
                };
                MrlRecordValidator.validate(&raw, i + 1).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_empty_at_startup() {
        let batch = PendingBatch::new();
        assert!(!batch.has_records());
        assert!(batch.current().is_empty());
        assert!(batch.snapshot().is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let batch = PendingBatch::new();
        batch.replace(records(&["A", "B"]));
        batch.replace(records(&["C"]));

        let current = batch.current();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].material_id(), "C");
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let batch = PendingBatch::new();
        batch.replace(records(&["A"]));
        assert!(batch.has_records());

        batch.replace(Vec::new());
        assert!(!batch.has_records());
        assert!(batch.snapshot().is_none());
    }

    #[test]
    fn test_stage_keeps_metadata() {
        let batch = PendingBatch::new();
        let batch_id = batch.stage(records(&["A"]), Some("mrl.xml")).unwrap();

        let snapshot = batch.snapshot().unwrap();
        assert_eq!(snapshot.batch_id, batch_id);
        assert_eq!(snapshot.source_file.as_deref(), Some("mrl.xml"));
        assert_eq!(snapshot.records.len(), 1);

        batch.clear();
        assert!(!batch.has_records());
    }

    #[test]
    fn test_snapshot_survives_later_replace() {
        let batch = PendingBatch::new();
        batch.replace(records(&["A", "B"]));
        let held = batch.current();

        batch.replace(records(&["C"]));
        assert_eq!(held.len(), 2);
        assert_eq!(batch.current().len(), 1);
    }
}
