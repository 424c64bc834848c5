// ==========================================
// MRL 数据导入驾驶舱 - Excel 追加实现
// ==========================================
// 流程: 存在性检查 → 读取整个工作簿 → 内存追加 → 整体写回
// 并发: 同一实例的追加串行执行（一个实例对应一个目标文件）；
//       写锁随阻塞任务持有，调用方取消后写回完成前不会放行下一次追加
// 限制: 读取与写回之间进程崩溃可能丢失原文件内容
// ==========================================

use crate::domain::mrl::{MrlRecord, SHEET_HEADER};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::mrl_sheet_repo::TabularAppender;
use crate::repository::xlsx_workbook::WorkbookData;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

// ==========================================
// XlsxTabularAppender
// ==========================================
pub struct XlsxTabularAppender {
    excel_path: PathBuf,
    sheet_name: String,
    // 串行化同一文件的读-改-写
    write_lock: Arc<Mutex<()>>,
}

impl XlsxTabularAppender {
    /// 创建追加器
    ///
    /// # 参数
    /// - excel_path: 已存在的 .xlsx 文件路径
    /// - sheet_name: 目标工作表名（不存在时自动创建并写表头）
    pub fn new(excel_path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            excel_path: excel_path.into(),
            sheet_name: sheet_name.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl TabularAppender for XlsxTabularAppender {
    #[instrument(skip(self, records), fields(path = %self.excel_path.display(), count = records.len()))]
    async fn append(&self, records: &[MrlRecord]) -> RepositoryResult<usize> {
        if records.is_empty() {
            debug!("无记录，跳过追加");
            return Ok(0);
        }

        let guard = Arc::clone(&self.write_lock).lock_owned().await;

        let path = self.excel_path.clone();
        let sheet_name = self.sheet_name.clone();
        let rows: Vec<[String; 6]> = records.iter().map(MrlRecord::to_row).collect();

        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            append_rows(&path, &sheet_name, &rows)
        })
        .await
        .map_err(|e| RepositoryError::Io(format!("append task failed: {}", e)))?;

        match &result {
            Ok(written) => info!(rows = *written, "Excel 追加完成"),
            Err(e) => error!(error = %e, "Excel 追加失败"),
        }
        result
    }
}

/// 读-改-写整个工作簿
fn append_rows(path: &Path, sheet_name: &str, rows: &[[String; 6]]) -> RepositoryResult<usize> {
    if !path.exists() {
        return Err(RepositoryError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = WorkbookData::read(path)?;

    let (sheet, created) = workbook.ensure_sheet(sheet_name);
    if created {
        debug!(sheet = %sheet_name, "目标工作表不存在，创建并写入表头");
        sheet.write_text_row(0, &SHEET_HEADER)?;
    }

    let first_row = sheet.last_row().map_or(0, |last| last + 1);
    for (offset, row) in rows.iter().enumerate() {
        let row_idx = u32::try_from(offset)
            .ok()
            .and_then(|o| first_row.checked_add(o))
            .ok_or_else(|| RepositoryError::Io("row index out of range".to_string()))?;
        sheet.write_text_row(row_idx, row)?;
    }
    debug!(first_row = first_row, rows = rows.len(), "内存追加完成");

    workbook.write(path)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mrl::RawMrlRecord;
    use crate::importer::{MrlRecordValidator, RecordValidator};
    use crate::repository::xlsx_workbook::CellValue;

    fn record(id: &str) -> MrlRecord {
        let raw = RawMrlRecord {
            material_id: Some(id.to_string()),
            plant: Some("P100".to_string()),
            mrl_number: Some("MRL-1".to_string()),
            valid_from: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        MrlRecordValidator.validate(&raw, 1).unwrap()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[tokio::test]
    async fn test_empty_records_do_not_touch_missing_file() {
        let appender = XlsxTabularAppender::new("/definitely/missing/book.xlsx", "MRL_DATA");
        assert_eq!(appender.append(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");
        let appender = XlsxTabularAppender::new(&path, "MRL_DATA");

        let err = appender.append(&[record("A")]).await.unwrap_err();
        assert!(matches!(err, RepositoryError::FileNotFound(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let appender = XlsxTabularAppender::new(&path, "MRL_DATA");
        let err = appender.append(&[record("A")]).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Io(_)));
    }

    #[test]
    fn test_append_rows_creates_sheet_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut seed = WorkbookData::default();
        seed.ensure_sheet("Other").0.set_text(0, 0, "keep");
        seed.write(&path).unwrap();

        let rows = vec![record("A").to_row(), record("B").to_row()];
        assert_eq!(append_rows(&path, "MRL_DATA", &rows).unwrap(), 2);

        let book = WorkbookData::read(&path).unwrap();
        let sheet = book.sheet("MRL_DATA").unwrap();
        assert_eq!(sheet.cell(0, 0), Some(&text("MaterialId")));
        assert_eq!(sheet.cell(0, 5), Some(&text("Status")));
        assert_eq!(sheet.cell(1, 0), Some(&text("A")));
        assert_eq!(sheet.cell(1, 3), Some(&text("2024-01-01")));
        assert_eq!(sheet.cell(2, 0), Some(&text("B")));
        assert_eq!(book.sheet("Other").unwrap().cell(0, 0), Some(&text("keep")));
    }

    #[test]
    fn test_append_keeps_formulas_and_dates_of_other_sheets() {
        use rust_xlsxwriter::{Format, Workbook};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut seed = Workbook::new();
        let calc = seed.add_worksheet();
        calc.set_name("Calc").unwrap();
        calc.write_number(0, 0, 10.0).unwrap();
        calc.write_formula(1, 0, "=A1*2").unwrap();
        calc.write_number_with_format(2, 0, 45413.0, &Format::new().set_num_format("yyyy-mm-dd"))
            .unwrap();
        seed.save(&path).unwrap();

        append_rows(&path, "MRL_DATA", &[record("A").to_row()]).unwrap();

        let book = WorkbookData::read(&path).unwrap();
        let calc = book.sheet("Calc").unwrap();
        assert_eq!(calc.cell(0, 0), Some(&CellValue::Number(10.0)));
        assert_eq!(calc.cell(1, 0), Some(&CellValue::Formula("A1*2".to_string())));
        assert_eq!(calc.cell(2, 0), Some(&CellValue::DateTime(45413.0)));
        assert_eq!(book.sheet("MRL_DATA").unwrap().cell(1, 0), Some(&text("A")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_append_still_blocks_next_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut seed = WorkbookData::default();
        seed.ensure_sheet("MRL_DATA").0.write_text_row(0, &SHEET_HEADER).unwrap();
        seed.write(&path).unwrap();

        let appender = XlsxTabularAppender::new(&path, "MRL_DATA");
        let first: Vec<MrlRecord> = (0..3000).map(|i| record(&format!("A{}", i))).collect();

        // 调用方放弃等待，后台写回继续执行
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            appender.append(&first),
        )
        .await;

        assert_eq!(appender.append(&[record("B")]).await.unwrap(), 1);

        let book = WorkbookData::read(&path).unwrap();
        let sheet = book.sheet("MRL_DATA").unwrap();
        assert_eq!(sheet.last_row(), Some(3001));
        assert_eq!(sheet.cell(1, 0), Some(&text("A0")));
        assert_eq!(sheet.cell(3000, 0), Some(&text("A2999")));
        assert_eq!(sheet.cell(3001, 0), Some(&text("B")));
    }
}
