// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成测试工作簿与 XML 内容、读回工作表
// ==========================================
#![allow(dead_code)]

use calamine::{open_workbook, Reader, Xlsx};
use mrl_cockpit::{AppState, MrlConfig};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 在临时目录中创建工作簿
///
/// # 参数
/// - sheets: (工作表名，行数据) 列表，按顺序写入
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - PathBuf: 工作簿路径
pub fn create_test_workbook(
    sheets: &[(&str, &[&[&str]])],
) -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mrl_data.xlsx");

    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(*name)?;
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                worksheet.write_string(row_idx as u32, col_idx as u16, *value)?;
            }
        }
        workbook.push_worksheet(worksheet);
    }
    workbook.save(&path)?;

    Ok((dir, path))
}

/// 读回工作表内容（按绝对行号，空单元格为 ""）
pub fn read_sheet_rows(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(sheet)?;
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row, col, data) in range.used_cells() {
        let row = row_offset as usize + row;
        let col = col_offset as usize + col;
        if rows.len() <= row {
            rows.resize(row + 1, Vec::new());
        }
        if rows[row].len() <= col {
            rows[row].resize(col + 1, String::new());
        }
        rows[row][col] = data.to_string();
    }

    // 空字符串单元格可能不落盘，统一补齐到最宽行
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    Ok(rows)
}

/// 只含 MRL_DATA 表头的工作簿
pub fn create_header_only_workbook() -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let rows: &[&[&str]] = &[&HEADER];
    create_test_workbook(&[("MRL_DATA", rows)])
}

pub fn sheet_names(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    Ok(workbook.sheet_names())
}

/// 生成 MRL XML 文档
///
/// 每条记录的字段顺序: MaterialId, Plant, MRLNumber, ValidFrom, ValidTo, Status
pub fn mrl_xml(records: &[[&str; 6]]) -> String {
    let tags = ["MaterialId", "Plant", "MRLNumber", "ValidFrom", "ValidTo", "Status"];

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<MRLData>\n");
    for record in records {
        xml.push_str("  <Record>");
        for (tag, value) in tags.iter().zip(record.iter()) {
            xml.push_str(&format!("<{tag}>{value}</{tag}>"));
        }
        xml.push_str("</Record>\n");
    }
    xml.push_str("</MRLData>\n");
    xml
}

/// 指向指定工作簿的应用状态
pub fn create_test_state(excel_path: &Path) -> AppState {
    AppState::new(MrlConfig {
        excel_path: excel_path.to_path_buf(),
        sheet_name: "MRL_DATA".to_string(),
    })
}

pub const HEADER: [&str; 6] = ["MaterialId", "Plant", "MRLNumber", "ValidFrom", "ValidTo", "Status"];
