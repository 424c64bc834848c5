// ==========================================
// MRL 数据导入驾驶舱 - 工作簿读写
// ==========================================
// 读取: calamine 读出全部工作表的单元格值与公式（保持工作表顺序）
// 写回: rust_xlsxwriter 按内存模型整体重写同一路径
// 保留: 文本 / 数字 / 布尔 / 日期（按日期格式写回）/ 公式
// 限制: 字体、列宽等其他格式不保留；公式的缓存结果由 Excel 重新计算
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::BTreeMap;
use std::path::Path;

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DURATION_NUM_FORMAT: &str = "[h]:mm:ss";
const TEXT_NUM_FORMAT: &str = "@";

/// 单元格值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel 日期序列值
    DateTime(f64),
    /// Excel 时长序列值
    Duration(f64),
    /// 公式文本（不含前导 "="）
    Formula(String),
}

impl CellValue {
    fn from_data(data: &Data) -> Option<Self> {
        match data {
            Data::Empty => None,
            Data::String(s) => Some(Self::Text(s.clone())),
            Data::Float(f) => Some(Self::Number(*f)),
            Data::Int(i) => Some(Self::Number(*i as f64)),
            Data::Bool(b) => Some(Self::Bool(*b)),
            Data::DateTime(dt) if dt.is_duration() => Some(Self::Duration(dt.as_f64())),
            Data::DateTime(dt) => Some(Self::DateTime(dt.as_f64())),
            other => Some(Self::Text(other.to_string())),
        }
    }
}

// ==========================================
// SheetData - 单个工作表（稀疏，按 (行，列) 排序）
// ==========================================
#[derive(Debug, Clone)]
pub struct SheetData {
    name: String,
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl SheetData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 最后一个非空行的索引（从 0 开始）
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().next_back().map(|(row, _)| *row)
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn set_cell(&mut self, row: u32, col: u16, value: CellValue) {
        self.cells.insert((row, col), value);
    }

    pub fn set_text(&mut self, row: u32, col: u16, value: impl Into<String>) {
        self.set_cell(row, col, CellValue::Text(value.into()));
    }

    /// 在指定行依次写入文本单元格
    pub fn write_text_row<S: AsRef<str>>(&mut self, row: u32, values: &[S]) -> RepositoryResult<()> {
        for (col, value) in values.iter().enumerate() {
            let col = u16::try_from(col)
                .map_err(|_| RepositoryError::Io(format!("column index {} out of range", col)))?;
            self.set_text(row, col, value.as_ref());
        }
        Ok(())
    }
}

/// 写回时复用的数字格式
struct CellFormats {
    date: Format,
    datetime: Format,
    duration: Format,
    text: Format,
}

impl CellFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format(DATE_NUM_FORMAT),
            datetime: Format::new().set_num_format(DATETIME_NUM_FORMAT),
            duration: Format::new().set_num_format(DURATION_NUM_FORMAT),
            text: Format::new().set_num_format(TEXT_NUM_FORMAT),
        }
    }
}

// ==========================================
// WorkbookData - 整个工作簿的内存模型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkbookData {
    sheets: Vec<SheetData>,
}

impl WorkbookData {
    /// 读取已有工作簿的全部工作表（值 + 公式）
    pub fn read(path: &Path) -> RepositoryResult<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let mut sheet = SheetData::new(&name);

            let range = workbook.worksheet_range(&name)?;
            let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
            for (row, col, data) in range.used_cells() {
                let Some(value) = CellValue::from_data(data) else {
                    continue;
                };
                let pos = absolute_pos(&name, row_offset, col_offset, row, col)?;
                sheet.cells.insert(pos, value);
            }

            // 公式覆盖缓存值
            let formulas = workbook.worksheet_formula(&name)?;
            let (row_offset, col_offset) = formulas.start().unwrap_or((0, 0));
            for (row, col, formula) in formulas.used_cells() {
                let formula = formula.trim_start_matches('=');
                if formula.is_empty() {
                    continue;
                }
                let pos = absolute_pos(&name, row_offset, col_offset, row, col)?;
                sheet.cells.insert(pos, CellValue::Formula(formula.to_string()));
            }

            sheets.push(sheet);
        }

        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &[SheetData] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|s| same_sheet_name(&s.name, name))
    }

    /// 获取工作表，不存在时追加到末尾
    ///
    /// # 返回
    /// - (&mut SheetData, true): 新建
    /// - (&mut SheetData, false): 已存在
    pub fn ensure_sheet(&mut self, name: &str) -> (&mut SheetData, bool) {
        let (idx, created) = match self.sheets.iter().position(|s| same_sheet_name(&s.name, name)) {
            Some(idx) => (idx, false),
            None => {
                self.sheets.push(SheetData::new(name));
                (self.sheets.len() - 1, true)
            }
        };
        (&mut self.sheets[idx], created)
    }

    /// 整体重写到指定路径
    pub fn write(&self, path: &Path) -> RepositoryResult<()> {
        let formats = CellFormats::new();
        let mut workbook = Workbook::new();

        for sheet in &self.sheets {
            let mut worksheet = Worksheet::new();
            worksheet.set_name(&sheet.name)?;

            for (&(row, col), value) in &sheet.cells {
                write_cell(&mut worksheet, row, col, value, &formats)?;
            }

            workbook.push_worksheet(worksheet);
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    formats: &CellFormats,
) -> RepositoryResult<()> {
    match value {
        // rust_xlsxwriter 忽略空字符串，改写为文本格式的空白单元格
        CellValue::Text(text) if text.is_empty() => {
            worksheet.write_blank(row, col, &formats.text)?;
        }
        CellValue::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
        CellValue::Number(number) => {
            worksheet.write_number(row, col, *number)?;
        }
        CellValue::Bool(flag) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        CellValue::DateTime(serial) => {
            let format = if serial.fract() == 0.0 {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet.write_number_with_format(row, col, *serial, format)?;
        }
        CellValue::Duration(serial) => {
            worksheet.write_number_with_format(row, col, *serial, &formats.duration)?;
        }
        CellValue::Formula(formula) => {
            worksheet.write_formula(row, col, formula.as_str())?;
        }
    }
    Ok(())
}

fn absolute_pos(
    sheet: &str,
    row_offset: u32,
    col_offset: u32,
    row: usize,
    col: usize,
) -> RepositoryResult<(u32, u16)> {
    let out_of_range =
        || RepositoryError::Io(format!("cell index out of range in sheet {}", sheet));
    let row = u32::try_from(row)
        .ok()
        .and_then(|r| row_offset.checked_add(r))
        .ok_or_else(out_of_range)?;
    let col = u16::try_from(col_offset as usize + col).map_err(|_| out_of_range())?;
    Ok((row, col))
}

/// Excel 工作表名不区分大小写
fn same_sheet_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
