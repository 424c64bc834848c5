// ==========================================
// MRL 数据导入驾驶舱 - MRL 领域模型
// ==========================================
// 职责: 原始记录 / 校验后记录 / 校验报告
// 约束: MrlRecord 只能由校验器构造，必填字段恒非空
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 日期格式（yyyy-MM-dd）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Excel 目标工作表默认名称
pub const DEFAULT_SHEET_NAME: &str = "MRL_DATA";

/// 工作表固定表头（列顺序即写入顺序）
pub const SHEET_HEADER: [&str; 6] = [
    "MaterialId",
    "Plant",
    "MRLNumber",
    "ValidFrom",
    "ValidTo",
    "Status",
];

// ==========================================
// RawMrlRecord - XML 原始记录
// ==========================================
// 用途: XML 解码结果，所有字段保持原始文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMrlRecord {
    pub material_id: Option<String>, // <MaterialId>
    pub plant: Option<String>,       // <Plant>
    pub mrl_number: Option<String>,  // <MRLNumber>
    pub valid_from: Option<String>,  // <ValidFrom>（yyyy-MM-dd 文本）
    pub valid_to: Option<String>,    // <ValidTo>（yyyy-MM-dd 文本）
    pub status: Option<String>,      // <Status>
}

// ==========================================
// MrlRecord - 校验通过的记录（不可变）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MrlRecord {
    material_id: String,
    plant: String,
    mrl_number: String,
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
    status: String,
}

impl MrlRecord {
    /// 仅供校验器调用：调用方已保证三个必填字段非空白
    pub(crate) fn from_checked(
        material_id: String,
        plant: String,
        mrl_number: String,
        valid_from: Option<NaiveDate>,
        valid_to: Option<NaiveDate>,
        status: String,
    ) -> Self {
        Self {
            material_id,
            plant,
            mrl_number,
            valid_from,
            valid_to,
            status,
        }
    }

    pub fn material_id(&self) -> &str {
        &self.material_id
    }

    pub fn plant(&self) -> &str {
        &self.plant
    }

    pub fn mrl_number(&self) -> &str {
        &self.mrl_number
    }

    pub fn valid_from(&self) -> Option<NaiveDate> {
        self.valid_from
    }

    pub fn valid_to(&self) -> Option<NaiveDate> {
        self.valid_to
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// 按表头顺序输出单元格文本（日期缺失写空串）
    pub fn to_row(&self) -> [String; 6] {
        [
            self.material_id.clone(),
            self.plant.clone(),
            self.mrl_number.clone(),
            format_date(self.valid_from),
            format_date(self.valid_to),
            self.status.clone(),
        ]
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

// ==========================================
// ValidationReport - 导入校验报告
// ==========================================
// 不变量:
// - valid_records_count + invalid_records_count == total_records
// - valid == errors.is_empty() && valid_records_count > 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub total_records: usize,
    pub valid_records_count: usize,
    pub invalid_records_count: usize,
    pub errors: Vec<String>,
    pub valid_records: Vec<MrlRecord>,
}

impl ValidationReport {
    /// 文件级拒绝：单条错误，计数全为 0
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            total_records: 0,
            valid_records_count: 0,
            invalid_records_count: 0,
            errors: vec![message.into()],
            valid_records: Vec::new(),
        }
    }

    /// 由逐条校验结果汇总
    pub(crate) fn from_outcome(total: usize, errors: Vec<String>, valid_records: Vec<MrlRecord>) -> Self {
        let valid_count = valid_records.len();
        Self {
            valid: errors.is_empty() && valid_count > 0,
            total_records: total,
            valid_records_count: valid_count,
            invalid_records_count: total.saturating_sub(valid_count),
            errors,
            valid_records,
        }
    }
}
