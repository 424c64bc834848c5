// ==========================================
// MRL 数据导入驾驶舱 - 记录校验器实现
// ==========================================
// 规则顺序（固定）:
// 1. 必填字段: MaterialId / Plant / MRLNumber 非空白
// 2. 日期字段: ValidFrom / ValidTo 非空白时必须为 yyyy-MM-dd
// 3. Status 原样透传，缺失时为空串
// ==========================================

use crate::domain::mrl::{MrlRecord, RawMrlRecord, DATE_FORMAT};
use crate::importer::error::RecordRejection;
use crate::importer::mrl_importer_trait::RecordValidator;
use chrono::NaiveDate;

pub struct MrlRecordValidator;

impl RecordValidator for MrlRecordValidator {
    fn validate(&self, raw: &RawMrlRecord, position: usize) -> Result<MrlRecord, RecordRejection> {
        let (material_id, plant, mrl_number) =
            match (required(&raw.material_id), required(&raw.plant), required(&raw.mrl_number)) {
                (Some(m), Some(p), Some(n)) => (m, p, n),
                _ => return Err(RecordRejection::MissingRequiredFields { position }),
            };

        let valid_from = parse_optional_date(raw.valid_from.as_deref())
            .map_err(|_| RecordRejection::InvalidDateFormat { position })?;
        let valid_to = parse_optional_date(raw.valid_to.as_deref())
            .map_err(|_| RecordRejection::InvalidDateFormat { position })?;

        Ok(MrlRecord::from_checked(
            material_id.to_string(),
            plant.to_string(),
            mrl_number.to_string(),
            valid_from,
            valid_to,
            raw.status.clone().unwrap_or_default(),
        ))
    }
}

/// 必填字段：空白视为缺失，非空白时原样保留
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !is_blank(v))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 非法日期标记（只用于转换为 RecordRejection）
struct InvalidDate;

/// 空白日期视为缺失；非空白日期必须严格匹配 YYYY-MM-DD
fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, InvalidDate> {
    match value {
        None => Ok(None),
        Some(v) if is_blank(v) => Ok(None),
        Some(v) => parse_iso_date(v).map(Some).ok_or(InvalidDate),
    }
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    // chrono 的 %m/%d 接受单位数，先卡住 4-2-2 位形状
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
