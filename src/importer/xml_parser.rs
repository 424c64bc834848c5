// ==========================================
// MRL 数据导入驾驶舱 - XML 解析器实现
// ==========================================
// 阶段 0: 上传检查（空文件 / 扩展名）
// 阶段 1: XML 解码为 RawMrlRecord（文档顺序）
// 阶段 2: 逐条校验，不短路，汇总 ValidationReport
// ==========================================
// 文档结构: <任意根元素> 下零个或多个 <Record>
// 兼容性: 未知元素/属性/注释全部忽略
// 编码: 按 BOM 或 XML 声明中的 encoding 解码，缺省为 UTF-8
// ==========================================

use crate::domain::mrl::{RawMrlRecord, ValidationReport};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::mrl_importer_trait::{RecordValidator, XmlImportParser};
use crate::importer::record_validator::MrlRecordValidator;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info, warn};

const RECORD_TAG: &[u8] = b"Record";

// 元素深度: 1 = 根，2 = Record, 3 = 字段
const ROOT_DEPTH: usize = 1;
const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// Record 下可识别的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordField {
    MaterialId,
    Plant,
    MrlNumber,
    ValidFrom,
    ValidTo,
    Status,
}

impl RecordField {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"MaterialId" => Some(Self::MaterialId),
            b"Plant" => Some(Self::Plant),
            b"MRLNumber" => Some(Self::MrlNumber),
            b"ValidFrom" => Some(Self::ValidFrom),
            b"ValidTo" => Some(Self::ValidTo),
            b"Status" => Some(Self::Status),
            _ => None,
        }
    }

    /// 同名字段重复出现时后者覆盖前者
    fn assign(self, record: &mut RawMrlRecord, value: String) {
        let slot = match self {
            Self::MaterialId => &mut record.material_id,
            Self::Plant => &mut record.plant,
            Self::MrlNumber => &mut record.mrl_number,
            Self::ValidFrom => &mut record.valid_from,
            Self::ValidTo => &mut record.valid_to,
            Self::Status => &mut record.status,
        };
        *slot = Some(value);
    }
}

// ==========================================
// 解码状态机
// ==========================================
#[derive(Default)]
struct DecodeState {
    depth: usize,
    root_seen: bool,
    records: Vec<RawMrlRecord>,
    current: Option<RawMrlRecord>,
    field: Option<(RecordField, String)>,
}

impl DecodeState {
    fn open(&mut self, local_name: &[u8]) -> ImportResult<()> {
        self.depth += 1;
        match self.depth {
            ROOT_DEPTH => {
                if self.root_seen {
                    return Err(ImportError::XmlReadError(
                        "multiple root elements".to_string(),
                    ));
                }
                self.root_seen = true;
            }
            RECORD_DEPTH if local_name == RECORD_TAG => {
                self.current = Some(RawMrlRecord::default());
            }
            FIELD_DEPTH if self.current.is_some() => {
                self.field = RecordField::from_local_name(local_name).map(|f| (f, String::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) {
        match self.depth {
            RECORD_DEPTH => {
                if let Some(record) = self.current.take() {
                    self.records.push(record);
                }
            }
            FIELD_DEPTH => {
                if let (Some((field, value)), Some(record)) = (self.field.take(), self.current.as_mut())
                {
                    field.assign(record, value);
                }
            }
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) -> ImportResult<()> {
        if self.depth == FIELD_DEPTH {
            if let Some((_, value)) = self.field.as_mut() {
                value.push_str(text);
            }
        } else if self.depth == 0 && !text.trim().is_empty() {
            return Err(ImportError::XmlReadError(
                "text content outside of the root element".to_string(),
            ));
        }
        Ok(())
    }

    fn finish(self) -> ImportResult<Vec<RawMrlRecord>> {
        if self.depth != 0 {
            return Err(ImportError::XmlReadError(
                "unexpected end of document (unclosed element)".to_string(),
            ));
        }
        if !self.root_seen {
            return Err(ImportError::XmlReadError(
                "no root element found".to_string(),
            ));
        }
        Ok(self.records)
    }
}

// ==========================================
// MrlXmlParser 实现
// ==========================================
pub struct MrlXmlParser {
    validator: Box<dyn RecordValidator>,
}

impl MrlXmlParser {
    /// 创建解析器
    ///
    /// # 参数
    /// - validator: 单条记录校验器
    pub fn new(validator: Box<dyn RecordValidator>) -> Self {
        Self { validator }
    }

    /// 上传检查：空文件优先于扩展名
    fn check_upload(bytes: &[u8], filename: &str) -> ImportResult<()> {
        if bytes.is_empty() {
            return Err(ImportError::EmptyUpload);
        }
        if !filename.to_lowercase().ends_with(".xml") {
            return Err(ImportError::UnsupportedFileType(filename.to_string()));
        }
        Ok(())
    }

    fn try_parse(&self, bytes: &[u8], filename: &str) -> ImportResult<ValidationReport> {
        Self::check_upload(bytes, filename)?;

        let raw_records = self.decode(bytes)?;
        if raw_records.is_empty() {
            return Err(ImportError::NoRecords);
        }

        let total = raw_records.len();
        debug!(total = total, "XML 解码完成");

        let mut errors = Vec::new();
        let mut valid_records = Vec::new();
        for (idx, raw) in raw_records.iter().enumerate() {
            match self.validator.validate(raw, idx + 1) {
                Ok(record) => valid_records.push(record),
                Err(rejection) => {
                    warn!(position = rejection.position(), reason = %rejection, "记录校验失败");
                    errors.push(rejection.to_string());
                }
            }
        }

        Ok(ValidationReport::from_outcome(total, errors, valid_records))
    }
}

impl Default for MrlXmlParser {
    fn default() -> Self {
        Self::new(Box::new(MrlRecordValidator))
    }
}

impl XmlImportParser for MrlXmlParser {
    fn decode(&self, bytes: &[u8]) -> ImportResult<Vec<RawMrlRecord>> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut state = DecodeState::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => state.open(e.local_name().as_ref())?,
                Event::Empty(e) => {
                    state.open(e.local_name().as_ref())?;
                    state.close();
                }
                Event::End(_) => state.close(),
                Event::Text(t) => state.text(&t.unescape()?)?,
                Event::CData(c) => {
                    let text = reader
                        .decoder()
                        .decode(&c)
                        .map_err(|e| ImportError::XmlReadError(e.to_string()))?;
                    state.text(&text)?;
                }
                Event::Eof => break,
                // 声明 / 注释 / 处理指令 / DOCTYPE
                _ => {}
            }
            buf.clear();
        }

        state.finish()
    }

    fn parse(&self, bytes: &[u8], filename: &str) -> ValidationReport {
        info!(filename = %filename, size = bytes.len(), "开始解析 MRL XML");

        match self.try_parse(bytes, filename) {
            Ok(report) => {
                info!(
                    total = report.total_records,
                    valid = report.valid_records_count,
                    invalid = report.invalid_records_count,
                    "MRL XML 校验完成"
                );
                report
            }
            Err(e) => {
                warn!(filename = %filename, error = %e, "MRL XML 导入被拒绝");
                ValidationReport::rejected(e.to_string())
            }
        }
    }
}
