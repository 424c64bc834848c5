// ==========================================
// MRL 数据导入驾驶舱 - 导入 Trait
// ==========================================
// 职责: 定义 XML 解析与记录校验接口（不包含实现）
// ==========================================

use crate::domain::mrl::{MrlRecord, RawMrlRecord, ValidationReport};
use crate::importer::error::{ImportResult, RecordRejection};

// ==========================================
// RecordValidator Trait
// ==========================================
// 用途: 单条记录的字段级校验
// 实现者: MrlRecordValidator
pub trait RecordValidator: Send + Sync {
    /// 校验一条原始记录
    ///
    /// # 参数
    /// - raw: XML 解码得到的原始记录
    /// - position: 记录在文档中的位置（从 1 开始，用于错误信息）
    ///
    /// # 返回
    /// - Ok(MrlRecord): 校验通过
    /// - Err(RecordRejection): 必填字段缺失或日期格式错误（整条丢弃）
    fn validate(&self, raw: &RawMrlRecord, position: usize) -> Result<MrlRecord, RecordRejection>;
}

// ==========================================
// XmlImportParser Trait
// ==========================================
// 用途: 上传文件 → 校验报告
// 实现者: MrlXmlParser
pub trait XmlImportParser: Send + Sync {
    /// 解码字节流为原始记录序列（文档顺序）
    ///
    /// # 返回
    /// - Ok(Vec<RawMrlRecord>): 可能为空
    /// - Err(ImportError::XmlReadError): XML 结构错误
    fn decode(&self, bytes: &[u8]) -> ImportResult<Vec<RawMrlRecord>>;

    /// 解析并校验上传文件
    ///
    /// # 参数
    /// - bytes: 文件原始字节
    /// - filename: 原始文件名（用于扩展名检查）
    ///
    /// # 返回
    /// - ValidationReport: 始终返回报告，文件级错误也体现在 errors 中
    fn parse(&self, bytes: &[u8], filename: &str) -> ValidationReport;
}
