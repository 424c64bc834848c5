// ==========================================
// MRL 数据导入驾驶舱 - 应用状态
// ==========================================
// 职责: 按配置装配各层组件，持有进程级共享状态
// 装配: MrlConfig → XlsxTabularAppender → ImportWorkflow → ImportApi
// ==========================================

use std::sync::Arc;

use crate::api::{ImportApi, ImportWorkflow};
use crate::config::{ConfigError, MrlConfig};
use crate::importer::MrlXmlParser;
use crate::repository::XlsxTabularAppender;
use crate::session::PendingBatch;

/// 应用状态
///
/// 暂存批次在整个进程内只有一份
pub struct AppState {
    pub config: MrlConfig,
    pub pending: Arc<PendingBatch>,
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 从环境加载配置并装配
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(MrlConfig::load()?))
    }

    pub fn new(config: MrlConfig) -> Self {
        tracing::info!(
            "初始化AppState，工作簿: {}，工作表: {}",
            config.excel_path.display(),
            config.sheet_name
        );

        let pending = Arc::new(PendingBatch::new());
        let appender = Arc::new(XlsxTabularAppender::new(
            config.excel_path.clone(),
            config.sheet_name.clone(),
        ));
        let workflow = Arc::new(ImportWorkflow::new(
            Box::new(MrlXmlParser::default()),
            Arc::clone(&pending),
            appender,
        ));
        let import_api = Arc::new(ImportApi::new(workflow));

        tracing::info!("AppState初始化完成");
        Self {
            config,
            pending,
            import_api,
        }
    }
}
