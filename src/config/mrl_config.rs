// ==========================================
// MRL 数据导入驾驶舱 - 运行配置
// ==========================================
// 来源（后者覆盖前者）:
//   1. 默认值（用户数据目录下的 mrl_data.xlsx，工作表 MRL_DATA）
//   2. MRL_CONFIG_PATH 指向的 JSON 文件
//   3. 环境变量 MRL_EXCEL_PATH / MRL_SHEET_NAME（空白值忽略）
// 注意: 配置不会创建工作簿文件本身
// ==========================================

use crate::domain::mrl::DEFAULT_SHEET_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const ENV_CONFIG_PATH: &str = "MRL_CONFIG_PATH";
pub const ENV_EXCEL_PATH: &str = "MRL_EXCEL_PATH";
pub const ENV_SHEET_NAME: &str = "MRL_SHEET_NAME";

const DEFAULT_WORKBOOK_FILE: &str = "mrl_data.xlsx";
const DATA_DIR_NAME: &str = "mrl-cockpit";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {cause}")]
    Unreadable { path: String, cause: String },

    #[error("配置文件格式错误 {path}: {cause}")]
    Invalid { path: String, cause: String },

    #[error("工作表名称不能为空")]
    BlankSheetName,
}

// ==========================================
// MrlConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MrlConfig {
    pub excel_path: PathBuf,
    pub sheet_name: String,
}

impl Default for MrlConfig {
    fn default() -> Self {
        Self {
            excel_path: default_excel_path(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl MrlConfig {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载
    pub fn load() -> Result<Self, ConfigError> {
        let file = non_blank_env(ENV_CONFIG_PATH).map(PathBuf::from);
        Self::from_sources(
            file.as_deref(),
            non_blank_env(ENV_EXCEL_PATH),
            non_blank_env(ENV_SHEET_NAME),
        )
    }

    /// 组合各来源（不读取环境变量，便于测试）
    ///
    /// # 参数
    /// - file: 可选 JSON 配置文件
    /// - excel_path: 工作簿路径覆盖
    /// - sheet_name: 工作表名覆盖
    pub fn from_sources(
        file: Option<&Path>,
        excel_path: Option<String>,
        sheet_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };

        if let Some(path) = excel_path.filter(|p| !p.trim().is_empty()) {
            config.excel_path = PathBuf::from(path.trim());
        }
        if let Some(name) = sheet_name.filter(|n| !n.trim().is_empty()) {
            config.sheet_name = name.trim().to_string();
        }

        config.validate()?;
        info!(
            excel_path = %config.excel_path.display(),
            sheet = %config.sheet_name,
            "配置加载完成"
        );
        Ok(config)
    }

    /// 读取 JSON 配置文件，缺省字段取默认值
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "读取配置文件");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            cause: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet_name.trim().is_empty() {
            return Err(ConfigError::BlankSheetName);
        }
        Ok(())
    }
}

/// 默认工作簿路径
///
/// 优先使用用户数据目录，无法获取时回退到当前目录
pub fn default_excel_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join(DATA_DIR_NAME).join(DEFAULT_WORKBOOK_FILE),
        None => PathBuf::from(".").join(DEFAULT_WORKBOOK_FILE),
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MrlConfig::from_sources(None, None, None).unwrap();
        assert_eq!(config.sheet_name, "MRL_DATA");
        assert!(config.excel_path.ends_with("mrl_data.xlsx"));
    }

    #[test]
    fn test_overrides_win_and_blank_is_ignored() {
        let config = MrlConfig::from_sources(
            None,
            Some(" /srv/mrl/book.xlsx ".to_string()),
            Some("   ".to_string()),
        )
        .unwrap();
        assert_eq!(config.excel_path, PathBuf::from("/srv/mrl/book.xlsx"));
        assert_eq!(config.sheet_name, "MRL_DATA");
    }

    #[test]
    fn test_json_file_with_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mrl.json");
        std::fs::write(&path, r#"{"sheetName": "Imports"}"#).unwrap();

        let config = MrlConfig::from_sources(Some(&path), None, None).unwrap();
        assert_eq!(config.sheet_name, "Imports");
        assert_eq!(config.excel_path, default_excel_path());

        let config =
            MrlConfig::from_sources(Some(&path), None, Some("Override".to_string())).unwrap();
        assert_eq!(config.sheet_name, "Override");
    }

    #[test]
    fn test_invalid_sources() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        let err = MrlConfig::from_sources(Some(&missing), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = MrlConfig::from_sources(Some(&broken), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let blank = dir.path().join("blank.json");
        std::fs::write(&blank, r#"{"sheetName": " "}"#).unwrap();
        let err = MrlConfig::from_sources(Some(&blank), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::BlankSheetName));
    }
}
