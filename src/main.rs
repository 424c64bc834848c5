// ==========================================
// MRL 数据导入驾驶舱 - 命令行入口
// ==========================================
// 用法: mrl-cockpit <file.xml> [--submit]
// 输出: 校验报告（及提交响应）以 JSON 打印到 stdout
// 退出码: 提交失败时为 1
// ==========================================

use anyhow::{bail, Context};
use mrl_cockpit::{logging, AppState};
use std::path::PathBuf;
use std::process::ExitCode;

struct CliArgs {
    file: PathBuf,
    submit: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut file = None;
    let mut submit = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--submit" => submit = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            path => {
                if file.replace(PathBuf::from(path)).is_some() {
                    bail!("只能指定一个 XML 文件");
                }
            }
        }
    }

    let file = file.context("用法: mrl-cockpit <file.xml> [--submit]")?;
    Ok(CliArgs { file, submit })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let args = parse_args()?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", mrl_cockpit::APP_NAME, mrl_cockpit::VERSION);
    tracing::info!("==================================================");

    let state = AppState::from_env().context("配置加载失败")?;

    let report = state.import_api.import_file(&args.file).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !args.submit {
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = state.import_api.submit().await;
    println!("{}", serde_json::to_string_pretty(&outcome.response)?);

    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(
            status = outcome.status_code,
            code = outcome.error_code.unwrap_or_default(),
            "提交失败"
        );
        Ok(ExitCode::FAILURE)
    }
}
