//! Claude CLI連携
//!
//! `claude -p <prompt> --output-format text` の標準出力を評価テキストとする。

use super::HealthAssessor;
use crate::error::{LabelScanError, Result};
use async_trait::async_trait;
use label_scan_common::clean_response;
use tokio::process::Command;
use tracing::debug;

pub struct ClaudeCliAssessor {
    program: String,
}

impl ClaudeCliAssessor {
    pub fn new() -> Self {
        Self { program: "claude".to_string() }
    }

    /// 実行ファイルを変更
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run_claude_cli(&self, prompt: &str) -> Result<String> {
        // Windowsではcmd /c経由
        #[cfg(windows)]
        let output = Command::new("cmd")
            .args(["/c", self.program.as_str(), "-p", prompt, "--output-format", "text"])
            .output()
            .await;

        #[cfg(not(windows))]
        let output = Command::new(&self.program)
            .args(["-p", prompt, "--output-format", "text"])
            .output()
            .await;

        let output = output
            .map_err(|e| LabelScanError::CliExecution(format!("{} 実行エラー: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LabelScanError::CliExecution(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("claude response: {} chars", response.len());
        Ok(response)
    }
}

impl Default for ClaudeCliAssessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthAssessor for ClaudeCliAssessor {
    fn name(&self) -> &str {
        "claude"
    }

    async fn assess(&self, prompt: &str) -> Result<String> {
        let response = self.run_claude_cli(prompt).await?;
        Ok(clean_response(&response)?)
    }
}
