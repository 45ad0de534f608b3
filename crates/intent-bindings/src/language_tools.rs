//! One switch tool per supported language.
//!
//! All six tools share [`LanguageTool`]; only the fixed [`LanguageCode`]
//! differs. The tool delegates straight to the session's controller.

use crate::{Result, Tool, ToolError};
use async_trait::async_trait;
use language_switch::{LanguageCode, LanguageSwitchController};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub struct LanguageTool {
    code: LanguageCode,
    name: String,
    description: String,
    controller: Arc<LanguageSwitchController>,
}

impl LanguageTool {
    pub fn new(code: LanguageCode, controller: Arc<LanguageSwitchController>) -> Self {
        let display = controller.registry().display_name(code).to_string();
        Self {
            code,
            name: format!("switch_to_{}", display.to_lowercase()),
            description: format!("Switch to {display} responses."),
            controller,
        }
    }

    pub fn code(&self) -> LanguageCode {
        self.code
    }
}

#[async_trait]
impl Tool for LanguageTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        match &args {
            Value::Null => {}
            Value::Object(map) if map.is_empty() => {}
            other => {
                return Err(ToolError::InvalidArguments {
                    tool: self.name.clone(),
                    reason: format!("expected no arguments, got {other}"),
                })
            }
        }

        debug!(tool = %self.name, "executing language tool");
        let outcome = self.controller.switch_to(self.code).await;
        Ok(json!({
            "language": outcome.current,
            "changed": outcome.changed,
            "announced": outcome.announcement.is_spoken(),
        }))
    }
}

/// Build the six language tools bound to one session's controller.
pub fn language_tools(controller: &Arc<LanguageSwitchController>) -> Vec<LanguageTool> {
    LanguageCode::ALL
        .into_iter()
        .map(|code| LanguageTool::new(code, controller.clone()))
        .collect()
}
