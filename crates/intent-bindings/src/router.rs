use crate::{Result, Tool, ToolCall, ToolDefinition, ToolError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Dispatches tool calls by name.
#[derive(Default)]
pub struct ToolRouter {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A later tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.by_name.get(&name) {
            Some(&idx) => self.tools[idx] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Function definitions for every tool, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub async fn dispatch(&self, call: &ToolCall) -> Result<Value> {
        let Some(&idx) = self.by_name.get(&call.name) else {
            warn!(tool = %call.name, "dispatcher requested unknown tool");
            return Err(ToolError::UnknownTool(call.name.clone()));
        };

        let args = match &call.arguments {
            Value::String(raw) if raw.trim().is_empty() => Value::Null,
            Value::String(raw) => {
                serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments {
                    tool: call.name.clone(),
                    reason: e.to_string(),
                })?
            }
            other => other.clone(),
        };

        info!(tool = %call.name, "dispatching tool call");
        self.tools[idx].execute(args).await
    }
}
