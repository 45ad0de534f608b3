//! intent-bindings: language-switch actions for a language-model dispatcher
//!
//! The dispatcher (an external language model) decides from the user's
//! speech which action to call. This crate exposes one zero-argument tool per
//! supported language, a router that executes tool calls by name, and the
//! function definitions the dispatcher selects from.

mod error;
pub use error::{Result, ToolError};

mod tool;
pub use tool::{FunctionDefinition, Tool, ToolCall, ToolDefinition};

mod language_tools;
pub use language_tools::{language_tools, LanguageTool};

mod router;
pub use router::ToolRouter;

use language_switch::LanguageSwitchController;
use std::sync::Arc;

/// Initialize the intent bindings system
pub fn init() -> Result<()> {
    tracing::info!("Initializing Intent Bindings system");
    Ok(())
}

/// Router preloaded with the six language tools for one session.
pub fn create_router(controller: &Arc<LanguageSwitchController>) -> ToolRouter {
    let mut router = ToolRouter::new();
    for tool in language_tools(controller) {
        router.register(Arc::new(tool));
    }
    router
}
