//! Name table mapping tool names to connected operations.

use std::collections::HashMap;

use rmcp::model::Tool;

use crate::error::{GithubOpsError, Result};
use crate::operation::{DynOperation, JsonObject, OperationOutput};

/// Registry of the tools exposed to the host.
///
/// Built once at startup by [`ToolRegistry::register`]; there is no way to
/// add or remove tools afterwards.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn DynOperation>>,
}

impl ToolRegistry {
    /// Register every operation under its tool name. Two operations with the
    /// same name are a configuration error.
    pub fn register(operations: Vec<Box<dyn DynOperation>>) -> Result<Self> {
        let mut tools = HashMap::with_capacity(operations.len());
        for operation in operations {
            let name = operation.descriptor().name.to_string();
            if tools.contains_key(&name) {
                return Err(GithubOpsError::Configuration(format!(
                    "Duplicate tool name: {}",
                    name
                )));
            }
            tracing::debug!(tool = %name, "Registered tool");
            tools.insert(name, operation);
        }
        Ok(Self { tools })
    }

    /// Every registered tool, sorted by name.
    pub fn tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|op| op.descriptor().to_tool())
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call to the named tool. Missing arguments are an empty
    /// object.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<OperationOutput> {
        let operation = self
            .tools
            .get(name)
            .ok_or_else(|| GithubOpsError::NotFound(name.to_string()))?;
        operation.invoke(arguments.unwrap_or_default()).await
    }
}
