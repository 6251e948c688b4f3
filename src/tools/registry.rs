//! Tool registry
//!
//! Manages the collection of available tools and their metadata.

use crate::error::{AccessDeniedError, ToolError};
use crate::tools::executor::{
    OperationType, ToolCategory, ToolContext, ToolExecutor, ToolInfo, ToolOutput,
};
// async_trait required for dyn-compatibility with Box<dyn ToolHandler>
use async_trait::async_trait;
use schemars::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Compile-time tool registration entry
///
/// Submitted via `inventory::submit!` by the `#[gitlab_tool]` macro.
pub struct ToolRegistration {
    pub register_fn: fn(&mut ToolRegistry),
}

inventory::collect!(ToolRegistration);

/// A registered tool with all its metadata
pub struct RegisteredTool {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    pub operation: OperationType,
    /// JSON Schema for the tool's input
    pub input_schema: Schema,
    handler: Box<dyn ToolHandler>,
}

/// Type-erased tool handling
#[async_trait]
trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError>;
}

struct TypedToolHandler<T> {
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> TypedToolHandler<T> {
    fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T> ToolHandler for TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError> {
        let tool: T = serde_json::from_value(args).map_err(|e| {
            ToolError::InvalidArguments(format!("Failed to parse arguments: {}", e))
        })?;

        tool.execute(ctx).await
    }
}

/// Tool registry
///
/// Ordered by name so listings are stable.
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Create a registry holding every `#[gitlab_tool]` in the crate
    pub fn with_all_tools() -> Self {
        let mut registry = Self::new();
        registry.register_all_auto();
        registry
    }

    /// Register a tool
    pub fn register<T>(&mut self)
    where
        T: ToolExecutor + DeserializeOwned + schemars::JsonSchema + ToolInfo + 'static,
    {
        let name = T::name();
        let category = T::category();

        let tool = RegisteredTool {
            name,
            description: T::description(),
            category,
            operation: T::operation_type(),
            input_schema: schemars::schema_for!(T),
            handler: Box::new(TypedToolHandler::<T>::new()),
        };

        if self.tools.insert(name, tool).is_some() {
            warn!(name = name, "Tool registered twice, keeping the latest");
        }

        debug!(name = name, category = %category, "Registered tool");
    }

    /// Register all tools discovered via the `#[gitlab_tool]` macro
    pub fn register_all_auto(&mut self) {
        for registration in inventory::iter::<ToolRegistration> {
            (registration.register_fn)(self);
        }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().copied()
    }

    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.values()
    }

    pub fn tools_in_category(&self, category: ToolCategory) -> Vec<&RegisteredTool> {
        self.tools
            .values()
            .filter(|tool| tool.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    #[instrument(skip(self, ctx, args), fields(tool = %name, request_id = %ctx.request_id))]
    pub async fn execute(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        if ctx.read_only && !tool.operation.is_read_only() {
            warn!(tool = %name, "Refusing write tool in read-only mode");
            return Err(AccessDeniedError::read_only(name).into());
        }

        let start = Instant::now();
        let result = tool.handler.call(ctx, args).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(tool = %name, elapsed_ms, "Tool call completed"),
            Err(e) => warn!(tool = %name, elapsed_ms, error = %e, "Tool call failed"),
        }

        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_not_found() {
        let registry = ToolRegistry::new();
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_auto_registration_finds_every_tool() {
        let registry = ToolRegistry::with_all_tools();
        assert_eq!(registry.len(), 8);
        assert!(registry.get("create_or_update_file").is_some());
        assert_eq!(registry.tools_in_category(ToolCategory::MergeRequests).len(), 2);
    }
}
