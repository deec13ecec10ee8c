//! Tool ownership table
//!
//! Holds the authoritative mapping from tool name to descriptor. Populated
//! once at startup, read-only while serving traffic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::errors::ToolError;

/// Executable side of a tool, supplied by the embedding application.
///
/// `execute` receives exactly the `arguments` object from the request and may
/// take arbitrary time; the dispatcher imposes no timeout and converts any
/// failure into a structured error response.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value, ToolError>;
}

/// A registered capability: identity, advertised parameter schemas, and the
/// operation behind them.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Parameter name to JSON-schema fragment, advertised via `tools/list`.
    pub parameters: Map<String, Value>,
    pub executor: Arc<dyn ToolExecutor>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Map<String, Value>,
        executor: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            executor,
        }
    }
}

/// Wire projection of a descriptor for `tools/list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolListing {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolListing {
    /// Every declared parameter is advertised as required. Optionality is not
    /// expressible in the descriptor, so the full key set is the contract.
    pub fn from_descriptor(descriptor: &ToolDescriptor) -> Self {
        let required: Vec<&String> = descriptor.parameters.keys().collect();

        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            input_schema: json!({
                "type": "object",
                "properties": descriptor.parameters,
                "required": required,
            }),
        }
    }
}

/// Registry of all tools served by this process.
///
/// Registering a name twice silently replaces the earlier descriptor; the
/// name keeps its original position so `tools/list` output stays stable.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    positions: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `descriptor.name`. Last write wins.
    pub fn register(&mut self, descriptor: ToolDescriptor) {
        match self.positions.get(&descriptor.name) {
            Some(&position) => self.tools[position] = descriptor,
            None => {
                self.positions
                    .insert(descriptor.name.clone(), self.tools.len());
                self.tools.push(descriptor);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.positions
            .get(name)
            .map(|&position| &self.tools[position])
    }

    /// All descriptors in registration order.
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}
