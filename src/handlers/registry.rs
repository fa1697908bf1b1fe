// src/handlers/registry.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{FleetError, Result};
use crate::handlers::context::{HandlerOutput, TaskContext};

/// A named, schedulable unit of work.
///
/// Handlers are synchronous and run on the blocking thread pool. An `Err`
/// (or a panic) is a failed attempt, which the scheduler retries according
/// to the task's retry policy.
pub trait Handler: Send + Sync {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput>;
}

impl<F> Handler for F
where
    F: Fn(&TaskContext) -> anyhow::Result<HandlerOutput> + Send + Sync,
{
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        self(ctx)
    }
}

/// Maps symbolic handler names to implementations.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Arc<dyn Handler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in handlers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, handler) in crate::handlers::builtin::all() {
            // Built-in names are distinct constants.
            registry.handlers.insert(name.to_string(), handler);
        }
        registry
    }

    /// Register a handler under `name`. Names must be unique.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn Handler>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FleetError::Config("handler name must not be empty".into()));
        }
        if self.handlers.contains_key(&name) {
            return Err(FleetError::Config(format!(
                "handler '{name}' is already registered"
            )));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Handler>> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| FleetError::UnknownHandler(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Known handler names, sorted. Used to validate schedule documents.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}
