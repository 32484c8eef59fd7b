//! Step registry
//!
//! Resolves a named capability to the container executable that provides it.

use std::collections::BTreeMap;

use contracts::{StepCapability, StepConfig};
use tracing::debug;

use crate::error::{CompileError, Result};

/// Concrete executable for a capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepExecutor {
    pub image: String,
    pub command: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Capability -> executable lookup table
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    executors: BTreeMap<StepCapability, StepExecutor>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration entries
    ///
    /// # Errors
    /// `DuplicateCapability` if two entries provide the same capability
    pub fn from_config(steps: &[StepConfig]) -> Result<Self> {
        let mut registry = Self::new();
        for step in steps {
            let executor = StepExecutor {
                image: step.image.clone(),
                command: step.command.clone(),
                env: step.env.clone(),
            };
            if registry.register(step.capability, executor).is_some() {
                return Err(CompileError::DuplicateCapability {
                    capability: step.capability,
                });
            }
        }
        Ok(registry)
    }

    /// Register an executor, returning the one it replaced
    pub fn register(
        &mut self,
        capability: StepCapability,
        executor: StepExecutor,
    ) -> Option<StepExecutor> {
        debug!(%capability, image = %executor.image, "registering step");
        self.executors.insert(capability, executor)
    }

    /// Resolve a capability
    pub fn resolve(&self, capability: StepCapability) -> Result<&StepExecutor> {
        self.executors
            .get(&capability)
            .ok_or(CompileError::UnresolvedCapability { capability })
    }

    /// Registered capabilities in stable order
    pub fn capabilities(&self) -> impl Iterator<Item = StepCapability> + '_ {
        self.executors.keys().copied()
    }
}
