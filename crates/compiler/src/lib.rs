//! # Compiler
//!
//! Turns the declared step graph into a [`PipelineTemplate`].
//!
//! Responsibilities:
//! - Declare the step components and the two-node training graph
//! - Resolve each node's capability to an executable via [`StepRegistry`]
//! - Check parameter and artifact wiring, then emit the template

pub mod component;
pub mod compiler;
pub mod error;
pub mod graph;
pub mod registry;

pub use component::{ComponentDecl, Placeholder};
pub use compiler::Compiler;
pub use contracts::PipelineTemplate;
pub use error::{CompileError, Result};
pub use graph::{training_pipeline, InputSource, PipelineDefinition, TaskNode};
pub use registry::{StepExecutor, StepRegistry};
