pub mod args;
pub mod error;
pub mod generate;
pub mod progress;
pub mod recon_driver;
pub mod runner;
pub mod stage;
pub mod workflow;
pub mod workflow_config;

pub use error::{WorkflowError, WorkflowResult};
pub use stage::{Stage, WorkflowStage};
pub use workflow_config::{Config, ConfigFile, Overrides, PointCounts, WorkflowConfig};
