use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{WorkflowError, WorkflowResult};

/// A step of the processing workflow, in execution order
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Stage {
    Conversion,
    PhaseCheck,
    Prepare,
    Reconstruction,
    FinalTransform,
}

impl Stage {
    /// workflow state that must have been reached before the stage may run
    pub fn requires(&self) -> WorkflowStage {
        match self {
            Stage::Conversion => WorkflowStage::Init,
            Stage::PhaseCheck => WorkflowStage::Converted,
            Stage::Prepare => WorkflowStage::Phased,
            Stage::Reconstruction => WorkflowStage::Phased,
            Stage::FinalTransform => WorkflowStage::Reconstructed,
        }
    }

    /// workflow state reached when the stage succeeds. Prepare only feeds the reconstruction and
    /// records nothing on its own.
    pub fn completes(&self) -> Option<WorkflowStage> {
        match self {
            Stage::Conversion => Some(WorkflowStage::Converted),
            Stage::PhaseCheck => Some(WorkflowStage::Phased),
            Stage::Prepare => None,
            Stage::Reconstruction => Some(WorkflowStage::Reconstructed),
            Stage::FinalTransform => Some(WorkflowStage::Transformed),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self,f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Conversion => write!(f,"conversion"),
            Stage::PhaseCheck => write!(f,"phase check"),
            Stage::Prepare => write!(f,"preparation for reconstruction"),
            Stage::Reconstruction => write!(f,"reconstruction"),
            Stage::FinalTransform => write!(f,"final transform"),
        }
    }
}

/// How far the workflow has progressed. The ordering encodes the completion chain, so a later
/// state always implies every earlier one.
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Serialize,Deserialize)]
pub enum WorkflowStage {
    Init,
    Converted,
    Phased,
    Reconstructed,
    Transformed,
}

impl WorkflowStage {
    pub fn converted(&self) -> bool {
        *self >= WorkflowStage::Converted
    }

    pub fn phased(&self) -> bool {
        *self >= WorkflowStage::Phased
    }

    pub fn reconstructed(&self) -> bool {
        *self >= WorkflowStage::Reconstructed
    }

    pub fn transformed(&self) -> bool {
        *self >= WorkflowStage::Transformed
    }

    pub fn check(&self,stage:Stage) -> WorkflowResult<()> {
        let required = stage.requires();
        match *self >= required {
            true => Ok(()),
            false => Err(WorkflowError::PreconditionNotMet {
                stage,
                required,
                current:*self,
            })
        }
    }

    /// Next state after running a stage. The stage's own precondition is re-checked and a failed
    /// execution result is passed through unchanged, so the state only moves forward on success.
    /// Re-running an earlier stage never moves the state back.
    pub fn advance(self,stage:Stage,result:WorkflowResult<()>) -> WorkflowResult<Self> {
        self.check(stage)?;
        result?;
        Ok(match stage.completes() {
            Some(reached) => self.max(reached),
            None => self,
        })
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self,f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStage::Init => write!(f,"unprocessed"),
            WorkflowStage::Converted => write!(f,"converted"),
            WorkflowStage::Phased => write!(f,"phased"),
            WorkflowStage::Reconstructed => write!(f,"reconstructed"),
            WorkflowStage::Transformed => write!(f,"transformed"),
        }
    }
}
