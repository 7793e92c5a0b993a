use std::path::{Path, PathBuf};
use std::process::Command;
use log::{info, warn};
use pipe_script::{Interpreter, Invocation, Script};
use crate::error::{WorkflowError, WorkflowResult};

/// A script written into the working directory
#[derive(Debug,Clone)]
pub struct InstalledScript {
    name:String,
    path:PathBuf,
    interpreter:Interpreter,
}

/// Writes generated scripts into the working directory and runs them there
#[derive(Debug,Clone)]
pub struct StageRunner {
    work_dir:PathBuf,
}

impl StageRunner {
    pub fn new(work_dir:&Path) -> WorkflowResult<Self> {
        Ok(Self {
            work_dir:work_dir.canonicalize()?,
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// write the script next to the data and make it executable
    pub fn install(&self,script:&Script) -> WorkflowResult<InstalledScript> {
        let path = self.work_dir.join(script.name());
        utils::write_to_file(&path,&script.print())?;
        utils::make_executable(&path)?;
        info!("wrote {:?}",path);
        Ok(InstalledScript {
            name:script.name().to_string(),
            path,
            interpreter:script.interpreter(),
        })
    }

    /// run an installed script with its interpreter from PATH, inside the working directory
    pub fn execute(&self,script:&InstalledScript,args:&[&str]) -> WorkflowResult<()> {
        let mut cmd = Command::new(script.interpreter.program());
        cmd.arg(&script.path);
        cmd.args(args);
        cmd.current_dir(&self.work_dir);
        let status = cmd.status().map_err(|e| WorkflowError::ExternalExecutionFailure{
            script:script.name.clone(),
            reason:format!("cannot launch {}: {}",script.interpreter.program(),e),
        })?;
        match status.success() {
            true => Ok(()),
            false => Err(WorkflowError::ExternalExecutionFailure{script:script.name.clone(),reason:status.to_string()})
        }
    }

    pub fn install_and_run(&self,script:&Script,args:&[&str]) -> WorkflowResult<()> {
        let installed = self.install(script)?;
        self.execute(&installed,args)
    }

    /// Run a program directly. A failure is only reported.
    pub fn launch_viewer(&self,invocation:&Invocation) {
        let args:Vec<String> = invocation.args().map(|t| t.to_string()).collect();
        let result = Command::new(invocation.program()).args(&args).current_dir(&self.work_dir).status();
        match result {
            Ok(status) if status.success() => {},
            Ok(status) => warn!("{} exited with {}",invocation.program(),status),
            Err(e) => warn!("cannot launch {}: {}",invocation.program(),e),
        }
    }
}
