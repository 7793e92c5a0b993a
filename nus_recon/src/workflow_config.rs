use std::path::{Path, PathBuf};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use toml;
use crate::error::{WorkflowError, WorkflowResult};
use crate::stage::WorkflowStage;

/// name of the workflow state file kept in the working directory (extension added by `file_ext`)
pub const STATE_FILE_STEM:&str = ".nus_recon";
pub const CONFIG_VERSION:u32 = 1;
pub const DEFAULT_ITERATIONS:u32 = 250;

pub trait Config {
    fn default() -> Self;
}

pub trait ConfigFile: Sized {
    fn to_file(&self, filename:&Path) -> WorkflowResult<()>;
    fn from_file(filename:&Path) -> WorkflowResult<Self>;
    fn file_ext() -> String;
}

/// Point count targets handed to the reconstruction program
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum PointCounts {
    /// let the reconstruction pick its own sizes
    Auto,
    Explicit{x_n:u32,y_n:u32},
}

/// Parameters and progress that survive between invocations
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct WorkflowConfig {
    pub version:u32,
    pub data_dir:Option<PathBuf>,
    pub phase0:f64,
    pub phase1:f64,
    pub nsamples:Option<usize>,
    pub extend:bool,
    pub itr:Option<u32>,
    pub x_n:Option<u32>,
    pub y_n:Option<u32>,
    /// worker count for the reconstruction driver, 0 or unset uses every core
    pub proc:Option<usize>,
    pub triple_rez:bool,
    pub stage:WorkflowStage,
}

impl Config for WorkflowConfig {
    fn default() -> Self {
        Self {
            version:CONFIG_VERSION,
            data_dir:None,
            phase0:0.0,
            phase1:0.0,
            nsamples:None,
            extend:true,
            itr:None,
            x_n:None,
            y_n:None,
            proc:None,
            triple_rez:false,
            stage:WorkflowStage::Init,
        }
    }
}

impl ConfigFile for WorkflowConfig {
    fn to_file(&self, filename:&Path) -> WorkflowResult<()> {
        let t = toml::to_string(&self)?;
        utils::write_to_file(&filename.with_extension(Self::file_ext()),&t)?;
        Ok(())
    }

    fn from_file(filename:&Path) -> WorkflowResult<Self> {
        let path = filename.with_extension(Self::file_ext());
        let t = utils::read_to_string(&path)?;
        let c:Self = toml::from_str(&t).map_err(|source| WorkflowError::CorruptStateFile{path:path.clone(),source})?;
        match c.version > CONFIG_VERSION {
            true => Err(WorkflowError::UnsupportedStateVersion{path,found:c.version,supported:CONFIG_VERSION}),
            false => Ok(c)
        }
    }

    fn file_ext() -> String {
        String::from("toml")
    }
}

impl WorkflowConfig {
    /// path of the state file in a working directory
    pub fn state_file(work_dir:&Path) -> PathBuf {
        work_dir.join(STATE_FILE_STEM).with_extension(Self::file_ext())
    }

    /// saved state of a working directory, or defaults on the first run
    pub fn load(work_dir:&Path) -> WorkflowResult<Self> {
        let path = Self::state_file(work_dir);
        match path.exists() {
            true => Self::from_file(&path),
            false => {
                info!("no saved workflow state in {:?}, starting fresh",work_dir);
                Ok(<Self as Config>::default())
            }
        }
    }

    pub fn save(&self,work_dir:&Path) -> WorkflowResult<()> {
        self.to_file(&Self::state_file(work_dir))
    }

    /// New record with every supplied override applied on top of this one
    pub fn merge(&self,overrides:&Overrides) -> Self {
        let mut next = self.clone();
        if let Some(dir) = &overrides.data_dir {
            next.data_dir = Some(dir.clone());
        }
        if let Some(p0) = overrides.phase0 {
            next.phase0 = p0;
        }
        if let Some(p1) = overrides.phase1 {
            next.phase1 = p1;
        }
        if let Some(n) = overrides.nsamples {
            next.nsamples = Some(n);
        }
        if let Some(ext) = overrides.extend {
            next.extend = ext;
        }
        if let Some(itr) = overrides.itr {
            next.itr = Some(itr);
        }
        if let Some(proc) = overrides.proc {
            next.proc = Some(proc);
        }
        if let Some(triple_rez) = overrides.triple_rez {
            next.triple_rez = triple_rez;
        }
        let counts = overrides.point_counts().unwrap_or_else(|e|{
            warn!("{}, falling back to automatic point counts",e);
            Some(PointCounts::Auto)
        });
        match counts {
            Some(PointCounts::Auto) => {
                next.x_n = None;
                next.y_n = None;
            }
            Some(PointCounts::Explicit{x_n,y_n}) => {
                next.x_n = Some(x_n);
                next.y_n = Some(y_n);
            }
            None => {}
        }
        next
    }

    /// copy of this record at a new workflow stage
    pub fn with_stage(&self,stage:WorkflowStage) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or(PathBuf::from("."))
    }

    pub fn iterations(&self) -> u32 {
        self.itr.unwrap_or(DEFAULT_ITERATIONS)
    }

    pub fn workers(&self) -> usize {
        self.proc.unwrap_or(0)
    }

    pub fn point_counts(&self) -> PointCounts {
        match (self.x_n,self.y_n) {
            (Some(x_n),Some(y_n)) => PointCounts::Explicit{x_n,y_n},
            _ => PointCounts::Auto,
        }
    }
}

/// Values supplied on the command line for one invocation. `None` keeps the saved value.
#[derive(Clone,Debug,Default,PartialEq)]
pub struct Overrides {
    pub data_dir:Option<PathBuf>,
    pub phase0:Option<f64>,
    pub phase1:Option<f64>,
    pub nsamples:Option<usize>,
    pub extend:Option<bool>,
    pub itr:Option<u32>,
    pub x_n:Option<u32>,
    pub y_n:Option<u32>,
    pub auto_n:bool,
    pub proc:Option<usize>,
    pub triple_rez:Option<bool>,
}

impl Overrides {
    /// requested point count mode, `None` when nothing was asked for
    pub fn point_counts(&self) -> WorkflowResult<Option<PointCounts>> {
        if self.auto_n {
            return Ok(Some(PointCounts::Auto))
        }
        match (self.x_n,self.y_n) {
            (Some(x_n),Some(y_n)) => Ok(Some(PointCounts::Explicit{x_n,y_n})),
            (None,None) => Ok(None),
            (Some(_),None) => Err(WorkflowError::InvalidParameterCombination(String::from("xN given without yN"))),
            (None,Some(_)) => Err(WorkflowError::InvalidParameterCombination(String::from("yN given without xN"))),
        }
    }
}
