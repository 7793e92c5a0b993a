use std::fs::{copy, create_dir_all};
use std::path::{Path, PathBuf};
use log::{error, info};
use bruker::{AcquisitionParameters, DataSet, NusList};
use crate::error::WorkflowResult;
use crate::generate::{self, DirectProcessing};
use crate::runner::StageRunner;
use crate::stage::Stage;
use crate::workflow_config::{Overrides, WorkflowConfig};

/// Runs workflow stages against one working directory, keeping the merged configuration and
/// the workflow state up to date
pub struct Workflow {
    config:WorkflowConfig,
    runner:StageRunner,
    /// program the reconstruction driver calls back into
    exe:PathBuf,
    view:bool,
}

impl Workflow {
    pub fn new(config:WorkflowConfig,runner:StageRunner,exe:&Path) -> Self {
        Self {
            config,
            runner,
            exe:exe.to_owned(),
            view:true,
        }
    }

    /// open the viewer after a phase check
    pub fn with_viewer(mut self,view:bool) -> Self {
        self.view = view;
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run one stage. Nothing is generated when the stage's precondition does not hold, and the
    /// workflow state only advances when the stage succeeded.
    pub fn run(&mut self,stage:Stage) -> WorkflowResult<()> {
        self.config.stage.check(stage)?;
        let result = match stage {
            Stage::Conversion => self.convert(),
            Stage::PhaseCheck => self.phase_check(),
            Stage::Prepare => self.prepare(),
            Stage::Reconstruction => self.reconstruct(),
            Stage::FinalTransform => self.final_transform(),
        };
        let next = self.config.stage.advance(stage,result)?;
        self.config = self.config.with_stage(next);
        Ok(())
    }

    /// run stages in order, stopping at the first failure
    pub fn run_all(&mut self,stages:&[Stage]) -> WorkflowResult<()> {
        for stage in stages {
            self.run(*stage)?;
        }
        Ok(())
    }

    fn convert(&self) -> WorkflowResult<()> {
        let mut params = AcquisitionParameters::load(&self.config.data_dir())?;
        let z_n = params.resolve_sample_count(self.config.nsamples)?;
        info!("z dimension has {} sampled points",z_n);
        info!("Converting Bruker data to nmrPipe format ({})",generate::CONVERSION_SCRIPT);
        self.runner.install_and_run(&generate::conversion(&params),&[])
    }

    fn phase_check(&self) -> WorkflowResult<()> {
        info!("FT along the direct dimension of the first plane ({})",generate::PHASE_CHECK_SCRIPT);
        let script = generate::phase_check(&DirectProcessing::from(&self.config));
        self.runner.install_and_run(&script,&[])?;
        if self.view {
            self.runner.launch_viewer(&generate::viewer());
        }
        Ok(())
    }

    fn prepare(&self) -> WorkflowResult<()> {
        info!("FT along the direct dimension of every plane ({})",generate::PREPARE_SCRIPT);
        let script = generate::prepare(&DirectProcessing::from(&self.config));
        self.runner.install_and_run(&script,&[])
    }

    /// copy the acquired sample list and write the one the reconstruction reads
    fn write_sample_lists(&self) -> WorkflowResult<()> {
        let source = DataSet::new(&self.config.data_dir()).nuslist;
        let work = self.runner.work_dir();
        let list = NusList::open(&source)?;
        copy(&source,work.join(generate::NUSLIST_COPY))?;
        match self.config.nsamples {
            Some(n) => {
                info!("using the first {} of {} sampled points",n,list.n_samples());
                utils::write_to_file(&work.join(generate::NUSLIST_USED),&list.truncated(n)?.to_txt())?;
            }
            None => {
                copy(&source,work.join(generate::NUSLIST_USED))?;
            }
        }
        Ok(())
    }

    fn reconstruct(&self) -> WorkflowResult<()> {
        self.write_sample_lists()?;
        let ist_dir = self.runner.work_dir().join(generate::IST_DIR);
        if !ist_dir.exists() {
            create_dir_all(&ist_dir)?;
        }
        let scripts = generate::reconstruction(&self.exe,&self.config);
        self.runner.install(&scripts.ist)?;
        let reorder = self.runner.install(&scripts.reorder)?;
        let driver = self.runner.install(&scripts.driver)?;
        info!("Reconstructing planes with hmsIST ({})",generate::DRIVER_SCRIPT);
        let planes = format!("{}/",generate::YZX_DIR);
        self.runner.execute(&driver,&[planes.as_str()])?;
        info!("Collecting reconstructed planes ({})",generate::REORDER_SCRIPT);
        self.runner.execute(&reorder,&[])
    }

    fn final_transform(&self) -> WorkflowResult<()> {
        let params = AcquisitionParameters::load(&self.config.data_dir())?;
        let (y,z) = generate::ft_variants(self.config.triple_rez,params.y.scheme,params.z.scheme);
        info!("FT along the indirect dimensions ({})",generate::FINAL_TRANSFORM_SCRIPT);
        self.runner.install_and_run(&generate::final_transform(y,z),&[])
    }
}

/// Run stages for one invocation in `work_dir`. The saved record only takes on this
/// invocation's overrides when the first stage may run at all. The record is saved afterwards,
/// also when a stage failed.
pub fn run_stages(work_dir:&Path,overrides:&Overrides,stages:&[Stage],exe:&Path,view:bool) -> WorkflowResult<()> {
    // a corrupt state file is reported and left alone
    let saved = WorkflowConfig::load(work_dir)?;
    if let Some(first) = stages.first() {
        if let Err(e) = saved.stage.check(*first) {
            saved.save(work_dir)?;
            return Err(e);
        }
    }

    let mut workflow = Workflow::new(saved.merge(overrides),StageRunner::new(work_dir)?,exe).with_viewer(view);
    let result = workflow.run_all(stages);
    let persisted = workflow.config().save(work_dir);
    info!("workflow state: {}",workflow.config().stage);
    if let (Err(_),Err(e)) = (&result,&persisted) {
        error!("cannot save workflow state: {}",e);
    }
    result.and(persisted)
}
