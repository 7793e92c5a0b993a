//! Parallel per-plane reconstruction, invoked through the generated `recon.sh`

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use log::{debug, error, info};
use rayon::prelude::*;
use crate::error::{WorkflowError, WorkflowResult};
use crate::progress::Progress;

#[derive(Debug,Clone)]
pub struct DriverSettings {
    /// directory holding one file per plane
    pub input_dir:PathBuf,
    /// directory the template writes reconstructed planes into
    pub output_dir:PathBuf,
    /// executable run once per plane with the plane path as its only argument
    pub template:PathBuf,
    /// worker count, 0 for one per core
    pub workers:usize,
}

fn report_progress(output_dir:&Path,total:usize) {
    let p = Progress::new(utils::count_files(output_dir),total);
    let mut err = io::stderr();
    // progress is cosmetic
    if let Err(e) = write!(err,"{}\r",p.render()).and_then(|_| err.flush()) {
        debug!("cannot draw progress: {}",e);
    }
}

fn reconstruct_plane(template:&Path,plane:&Path) -> Result<(),String> {
    match Command::new(template).arg(plane).status() {
        Ok(status) => match status.success() {
            true => Ok(()),
            false => Err(format!("{:?} exited with {}",template,status)),
        },
        Err(e) => Err(format!("cannot launch {:?}: {}",template,e)),
    }
}

/// Run the template on every plane of the input directory using a pool of workers. Fails when
/// any plane could not be reconstructed.
pub fn run(settings:&DriverSettings) -> WorkflowResult<()> {
    let planes = utils::list_files(&settings.input_dir)?;
    let total = planes.len();
    info!("reconstructing {} planes from {:?}",total,settings.input_dir);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(settings.workers).build()?;
    let failures:Vec<PathBuf> = pool.install(||{
        planes.par_iter().filter_map(|plane|{
            report_progress(&settings.output_dir,total);
            match reconstruct_plane(&settings.template,plane) {
                Ok(_) => None,
                Err(reason) => {
                    error!("plane {:?} failed: {}",plane,reason);
                    Some(plane.clone())
                }
            }
        }).collect()
    });
    report_progress(&settings.output_dir,total);
    eprintln!();

    match failures.is_empty() {
        true => {
            info!("all {} planes reconstructed",total);
            Ok(())
        }
        false => Err(WorkflowError::PlanesFailed{failed:failures.len(),total})
    }
}
