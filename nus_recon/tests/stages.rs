#![cfg(unix)]

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;
use nus_recon::generate;
use nus_recon::runner::StageRunner;
use nus_recon::workflow::{self, Workflow};
use nus_recon::{Overrides, Stage, WorkflowConfig, WorkflowError, WorkflowStage};
use common::{config_for, write_data_set};

const TOOLS:[&str;7] = ["bruk2pipe","nmrPipe","pipe2xyz","xyz2pipe","phf2pipe","hmsIST","proj3D.tcl"];

/// A tool fails when `fail_<tool>` exists in the directory it runs in. When `replace_state`
/// exists it also puts a directory where the state file goes.
const TOOL:&str = "#!/bin/sh
if [ -e replace_state ]; then rm -f .nus_recon.toml; mkdir -p .nus_recon.toml; fi
if [ -e \"fail_$(basename \"$0\")\" ]; then exit 1; fi
exit 0
";

fn write_stub(path:&Path,body:&str) {
    fs::write(path,body).unwrap();
    utils::make_executable(path).unwrap();
}

/// Stand-ins for the nmrPipe tools, first on PATH for every test in this file. csh scripts are
/// handed to sh.
fn install_tools() {
    static TOOL_DIR:OnceLock<TempDir> = OnceLock::new();
    TOOL_DIR.get_or_init(||{
        let dir = tempfile::tempdir().unwrap();
        for name in TOOLS {
            write_stub(&dir.path().join(name),TOOL);
        }
        write_stub(&dir.path().join("csh"),"#!/bin/sh\nexec /bin/sh \"$@\"\n");
        let path = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH",format!("{}:{}",dir.path().display(),path));
        dir
    });
}

/// program the driver calls back into; records its arguments and exits with `code`
fn driver_exe(dir:&Path,code:i32) -> PathBuf {
    let exe = dir.join("nus_recon_stub");
    write_stub(&exe,&format!("#!/bin/sh\necho \"$@\" > driver.args\nexit {}\n",code));
    exe
}

fn make_workflow(work_dir:&Path,config:WorkflowConfig,exe:&Path) -> Workflow {
    Workflow::new(config,StageRunner::new(work_dir).unwrap(),exe).with_viewer(false)
}

#[test]
fn stages_advance_when_their_scripts_succeed(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    write_data_set(data.path(),16,6,5);
    let mut wf = make_workflow(work.path(),config_for(data.path(),WorkflowStage::Init),&driver_exe(bin.path(),0));

    wf.run(Stage::Conversion).unwrap();
    assert_eq!(wf.config().stage,WorkflowStage::Converted);
    assert!(work.path().join(generate::CONVERSION_SCRIPT).exists());

    wf.run(Stage::PhaseCheck).unwrap();
    assert_eq!(wf.config().stage,WorkflowStage::Phased);
    assert!(work.path().join(generate::PHASE_CHECK_OUTPUT).exists());

    wf.run_all(&[Stage::Prepare,Stage::Reconstruction]).unwrap();
    assert_eq!(wf.config().stage,WorkflowStage::Reconstructed);
    let args = fs::read_to_string(work.path().join("driver.args")).unwrap();
    assert_eq!(args,"drive --proc 0 --template ./ist.com --output yzx_ist yzx/\n");
    assert_eq!(utils::count_lines(&work.path().join(generate::NUSLIST_USED)).unwrap(),16);

    wf.run(Stage::FinalTransform).unwrap();
    assert_eq!(wf.config().stage,WorkflowStage::Transformed);
}

#[test]
fn failed_reorder_leaves_planes_unreconstructed(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    write_data_set(data.path(),16,6,5);
    // the reorder pipeline ends in pipe2xyz
    fs::write(work.path().join("fail_pipe2xyz"),"").unwrap();
    let mut wf = make_workflow(work.path(),config_for(data.path(),WorkflowStage::Phased),&driver_exe(bin.path(),0));

    let r = wf.run(Stage::Reconstruction);
    assert!(matches!(r,Err(WorkflowError::ExternalExecutionFailure{ref script,..}) if script == generate::REORDER_SCRIPT));
    assert!(work.path().join("driver.args").exists());
    assert_eq!(wf.config().stage,WorkflowStage::Phased);
}

#[test]
fn failed_driver_skips_the_reorder(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    write_data_set(data.path(),16,6,5);
    let mut wf = make_workflow(work.path(),config_for(data.path(),WorkflowStage::Phased),&driver_exe(bin.path(),2));

    let r = wf.run(Stage::Reconstruction);
    assert!(matches!(r,Err(WorkflowError::ExternalExecutionFailure{ref script,..}) if script == generate::DRIVER_SCRIPT));
    assert_eq!(wf.config().stage,WorkflowStage::Phased);
}

#[test]
fn failed_conversion_keeps_state(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    write_data_set(data.path(),16,6,5);
    fs::write(work.path().join("fail_pipe2xyz"),"").unwrap();

    let overrides = Overrides{data_dir:Some(data.path().to_owned()),phase0:Some(45.0),..Overrides::default()};
    let r = workflow::run_stages(work.path(),&overrides,&[Stage::Conversion],Path::new("nus_recon"),false);
    assert!(matches!(r,Err(WorkflowError::ExternalExecutionFailure{ref script,..}) if script == generate::CONVERSION_SCRIPT));
    assert!(work.path().join(generate::CONVERSION_SCRIPT).exists());

    let saved = WorkflowConfig::load(work.path()).unwrap();
    assert_eq!(saved.stage,WorkflowStage::Init);
    assert_eq!(saved.data_dir(),data.path());
    assert_eq!(saved.phase0,45.0);
}

#[test]
fn stage_failure_outlives_a_failed_save(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    write_data_set(data.path(),16,6,5);
    fs::write(work.path().join("fail_pipe2xyz"),"").unwrap();
    fs::write(work.path().join("replace_state"),"").unwrap();

    let overrides = Overrides{data_dir:Some(data.path().to_owned()),..Overrides::default()};
    let r = workflow::run_stages(work.path(),&overrides,&[Stage::Conversion],Path::new("nus_recon"),false);
    assert!(WorkflowConfig::state_file(work.path()).is_dir());
    assert!(matches!(r,Err(WorkflowError::ExternalExecutionFailure{ref script,..}) if script == generate::CONVERSION_SCRIPT));
}

#[test]
fn save_failure_is_reported_after_success(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    write_data_set(data.path(),16,6,5);
    fs::write(work.path().join("replace_state"),"").unwrap();

    let overrides = Overrides{data_dir:Some(data.path().to_owned()),..Overrides::default()};
    let r = workflow::run_stages(work.path(),&overrides,&[Stage::Conversion],Path::new("nus_recon"),false);
    assert!(matches!(r,Err(WorkflowError::Io(_))));
}

#[test]
fn triple_resolution_overrides_schemes(){
    install_tools();
    let data = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    // States in both indirect dimensions
    write_data_set(data.path(),16,4,4);
    let script = work.path().join(generate::FINAL_TRANSFORM_SCRIPT);
    let exe = Path::new("nus_recon");

    let mut wf = make_workflow(work.path(),config_for(data.path(),WorkflowStage::Reconstructed),exe);
    wf.run(Stage::FinalTransform).unwrap();
    let plain = fs::read_to_string(&script).unwrap();
    assert_eq!(plain.matches("-fn FT -verb").count(),2);

    let c = config_for(data.path(),WorkflowStage::Reconstructed).merge(&Overrides{triple_rez:Some(true),..Overrides::default()});
    let mut wf = make_workflow(work.path(),c,exe);
    wf.run(Stage::FinalTransform).unwrap();
    assert_eq!(wf.config().stage,WorkflowStage::Transformed);
    let triple = fs::read_to_string(&script).unwrap();
    let neg = triple.find("-fn FT -neg -verb").unwrap();
    let alt = triple.find("-fn FT -alt -verb").unwrap();
    assert!(neg < alt);
}
