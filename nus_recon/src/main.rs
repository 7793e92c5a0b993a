use std::path::Path;
use clap::Parser;
use log::error;
use bruker::AcquisitionParameters;
use nus_recon::generate;
use nus_recon::args::{Action, DriveArgs, NusReconArgs, ParamsArgs, StageArgs};
use nus_recon::recon_driver::{self, DriverSettings};
use nus_recon::workflow;
use nus_recon::{Stage, WorkflowConfig, WorkflowResult};

fn main() {
    let args = NusReconArgs::parse();
    let level = if args.quiet { "error" } else { "info" };

    env_logger::Builder::new()
        .filter_level(level.parse().unwrap_or(log::LevelFilter::Info))
        .format_target(false)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    let stages = args.action.stages();
    let result = match args.action {
        Action::Conv(a) | Action::PhaseCheck(a) | Action::Recon(a) | Action::Ft23(a) => run_stages(&a,&stages),
        Action::Drive(a) => drive(&a),
        Action::Params(a) => params(&a),
        Action::Status => status(),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run_stages(args:&StageArgs,stages:&[Stage]) -> WorkflowResult<()> {
    let work_dir = std::env::current_dir()?;
    let exe = std::env::current_exe()?;
    workflow::run_stages(&work_dir,&args.overrides(),stages,&exe,!args.no_view)
}

fn drive(args:&DriveArgs) -> WorkflowResult<()> {
    recon_driver::run(&DriverSettings {
        input_dir:args.input_dir.clone(),
        output_dir:args.output.clone(),
        template:args.template.clone(),
        workers:args.proc.unwrap_or(0),
    })
}

fn params(args:&ParamsArgs) -> WorkflowResult<()> {
    let saved = WorkflowConfig::load(&std::env::current_dir()?)?;
    let dir = args.dir.clone().unwrap_or(saved.data_dir());
    let mut p = AcquisitionParameters::load(&dir)?;
    p.resolve_sample_count(args.nsamples.or(saved.nsamples))?;
    println!("{}",serde_json::to_string_pretty(&p)?);
    Ok(())
}

fn status() -> WorkflowResult<()> {
    let work_dir = std::env::current_dir()?;
    let state_file = WorkflowConfig::state_file(&work_dir);
    let c = WorkflowConfig::load(&work_dir)?;
    print_status(&state_file,&c);
    print_artifacts(&work_dir)?;
    Ok(())
}

fn print_artifacts(work_dir:&Path) -> WorkflowResult<()> {
    let nuslist_used = work_dir.join(generate::NUSLIST_USED);
    if nuslist_used.exists() {
        println!("sample list in use: {} points",utils::count_lines(&nuslist_used)?);
    }
    match utils::get_all_matches(work_dir,"*.com") {
        Some(scripts) => {
            println!("generated scripts:");
            for s in scripts {
                println!("\t{:?}",s);
            }
        }
        None => println!("no scripts generated yet"),
    }
    Ok(())
}

fn print_status(state_file:&Path,c:&WorkflowConfig) {
    println!("state file: {:?} (exists: {})",state_file,state_file.exists());
    println!("data directory: {:?}",c.data_dir());
    println!("phase: p0 {} p1 {}  extract left half: {}",c.phase0,c.phase1,c.extend);
    println!("samples: {}",c.nsamples.map(|n| n.to_string()).unwrap_or(String::from("all")));
    println!("point counts: {:?}  iterations: {}  workers: {}",c.point_counts(),c.iterations(),c.workers());
    println!("triple resolution: {}",c.triple_rez);
    println!("converted: {}",c.stage.converted());
    println!("phased: {}",c.stage.phased());
    println!("reconstructed: {}",c.stage.reconstructed());
    println!("transformed: {}",c.stage.transformed());
}
