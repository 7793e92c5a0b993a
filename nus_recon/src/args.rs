use clap;
use std::path::PathBuf;
use crate::stage::Stage;
use crate::workflow_config::Overrides;

#[derive(clap::Parser,Debug)]
#[command(name = "nus_recon", about = "hmsIST reconstruction of non-uniformly sampled Bruker 3D data")]
pub struct NusReconArgs {
    #[command(subcommand)]
    pub action: Action,
    /// only log errors
    #[clap(short, long, global = true)]
    pub quiet: bool,
}

#[derive(clap::Subcommand,Debug)]
pub enum Action {
    /// convert the Bruker data to nmrPipe format (fid.com)
    Conv(StageArgs),
    /// FT the first plane along the direct dimension to check its phase (ft1xyz.com)
    PhaseCheck(StageArgs),
    /// FT every plane along the direct dimension, then reconstruct with hmsIST
    Recon(StageArgs),
    /// FT along the indirect dimensions to produce the final spectrum (ft23.com)
    Ft23(StageArgs),
    /// reconstruct every plane of a directory in parallel. Called by the generated recon.sh
    Drive(DriveArgs),
    /// print the acquisition parameters read from the Bruker data as json
    Params(ParamsArgs),
    /// print the saved workflow settings and progress
    Status,
}

impl Action {
    /// workflow stages run for this action, in order
    pub fn stages(&self) -> Vec<Stage> {
        match self {
            Action::Conv(_) => vec![Stage::Conversion],
            Action::PhaseCheck(_) => vec![Stage::PhaseCheck],
            Action::Recon(_) => vec![Stage::Prepare,Stage::Reconstruction],
            Action::Ft23(_) => vec![Stage::FinalTransform],
            _ => vec![],
        }
    }
}

#[derive(clap::Args,Debug)]
pub struct StageArgs {
    /// directory holding the Bruker data set (defaults to the saved directory, then the current one)
    #[clap(long)]
    pub dir:Option<PathBuf>,
    /// number of sampled points to use from the sample list
    #[clap(long)]
    pub nsamples:Option<usize>,
    /// zero order phase correction of the direct dimension
    #[clap(long, allow_negative_numbers = true)]
    pub phase0:Option<f64>,
    /// first order phase correction of the direct dimension
    #[clap(long, allow_negative_numbers = true)]
    pub phase1:Option<f64>,
    /// keep only the left half of the direct dimension
    #[clap(long, conflicts_with = "no_ext")]
    pub ext:bool,
    /// keep the full direct dimension
    #[clap(long)]
    pub no_ext:bool,
    /// number of reconstruction workers, 0 for one per core
    #[clap(long)]
    pub proc:Option<usize>,
    /// hmsIST iterations (defaults to 250)
    #[clap(long)]
    pub itr:Option<u32>,
    /// hmsIST x point count, requires --yN
    #[clap(long = "xN")]
    pub x_n:Option<u32>,
    /// hmsIST y point count, requires --xN
    #[clap(long = "yN")]
    pub y_n:Option<u32>,
    /// let hmsIST choose the point counts
    #[clap(long = "autoN")]
    pub auto_n:bool,
    /// the data was acquired with the triple resolution scheme
    #[clap(long, conflicts_with = "no_triple_rez")]
    pub triple_rez:bool,
    #[clap(long)]
    pub no_triple_rez:bool,
    /// don't open nmrDraw after the phase check
    #[clap(long)]
    pub no_view:bool,
}

fn flag_pair(on:bool,off:bool) -> Option<bool> {
    match (on,off) {
        (true,_) => Some(true),
        (false,true) => Some(false),
        (false,false) => None,
    }
}

impl StageArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir:self.dir.clone(),
            phase0:self.phase0,
            phase1:self.phase1,
            nsamples:self.nsamples,
            extend:flag_pair(self.ext,self.no_ext),
            itr:self.itr,
            x_n:self.x_n,
            y_n:self.y_n,
            auto_n:self.auto_n,
            proc:self.proc,
            triple_rez:flag_pair(self.triple_rez,self.no_triple_rez),
        }
    }
}

#[derive(clap::Args,Debug)]
pub struct DriveArgs {
    /// directory of planes to reconstruct
    pub input_dir:PathBuf,
    /// script run once per plane
    #[clap(long)]
    pub template:PathBuf,
    /// directory the template writes into, watched for progress
    #[clap(long)]
    pub output:PathBuf,
    #[clap(long)]
    pub proc:Option<usize>,
}

#[derive(clap::Args,Debug)]
pub struct ParamsArgs {
    /// directory holding the Bruker data set (defaults to the saved directory)
    #[clap(long)]
    pub dir:Option<PathBuf>,
    /// number of sampled points to use from the sample list
    #[clap(long)]
    pub nsamples:Option<usize>,
}
