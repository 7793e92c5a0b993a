//! Script generators for every workflow stage. Each one is a pure function of the acquisition
//! parameters and the workflow settings; writing and running the scripts is left to the runner.

use std::path::Path;
use bruker::{AcqScheme, AcquisitionParameters, Axis};
use pipe_script::{Interpreter, Invocation, Pipeline, Redirect, Script, Token};
use crate::workflow_config::{PointCounts, WorkflowConfig};

pub const CONVERSION_SCRIPT:&str = "fid.com";
pub const PHASE_CHECK_SCRIPT:&str = "ft1xyz.com";
pub const PREPARE_SCRIPT:&str = "ft1yzx.com";
pub const DRIVER_SCRIPT:&str = "recon.sh";
pub const IST_SCRIPT:&str = "ist.com";
pub const REORDER_SCRIPT:&str = "phf2pipe.com";
pub const FINAL_TRANSFORM_SCRIPT:&str = "ft23.com";

pub const FID_DIR:&str = "fid";
pub const YZX_DIR:&str = "yzx";
pub const IST_DIR:&str = "yzx_ist";
pub const REC_DIR:&str = "rec";
pub const PHASE_CHECK_OUTPUT:&str = "data001.dat";
pub const SPECTRUM:&str = "3Dspectrum.dat";
pub const NUSLIST_COPY:&str = "nuslist.copy";
pub const NUSLIST_USED:&str = "nuslist.used";

/// Direct dimension processing shared by the phase check and the preparation step
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct DirectProcessing {
    pub phase0:f64,
    pub phase1:f64,
    pub extend:bool,
}

impl From<&WorkflowConfig> for DirectProcessing {
    fn from(c:&WorkflowConfig) -> Self {
        Self {
            phase0:c.phase0,
            phase1:c.phase1,
            extend:c.extend,
        }
    }
}

/// sign handling applied by the Fourier transform of an indirect axis
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum FtVariant {
    Plain,
    Negate,
    Alternate,
}

impl FtVariant {
    pub fn for_scheme(scheme:AcqScheme) -> Self {
        match scheme {
            AcqScheme::EchoAntiecho => FtVariant::Negate,
            AcqScheme::StatesTPPI => FtVariant::Alternate,
            _ => FtVariant::Plain,
        }
    }

    fn invocation(&self) -> Invocation {
        let ft = Invocation::nmr_pipe("FT");
        let ft = match self {
            FtVariant::Plain => ft,
            FtVariant::Negate => ft.switch("neg"),
            FtVariant::Alternate => ft.switch("alt"),
        };
        ft.switch("verb")
    }
}

/// FT variants for the y and z axes. Triple resolution data always uses negate then alternate.
pub fn ft_variants(triple_rez:bool,y:AcqScheme,z:AcqScheme) -> (FtVariant,FtVariant) {
    match triple_rez {
        true => (FtVariant::Negate,FtVariant::Alternate),
        false => (FtVariant::for_scheme(y),FtVariant::for_scheme(z)),
    }
}

/// one converter argument per axis, right-aligned in a fixed column
fn axis_row(inv:Invocation,name:&str,width:usize,value:fn(&Axis) -> Token,axes:[&Axis;3]) -> Invocation {
    let mut inv = inv.wrap();
    for (label,axis) in ["x","y","z"].iter().zip(axes) {
        inv = inv.opt(&format!("{}{}",label,name),value(axis).padded(width));
    }
    inv
}

/// `fid.com`: Bruker serial file to one nmrPipe FID per plane. z N must already be resolved.
pub fn conversion(params:&AcquisitionParameters) -> Script {
    let axes = [&params.x,&params.y,&params.z];
    let bruk2pipe = Invocation::new("bruk2pipe")
        .opt("in",Token::path(&params.data_set.ser))
        .wrap()
        .opt("bad",Token::word("0.0"))
        .switch("ext").switch("aswap").switch("AMX")
        .opt("decim",Token::word(&params.filter.decim))
        .opt("dspfvs",Token::word(&params.filter.dspfvs))
        .opt("grpdly",Token::word(&params.filter.grpdly));
    let bruk2pipe = axis_row(bruk2pipe,"N",16,|a| Token::from(a.n),axes);
    let bruk2pipe = axis_row(bruk2pipe,"T",16,|a| Token::from(a.t),axes);
    let bruk2pipe = axis_row(bruk2pipe,"MODE",13,|a| Token::word(&a.mode),axes);
    let bruk2pipe = axis_row(bruk2pipe,"SW",15,|a| Token::fixed(a.sw),axes);
    let bruk2pipe = axis_row(bruk2pipe,"OBS",14,|a| Token::fixed(a.obs),axes);
    let bruk2pipe = axis_row(bruk2pipe,"CAR",14,|a| Token::fixed(a.car()),axes);
    let bruk2pipe = axis_row(bruk2pipe,"LAB",14,|a| Token::word(&a.label),axes);
    let bruk2pipe = bruk2pipe.wrap().opt("ndim",3i64).opt("aq2D","Complex");

    let pipeline = Pipeline::new(bruk2pipe)
        .pipe_if(params.t2_echo_antiecho,
            Invocation::nmr_pipe("MAC").opt("macro","$NMRTXT/ranceY.M").switch("noRd").switch("noWr"))
        .pipe(Invocation::new("pipe2xyz").switch("x")
            .opt("out",format!("./{}/data%03d.fid",FID_DIR))
            .switch("verb").switch("ov").opt("to",0i64));

    Script::new(CONVERSION_SCRIPT,Interpreter::Csh)
        .comment("hmsIST conversion script for Bruker 3D Data")
        .blank()
        .pipeline(pipeline)
}

fn direct_chain(pipeline:Pipeline,p:&DirectProcessing) -> Pipeline {
    pipeline
        .pipe(Invocation::nmr_pipe("SOL"))
        .pipe(Invocation::nmr_pipe("SP").opt("off",0.5).opt("end",0.98).opt("pow",2i64).opt("c",0.5))
        .pipe(Invocation::nmr_pipe("ZF").switch("auto"))
        .pipe(Invocation::nmr_pipe("FT").switch("verb"))
        .pipe(Invocation::nmr_pipe("PS").opt("p0",p.phase0).opt("p1",p.phase1).switch("di"))
        .pipe_if(p.extend,Invocation::nmr_pipe("EXT").switch("left").switch("sw"))
}

/// `ft1xyz.com`: process the first plane only so the direct dimension phase can be checked
pub fn phase_check(p:&DirectProcessing) -> Script {
    let pipeline = Pipeline::new(Invocation::new("nmrPipe").opt("in",format!("{}/data001.fid",FID_DIR)));
    let pipeline = direct_chain(pipeline,p).stdout(Redirect::Stdout(Token::word(PHASE_CHECK_OUTPUT)));
    Script::new(PHASE_CHECK_SCRIPT,Interpreter::Csh)
        .comment("hmsIST FT along direct dimension for first samples point only")
        .pipeline(pipeline)
}

/// viewer launched on the phase check output
pub fn viewer() -> Invocation {
    Invocation::new("nmrDraw")
        .opt("Ws",1000i64).arg(700i64)
        .opt("position",50i64).arg(50i64)
        .opt("in",PHASE_CHECK_OUTPUT)
}

/// `ft1yzx.com`: transform every plane along x and write them transposed for reconstruction
pub fn prepare(p:&DirectProcessing) -> Script {
    let pipeline = Pipeline::new(Invocation::new("xyz2pipe").opt("in",format!("{}/data%03d.fid",FID_DIR)).switch("x"));
    let pipeline = direct_chain(pipeline,p)
        .pipe(Invocation::new("pipe2xyz").switch("ov").opt("out",format!("{}/data%03d.dat",YZX_DIR)).switch("z"));
    Script::new(PREPARE_SCRIPT,Interpreter::Csh)
        .comment("hmsIST FT along direct dimension for all sample points")
        .pipeline(pipeline)
        .blank()
        .command(Invocation::new("rm").switch("rf").arg(IST_DIR))
        .command(Invocation::new("mkdir").arg(IST_DIR))
}

/// Scripts written for the reconstruction stage
#[derive(Debug,Clone,PartialEq)]
pub struct ReconScripts {
    pub driver:Script,
    pub ist:Script,
    pub reorder:Script,
}

/// `ist.com`: reconstruct the single plane given as its first argument
pub fn ist_template(itr:u32,counts:PointCounts) -> Script {
    let hms = Invocation::new("hmsIST").opt("dim",2i64).opt("incr",1i64);
    let hms = match counts {
        PointCounts::Auto => hms.opt("autoN",1i64),
        PointCounts::Explicit{x_n,y_n} => hms.opt("xN",x_n).opt("yN",y_n),
    };
    let hms = hms.opt("user",1i64).opt("itr",itr).opt("verb",0i64).opt("ref",0i64).opt("vlist",NUSLIST_USED);
    let pipeline = Pipeline::inline(hms)
        .stdin(format!("./{}/${{in}}",YZX_DIR))
        .stdout(Redirect::Clobber(Token::Word(format!("./{}/${{out}}",IST_DIR))));
    Script::new(IST_SCRIPT,Interpreter::Csh)
        .statement("set F = $1")
        .statement("  set in = $F:t")
        .statement("  set out = $F:t:r.phf")
        .blank()
        .pipeline(pipeline)
}

/// `recon.sh`: hands the plane directory to this program's parallel driver
/// single quoted for sh, an embedded quote closes, escapes and reopens
fn sh_quote(s:&str) -> String {
    format!("'{}'",s.replace('\'',"'\\''"))
}

pub fn recon_driver(exe:&Path,workers:usize) -> Script {
    let drive = Invocation::new("exec")
        .arg(Token::Word(sh_quote(&exe.to_string_lossy())))
        .arg("drive")
        .arg("--proc").arg(workers)
        .arg("--template").arg(format!("./{}",IST_SCRIPT))
        .arg("--output").arg(IST_DIR)
        .arg("\"$1\"");
    Script::new(DRIVER_SCRIPT,Interpreter::Sh)
        .comment("reconstruct every plane in the directory given as the first argument")
        .command(drive)
}

/// `phf2pipe.com`: collect the reconstructed planes back into nmrPipe order
pub fn reorder() -> Script {
    let pipeline = Pipeline::inline(Invocation::new("xyz2pipe").opt("in",format!("{}/data%03d.phf",IST_DIR)))
        .pipe(Invocation::new("phf2pipe").opt("user",1i64))
        .pipe(Invocation::new("pipe2xyz").opt("out",format!("{}/data%03d.ft1",REC_DIR)));
    Script::new(REORDER_SCRIPT,Interpreter::Csh)
        .pipeline(pipeline)
}

pub fn reconstruction(exe:&Path,config:&WorkflowConfig) -> ReconScripts {
    ReconScripts {
        driver:recon_driver(exe,config.workers()),
        ist:ist_template(config.iterations(),config.point_counts()),
        reorder:reorder(),
    }
}

fn zero_phase() -> Invocation {
    Invocation::nmr_pipe("PS").opt("p0",Token::word("0.0")).opt("p1",Token::word("0.0")).switch("di")
}

fn indirect_apodize() -> Invocation {
    Invocation::nmr_pipe("SP").opt("off",0.5).opt("end",0.98).opt("pow",2i64).opt("c",0.5)
}

fn baseline() -> Invocation {
    Invocation::nmr_pipe("POLY").switch("auto").opt("ord",1i64)
}

/// `ft23.com`: transform both indirect axes of the reconstructed planes into the final spectrum
pub fn final_transform(y:FtVariant,z:FtVariant) -> Script {
    let pipeline = Pipeline::new(Invocation::new("xyz2pipe").opt("in",format!("{}/data%03d.ft1",REC_DIR)).switch("x"))
        .pipe(indirect_apodize())
        .pipe(Invocation::nmr_pipe("ZF").switch("auto"))
        .pipe(y.invocation())
        .pipe(zero_phase())
        .pipe(Invocation::nmr_pipe("TP"))
        .pipe(indirect_apodize())
        .pipe(Invocation::nmr_pipe("ZF").switch("auto"))
        .pipe(z.invocation())
        .pipe(zero_phase())
        .pipe(baseline())
        .pipe(Invocation::nmr_pipe("TP"))
        .pipe(baseline())
        .pipe(Invocation::nmr_pipe("ZTP"))
        .pipe(baseline())
        .stdout(Redirect::Stdout(Token::word(SPECTRUM)));
    Script::new(FINAL_TRANSFORM_SCRIPT,Interpreter::Csh)
        .comment("hmsIST FT along indirect dimensions")
        .pipeline(pipeline)
        .command(Invocation::new("proj3D.tcl").opt("in",SPECTRUM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow_config::Config;

    fn processing() -> DirectProcessing {
        DirectProcessing{phase0:-12.5,phase1:0.0,extend:true}
    }

    #[test]
    fn phase_check_chain(){
        let s = phase_check(&processing()).print();
        assert!(s.starts_with("#!/bin/csh\n# hmsIST"));
        assert!(s.contains("\nnmrPipe -in fid/data001.fid \\\n| nmrPipe -fn SOL \\\n"));
        assert!(s.contains("| nmrPipe -fn SP -off 0.5 -end 0.98 -pow 2 -c 0.5 \\\n"));
        assert!(s.contains("| nmrPipe -fn PS -p0 -12.5 -p1 0 -di \\\n| nmrPipe -fn EXT -left -sw \\\n> data001.dat\n"));
    }

    #[test]
    fn extraction_is_optional(){
        let p = DirectProcessing{extend:false,..processing()};
        let s = phase_check(&p).print();
        assert!(!s.contains("EXT"));
        assert!(s.contains("-di \\\n> data001.dat"));
        let s = prepare(&p).print();
        assert!(!s.contains("EXT"));
    }

    #[test]
    fn prepare_resets_output_dir(){
        let s = prepare(&processing()).print();
        assert!(s.contains("\nxyz2pipe -in fid/data%03d.fid -x \\\n"));
        assert!(s.contains("| pipe2xyz -ov -out yzx/data%03d.dat -z\n\nrm -rf yzx_ist\nmkdir yzx_ist\n"));
    }

    #[test]
    fn ist_with_auto_point_counts(){
        let s = ist_template(250,PointCounts::Auto).print();
        let expected = "#!/bin/csh\nset F = $1\n  set in = $F:t\n  set out = $F:t:r.phf\n\n\
            hmsIST -dim 2 -incr 1 -autoN 1 -user 1 -itr 250 -verb 0 -ref 0 -vlist nuslist.used < ./yzx/${in} >! ./yzx_ist/${out}\n";
        assert_eq!(s,expected);
    }

    #[test]
    fn ist_with_explicit_point_counts(){
        let s = ist_template(400,PointCounts::Explicit{x_n:128,y_n:64}).print();
        assert!(s.contains("hmsIST -dim 2 -incr 1 -xN 128 -yN 64 -user 1 -itr 400 "));
        assert!(!s.contains("autoN"));
    }

    #[test]
    fn reorder_script(){
        assert_eq!(reorder().print(),"#!/bin/csh\nxyz2pipe -in yzx_ist/data%03d.phf | phf2pipe -user 1 | pipe2xyz -out rec/data%03d.ft1\n");
    }

    #[test]
    fn driver_calls_back_into_this_program(){
        let s = recon_driver(Path::new("/opt/bin/nus_recon"),4).print();
        assert!(s.starts_with("#!/bin/sh\n"));
        assert!(s.contains("exec '/opt/bin/nus_recon' drive --proc 4 --template ./ist.com --output yzx_ist \"$1\"\n"));
    }

    #[test]
    fn driver_path_is_not_expanded_by_the_shell(){
        let s = recon_driver(Path::new("/opt/it's $HOME/`id`/nus_recon"),1).print();
        assert!(s.contains("exec '/opt/it'\\''s $HOME/`id`/nus_recon' drive "));
        assert_eq!(sh_quote("plain"),"'plain'");
    }

    #[test]
    fn reconstruction_uses_saved_settings(){
        let mut c = <WorkflowConfig as Config>::default();
        c.itr = Some(300);
        c.proc = Some(8);
        let r = reconstruction(Path::new("nus_recon"),&c);
        assert!(r.ist.print().contains("-itr 300"));
        assert!(r.driver.print().contains("--proc 8"));
        assert_eq!(r.reorder.name(),REORDER_SCRIPT);
    }

    #[test]
    fn variants_follow_schemes(){
        assert_eq!(ft_variants(false,AcqScheme::EchoAntiecho,AcqScheme::StatesTPPI),(FtVariant::Negate,FtVariant::Alternate));
        assert_eq!(ft_variants(false,AcqScheme::States,AcqScheme::EchoAntiecho),(FtVariant::Plain,FtVariant::Negate));
        assert_eq!(ft_variants(true,AcqScheme::States,AcqScheme::QF),(FtVariant::Negate,FtVariant::Alternate));
    }

    #[test]
    fn final_transform_chain(){
        let s = final_transform(FtVariant::Negate,FtVariant::Plain).print();
        assert!(s.starts_with("#!/bin/csh\n# hmsIST FT along indirect dimensions\nxyz2pipe -in rec/data%03d.ft1 -x \\\n"));
        assert!(s.contains("| nmrPipe -fn FT -neg -verb \\\n| nmrPipe -fn PS -p0 0.0 -p1 0.0 -di \\\n| nmrPipe -fn TP \\\n"));
        assert!(s.contains("| nmrPipe -fn FT -verb \\\n"));
        assert!(s.contains("| nmrPipe -fn POLY -auto -ord 1 \\\n| nmrPipe -fn ZTP \\\n| nmrPipe -fn POLY -auto -ord 1 \\\n> 3Dspectrum.dat\n"));
        assert!(s.ends_with("> 3Dspectrum.dat\nproj3D.tcl -in 3Dspectrum.dat\n"));
    }

    #[test]
    fn viewer_arguments(){
        let s = Script::new("v",Interpreter::Csh).command(viewer()).print();
        assert!(s.contains("nmrDraw -Ws 1000 700 -position 50 50 -in data001.dat"));
    }
}
