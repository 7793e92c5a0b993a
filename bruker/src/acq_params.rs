use std::path::{Path, PathBuf};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use log::{debug, info};
use crate::derived;
use crate::error::{ParamError, ParamResult};
use crate::nus_list::NusList;
use crate::param_file::ParamFile;

const DECIM:&str = "DECIM";
const DSPFVS:&str = "DSPFVS";
const GRPDLY:&str = "GRPDLY";
const TD:&str = "##$TD= ";
const WBST:&str = "##$WBST= ";
const SW_H:&str = "##$SW_h= ";
const SFO1:&str = "##$SFO1= ";
const O1:&str = "##$O1= ";
const BF1:&str = "##$BF1= ";
const FN_MODE:&str = "##$FnMODE= ";

const DIRECT_KEYS:[&str;9] = [DECIM,DSPFVS,GRPDLY,TD,WBST,SW_H,SFO1,O1,BF1];
const INDIRECT_KEYS:[&str;5] = [SW_H,SFO1,O1,BF1,FN_MODE];

// pulse program markers for echo/antiecho encoding along t2
const ECHO_ANTIECHO_MARKER:&str = "Echo/Antiecho";
const T2_MARKER:&str = "t2";

/// Paths of the six files that make up a Bruker 3D NUS data set
#[derive(Debug,Clone,Serialize)]
pub struct DataSet {
    pub dir:PathBuf,
    pub acqus:PathBuf,
    pub acqu2s:PathBuf,
    pub acqu3s:PathBuf,
    pub ser:PathBuf,
    pub pulse_program:PathBuf,
    pub nuslist:PathBuf,
}

impl DataSet {
    pub fn new(dir:&Path) -> Self {
        Self {
            dir:dir.to_owned(),
            acqus:dir.join("acqus"),
            acqu2s:dir.join("acqu2s"),
            acqu3s:dir.join("acqu3s"),
            ser:dir.join("ser"),
            pulse_program:dir.join("pulseprogram"),
            nuslist:dir.join("nuslist"),
        }
    }

    fn required_files(&self) -> [&Path;6] {
        [
            self.acqus.as_path(),
            self.acqu2s.as_path(),
            self.acqu3s.as_path(),
            self.ser.as_path(),
            self.pulse_program.as_path(),
            self.nuslist.as_path(),
        ]
    }

    /// Ok if every required file is present, otherwise the first missing file
    pub fn validate(&self) -> ParamResult<()> {
        let missing:Vec<&Path> = self.required_files().into_iter().filter(|f| !f.is_file()).collect();
        for m in &missing {
            debug!("missing {:?}",m);
        }
        match missing.first() {
            Some(m) => Err(ParamError::MissingMetadataFile(m.to_path_buf())),
            None => Ok(())
        }
    }
}

/// digitizer settings. These are handed to the converter untouched
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct DigitalFilter {
    pub decim:String,
    pub dspfvs:String,
    pub grpdly:String,
}

/// FnMODE: how an indirect dimension was encoded
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum AcqScheme {
    Undefined,
    QF,
    QSEQ,
    TPPI,
    States,
    StatesTPPI,
    EchoAntiecho,
    Other(i64),
}

impl AcqScheme {
    pub fn from_code(code:i64) -> Self {
        match code {
            0 => AcqScheme::Undefined,
            1 => AcqScheme::QF,
            2 => AcqScheme::QSEQ,
            3 => AcqScheme::TPPI,
            4 => AcqScheme::States,
            5 => AcqScheme::StatesTPPI,
            6 => AcqScheme::EchoAntiecho,
            _ => AcqScheme::Other(code),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            AcqScheme::Undefined => 0,
            AcqScheme::QF => 1,
            AcqScheme::QSEQ => 2,
            AcqScheme::TPPI => 3,
            AcqScheme::States => 4,
            AcqScheme::StatesTPPI => 5,
            AcqScheme::EchoAntiecho => 6,
            AcqScheme::Other(c) => *c,
        }
    }
}

/// Acquisition parameters of a single dimension
#[derive(Debug,Clone,PartialEq)]
pub struct Axis {
    pub n:usize,
    pub t:usize,
    pub sw:f64,
    pub obs:f64,
    o1:f64,
    bf1:f64,
    pub mode:String,
    pub label:String,
    pub scheme:AcqScheme,
}

impl Axis {
    pub fn o1(&self) -> f64 {
        self.o1
    }

    pub fn bf1(&self) -> f64 {
        self.bf1
    }

    /// carrier position is always derived from the current offset and base frequency
    pub fn car(&self) -> f64 {
        derived::carrier_position(self.o1,self.bf1)
    }

    pub fn set_carrier_inputs(&mut self,o1:f64,bf1:f64) {
        self.o1 = o1;
        self.bf1 = bf1;
    }

    fn direct(p:&ParamFile) -> ParamResult<Self> {
        Ok(Self {
            n:p.require_parsed(TD)?,
            t:p.require_parsed(WBST)?,
            sw:p.require_parsed(SW_H)?,
            obs:p.require_parsed(SFO1)?,
            o1:p.require_parsed(O1)?,
            bf1:nonzero_bf1(p)?,
            mode:String::from("DQD"),
            label:String::from("H"),
            scheme:AcqScheme::Undefined,
        })
    }

    fn indirect(p:&ParamFile,n:usize,label:&str) -> ParamResult<Self> {
        Ok(Self {
            n,
            t:2,
            sw:p.require_parsed(SW_H)?,
            obs:p.require_parsed(SFO1)?,
            o1:p.require_parsed(O1)?,
            bf1:nonzero_bf1(p)?,
            mode:String::from("Real"),
            label:label.to_string(),
            scheme:AcqScheme::from_code(p.parsed_or(FN_MODE,0)?),
        })
    }
}

fn nonzero_bf1(p:&ParamFile) -> ParamResult<f64> {
    let bf1:f64 = p.require_parsed(BF1)?;
    match bf1 == 0.0 {
        true => Err(p.malformed(BF1,"base frequency cannot be zero")),
        false => Ok(bf1)
    }
}

impl Serialize for Axis {
    fn serialize<S:Serializer>(&self,serializer:S) -> Result<S::Ok,S::Error> {
        let mut s = serializer.serialize_struct("Axis",10)?;
        s.serialize_field("n",&self.n)?;
        s.serialize_field("t",&self.t)?;
        s.serialize_field("sw",&self.sw)?;
        s.serialize_field("obs",&self.obs)?;
        s.serialize_field("o1",&self.o1)?;
        s.serialize_field("bf1",&self.bf1)?;
        s.serialize_field("car",&self.car())?;
        s.serialize_field("mode",&self.mode)?;
        s.serialize_field("label",&self.label)?;
        s.serialize_field("scheme",&self.scheme)?;
        s.end()
    }
}

/// Everything the stage scripts need to know about a Bruker 3D NUS acquisition
#[derive(Debug,Clone,Serialize)]
pub struct AcquisitionParameters {
    pub data_set:DataSet,
    pub filter:DigitalFilter,
    pub x:Axis,
    pub y:Axis,
    pub z:Axis,
    /// t2 was acquired echo/antiecho, so the converted data needs the ranceY macro
    pub t2_echo_antiecho:bool,
}

impl AcquisitionParameters {

    pub fn load(dir:&Path) -> ParamResult<Self> {
        let data_set = DataSet::new(dir);
        data_set.validate()?;

        let pp = utils::read_to_string_lossy(&data_set.pulse_program)?;
        let t2_echo_antiecho = pp.lines().any(|line| line.contains(ECHO_ANTIECHO_MARKER) && line.contains(T2_MARKER));

        let ac1 = ParamFile::scan(&data_set.acqus,&DIRECT_KEYS)?;
        let ac2 = ParamFile::scan(&data_set.acqu2s,&INDIRECT_KEYS)?;
        let ac3 = ParamFile::scan(&data_set.acqu3s,&INDIRECT_KEYS)?;

        let filter = DigitalFilter {
            decim:ac1.require(DECIM)?,
            dspfvs:ac1.require(DSPFVS)?,
            grpdly:ac1.require(GRPDLY)?,
        };

        let params = Self {
            filter,
            x:Axis::direct(&ac1)?,
            y:Axis::indirect(&ac2,4,"N")?,
            // resolved from the sample list by the conversion stage
            z:Axis::indirect(&ac3,0,"C")?,
            t2_echo_antiecho,
            data_set,
        };
        info!("loaded Bruker 3D parameters from {:?}",params.data_set.dir);
        debug!("{:?}",params);
        Ok(params)
    }

    pub fn nus_list(&self) -> ParamResult<NusList> {
        NusList::open(&self.data_set.nuslist)
    }

    /// Resolve and set the z point count from an explicit sample count or the sample list. The
    /// list has to hold at least as many records as requested.
    pub fn resolve_sample_count(&mut self,sample_override:Option<usize>) -> ParamResult<usize> {
        let listed = self.nus_list()?.n_samples();
        if let Some(requested) = sample_override {
            if requested > listed {
                return Err(ParamError::SampleCountExceedsList{requested,available:listed});
            }
        }
        self.z.n = derived::indirect_point_count(sample_override,listed);
        Ok(self.z.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis() -> Axis {
        Axis {
            n:4,t:2,sw:1800.0,obs:60.8,o1:7296.0,bf1:60.8131,
            mode:String::from("Real"),label:String::from("N"),scheme:AcqScheme::States,
        }
    }

    #[test]
    fn carrier_follows_its_inputs(){
        let mut a = axis();
        assert_eq!(a.car(),7296.0/60.8131);
        a.set_carrier_inputs(7000.0,60.0);
        assert_eq!(a.car(),7000.0/60.0);
    }

    #[test]
    fn scheme_codes(){
        assert_eq!(AcqScheme::from_code(6),AcqScheme::EchoAntiecho);
        assert_eq!(AcqScheme::from_code(5),AcqScheme::StatesTPPI);
        assert_eq!(AcqScheme::from_code(9),AcqScheme::Other(9));
        assert_eq!(AcqScheme::from_code(9).code(),9);
        assert_eq!(AcqScheme::EchoAntiecho.code(),6);
    }
}
