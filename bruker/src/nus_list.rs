use std::path::Path;
use crate::error::{ParamError, ParamResult};

/// The non-uniform sampling schedule: one record per acquired indirect point, in acquisition
/// order. Records are kept verbatim so a truncated copy is byte-identical to the head of the
/// acquired list.
#[derive(Debug,Clone)]
pub struct NusList {
    records:Vec<String>,
}

impl NusList {
    pub fn open(source:&Path) -> ParamResult<Self> {
        if !source.exists() {
            return Err(ParamError::MissingMetadataFile(source.to_owned()));
        }
        let s = utils::read_to_string(source)?;
        Ok(Self::from_txt(&s))
    }

    pub fn from_txt(txt:&str) -> Self {
        Self {
            records:txt.lines().map(|line| line.to_string()).collect(),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.records.len()
    }

    /// the first n records of the schedule
    pub fn truncated(&self,n:usize) -> ParamResult<Self> {
        if n > self.records.len() {
            return Err(ParamError::SampleCountExceedsList {
                requested:n,
                available:self.records.len(),
            });
        }
        Ok(Self {
            records:self.records[0..n].to_vec(),
        })
    }

    pub fn to_txt(&self) -> String {
        let mut s = String::new();
        for r in &self.records {
            s.push_str(r);
            s.push('\n');
        }
        s
    }
}
