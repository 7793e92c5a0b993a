use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::error::{ParamError, ParamResult};

/// Values found by scanning a JCAMP style parameter file (acqus, acqu2s ...) for a fixed set of
/// tagged keys. A line that contains a key assigns the line's second whitespace-delimited token
/// to that key. Later lines overwrite earlier ones.
pub struct ParamFile {
    file:PathBuf,
    values:HashMap<String,String>,
}

impl ParamFile {

    pub fn scan(file_path:&Path,keys:&[&str]) -> ParamResult<Self> {
        let txt = utils::read_to_string_lossy(file_path)?;
        Ok(Self::scan_str(file_path,&txt,keys))
    }

    pub fn scan_str(file_path:&Path,txt:&str,keys:&[&str]) -> Self {
        let mut values = HashMap::<String,String>::new();
        txt.lines().for_each(|line|{
            for key in keys {
                if line.contains(key) {
                    // a tagged line without a value token leaves the key unset
                    if let Some(val) = line.split_whitespace().nth(1) {
                        values.insert(key.to_string(),val.to_string());
                    }
                }
            }
        });
        Self {
            file:file_path.to_owned(),
            values,
        }
    }

    pub fn get(&self,key:&str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn require(&self,key:&str) -> ParamResult<String> {
        self.get(key).map(|s| s.to_string()).ok_or_else(|| self.malformed(key,"field not found"))
    }

    pub fn require_parsed<T>(&self,key:&str) -> ParamResult<T>
    where T:FromStr, <T as FromStr>::Err:std::fmt::Display
    {
        let raw = self.get(key).ok_or_else(|| self.malformed(key,"field not found"))?;
        raw.parse().map_err(|e:T::Err| self.malformed(key,&format!("cannot parse '{}': {}",raw,e)))
    }

    pub fn parsed_or<T>(&self,key:&str,default:T) -> ParamResult<T>
    where T:FromStr, <T as FromStr>::Err:std::fmt::Display
    {
        match self.get(key) {
            Some(_) => self.require_parsed(key),
            None => {
                log::debug!("{} not found in {:?}, using default",key.trim(),self.file);
                Ok(default)
            }
        }
    }

    pub(crate) fn malformed(&self,key:&str,reason:&str) -> ParamError {
        ParamError::MalformedValue {
            file:self.file.clone(),
            key:key.trim().to_string(),
            reason:reason.to_string(),
        }
    }
}
