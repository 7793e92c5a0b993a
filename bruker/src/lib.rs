pub mod acq_params;
pub mod derived;
pub mod error;
pub mod nus_list;
pub mod param_file;

pub use acq_params::{AcqScheme, AcquisitionParameters, Axis, DataSet, DigitalFilter};
pub use error::{ParamError, ParamResult};
pub use nus_list::NusList;
