pub mod command;
pub mod script;
pub mod token;

pub use command::{Invocation, Layout, Pipeline, Redirect};
pub use script::{Interpreter, Script};
pub use token::Token;
