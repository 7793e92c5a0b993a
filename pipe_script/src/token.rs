use std::fmt;
use std::path::Path;

/// number of decimals used for every frequency, width and carrier value written to a script
pub const FIXED_DECIMALS:usize = 5;

/// A single argument of a generated command. Values stay typed until the script is printed.
#[derive(Debug,Clone,PartialEq)]
pub enum Token {
    Word(String),
    Int(i64),
    /// plain float, printed with the shortest representation
    Float(f64),
    /// float rounded to exactly FIXED_DECIMALS places
    Fixed5(f64),
    /// right-aligned in a column of the given width
    Padded(Box<Token>,usize),
}

impl Token {
    pub fn word(s:&str) -> Self {
        Token::Word(s.to_string())
    }

    pub fn path(p:&Path) -> Self {
        Token::Word(p.to_string_lossy().into_owned())
    }

    pub fn fixed(value:f64) -> Self {
        Token::Fixed5(value)
    }

    pub fn padded(self,width:usize) -> Self {
        Token::Padded(Box::new(self),width)
    }
}

impl fmt::Display for Token {
    fn fmt(&self,f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(s) => write!(f,"{}",s),
            Token::Int(i) => write!(f,"{}",i),
            Token::Float(v) => write!(f,"{}",v),
            Token::Fixed5(v) => write!(f,"{:.*}",FIXED_DECIMALS,v),
            Token::Padded(inner,width) => write!(f,"{:>width$}",inner.to_string(),width=width),
        }
    }
}

impl From<&str> for Token {
    fn from(s:&str) -> Self {
        Token::word(s)
    }
}

impl From<String> for Token {
    fn from(s:String) -> Self {
        Token::Word(s)
    }
}

impl From<i64> for Token {
    fn from(i:i64) -> Self {
        Token::Int(i)
    }
}

impl From<u32> for Token {
    fn from(i:u32) -> Self {
        Token::Int(i as i64)
    }
}

impl From<usize> for Token {
    fn from(i:usize) -> Self {
        Token::Int(i as i64)
    }
}

impl From<f64> for Token {
    fn from(v:f64) -> Self {
        Token::Float(v)
    }
}
