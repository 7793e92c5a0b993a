use crate::command::{Invocation, Pipeline};

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Interpreter {
    Csh,
    Sh,
}

impl Interpreter {
    pub fn shebang(&self) -> &'static str {
        match self {
            Interpreter::Csh => "#!/bin/csh",
            Interpreter::Sh => "#!/bin/sh",
        }
    }

    /// shell looked up on PATH when a script is run
    pub fn program(&self) -> &'static str {
        match self {
            Interpreter::Csh => "csh",
            Interpreter::Sh => "sh",
        }
    }
}

#[derive(Debug,Clone,PartialEq)]
enum Line {
    Comment(String),
    Blank,
    /// shell statement that is not a program call (`set F = $1`)
    Statement(String),
    Command(Pipeline),
}

impl Line {
    fn print(&self) -> String {
        match self {
            Line::Comment(c) => format!("# {}",c),
            Line::Blank => String::new(),
            Line::Statement(s) => s.clone(),
            Line::Command(p) => p.print(),
        }
    }
}

/// A named, ordered list of script lines. Nothing is written to disk here.
#[derive(Debug,Clone,PartialEq)]
pub struct Script {
    name:String,
    interpreter:Interpreter,
    lines:Vec<Line>,
}

impl Script {
    pub fn new(name:&str,interpreter:Interpreter) -> Self {
        Self {
            name:name.to_string(),
            interpreter,
            lines:vec![],
        }
    }

    pub fn comment(mut self,comment:&str) -> Self {
        self.lines.push(Line::Comment(comment.to_string()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(Line::Blank);
        self
    }

    pub fn statement(mut self,statement:&str) -> Self {
        self.lines.push(Line::Statement(statement.to_string()));
        self
    }

    pub fn pipeline(mut self,pipeline:Pipeline) -> Self {
        self.lines.push(Line::Command(pipeline));
        self
    }

    /// a single program call on its own line
    pub fn command(self,invocation:Invocation) -> Self {
        self.pipeline(Pipeline::inline(invocation))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interpreter(&self) -> Interpreter {
        self.interpreter
    }

    /// every program call in the script, in order
    pub fn invocations(&self) -> Vec<&Invocation> {
        self.lines.iter().flat_map(|line| match line {
            Line::Command(p) => p.invocations().iter().collect::<Vec<&Invocation>>(),
            _ => vec![],
        }).collect()
    }

    pub fn print(&self) -> String {
        let mut elems = Vec::<String>::new();
        elems.push(self.interpreter.shebang().to_string());
        elems.extend(self.lines.iter().map(|l| l.print()));
        let mut s = elems.join("\n");
        s.push('\n');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_starts_with_interpreter(){
        let s = Script::new("ft1xyz.com",Interpreter::Csh)
            .comment("FT along direct dimension")
            .blank()
            .command(Invocation::new("rm").switch("rf").arg("yzx_ist"));
        assert_eq!(s.print(),"#!/bin/csh\n# FT along direct dimension\n\nrm -rf yzx_ist\n");
        assert_eq!(s.invocations().len(),1);
        assert_eq!(s.name(),"ft1xyz.com");
    }

    #[test]
    fn sh_scripts(){
        let s = Script::new("recon.sh",Interpreter::Sh).statement("exec ./drive \"$1\"");
        assert!(s.print().starts_with("#!/bin/sh\n"));
        assert_eq!(s.interpreter().program(),"sh");
    }
}
