use crate::token::Token;

const CONTINUATION:&str = " \\";
const INDENT:&str = "  ";

/// One program call with its arguments. Arguments may be spread over several continuation
/// lines to keep long converter calls readable.
#[derive(Debug,Clone,PartialEq)]
pub struct Invocation {
    program:String,
    lines:Vec<Vec<Token>>,
}

impl Invocation {
    pub fn new(program:&str) -> Self {
        Self {
            program:program.to_string(),
            lines:vec![vec![]],
        }
    }

    /// `nmrPipe -fn <name>`
    pub fn nmr_pipe(function:&str) -> Self {
        Self::new("nmrPipe").opt("fn",function)
    }

    pub fn arg<T:Into<Token>>(mut self,token:T) -> Self {
        // lines is never empty
        if let Some(line) = self.lines.last_mut() {
            line.push(token.into());
        }
        self
    }

    /// `-<flag> <value>`
    pub fn opt<T:Into<Token>>(self,flag:&str,value:T) -> Self {
        self.arg(format!("-{}",flag)).arg(value)
    }

    /// `-<flag>` with no value
    pub fn switch(self,flag:&str) -> Self {
        self.arg(format!("-{}",flag))
    }

    /// continue the arguments on a new line
    pub fn wrap(mut self) -> Self {
        self.lines.push(vec![]);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> impl Iterator<Item=&Token> {
        self.lines.iter().flatten()
    }

    fn print_lines(&self) -> Vec<String> {
        self.lines.iter().enumerate().map(|(i,line)|{
            let mut words:Vec<String> = match i {
                0 => vec![self.program.clone()],
                _ => vec![],
            };
            words.extend(line.iter().map(|t| t.to_string()));
            match i {
                0 => words.join(" "),
                _ => format!("{}{}",INDENT,words.join(" ")),
            }
        }).collect()
    }

    fn print_inline(&self) -> String {
        let mut words = vec![self.program.clone()];
        words.extend(self.args().map(|t| t.to_string()));
        words.join(" ")
    }
}

/// where the pipeline output goes
#[derive(Debug,Clone,PartialEq)]
pub enum Redirect {
    /// `> file`
    Stdout(Token),
    /// `>! file`, csh overwrite even with noclobber set
    Clobber(Token),
}

impl Redirect {
    fn print(&self) -> String {
        match self {
            Redirect::Stdout(t) => format!("> {}",t),
            Redirect::Clobber(t) => format!(">! {}",t),
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Layout {
    /// one invocation per line joined with line continuations, the nmrPipe convention
    Continued,
    /// everything on a single line
    Inline,
}

/// A chain of invocations connected with pipes
#[derive(Debug,Clone,PartialEq)]
pub struct Pipeline {
    invocations:Vec<Invocation>,
    stdin:Option<Token>,
    stdout:Option<Redirect>,
    layout:Layout,
}

impl Pipeline {
    pub fn new(first:Invocation) -> Self {
        Self {
            invocations:vec![first],
            stdin:None,
            stdout:None,
            layout:Layout::Continued,
        }
    }

    pub fn inline(first:Invocation) -> Self {
        Self {
            layout:Layout::Inline,
            ..Self::new(first)
        }
    }

    pub fn pipe(mut self,next:Invocation) -> Self {
        self.invocations.push(next);
        self
    }

    /// append an invocation only if the condition holds
    pub fn pipe_if(self,condition:bool,next:Invocation) -> Self {
        match condition {
            true => self.pipe(next),
            false => self
        }
    }

    pub fn stdin<T:Into<Token>>(mut self,source:T) -> Self {
        self.stdin = Some(source.into());
        self
    }

    pub fn stdout(mut self,redirect:Redirect) -> Self {
        self.stdout = Some(redirect);
        self
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    pub fn print(&self) -> String {
        match self.layout {
            Layout::Continued => self.print_continued(),
            Layout::Inline => self.print_inline(),
        }
    }

    fn print_continued(&self) -> String {
        let mut lines = Vec::<String>::new();
        for (i,inv) in self.invocations.iter().enumerate() {
            let mut inv_lines = inv.print_lines();
            if i > 0 {
                inv_lines[0] = format!("| {}",inv_lines[0]);
            }
            lines.extend(inv_lines);
        }
        if let Some(source) = &self.stdin {
            lines[0] = format!("{} < {}",lines[0],source);
        }
        if let Some(redirect) = &self.stdout {
            lines.push(redirect.print());
        }
        let last = lines.len() - 1;
        lines.iter().enumerate().map(|(i,line)|{
            match i == last {
                true => line.clone(),
                false => format!("{}{}",line,CONTINUATION),
            }
        }).collect::<Vec<String>>().join("\n")
    }

    fn print_inline(&self) -> String {
        let mut s = self.invocations.iter().map(|inv| inv.print_inline()).collect::<Vec<String>>().join(" | ");
        if let Some(source) = &self.stdin {
            // input redirection belongs to the first program of a single-command line
            s = match self.invocations.len() {
                1 => format!("{} < {}",s,source),
                _ => format!("{} < {} | {}",
                    self.invocations[0].print_inline(),
                    source,
                    self.invocations[1..].iter().map(|inv| inv.print_inline()).collect::<Vec<String>>().join(" | ")),
            };
        }
        if let Some(redirect) = &self.stdout {
            s = format!("{} {}",s,redirect.print());
        }
        s
    }
}
