/// width of the reconstruction progress bar
pub const BAR_SEGMENTS:usize = 32;

/// Snapshot of how many planes have been reconstructed
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Progress {
    pub completed:usize,
    pub total:usize,
}

impl Progress {
    pub fn new(completed:usize,total:usize) -> Self {
        Self {completed,total}
    }

    fn clamped(&self) -> usize {
        self.completed.min(self.total)
    }

    pub fn filled_segments(&self) -> usize {
        match self.total {
            0 => BAR_SEGMENTS,
            t => self.clamped() * BAR_SEGMENTS / t,
        }
    }

    pub fn percent(&self) -> f64 {
        match self.total {
            0 => 100.0,
            t => 100.0 * self.clamped() as f64 / t as f64,
        }
    }

    /// `####----... 50.00 %`, meant to be overwritten in place with a carriage return
    pub fn render(&self) -> String {
        let filled = self.filled_segments();
        format!("{}{} {:.2} %","#".repeat(filled),"-".repeat(BAR_SEGMENTS - filled),self.percent())
    }
}
