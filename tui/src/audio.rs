//! Terminal-bell audio cues. Fire-and-forget: write failures are ignored.

use std::io::{self, Write};

pub struct Cues {
    enabled: bool,
}

impl Cues {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn exercise_complete(&self) {
        self.ring(1);
    }

    /// Distinct from the per-exercise cue.
    pub fn workout_complete(&self) {
        self.ring(3);
    }

    fn ring(&self, times: usize) {
        if !self.enabled {
            return;
        }
        let mut out = io::stdout();
        for _ in 0..times {
            let _ = out.write_all(b"\x07");
        }
        let _ = out.flush();
    }
}
