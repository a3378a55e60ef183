use std::io;
use std::io::Write;

/// The one-shot cue fired when the sound timer runs out.
pub trait Sound {
    fn cue(&mut self) -> Result<(), io::Error>;
}

const BEL: &[u8] = b"\x07";

/// rings the terminal bell
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn new() -> Self {
        TerminalBell { out: io::stdout() }
    }
}

impl Default for TerminalBell<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn with_writer(out: W) -> Self {
        TerminalBell { out }
    }
}

impl<W: Write> Sound for TerminalBell<W> {
    fn cue(&mut self) -> Result<(), io::Error> {
        self.out.write_all(BEL)?;
        self.out.flush()
    }
}

/// stays quiet, but counts the cues so tests can see them
#[derive(Default)]
pub struct Mute {
    pub cues: usize,
}

impl Mute {
    pub fn new() -> Self {
        Mute { cues: 0 }
    }
}

impl Sound for Mute {
    fn cue(&mut self) -> Result<(), io::Error> {
        self.cues += 1;
        Ok(())
    }
}
