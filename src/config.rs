/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// where programs are conventionally loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// the machine's timers historically ran at 60 Hz, and so do we by default
pub const DEFAULT_CLOCK_SPEED: u32 = 60;

/// Knobs for building an interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// cycles per second; also the rate the timers decay at
    pub clock_speed: u32,
    /// where the program is written and where execution starts
    pub load_offset: u16,
    /// fixed seed for the random opcode; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            clock_speed: DEFAULT_CLOCK_SPEED,
            load_offset: PROGRAM_ADDR,
            seed: None,
        }
    }
}
