/// # termchip8
///
/// A CHIP-8 virtual machine that renders to the terminal.
///
/// ## Design
///
/// * one instruction per clock tick; the timers decay once per tick too, so
///   the default 60 Hz clock matches the machine's timer rate
/// * decoding produces an `Opcode` enum that execution matches exhaustively;
///   words that decode to nothing stop the machine with `UnknownOpcode`
/// * abstract display so can plug alternatives; starting with TUI in-console
/// * input device, with trait for reading key-presses
/// * sound device, with trait for the cue fired when the sound timer expires
/// * the run loop is cooperative: a `StopHandle` is checked once per tick,
///   never mid-instruction
///
/// Model
///
/// main
///  |-- display, keypad, sound, options
///  |-- interpreter(options, display, keypad, sound)
///  |    |-- memory (font + program)
///  |    |-- graphics buffer
///  |    `-- registers, stack, timers
///  `-- run(clock, stop)
///       |-- clock.tick()
///       |-- stop requested? -> done
///       |-- interpreter.cycle()   // fetch, decode, execute, decay timers
///       `-- quit from the keypad -> done; any other error -> reported
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod graphics;
pub mod input;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod sound;

pub use error::{Error, KeypadError};
pub use interpreter::{Chip8Interpreter, RunState};
