use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process;

use termchip8::clock::{SpinClock, StopHandle};
use termchip8::config::{Options, DEFAULT_CLOCK_SPEED, PROGRAM_ADDR};
use termchip8::display::MonoTermDisplay;
use termchip8::input::TermKeypad;
use termchip8::sound::{Mute, Sound, TerminalBell};
use termchip8::Chip8Interpreter;

/// Run a CHIP-8 program in the terminal. Esc or Ctrl-C quits.
#[derive(Parser, Debug)]
#[command(name = "termchip8", version, about)]
struct Args {
    /// program image to load at 0x200
    rom: PathBuf,

    /// instructions (and timer ticks) per second
    #[arg(long, default_value_t = DEFAULT_CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    clock_speed: u32,

    /// seed for the random number opcode, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// don't ring the terminal bell when the sound timer runs out
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let options = Options {
        clock_speed: args.clock_speed,
        load_offset: PROGRAM_ADDR,
        seed: args.seed,
    };

    eprintln!("Loading rom {}", args.rom.display());
    let mut rom = File::open(&args.rom)?;

    // the terminal must be restored before anything is reported, so the
    // adapters live in their own scope
    let outcome = {
        let stop = StopHandle::new();
        stop.stop_on_signals()?;
        let mut display = MonoTermDisplay::new()?;
        let mut keypad = TermKeypad::new(stop.clone())?;
        let mut bell = TerminalBell::new();
        let mut mute = Mute::new();
        let sound: &mut dyn Sound = if args.mute { &mut mute } else { &mut bell };

        let mut interpreter = Chip8Interpreter::new(&options, &mut display, &mut keypad, sound);
        match interpreter.load_program(&mut rom) {
            Ok(_) => {
                let mut clock = SpinClock::new(options.clock_speed);
                interpreter
                    .run(&mut clock, &stop)
                    .map_err(|e| (e, interpreter.to_string()))
            }
            Err(e) => Err((e, interpreter.to_string())),
        }
    };

    // shove a few newlines on stdout to stop the shell prompt landing in the last frame
    for _ in 0..2 {
        println!();
    }

    if let Err((e, state)) = outcome {
        eprintln!("termchip8: {}", e);
        eprintln!("  {}", state);
        process::exit(1);
    }
    Ok(())
}
