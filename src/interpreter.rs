/// # interpreter
///
/// Machine state plus the fetch/decode/execute engine and the clocked loop
/// driving it:
///  - 4K of memory with the font at 0x000 and the program at `load_offset`
///  - V0..VF, 8 bits each; VF doubles as carry/borrow/collision flag
///  - I, the 16 bit index register
///  - PC, which every instruction is responsible for moving on
///  - a 16 slot stack of return addresses and its pointer
///  - delay and sound timers, decremented once per cycle
///  - the 64x32 pixel grid
///
/// Display, keypad and sound are borrowed collaborators, so the same engine
/// runs against a terminal or against test doubles.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::io;

use crate::clock::{Clock, StopHandle};
use crate::config::Options;
use crate::display::Display;
use crate::error::{Error, KeypadError};
use crate::graphics::Graphics;
use crate::input::Keypad;
use crate::memory::{Chip8MemoryMap, MemoryMap, FONT_ADDR, FONT_GLYPH_BYTES};
use crate::opcode::{Opcode, Reg};
use crate::sound::Sound;

const STACK_SLOTS: usize = 16;
const FLAG: usize = 0xF;
/// largest sprite a DXYN can draw
const MAX_SPRITE_ROWS: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

pub struct Chip8Interpreter<'a> {
    memory: Chip8MemoryMap,
    display: &'a mut dyn Display,
    keypad: &'a mut dyn Keypad,
    sound: &'a mut dyn Sound,
    graphics: Graphics,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_SLOTS],
    stack_pointer: u8,
    delay_timer: u8,
    sound_timer: u8,
    load_offset: u16,
    rng: StdRng,
    state: RunState,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        options: &Options,
        display: &'a mut dyn Display,
        keypad: &'a mut dyn Keypad,
        sound: &'a mut dyn Sound,
    ) -> Chip8Interpreter<'a> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            display,
            keypad,
            sound,
            graphics: Graphics::new(),
            v: [0; 16],
            i: 0,
            program_counter: options.load_offset,
            stack: [0; STACK_SLOTS],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            load_offset: options.load_offset,
            rng,
            state: RunState::Stopped,
        }
    }

    /// load a chip8 program at the load offset, returning its length
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Error> {
        self.memory.load_program(reader, self.load_offset)
    }

    pub fn load_bytes(&mut self, program: &[u8]) -> Result<usize, Error> {
        let mut reader = program;
        self.load_program(&mut reader)
    }

    /// Run one cycle every clock tick until stopped, the keypad quits, or an
    /// instruction fails. Only the last of those is reported as an error.
    pub fn run(&mut self, clock: &mut dyn Clock, stop: &StopHandle) -> Result<(), Error> {
        self.state = RunState::Running;
        let result = loop {
            clock.tick();
            if stop.is_stopped() {
                break Ok(());
            }
            match self.cycle() {
                Ok(_) => {}
                Err(Error::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.state = RunState::Stopped;
        result
    }

    /// Execute one instruction then decay the timers. A failed instruction
    /// leaves the timers alone. Returns the opcode executed.
    pub fn cycle(&mut self) -> Result<u16, Error> {
        let op = self.fetch();
        self.step()?;

        // a failed cue must leave both timers untouched
        if self.sound_timer == 1 {
            self.sound.cue().map_err(Error::Sound)?;
        }
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
        Ok(op)
    }

    /// the word at the program counter
    pub fn fetch(&self) -> u16 {
        self.memory.get_word(self.program_counter)
    }

    /// fetch, decode and execute the instruction at the program counter
    pub fn step(&mut self) -> Result<(), Error> {
        let op = self.fetch();
        let instruction = Opcode::decode(op)?;
        self.execute(instruction)
    }

    fn execute(&mut self, instruction: Opcode) -> Result<(), Error> {
        match instruction {
            Opcode::ClearScreen => {
                self.graphics.clear();
                self.advance();
            }
            Opcode::Return => {
                if self.stack_pointer == 0 {
                    return Err(Error::StackUnderflow {
                        pc: self.program_counter,
                    });
                }
                self.program_counter = self.stack[self.stack_pointer as usize];
                self.stack_pointer -= 1;
                self.advance();
            }
            Opcode::Jump(addr) => self.program_counter = addr,
            Opcode::Call(addr) => {
                // slot 0 is never used, so that leaves room for 15 calls
                if self.stack_pointer as usize == STACK_SLOTS - 1 {
                    return Err(Error::StackOverflow { addr });
                }
                self.stack_pointer += 1;
                self.stack[self.stack_pointer as usize] = self.program_counter;
                self.program_counter = addr;
            }
            Opcode::SkipEqImm(x, nn) => self.skip_if(self.reg(x) == nn),
            Opcode::SkipNeImm(x, nn) => self.skip_if(self.reg(x) != nn),
            Opcode::SkipEqReg(x, y) => self.skip_if(self.reg(x) == self.reg(y)),
            Opcode::SetImm(x, nn) => self.set_reg(x, nn),
            Opcode::AddImm(x, nn) => self.set_reg(x, self.reg(x).wrapping_add(nn)),
            Opcode::Copy(x, y) => self.set_reg(x, self.reg(y)),
            Opcode::Or(x, y) => self.set_reg(x, self.reg(x) | self.reg(y)),
            Opcode::And(x, y) => self.set_reg(x, self.reg(x) & self.reg(y)),
            Opcode::Xor(x, y) => self.set_reg(x, self.reg(x) ^ self.reg(y)),
            Opcode::Add(x, y) => {
                let (sum, carry) = self.reg(x).overflowing_add(self.reg(y));
                self.v[FLAG] = carry as u8;
                self.set_reg(x, sum);
            }
            Opcode::Sub(x, y) => {
                // VF = 1 means "no borrow"; equal operands count as a borrow
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.v[FLAG] = (vx > vy) as u8;
                self.set_reg(x, vx.wrapping_sub(vy));
            }
            Opcode::ShiftRight(x) => {
                let vx = self.reg(x);
                self.v[FLAG] = vx & 0x01;
                self.set_reg(x, vx >> 1);
            }
            Opcode::SubN(x, y) => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.v[FLAG] = (vy > vx) as u8;
                self.set_reg(x, vy.wrapping_sub(vx));
            }
            Opcode::ShiftLeft(x) => {
                let vx = self.reg(x);
                self.v[FLAG] = (vx & 0x80) >> 7;
                self.set_reg(x, vx << 1);
            }
            Opcode::SkipNeReg(x, y) => self.skip_if(self.reg(x) != self.reg(y)),
            Opcode::SetIndex(addr) => {
                self.i = addr;
                self.advance();
            }
            Opcode::JumpOffset(addr) => {
                self.program_counter = addr.wrapping_add(self.reg(0) as u16);
            }
            Opcode::Random(x, nn) => {
                // NN is added to, not ANDed with, a byte in 0..=254
                let random: u8 = self.rng.gen_range(0..255);
                self.set_reg(x, nn.wrapping_add(random));
            }
            Opcode::Draw(x, y, n) => {
                let mut rows = [0u8; MAX_SPRITE_ROWS];
                let rows = &mut rows[..n as usize];
                for (k, row) in rows.iter_mut().enumerate() {
                    *row = self.memory.get_byte(self.i.wrapping_add(k as u16));
                }
                let (vx, vy) = (self.reg(x), self.reg(y));
                let collision = self.graphics.write_sprite(rows, vx, vy);
                self.v[FLAG] = collision as u8;
                self.advance();
                self.graphics
                    .render(&mut *self.display)
                    .map_err(Error::Display)?;
            }
            Opcode::SkipPressed(x) => {
                let key = self.get_key()?;
                self.skip_if(key == Some(self.reg(x)));
            }
            Opcode::SkipNotPressed(x) => {
                let key = self.get_key()?;
                self.skip_if(key != Some(self.reg(x)));
            }
            Opcode::GetDelay(x) => self.set_reg(x, self.delay_timer),
            Opcode::WaitKey(x) => {
                // with nothing pressed the PC stays put and we ask again next cycle
                if let Some(key) = self.get_key()? {
                    self.set_reg(x, key);
                }
            }
            Opcode::SetDelay(x) => {
                self.delay_timer = self.reg(x);
                self.advance();
            }
            Opcode::SetSound(x) => {
                self.sound_timer = self.reg(x);
                self.advance();
            }
            Opcode::AddIndex(x) => {
                self.i = self.i.wrapping_add(self.reg(x) as u16);
                self.advance();
            }
            Opcode::FontChar(x) => {
                self.i = FONT_ADDR + self.reg(x) as u16 * FONT_GLYPH_BYTES;
                self.advance();
            }
            Opcode::Bcd(x) => {
                let vx = self.reg(x);
                self.memory.set_byte(self.i, vx / 100);
                self.memory.set_byte(self.i.wrapping_add(1), (vx / 10) % 10);
                self.memory.set_byte(self.i.wrapping_add(2), vx % 10);
                self.advance();
            }
            Opcode::Store(x) => {
                for r in 0..=x {
                    self.memory
                        .set_byte(self.i.wrapping_add(r as u16), self.reg(r));
                }
                self.advance();
            }
            Opcode::Load(x) => {
                for r in 0..=x {
                    self.v[r as usize] = self.memory.get_byte(self.i.wrapping_add(r as u16));
                }
                self.advance();
            }
        }
        Ok(())
    }

    fn reg(&self, r: Reg) -> u8 {
        self.v[r as usize]
    }

    /// write a register and move on to the next instruction
    fn set_reg(&mut self, r: Reg, value: u8) {
        self.v[r as usize] = value;
        self.advance();
    }

    fn advance(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    fn skip_if(&mut self, condition: bool) {
        self.advance();
        if condition {
            self.advance();
        }
    }

    /// `None` when no key is pressed; quit and failures come back as errors
    fn get_key(&mut self) -> Result<Option<u8>, Error> {
        match self.keypad.get_key() {
            Ok(key) => Ok(Some(key)),
            Err(KeypadError::NoKey) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }
}

impl fmt::Display for Chip8Interpreter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pc={:#05X} op={:#06X} i={:#05X} sp={} dt={} st={} v=[",
            self.program_counter,
            self.fetch(),
            self.i,
            self.stack_pointer,
            self.delay_timer,
            self.sound_timer
        )?;
        for (n, v) in self.v.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", v)?;
        }
        write!(f, "]")
    }
}
