use std::io;
use std::io::Read;

use crate::config::RAM_SIZE_BYTES;
use crate::error::Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// addresses wrap within the 4K address space
const ADDR_MASK: u16 = (RAM_SIZE_BYTES - 1) as u16;

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// write unknown len of data into memory at a particular address, refusing
    /// anything that would run past the end of memory
    fn write_any(&mut self, reader: &mut impl Read, addr: u16) -> Result<usize, Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(Error::Load)?;
        self.write(buf.as_slice(), addr)?;
        Ok(buf.len())
    }

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Error> {
        let available = self.size().saturating_sub(addr as usize);
        if data.len() > available {
            return Err(Error::LoadOverflow {
                size: data.len(),
                available,
                offset: addr,
            });
        }
        if data.is_empty() {
            return Ok(());
        }
        self.get_rw_slice(addr, data.len()).copy_from_slice(data);
        Ok(())
    }

    /// get a two-byte big-endian word; the second byte wraps to the start of memory
    fn get_word(&self, addr: u16) -> u16 {
        (self.get_byte(addr) as u16) << 8 | self.get_byte(addr.wrapping_add(1)) as u16
    }

    /// read one byte, wrapping the address into memory
    fn get_byte(&self, addr: u16) -> u8;

    /// write one byte, wrapping the address into memory
    fn set_byte(&mut self, addr: u16, value: u8);

    /// total addressable bytes
    fn size(&self) -> usize;

    /// get a r/w slice of the underlying memory (heap)
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory (heap)
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// Defines the CHIP-8 memory map used here:
///   0x0000-0x004f  font (16 glyphs, 5 bytes each)
///   0x0050-0x01ff  unused; historically the interpreter lived here
///   0x0200-0x0fff  program
///
/// chip-8 programs *should* not write below 0x200
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    fn set_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = value;
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8] {
        let a = addr as usize;
        &mut self.bytes[a..(a + len)]
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in at 0x000
    pub fn new() -> Self {
        let mut bytes = vec![0u8; RAM_SIZE_BYTES].into_boxed_slice();
        let font = FONT_ADDR as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        Chip8MemoryMap { bytes }
    }

    /// load a CHIP-8 program at `addr`, returning how many bytes were written
    pub fn load_program(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<usize, Error> {
        self.write_any(reader, addr)
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

/// the glyph for hex digit `d` starts at `FONT_ADDR + d * FONT_GLYPH_BYTES`
pub const FONT_ADDR: u16 = 0x000;
pub const FONT_GLYPH_BYTES: u16 = 5;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
