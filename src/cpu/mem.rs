// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::error::{Error, Result};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Total size of the address space, in bytes
pub const MEMORY_SIZE: usize = 0x1000;
/// Address at which programs are loaded, and execution begins
pub const ENTRY_POINT: usize = 0x200;
/// Masks an address into the address space
pub const ADDRESS_MASK: u16 = (MEMORY_SIZE - 1) as u16;
/// Size of each built-in glyph, in bytes
pub const GLYPH_SIZE: usize = 5;

/// The built-in hexadecimal font, loaded at address 0
#[rustfmt::skip]
pub const CHARSET: [u8; 16 * GLYPH_SIZE] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Reserved space between the charset and the program
    Reserved,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the address range covered by this [Region]
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0..CHARSET.len(),
            Region::Reserved => CHARSET.len()..ENTRY_POINT,
            Region::Program => ENTRY_POINT..MEMORY_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Reserved => "Reserved",
                Region::Program => "Program",
            }
        )
    }
}

/// The CPU's address space: a fixed 4 KiB arena with the charset preloaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Mem {
    memory: Box<[u8; MEMORY_SIZE]>,
}

impl Mem {
    /// Constructs a new mem, with the charset loaded and everything else zeroed
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(mem.grab(0..5), Some([0xf0, 0x90, 0x90, 0x90, 0xf0].as_slice()));
    /// assert_eq!(mem.grab(0x200), Some(&0));
    /// ```
    pub fn new() -> Self {
        let mut memory = Box::new([0; MEMORY_SIZE]);
        memory[Region::Charset.range()].copy_from_slice(&CHARSET);
        Mem { memory }
    }

    /// Gets the length of the backing memory. This is always [MEMORY_SIZE].
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Memory is never empty, but clippy insists.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Gets a slice of memory, or None if the index is out of range
    #[inline(always)]
    pub fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets `len` bytes starting at `addr`, or [Error::MemoryAddressNotFound]
    /// naming the first address of the span that lies outside memory
    pub fn range(&self, addr: usize, len: usize) -> Result<&[u8]> {
        self.memory
            .get(addr..addr.saturating_add(len))
            .ok_or(Error::MemoryAddressNotFound {
                addr: addr.max(MEMORY_SIZE),
            })
    }

    /// Gets `len` bytes starting at `addr` mutably, or [Error::MemoryAddressNotFound]
    pub fn range_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        self.memory
            .get_mut(addr..addr.saturating_add(len))
            .ok_or(Error::MemoryAddressNotFound {
                addr: addr.max(MEMORY_SIZE),
            })
    }

    /// Reads the big-endian word at `addr`
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let bytes = self.range(addr, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Gets a [Region] of memory
    pub fn region(&self, region: Region) -> &[u8] {
        &self.memory[region.range()]
    }

    /// Zeroes a [Region] of memory
    pub fn clear_region(&mut self, region: Region) -> &mut Self {
        self.memory[region.range()].fill(0);
        self
    }

    /// Copies `data` into the start of the Program [Region]
    ///
    /// Returns [Error::RomTooBig] without touching memory if `data` doesn't fit.
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut mem = Mem::new();
    /// mem.load_program(&[0x12, 0x00]).unwrap();
    /// assert_eq!(mem.read_word(0x200).unwrap(), 0x1200);
    /// assert!(mem.load_program(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program(&mut self, data: &[u8]) -> Result<&mut Self> {
        let max = Region::Program.range().len();
        if data.len() > max {
            return Err(Error::RomTooBig {
                len: data.len(),
                max,
            });
        }
        self.memory[ENTRY_POINT..ENTRY_POINT + data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Creates a window into the Mem which implements Display
    pub fn window(&self, range: Range<usize>) -> MemWindow<'_> {
        MemWindow {
            start: range.start,
            mem: self.memory.get(range).unwrap_or_default(),
        }
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("charset", &self.region(Region::Charset))
            .field("program", &format_args!("[{} bytes]", Region::Program.range().len()))
            .finish()
    }
}

/// A hexdump view into [Mem]
pub struct MemWindow<'a> {
    start: usize,
    mem: &'a [u8],
}

impl<'a> Display for MemWindow<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use owo_colors::{OwoColorize, Style};
        // Green phosphor style formatting, for taste
        let term: Style = Style::new().bold().green().on_black();
        for (index, byte) in self.mem.iter().enumerate() {
            if index % 16 == 0 {
                write!(f, "{:>03x}{} ", (self.start + index).style(term), ":".style(term))?
            }
            write!(f, "{byte:02x}")?;
            write!(
                f,
                "{}",
                match index % 16 {
                    0xf => "\n",
                    0x7 => "  ",
                    _ if index % 2 == 1 => " ",
                    _ => "",
                }
            )?
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_is_loaded() {
        let mem = Mem::new();
        assert_eq!(mem.region(Region::Charset), &CHARSET);
        assert!(mem.region(Region::Reserved).iter().all(|&b| b == 0));
        assert!(mem.region(Region::Program).iter().all(|&b| b == 0));
    }

    #[test]
    fn load_exact_fit() {
        let mut mem = Mem::new();
        let rom = vec![0xa5; MEMORY_SIZE - ENTRY_POINT];
        mem.load_program(&rom).unwrap();
        assert_eq!(mem.region(Region::Program), rom.as_slice());
    }

    #[test]
    fn load_one_byte_too_many() {
        let mut mem = Mem::new();
        let before = mem.clone();
        let rom = vec![0xa5; MEMORY_SIZE - ENTRY_POINT + 1];
        match mem.load_program(&rom) {
            Err(Error::RomTooBig { len, max }) => {
                assert_eq!(len, 0xe01);
                assert_eq!(max, 0xe00);
            }
            other => panic!("expected RomTooBig, got {other:?}"),
        }
        assert!(mem == before);
    }

    #[test]
    fn range_out_of_bounds() {
        let mem = Mem::new();
        assert!(mem.range(0xffe, 2).is_ok());
        assert!(matches!(
            mem.range(0xfff, 2),
            Err(Error::MemoryAddressNotFound { addr: 0x1000 })
        ));
        assert!(mem.read_word(0xfff).is_err());
    }

    #[test]
    fn range_reports_first_missing_address() {
        let mut mem = Mem::new();
        // a span that starts inside memory runs out at MEMORY_SIZE
        assert!(matches!(
            mem.range(0xffe, 3),
            Err(Error::MemoryAddressNotFound { addr: 0x1000 })
        ));
        // a span that starts outside memory is missing from its first byte
        assert!(matches!(
            mem.range_mut(0x10fe, 3),
            Err(Error::MemoryAddressNotFound { addr: 0x10fe })
        ));
    }

    #[test]
    fn window_display() {
        let mem = Mem::new();
        let dump = format!("{}", mem.window(0..0x20));
        assert!(dump.contains("f0"));
        println!("{dump}");
    }
}
