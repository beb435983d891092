// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod stack;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn, INSN_WIDTH,
    },
    mem::{Mem, ENTRY_POINT},
    stack::Stack,
};
use crate::{
    error::{Error, Result},
    keys::KeyQueue,
    screen::Screen,
};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Index of the flag register, vF
pub const FLAG: Reg = 0xf;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes the keypause (wait) flag.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: Stack,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: KeyQueue,
    // Execution data
    cycle: usize,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU in its power-on state, with the charset loaded
    /// and an empty program
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let cpu = CPU::new();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::new(),
            stack: Stack::new(),
            pc: ENTRY_POINT as Adr,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: KeyQueue::new(),
            cycle: 0,
            disassembler: Dis::default(),
        }
    }

    /// Constructs a new CPU, and loads the program at `rom` into it
    pub fn with_rom(rom: impl AsRef<std::path::Path>) -> Result<Self> {
        let mut cpu = CPU::new();
        cpu.load_program(rom)?;
        Ok(cpu)
    }

    /// Loads a program from a file into the CPU's program space.
    ///
    /// The file is read in full before anything is copied, so a failed read
    /// leaves memory untouched.
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        let bytes = std::fs::read(rom).map_err(|e| {
            log::warn!("couldn't read {}: {e}", rom.display());
            e
        })?;
        self.load_program_bytes(&bytes)
    }

    /// Loads bytes into the CPU's program space.
    ///
    /// If the program doesn't fit, returns [Error::RomTooBig] and leaves memory untouched.
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert!(cpu.load_program_bytes(&[0; 0x1000]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if let Err(e) = self.mem.load_program(rom) {
            log::warn!("{e}");
            return Err(e);
        }
        log::debug!("loaded {} byte program at {ENTRY_POINT:03x}", rom.len());
        Ok(self)
    }

    /// Queues a keypress, and reports whether it was queued.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let queued = cpu.press(0x7).unwrap();
    /// assert!(queued);
    /// assert_eq!(cpu.keys().peek(), Some(0x7));
    /// ```
    pub fn press(&mut self, key: u8) -> Result<bool> {
        self.keys.push(Some(key))
    }

    /// Gets the queue of unread keypresses
    pub fn keys(&self) -> &KeyQueue {
        &self.keys
    }

    /// Gets the queue of unread keypresses mutably
    pub fn keys_mut(&mut self) -> &mut KeyQueue {
        &mut self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::RegisterNotFound]
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// // Dump the CPU registers
    /// cpu.dump();
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::RegisterNotFound { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// // Create a new CPU, and set v0 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer (the number of outstanding calls)
    pub fn sp(&self) -> usize {
        self.stack.sp()
    }

    /// Gets the return addresses of the outstanding calls, oldest first
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of cycles the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Returns true if the CPU is blocked waiting for a keypress
    pub fn is_waiting(&self) -> bool {
        self.flags.keypause
    }

    /// Gets the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Takes an in-memory snapshot of the entire machine
    pub fn snapshot(&self) -> CPU {
        self.clone()
    }

    /// Restores the machine from a snapshot
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// let saved = cpu.snapshot();
    /// cpu.set_v(3, 0x33).unwrap();
    /// cpu.restore(&saved);
    /// assert_eq!(cpu.v()[3], 0);
    /// ```
    pub fn restore(&mut self, snapshot: &CPU) {
        log::trace!("restoring snapshot from cycle {}", snapshot.cycle);
        self.clone_from(snapshot);
    }

    /// Resets the machine to its power-on state.
    ///
    /// Touches everything: registers, timers, stack, memory (the program is
    /// unloaded and the charset reloaded), screen, key queue and keypause.
    ///
    /// Does not touch the debug flag or the disassembler.
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x12, 0x34]).unwrap();
    /// cpu.tick().unwrap();
    /// assert_eq!(0x234, cpu.pc());
    /// cpu.reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(0, cpu.cycle());
    /// assert_eq!(0, cpu.mem().read_word(0x200).unwrap());
    /// ```
    pub fn reset(&mut self) {
        log::debug!("reset after {} cycles", self.cycle);
        self.flags = Flags {
            debug: self.flags.debug,
            ..Default::default()
        };
        self.mem = Mem::new();
        self.screen.clear();
        self.stack.clear();
        self.keys.clear();
        self.pc = ENTRY_POINT as Adr;
        self.i = 0;
        self.v = [0; 16];
        (self.delay, self.sound) = (0, 0);
        self.cycle = 0;
    }

    /// Runs a single fetch-decode-execute cycle.
    ///
    /// 1. Fetches the big-endian word at `pc`
    /// 2. Decodes it into an [Insn]
    /// 3. Executes it
    /// 4. Decrements the delay and sound timers, if nonzero
    /// 5. Advances `pc`, unless the instruction set `pc` itself, or the CPU is
    ///    waiting for a keypress
    ///
    /// If fetch, decode, or execution fails, the CPU is left untouched and the
    /// error is returned. The exception is [Error::StackOverflow]: the call still
    /// happens, the cycle completes, and the error is returned afterward.
    ///
    /// Does nothing while [Flags::pause] is set.
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::InvalidOpcode] if the instruction is not implemented.
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(cpu.tick())
    ///     .expect_err("Should return Error::InvalidOpcode { 0xffff }");
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(self);
        }
        // fetch opcode
        let word = self.mem.read_word(self.pc as usize)?;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                (self.cycle + 1).bright_black(),
                self.pc,
                self.disassembler.once(word)
            );
        }

        // decode opcode
        let insn = Insn::from_word(word)?;

        // execute opcode
        let overflow = match self.execute(insn) {
            Ok(()) => None,
            Err(e) if e.is_recoverable() => Some(e),
            Err(e) => return Err(e),
        };

        self.cycle += 1;
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        if !(insn.transfers_control() || self.flags.keypause) {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }

        match overflow {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// Runs up to `steps` cycles, stopping at the first error
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick()?;
        }
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!("{}", self.dump_string());
    }

    fn dump_string(&self) -> String {
        format!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.sp(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        )
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU in its power-on state
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        Self::new()
    }
}
