// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture.
//!
//! The [CPU](cpu::CPU) owns the whole machine: registers, memory, stack, timers,
//! the [Screen](screen::Screen), and the [KeyQueue](keys::KeyQueue). The host
//! calls [CPU::tick](cpu::CPU::tick) in a loop, pushes keys into the queue, and
//! reads pixels back out of the screen.

pub mod cpu;
pub mod error;
pub mod keys;
pub mod screen;

/// Common imports for vip8
pub mod prelude {
    use super::*;
    pub use cpu::{
        flags::Flags,
        instruction::{
            disassembler::{Dis, Disassembler},
            Insn,
        },
        mem::{Mem, Region},
        CPU,
    };
    pub use error::{Error, Result};
    pub use keys::KeyQueue;
    pub use screen::Screen;
}
