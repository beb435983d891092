// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The fixed-depth call stack

use super::Adr;
use std::fmt::Debug;

/// Maximum number of nested calls
pub const STACK_DEPTH: usize = 16;

/// A fixed-depth stack of return addresses, with an explicit stack pointer
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Stack {
    entries: [Adr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    /// Constructs an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the stack pointer (the number of live entries)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Returns true if no calls are outstanding
    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// Returns true if another push would overflow
    pub fn is_full(&self) -> bool {
        self.sp == STACK_DEPTH
    }

    /// Pushes an address onto the stack.
    ///
    /// If the stack is already full, the top entry is overwritten instead,
    /// and this returns `false`.
    /// # Examples
    /// ```rust
    /// # use vip8::cpu::stack::*;
    /// let mut stack = Stack::new();
    /// for addr in 0..16 {
    ///     assert!(stack.push(addr));
    /// }
    /// assert!(!stack.push(0x300));
    /// assert_eq!(stack.sp(), 16);
    /// assert_eq!(stack.pop(), Some(0x300));
    /// ```
    pub fn push(&mut self, addr: Adr) -> bool {
        if self.is_full() {
            self.entries[STACK_DEPTH - 1] = addr;
            return false;
        }
        self.entries[self.sp] = addr;
        self.sp += 1;
        true
    }

    /// Pops the most recently pushed address, if any
    pub fn pop(&mut self) -> Option<Adr> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.entries[self.sp])
    }

    /// Gets the live entries, oldest first
    pub fn as_slice(&self) -> &[Adr] {
        &self.entries[..self.sp]
    }

    /// Discards every entry
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.as_slice().iter().map(|addr| format!("{addr:03x}")))
            .finish()
    }
}
