// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A bounded FIFO of keypress events
//!
//! The host pushes keys as they are pressed, and the CPU consumes them
//! oldest-first. An absent key (`None`) is the "no key" sentinel.

use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Maximum number of unread key events
pub const KEY_QUEUE_CAPACITY: usize = 32;

/// Number of keys on the keypad
pub const KEY_COUNT: u8 = 0x10;

/// A bounded queue of pressed keys (`0x0..=0xF`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyQueue {
    keys: VecDeque<u8>,
}

impl KeyQueue {
    /// Constructs an empty queue
    pub fn new() -> Self {
        KeyQueue {
            keys: VecDeque::with_capacity(KEY_QUEUE_CAPACITY),
        }
    }

    /// Queues a keypress, and reports whether it was queued.
    ///
    /// Pushing `None` does nothing. Pushing onto a full queue drops the key.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use vip8::keys::KeyQueue;
    /// let mut keys = KeyQueue::new();
    /// assert!(keys.push(Some(0x7)).unwrap());
    /// assert!(!keys.push(None).unwrap());
    /// assert!(keys.push(Some(0x10)).is_err());
    /// assert_eq!(keys.len(), 1);
    /// ```
    pub fn push(&mut self, key: Option<u8>) -> Result<bool> {
        let Some(key) = key else {
            return Ok(false);
        };
        if key >= KEY_COUNT {
            return Err(Error::InvalidKey { key });
        }
        if self.keys.len() >= KEY_QUEUE_CAPACITY {
            log::warn!("key queue full, dropping key {key:X}");
            return Ok(false);
        }
        self.keys.push_back(key);
        Ok(true)
    }

    /// Gets the oldest unread key without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.keys.front().copied()
    }

    /// Consumes the oldest unread key
    pub fn pop(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }

    /// Gets the number of unread keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if there are no unread keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Discards every unread key
    pub fn clear(&mut self) {
        self.keys.clear()
    }
}

impl Default for KeyQueue {
    fn default() -> Self {
        Self::new()
    }
}
