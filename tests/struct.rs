//! Exercises the derived and hand-written trait impls on vip8's public types
use std::{collections::hash_map::DefaultHasher, hash::Hash};
use vip8::{
    cpu::stack::Stack,
    prelude::{Region::*, *},
};

mod cpu {
    use super::*;
    #[test]
    fn default_clone_eq_debug() {
        let cpu = CPU::default(); // Default
        let cpu2 = cpu.clone(); // Clone
        assert_eq!(cpu, cpu2); // PartialEq
        assert_eq!(cpu, CPU::new());
        println!("{cpu:?}"); // Debug
    }
    #[test]
    fn ne_after_tick() {
        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x60, 0x01]).unwrap();
        let before = cpu.clone();
        cpu.tick().unwrap();
        assert_ne!(before, cpu);
    }
}

mod flags {
    use super::*;
    #[test]
    fn clone_eq_debug() {
        let mut flags = Flags::default();
        flags.debug();
        let flags2 = flags.clone();
        assert_eq!(flags, flags2);
        assert_ne!(flags, Flags::default());
        println!("{flags:?}");
    }
    #[test]
    fn ord() {
        let on = Flags {
            debug: true,
            ..Default::default()
        };
        assert!(Flags::default() < on);
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Flags::default().hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod region {
    use super::*;
    #[test]
    fn copy() {
        let r1 = Program;
        let r2 = r1;
        assert_eq!(r1, r2);
    }
    #[test]
    fn display() {
        assert_eq!("CharsetReservedProgram", format!("{Charset}{Reserved}{Program}"));
    }
    #[test]
    fn ord() {
        assert_eq!(Program, Charset.max(Reserved).max(Program));
        assert!(Charset < Reserved && Reserved < Program);
    }
    #[test]
    fn ranges_tile_memory() {
        assert_eq!(0, Charset.range().start);
        assert_eq!(Charset.range().end, Reserved.range().start);
        assert_eq!(Reserved.range().end, Program.range().start);
        assert_eq!(0x1000, Program.range().end);
    }
}

mod mem {
    use super::*;
    #[test]
    fn clone_eq_debug() {
        let mem = Mem::new();
        assert_eq!(mem, mem.clone());
        assert_eq!(0x1000, mem.len());
        assert!(!mem.is_empty());
        println!("{mem:?}");
    }
    #[test]
    fn regions() {
        let mut mem = Mem::new();
        mem.load_program(&[0xff; 4]).unwrap();
        assert_eq!(&[0xff; 4], &mem.region(Program)[..4]);
        mem.clear_region(Program);
        assert!(mem.region(Program).iter().all(|&b| b == 0));
        assert_eq!(0xf0, mem.region(Charset)[0]);
    }
    #[test]
    fn window_display() {
        let mem = Mem::new();
        println!("{}", mem.window(Charset.range()));
    }
}

mod stack {
    use super::*;
    #[test]
    fn copy_eq_debug() {
        let mut stack = Stack::new();
        stack.push(0x202);
        let copy = stack;
        assert_eq!(stack, copy);
        assert_eq!(&[0x202], stack.as_slice());
        println!("{stack:?}");
    }
}

mod keys {
    use super::*;
    #[test]
    fn clone_eq_debug() {
        let mut keys = KeyQueue::default();
        keys.push(Some(0xa)).unwrap();
        assert_eq!(keys, keys.clone());
        assert_ne!(keys, KeyQueue::new());
        println!("{keys:?}");
    }
}

mod screen {
    use super::*;
    #[test]
    fn clone_eq_debug_display() {
        let mut screen = Screen::default();
        screen.draw_row(0, 0, 0xff);
        assert_eq!(screen, screen.clone());
        assert_ne!(screen, Screen::new());
        println!("{screen:?}\n{screen}");
    }
}

mod insn {
    use super::*;
    #[test]
    fn copy_eq_hash_display() {
        let insn = Insn::from_word(0x6a42).unwrap();
        let copy = insn;
        assert_eq!(insn, copy);
        let mut hasher = DefaultHasher::new();
        insn.hash(&mut hasher);
        println!("{insn} {insn:?}");
    }
    #[test]
    fn try_from() {
        assert_eq!(Insn::try_from(0x00e0_u16).unwrap(), Insn::cls);
        assert!(Insn::try_from(0x0000_u16).is_err());
    }
}

mod dis {
    use super::*;
    #[test]
    fn default_is_colored() {
        assert_ne!(Dis::default(), Dis::plain());
    }
    #[test]
    fn plain_contains_insn_display() {
        let dis = Dis::plain();
        for word in [0x00e0, 0x1234, 0x8ab4, 0xd125, 0xf365] {
            let insn = Insn::from_word(word).unwrap();
            assert!(dis.once(word).contains(insn.to_string().trim_end()));
        }
    }
}

mod error {
    use super::*;
    #[test]
    fn display() {
        for (err, text) in [
            (Error::InvalidOpcode { word: 0xffff }, "opcode ffff not recognized"),
            (
                Error::MemoryAddressNotFound { addr: 0x1000 },
                "address 1000 is not present in memory",
            ),
            (
                Error::RegisterNotFound { reg: 16 },
                "tried to access register v10 which does not exist",
            ),
            (Error::InvalidArguments { value: 0x10 }, "argument 10 is out of range"),
            (Error::StackOverflow { addr: 0x200 }, "stack overflow calling 200"),
            (Error::NoCall { pc: 0x202 }, "return at 202 with no matching call"),
            (
                Error::RomTooBig { len: 0xe01, max: 0xe00 },
                "rom is 3585 bytes, but only 3584 bytes fit in memory",
            ),
            (
                Error::InvalidKey { key: 0x10 },
                "tried to press key 10 which does not exist",
            ),
        ] {
            assert_eq!(text, err.to_string());
        }
    }
    #[test]
    fn recoverable() {
        assert!(Error::StackOverflow { addr: 0 }.is_recoverable());
        assert!(!Error::NoCall { pc: 0 }.is_recoverable());
        assert!(!Error::InvalidOpcode { word: 0 }.is_recoverable());
    }
}
