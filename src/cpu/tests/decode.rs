// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
use super::*;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new CPU
/// returns the CPU for inspection
fn run_single_op(op: &[u8]) -> CPU {
    let mut cpu = CPU::default();
    cpu.load_program_bytes(op).unwrap();
    cpu.v = *INDX;
    cpu.i = 0x300;
    cpu.tick().unwrap(); // will panic if unimplemented
    cpu
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test]                 fn cls()   { run_single_op(b"\x00\xe0"); }
    #[test] #[should_panic] fn ret()   { run_single_op(b"\x00\xee"); }
    #[test] #[should_panic] fn u0420() { run_single_op(b"\x04\x20"); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").pc); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").pc); }
}
#[rustfmt::skip]
mod seb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").pc); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").pc); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x40\x01").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x40\x00").pc); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x50\x00").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x50\x10").pc); }
    #[test] #[should_panic] fn u5ff1() { run_single_op(b"\x5f\xf1"); }
    #[test] #[should_panic] fn u5ff7() { run_single_op(b"\x5f\xf7"); }
    #[test] #[should_panic] fn u5fff() { run_single_op(b"\x5f\xff"); }
}
#[rustfmt::skip]
mod movb {
    use super::*;
    #[test] fn mov()  { assert_eq!(0xa5, run_single_op(b"\x63\xa5").v[0x3]); }
}
#[rustfmt::skip]
mod addb {
    use super::*;
    #[test] fn add()   { assert_eq!(0x08, run_single_op(b"\x73\x05").v[0x3]); }
    #[test] fn carry() { assert_eq!((0x02, 1), { let c = run_single_op(b"\x73\xff"); (c.v[0x3], c.v[0xf]) }); }
}
#[rustfmt::skip]
mod alu {
    use super::*;
    #[test] fn mov()  { assert_eq!(0x5, run_single_op(b"\x83\x50").v[0x3]); }
    #[test] fn or()   { assert_eq!(0x7, run_single_op(b"\x83\x51").v[0x3]); }
    #[test] fn and()  { assert_eq!(0x1, run_single_op(b"\x83\x52").v[0x3]); }
    #[test] fn xor()  { assert_eq!(0x6, run_single_op(b"\x83\x53").v[0x3]); }
    #[test] fn add()  { assert_eq!(0x8, run_single_op(b"\x83\x54").v[0x3]); }
    #[test] fn sub()  { assert_eq!(0xfe, run_single_op(b"\x83\x55").v[0x3]); }
    #[test] fn shr()  { assert_eq!(0x1, run_single_op(b"\x83\x56").v[0x3]); }
    #[test] fn bsub() { assert_eq!(0x2, run_single_op(b"\x83\x57").v[0x3]); }
    #[test] fn shl()  { assert_eq!(0x6, run_single_op(b"\x83\x5e").v[0x3]); }
    #[test] #[should_panic] fn u8ff8() { run_single_op(b"\x8f\xf8"); }
    #[test] #[should_panic] fn u8ffd() { run_single_op(b"\x8f\xfd"); }
    #[test] #[should_panic] fn u8fff() { run_single_op(b"\x8f\xff"); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x90\x10").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x90\x00").pc); }
    #[test] #[should_panic] fn u9ff1() { run_single_op(b"\x9f\xf1"); }
}
#[rustfmt::skip]
mod mem_ops {
    use super::*;
    #[test] fn movi()  { assert_eq!(0x123, run_single_op(b"\xa1\x23").i); }
    #[test] fn jmpr()  { assert_eq!(0x123, run_single_op(b"\xb1\x23").pc); }
    #[test] fn rand()  { assert_eq!(0x0, run_single_op(b"\xc3\x00").v[0x3]); }
    #[test] fn draw()  { assert_eq!(0x0, run_single_op(b"\xd0\x15").v[0xf]); }
}
#[rustfmt::skip]
mod keys {
    use super::*;
    #[test] fn sek()   { assert_eq!(0x202, run_single_op(b"\xe0\x9e").pc); }
    #[test] fn snek()  { assert_eq!(0x204, run_single_op(b"\xe0\xa1").pc); }
    #[test] fn waitk() { assert_eq!(0x200, run_single_op(b"\xf0\x0a").pc); }
    #[test] #[should_panic] fn ue09f() { run_single_op(b"\xe0\x9f"); }
}
#[rustfmt::skip]
mod io {
    use super::*;
    #[test] fn getdt() { assert_eq!(0x0, run_single_op(b"\xf3\x07").v[0x3]); }
    #[test] fn setdt() { assert_eq!(0x2, run_single_op(b"\xf3\x15").delay); }
    #[test] fn movst() { assert_eq!(0x2, run_single_op(b"\xf3\x18").sound); }
    #[test] fn addi()  { assert_eq!(0x303, run_single_op(b"\xf3\x1e").i); }
    #[test] fn font()  { assert_eq!(0xf, run_single_op(b"\xf3\x29").i); }
    #[test] fn bcd()   { assert_eq!(&[0, 1, 5], run_single_op(b"\xff\x33").mem.range(0x300, 3).unwrap()); }
    #[test] fn dmao()  { assert_eq!(INDX[..4], *run_single_op(b"\xf3\x55").mem.range(0x300, 4).unwrap()); }
    #[test] fn dmai()  { assert_eq!([0; 4], run_single_op(b"\xf3\x65").v[..4]); }
    #[test] #[should_panic] fn uf0ff() { run_single_op(b"\xf0\xff"); }
}

/// Decoding is pure, and every field comes from the expected nibbles
mod fields {
    use super::*;

    #[test]
    fn deterministic() {
        for word in 0..=0xffff_u16 {
            let first = Insn::from_word(word).ok();
            assert_eq!(first, Insn::from_word(word).ok());
        }
    }

    #[test]
    fn extracts_operands() {
        assert_eq!(Insn::from_word(0x1abc).unwrap(), Insn::jmp { A: 0xabc });
        assert_eq!(Insn::from_word(0x2fed).unwrap(), Insn::call { A: 0xfed });
        assert_eq!(Insn::from_word(0x3a5c).unwrap(), Insn::seb { x: 0xa, B: 0x5c });
        assert_eq!(Insn::from_word(0x8124).unwrap(), Insn::add { x: 0x1, y: 0x2 });
        assert_eq!(Insn::from_word(0xb321).unwrap(), Insn::jmpr { A: 0x321 });
        assert_eq!(Insn::from_word(0xd7e3).unwrap(), Insn::draw { x: 0x7, y: 0xe, n: 0x3 });
        assert_eq!(Insn::from_word(0xfc33).unwrap(), Insn::bcd { x: 0xc });
    }

    #[test]
    fn counts_valid_words() {
        // 2 fixed words, 10 `Xaaa`/`Xxbb`/`Dxyn` groups of 0x1000,
        // 11 `Xxy_` (of 0x100), and 11 `Fx__`/`Ex__` (of 0x10)
        let valid = (0..=0xffff_u16)
            .filter(|&word| Insn::from_word(word).is_ok())
            .count();
        assert_eq!(valid, 2 + 10 * 0x1000 + 11 * 0x100 + 11 * 0x10);
    }

    #[test]
    fn control_transfer() {
        for (word, transfers) in [
            (0x00ee, true),
            (0x1200, true),
            (0x2200, true),
            (0xb200, true),
            (0x00e0, false),
            (0x3000, false),
            (0xf00a, false),
        ] {
            assert_eq!(Insn::from_word(word).unwrap().transfers_control(), transfers);
        }
    }
}
