// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::{
    mem::{ADDRESS_MASK, MEMORY_SIZE},
    *,
};
use rand::random;

impl CPU {
    /// Executes a single [Insn] against the CPU.
    ///
    /// This doesn't advance `pc` or tick the timers; [CPU::tick] does that.
    ///
    /// On error, the CPU is left as it was, except for [Error::StackOverflow],
    /// where the call still happens. A hand-built [Insn] naming a register
    /// past vF fails with [Error::RegisterNotFound].
    /// # Examples
    /// ```rust
    /// # use vip8::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.execute(Insn::movb { x: 0x3, B: 0xfe }).unwrap();
    /// cpu.execute(Insn::addb { x: 0x3, B: 0x03 }).unwrap();
    /// assert_eq!(cpu.v()[0x3], 0x01);
    /// assert_eq!(cpu.v()[0xf], 1);
    /// assert!(cpu.execute(Insn::dmao { x: 0x20 }).is_err());
    /// ```
    #[rustfmt::skip]
    pub fn execute(&mut self, instruction: Insn) -> Result<()> {
        if let Some(reg) = instruction
            .registers()
            .into_iter()
            .flatten()
            .find(|&reg| reg >= self.v.len())
        {
            return Err(Error::RegisterNotFound { reg });
        }
        match instruction {
            Insn::cls               => self.clear_screen(),
            Insn::ret               => self.ret()?,
            Insn::jmp   {       A } => self.jump(A),
            Insn::call  {       A } => self.call(A)?,
            Insn::seb   {    x, B } => self.skip_equals_immediate(x, B),
            Insn::sneb  {    x, B } => self.skip_not_equals_immediate(x, B),
            Insn::se    { y, x    } => self.skip_equals(x, y),
            Insn::movb  {    x, B } => self.load_immediate(x, B),
            Insn::addb  {    x, B } => self.add_immediate(x, B),
            Insn::mov   { y, x    } => self.load(x, y),
            Insn::or    { y, x    } => self.or(x, y),
            Insn::and   { y, x    } => self.and(x, y),
            Insn::xor   { y, x    } => self.xor(x, y),
            Insn::add   { y, x    } => self.add(x, y),
            Insn::sub   { y, x    } => self.sub(x, y),
            Insn::shr   {    x, ..} => self.shift_right(x),
            Insn::bsub  { y, x    } => self.backwards_sub(x, y),
            Insn::shl   {    x, ..} => self.shift_left(x),
            Insn::sne   { y, x    } => self.skip_not_equals(x, y),
            Insn::movI  {       A } => self.load_i_immediate(A),
            Insn::jmpr  {       A } => self.jump_indexed(A)?,
            Insn::rand  {    x, B } => self.rand(x, B),
            Insn::draw  { y, x, n } => self.draw(x, y, n)?,
            Insn::sek   {    x    } => self.skip_key_equals(x),
            Insn::snek  {    x    } => self.skip_key_not_equals(x),
            Insn::getdt {    x    } => self.load_delay_timer(x),
            Insn::waitk {    x    } => self.wait_for_key(x),
            Insn::setdt {    x    } => self.store_delay_timer(x),
            Insn::movst {    x    } => self.store_sound_timer(x),
            Insn::addI  {    x    } => self.add_i(x),
            Insn::font  {    x    } => self.load_sprite(x)?,
            Insn::bcd   {    x    } => self.bcd_convert(x)?,
            Insn::dmao  {    x    } => self.store_dma(x)?,
            Insn::dmai  {    x    } => self.load_dma(x)?,
        }
        Ok(())
    }
}

/// |`00nn`| System instructions
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) {
        self.screen.clear();
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// The stack holds the address of the call, so execution resumes just after it.
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<()> {
        let call = self.stack.pop().ok_or(Error::NoCall { pc: self.pc })?;
        self.pc = call.wrapping_add(INSN_WIDTH);
        Ok(())
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        self.pc = a;
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    ///
    /// If the stack is full, the top entry is overwritten, the jump still
    /// happens, and [Error::StackOverflow] is returned.
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<()> {
        let pushed = self.stack.push(self.pc);
        self.pc = a;
        if !pushed {
            log::warn!("stack overflow: call {a:03x} overwrote the top of the stack");
            return Err(Error::StackOverflow { addr: a });
        }
        Ok(())
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] == b {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] != b {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }
    }
}

/// |`5xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`5XY0`| Skip next instruction if vX == vY  |
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX, then sets vF=carry
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(b);
        self.v[FLAG] = carry.into();
    }
}

/// |`8xyn`| Performs ALU operation
///
/// vF is always written last, so an ALU op targeting vF leaves only the flag.
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = X >> 1; Set vF=shifted bit     |
/// |`8xy7`| X = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = X << 1; Set vF=shifted bit     |
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[FLAG] = carry.into();
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    ///
    /// vF is 0 when vY > vX (a borrow occurred), and 1 otherwise
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[FLAG] = (!borrow).into();
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg) {
        let shift_out = self.v[x] & 1;
        self.v[x] >>= 1;
        self.v[FLAG] = shift_out;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    ///
    /// vF is 0 when vX > vY (a borrow occurred), and 1 otherwise
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[FLAG] = (!borrow).into();
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg) {
        let shift_out = self.v[x] >> 7;
        self.v[x] <<= 1;
        self.v[FLAG] = shift_out;
    }
}

/// |`9xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`9XY0`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a & ADDRESS_MASK;
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// Fails with [Error::MemoryAddressNotFound] if that lands outside memory
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) -> Result<()> {
        let target = a as usize + self.v[0] as usize;
        if target >= MEMORY_SIZE {
            return Err(Error::MemoryAddressNotFound { addr: target });
        }
        self.pc = target as Adr;
        Ok(())
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) {
        self.v[x] = random::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// The sprite is read from memory at I, one byte per row, and XORed onto the
    /// screen, wrapping at the edges. vF is set to 1 if any lit pixel was turned
    /// off, and 0 otherwise.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) -> Result<()> {
        let (x, y) = (self.v[x] as usize, self.v[y] as usize);
        let sprite = self.mem.range(self.i as usize, n as usize)?;
        let collided = self.screen.draw_sprite(x, y, sprite);
        self.v[FLAG] = collided.into();
        Ok(())
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// Both consume the oldest unread key, if there is one.
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key == vX |
/// |`eXa1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key == vX
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) {
        if self.keys.pop() == Some(self.v[x]) {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }
    }
    /// |`ExA1`| Skip next instruction if key != vX
    ///
    /// An empty queue counts as "not pressed"
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) {
        if self.keys.pop() != Some(self.v[x]) {
            self.pc = self.pc.wrapping_add(INSN_WIDTH);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// With no key queued, sets keypause and leaves vX alone. The cycle won't
    /// advance pc, so this runs again next cycle.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        if let Some(key) = self.keys.pop() {
            self.v[x] = key;
            self.flags.keypause = false;
        } else {
            if !self.flags.keypause {
                log::debug!("waiting for key at {:03x}", self.pc);
            }
            self.flags.keypause = true;
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`Fx1e`| Add vX to I,
    /// ```py
    /// I += vX;
    /// ```
    /// I wraps within the 12-bit address space.
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr) & ADDRESS_MASK;
    }
    /// |`Fx29`| Load sprite for character vX into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) -> Result<()> {
        let value = self.v[x];
        if value > 0xf {
            return Err(Error::InvalidArguments { value });
        }
        self.i = value as Adr * mem::GLYPH_SIZE as Adr;
        Ok(())
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Result<()> {
        let x = self.v[x];
        self.mem
            .range_mut(self.i as usize, 3)?
            .copy_from_slice(&[x / 100, x / 10 % 10, x % 10]);
        Ok(())
    }
    /// |`Fx55`| DMA Stor from registers 0..=X to I
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) -> Result<()> {
        self.mem
            .range_mut(self.i as usize, x + 1)?
            .copy_from_slice(&self.v[..=x]);
        Ok(())
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) -> Result<()> {
        let data = self.mem.range(self.i as usize, x + 1)?;
        self.v[..=x].copy_from_slice(data);
        Ok(())
    }
}
