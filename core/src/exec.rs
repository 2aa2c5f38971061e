use log::warn;

use crate::constants::FONT_BASE;
use crate::display::Display;
use crate::instruction::Instruction;
use crate::opcode::split_decimal;
use crate::random::Random;
use crate::vm::Vm;

/// Instruction execution.
///
/// Every operation runs after the fetch has already advanced the program
/// counter past its word, so skips add a further 2 and jumping operations
/// overwrite the counter outright.
impl<D: Display, R: Random> Vm<D, R> {
    pub(crate) fn execute(&mut self, instruction: Instruction) {
        use Instruction::*;
        match instruction {
            ClearScreen => self.display.clear_screen(),
            Return => self.op_return(),
            Jump(nnn) => self.pc = nnn,
            Call(nnn) => self.op_call(nnn),
            SkipIfEqual(x, nn) => self.skip_if(self.v[x as usize] == nn),
            SkipIfNotEqual(x, nn) => self.skip_if(self.v[x as usize] != nn),
            SkipIfRegistersEqual(x, y) => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            SkipIfRegistersNotEqual(x, y) => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            SetRegister(x, nn) => self.v[x as usize] = nn,
            AddToRegister(x, nn) => {
                self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
            }
            Copy(x, y) => self.v[x as usize] = self.v[y as usize],
            Or(x, y) => self.v[x as usize] |= self.v[y as usize],
            And(x, y) => self.v[x as usize] &= self.v[y as usize],
            Xor(x, y) => self.v[x as usize] ^= self.v[y as usize],
            Add(x, y) => self.op_add(x, y),
            Subtract(x, y) => self.op_subtract(x, y),
            ShiftRight(x, y) => self.op_shift_right(x, y),
            SubtractReversed(x, y) => self.op_subtract_reversed(x, y),
            ShiftLeft(x, y) => self.op_shift_left(x, y),
            SetIndex(nnn) => self.i = nnn,
            JumpWithOffset(nnn) => self.pc = u16::from(self.v[0x0]) + nnn,
            Random(x, nn) => self.v[x as usize] = self.random.generate() & nn,
            Draw(x, y, n) => self.op_draw(x, y, n),
            ReadDelay(x) => self.v[x as usize] = self.delay_timer.get(),
            SetDelay(x) => self.delay_timer.set(self.v[x as usize]),
            SetSound(x) => self.sound_timer = self.v[x as usize],
            AddToIndex(x) => self.i = self.i.wrapping_add(u16::from(self.v[x as usize])),
            WaitForKey(x) => self.waiting_key = Some(x),
            FontCharacter(x) => self.i = FONT_BASE + u16::from(self.v[x as usize]) * 5,
            StoreDigits(x) => self.op_store_digits(x),
            StoreRegisters(x) => self.op_store_registers(x),
            LoadRegisters(x) => self.op_load_registers(x),
        }
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    /// Jumps to the subroutine and remembers the target address on the
    /// stack; the matching return resumes just past it.
    fn op_call(&mut self, nnn: u16) {
        self.pc = nnn;
        if let Err(fault) = self.stack.push(nnn) {
            warn!("call to {:#05X} dropped: {}", nnn, fault);
        }
    }

    fn op_return(&mut self) {
        match self.stack.pop() {
            Ok(address) => self.pc = address,
            Err(fault) => warn!("return skipped: {}", fault),
        }
    }

    /// Vx += Vy with the carry in VF.
    fn op_add(&mut self, x: u8, y: u8) {
        let (result, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
        self.v[x as usize] = result;
        self.v[0xF] = carry.into();
    }

    /// Vx -= Vy; VF is 1 unless the subtraction borrowed.
    fn op_subtract(&mut self, x: u8, y: u8) {
        let (result, borrow) = self.v[x as usize].overflowing_sub(self.v[y as usize]);
        self.v[x as usize] = result;
        self.v[0xF] = (!borrow).into();
    }

    /// Vx = Vy - Vx; VF is 1 unless the subtraction borrowed.
    fn op_subtract_reversed(&mut self, x: u8, y: u8) {
        let (result, borrow) = self.v[y as usize].overflowing_sub(self.v[x as usize]);
        self.v[x as usize] = result;
        self.v[0xF] = (!borrow).into();
    }

    fn op_shift_right(&mut self, x: u8, y: u8) {
        let source = self.shift_source(x, y);
        self.v[0xF] = source & 0x01;
        self.v[x as usize] = source >> 1;
    }

    fn op_shift_left(&mut self, x: u8, y: u8) {
        let source = self.shift_source(x, y);
        self.v[0xF] = (source & 0x80) >> 7;
        self.v[x as usize] = source << 1;
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        if self.quirks.shift_reads_vy {
            self.v[y as usize]
        } else {
            self.v[x as usize]
        }
    }

    /// Wraps the sprite origin into screen bounds, delegates the blit, and
    /// reports the collision in VF.
    fn op_draw(&mut self, x: u8, y: u8, n: u8) {
        let x_coord = self.v[x as usize] & 63;
        let y_coord = self.v[y as usize] & 31;
        self.v[0xF] = 0;
        let collided = self
            .display
            .draw_sprite(self.i, n, x_coord, y_coord, &self.memory);
        if collided {
            self.v[0xF] = 1;
        }
    }

    fn op_store_digits(&mut self, x: u8) {
        let (hundreds, tens, ones) = split_decimal(self.v[x as usize]);
        self.write_memory(self.i, hundreds);
        self.write_memory(self.i.wrapping_add(1), tens);
        self.write_memory(self.i.wrapping_add(2), ones);
    }

    fn op_store_registers(&mut self, x: u8) {
        for offset in 0..=u16::from(x) {
            self.write_memory(self.i.wrapping_add(offset), self.v[offset as usize]);
        }
    }

    fn op_load_registers(&mut self, x: u8) {
        for offset in 0..=u16::from(x) {
            self.v[offset as usize] = self.read_memory(self.i.wrapping_add(offset));
        }
    }
}
