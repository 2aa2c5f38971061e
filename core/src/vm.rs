use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::constants::{FONT, FONT_BASE, PROGRAM_CAPACITY, PROGRAM_START, RAM_SIZE, REGISTER_COUNT};
use crate::display::{Display, Event};
use crate::instruction::Instruction;
use crate::opcode::word_from_bytes;
use crate::random::Random;
use crate::stack::CallStack;
use crate::timer::DelayTimer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("program of {0} bytes exceeds the 3584 byte program area")]
    TooLarge(usize),
}

/// Behavioral switches for operations that historical interpreters disagree
/// on. ROMs written for the COSMAC VIP expect shifts to read Vy; ROMs
/// written for SUPER-CHIP machines expect them to read Vx.
#[derive(Clone, Copy, Debug)]
pub struct Quirks {
    pub shift_reads_vy: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_reads_vy: true,
        }
    }
}

/// # Chip-8 VM
/// Owns memory, the register file, the program counter, the index register,
/// the call stack and the delay timer, and drives fetch -> decode ->
/// execute -> event poll against the display and random collaborators.
///
/// Tracks two states: `Running`, and `WaitingForKey` whenever `waiting_key`
/// holds the register a pressed key should land in. While waiting, no
/// instructions execute but event polling and the timer keep going.
pub struct Vm<D: Display, R: Random> {
    pub(crate) memory: [u8; RAM_SIZE],
    pub(crate) v: [u8; REGISTER_COUNT],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: CallStack,
    pub(crate) delay_timer: DelayTimer,
    pub(crate) sound_timer: u8,
    pub(crate) waiting_key: Option<u8>,
    pub(crate) quirks: Quirks,
    pub(crate) display: D,
    pub(crate) random: R,
}

impl<D: Display, R: Random> Vm<D, R> {
    pub fn new(display: D, random: R) -> Self {
        Self::with_quirks(display, random, Quirks::default())
    }

    pub fn with_quirks(display: D, random: R, quirks: Quirks) -> Self {
        let mut memory = [0; RAM_SIZE];
        memory[FONT_BASE as usize..FONT_BASE as usize + FONT.len()].copy_from_slice(&FONT);

        Vm {
            memory,
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            stack: CallStack::new(),
            delay_timer: DelayTimer::new(),
            sound_timer: 0,
            waiting_key: None,
            quirks,
            display,
            random,
        }
    }

    /// Copies a program into memory at 0x200.
    ///
    /// Programs that don't fit the program area are rejected rather than
    /// silently truncated.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > PROGRAM_CAPACITY {
            return Err(LoadError::TooLarge(bytes.len()));
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
        info!("loaded {} byte program at {:#05X}", bytes.len(), PROGRAM_START);
        Ok(())
    }

    /// Runs until a quit event arrives or the fetch reads the zero word.
    ///
    /// The zero word is not a Chip-8 instruction; halting on it keeps
    /// truncated ROMs from executing the rest of empty memory.
    pub fn run(&mut self) {
        self.delay_timer.start();
        loop {
            if self.waiting_key.is_none() && self.step() {
                return;
            }

            match self.display.poll_events() {
                Event::Quit => return,
                Event::Keyboard => self.complete_key_wait(),
                Event::None => {}
            }
        }
    }

    /// One fetch/decode/execute cycle. Returns whether the zero word halted
    /// the machine.
    ///
    /// The program counter advances past the fetched word before execution,
    /// so every opcode sees the address of its successor and jumping
    /// opcodes simply overwrite the counter.
    fn step(&mut self) -> bool {
        let word = self.fetch();
        if word == 0x0000 {
            return true;
        }
        let at = self.pc;
        self.pc = self.pc.wrapping_add(2);

        match Instruction::decode(word) {
            Some(instruction) => {
                trace!("{:#05X}: {:04X} {:?}", at, word, instruction);
                self.execute(instruction);
            }
            None => warn!("{:#05X}: unknown word {:04X}, skipped", at, word),
        }
        false
    }

    /// The word at the program counter; two consecutive bytes, high first.
    fn fetch(&self) -> u16 {
        let high = self.read_memory(self.pc);
        let low = self.read_memory(self.pc.wrapping_add(1));
        word_from_bytes(high, low)
    }

    /// Finishes a pending 0xFX0A by storing the pressed key and resuming.
    fn complete_key_wait(&mut self) {
        if let Some(x) = self.waiting_key.take() {
            let key = self.display.get_key();
            debug!("key {:#04X} -> V{:X}", key, x);
            self.v[x as usize] = key;
        }
    }

    /// Interpreter memory accesses wrap their effective address so a
    /// walked-past-the-end index register can never write outside the
    /// 4096-byte array.
    pub(crate) fn read_memory(&self, address: u16) -> u8 {
        self.memory[(address & 0x0FFF) as usize]
    }

    pub(crate) fn write_memory(&mut self, address: u16, value: u8) {
        self.memory[(address & 0x0FFF) as usize] = value;
    }
}
