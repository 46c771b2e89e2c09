//! Instruction dispatcher: the fetch-decode-execute core.
//!
//! One call to [`Cpu::step`] executes exactly one complete instruction and
//! returns its total cycle cost, including page-crossing and branch
//! penalties, so a host clock loop can synchronize this chip against the
//! others. The dispatcher owns the register file; all memory traffic goes
//! through the [`CpuBus`] it is handed.

use bitflags::bitflags;
use std::fmt;

use crate::bus::CpuBus;
use crate::cartridge::MemoryError;

pub mod addressing;
pub mod opcodes;

mod flags;

#[cfg(test)]
mod tests;

pub use addressing::{AddressingMode, Resolved};
pub use opcodes::{opcode, Op, OpcodeEntry, OPCODE_TABLE};

bitflags! {
    /// Processor status register. The unused bit reads as 1 on hardware and
    /// is kept set at all times.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const UNUSED = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

/// Stack lives in page one of internal RAM.
pub const STACK_BASE: u16 = 0x0100;

const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// Recoverable execution failures, reported to the driver per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// Opcode byte with no defined behavior. PC is left just past the
    /// opcode so the host can log and decide to halt or skip.
    UnsupportedOpcode { opcode: u8, pc: u16 },
    Memory(MemoryError),
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::UnsupportedOpcode { opcode, pc } => {
                write!(f, "unsupported opcode {:#04x} at {:#06x}", opcode, pc)
            }
            CpuError::Memory(e) => write!(f, "memory error: {}", e),
        }
    }
}

impl std::error::Error for CpuError {}

impl From<MemoryError> for CpuError {
    fn from(e: MemoryError) -> Self {
        CpuError::Memory(e)
    }
}

pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: StatusFlags,
    pub(crate) cycles: u64,
}

impl Cpu {
    pub fn new() -> Self {
        debug_assert!(opcodes::table_is_consistent());
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: StatusFlags::from_bits_truncate(0x24),
            cycles: 0,
        }
    }

    /// Documented power-up/reset state; PC comes from the reset vector.
    pub fn reset(&mut self, bus: &mut dyn CpuBus) -> Result<(), MemoryError> {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = StatusFlags::from_bits_truncate(0x24);
        let low = bus.read(RESET_VECTOR)? as u16;
        let high = bus.read(RESET_VECTOR.wrapping_add(1))? as u16;
        self.pc = (high << 8) | low;
        self.cycles = 8;
        Ok(())
    }

    /// Total cycles executed since reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn flag(&self, flag: StatusFlags) -> bool {
        self.status.contains(flag)
    }

    /// Executes exactly one instruction and returns its cycle cost.
    pub fn step(&mut self, bus: &mut dyn CpuBus) -> Result<u8, CpuError> {
        let pc = self.pc;
        let byte = bus.read(pc)?;
        self.pc = pc.wrapping_add(1);

        let entry = opcodes::opcode(byte);
        if entry.op == Op::Unknown {
            log::error!("unsupported opcode {:#04x} at {:#06x}", byte, pc);
            return Err(CpuError::UnsupportedOpcode { opcode: byte, pc });
        }

        let cycles = self.execute(entry, bus)?;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    fn execute(&mut self, entry: &'static OpcodeEntry, bus: &mut dyn CpuBus) -> Result<u8, CpuError> {
        use Op::*;

        let mut cycles = entry.cycles;

        match entry.op {
            Lda | Ldx | Ldy => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let v = bus.read(r.addr)?;
                match entry.op {
                    Lda => self.a = v,
                    Ldx => self.x = v,
                    _ => self.y = v,
                }
                flags::update(&mut self.status, entry, v, 0, v as u16);
                if entry.page_sensitive && r.page_crossed {
                    cycles += 1;
                }
            }

            Sta | Stx | Sty => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let v = match entry.op {
                    Sta => self.a,
                    Stx => self.x,
                    _ => self.y,
                };
                bus.write(r.addr, v)?;
            }

            Tax | Tay | Tsx | Txa | Txs | Tya => {
                let v = match entry.op {
                    Tax | Tay => self.a,
                    Tsx => self.sp,
                    Txa | Txs => self.x,
                    _ => self.y,
                };
                match entry.op {
                    Tax | Tsx => self.x = v,
                    Tay => self.y = v,
                    Txa | Tya => self.a = v,
                    _ => self.sp = v,
                }
                flags::update(&mut self.status, entry, v, 0, v as u16);
            }

            Adc | Sbc => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let m = bus.read(r.addr)?;
                // Subtraction is addition of the complemented operand; the
                // flag engine's carry and overflow rules then apply as-is.
                let operand = if entry.op == Sbc { m ^ 0xFF } else { m };
                let a = self.a;
                let carry_in = self.status.contains(StatusFlags::CARRY) as u16;
                let result = a as u16 + operand as u16 + carry_in;
                self.a = result as u8;
                flags::update(&mut self.status, entry, a, operand, result);
                if entry.page_sensitive && r.page_crossed {
                    cycles += 1;
                }
            }

            And | Ora | Eor => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let m = bus.read(r.addr)?;
                let v = match entry.op {
                    And => self.a & m,
                    Ora => self.a | m,
                    _ => self.a ^ m,
                };
                self.a = v;
                flags::update(&mut self.status, entry, v, m, v as u16);
                if entry.page_sensitive && r.page_crossed {
                    cycles += 1;
                }
            }

            Bit => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let m = bus.read(r.addr)?;
                let a = self.a;
                flags::update(&mut self.status, entry, a, m, (a & m) as u16);
            }

            Asl | Lsr | Rol | Ror => {
                let carry_in = self.status.contains(StatusFlags::CARRY) as u8;
                if entry.mode == AddressingMode::Accumulator {
                    let v = self.a;
                    let out = shifted(entry.op, v, carry_in);
                    self.a = out;
                    flags::update(&mut self.status, entry, v, 0, out as u16);
                } else {
                    let r = addressing::resolve(self, bus, entry.mode)?;
                    let v = bus.read(r.addr)?;
                    let out = shifted(entry.op, v, carry_in);
                    bus.write(r.addr, out)?;
                    flags::update(&mut self.status, entry, v, 0, out as u16);
                }
            }

            Inc | Dec => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let v = bus.read(r.addr)?;
                let out = if entry.op == Inc {
                    v.wrapping_add(1)
                } else {
                    v.wrapping_sub(1)
                };
                bus.write(r.addr, out)?;
                flags::update(&mut self.status, entry, v, 0, out as u16);
            }

            Inx | Iny | Dex | Dey => {
                let out = match entry.op {
                    Inx => self.x.wrapping_add(1),
                    Dex => self.x.wrapping_sub(1),
                    Iny => self.y.wrapping_add(1),
                    _ => self.y.wrapping_sub(1),
                };
                match entry.op {
                    Inx | Dex => self.x = out,
                    _ => self.y = out,
                }
                flags::update(&mut self.status, entry, out, 0, out as u16);
            }

            Cmp | Cpx | Cpy => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                let m = bus.read(r.addr)?;
                let reg = match entry.op {
                    Cmp => self.a,
                    Cpx => self.x,
                    _ => self.y,
                };
                let diff = reg.wrapping_sub(m);
                flags::update(&mut self.status, entry, reg, m, diff as u16);
                if entry.page_sensitive && r.page_crossed {
                    cycles += 1;
                }
            }

            Bcc | Bcs | Beq | Bne | Bmi | Bpl | Bvc | Bvs => {
                let taken = match entry.op {
                    Bcc => !self.status.contains(StatusFlags::CARRY),
                    Bcs => self.status.contains(StatusFlags::CARRY),
                    Beq => self.status.contains(StatusFlags::ZERO),
                    Bne => !self.status.contains(StatusFlags::ZERO),
                    Bmi => self.status.contains(StatusFlags::NEGATIVE),
                    Bpl => !self.status.contains(StatusFlags::NEGATIVE),
                    Bvs => self.status.contains(StatusFlags::OVERFLOW),
                    _ => !self.status.contains(StatusFlags::OVERFLOW),
                };
                let r = addressing::resolve(self, bus, entry.mode)?;
                let offset = bus.read(r.addr)? as i8;
                if taken {
                    // Taken branches cost one extra cycle, two when the
                    // target sits on a different page than the next
                    // instruction would have.
                    let target = self.pc.wrapping_add(offset as u16);
                    cycles += 1;
                    if (self.pc & 0xFF00) != (target & 0xFF00) {
                        cycles += 1;
                    }
                    self.pc = target;
                }
            }

            Jmp => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                self.pc = r.addr;
            }

            Jsr => {
                let r = addressing::resolve(self, bus, entry.mode)?;
                // Return address is the last byte of the JSR instruction.
                let ret = self.pc.wrapping_sub(1);
                self.push(bus, (ret >> 8) as u8)?;
                self.push(bus, ret as u8)?;
                self.pc = r.addr;
            }

            Rts => {
                let low = self.pull(bus)? as u16;
                let high = self.pull(bus)? as u16;
                self.pc = ((high << 8) | low).wrapping_add(1);
            }

            Rti => {
                let p = self.pull(bus)?;
                self.load_status(p);
                let low = self.pull(bus)? as u16;
                let high = self.pull(bus)? as u16;
                self.pc = (high << 8) | low;
            }

            Pha => self.push(bus, self.a)?,

            Php => {
                // The pushed copy always carries B and the unused bit.
                let bits =
                    self.status.bits() | StatusFlags::BREAK.bits() | StatusFlags::UNUSED.bits();
                self.push(bus, bits)?;
            }

            Pla => {
                let v = self.pull(bus)?;
                self.a = v;
                flags::update(&mut self.status, entry, v, 0, v as u16);
            }

            Plp => {
                let p = self.pull(bus)?;
                self.load_status(p);
            }

            Clc | Sec | Cli | Sei | Cld | Sed | Clv => {
                flags::update(&mut self.status, entry, 0, 0, 0);
            }

            Brk => {
                // Two-byte instruction: the return address skips the
                // signature byte after the opcode.
                let ret = self.pc.wrapping_add(1);
                self.push(bus, (ret >> 8) as u8)?;
                self.push(bus, ret as u8)?;
                let bits =
                    self.status.bits() | StatusFlags::BREAK.bits() | StatusFlags::UNUSED.bits();
                self.push(bus, bits)?;
                flags::update(&mut self.status, entry, 0, 0, 0);
                let low = bus.read(IRQ_VECTOR)? as u16;
                let high = bus.read(IRQ_VECTOR.wrapping_add(1))? as u16;
                self.pc = (high << 8) | low;
            }

            Nop => {
                if entry.mode != AddressingMode::Implied {
                    // Undocumented NOPs still consume and read their
                    // operand.
                    let r = addressing::resolve(self, bus, entry.mode)?;
                    let _ = bus.read(r.addr)?;
                    if entry.page_sensitive && r.page_crossed {
                        cycles += 1;
                    }
                }
            }

            Unknown => unreachable!("rejected before dispatch"),
        }

        Ok(cycles)
    }

    pub(crate) fn fetch_byte(&mut self, bus: &mut dyn CpuBus) -> Result<u8, MemoryError> {
        let byte = bus.read(self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(byte)
    }

    pub(crate) fn fetch_word(&mut self, bus: &mut dyn CpuBus) -> Result<u16, MemoryError> {
        let low = self.fetch_byte(bus)? as u16;
        let high = self.fetch_byte(bus)? as u16;
        Ok((high << 8) | low)
    }

    fn push(&mut self, bus: &mut dyn CpuBus, value: u8) -> Result<(), MemoryError> {
        bus.write(STACK_BASE | self.sp as u16, value)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    fn pull(&mut self, bus: &mut dyn CpuBus) -> Result<u8, MemoryError> {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.sp as u16)
    }

    /// Whole-status load (PLP/RTI): B is discarded, unused forced to 1.
    fn load_status(&mut self, bits: u8) {
        self.status = (StatusFlags::from_bits_truncate(bits) - StatusFlags::BREAK)
            | StatusFlags::UNUSED;
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

fn shifted(op: Op, v: u8, carry_in: u8) -> u8 {
    match op {
        Op::Asl => v << 1,
        Op::Rol => (v << 1) | carry_in,
        Op::Lsr => v >> 1,
        Op::Ror => (v >> 1) | (carry_in << 7),
        _ => unreachable!(),
    }
}
