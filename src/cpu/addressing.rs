//! Addressing-mode resolver: turns an opcode's mode into an effective
//! address, consuming operand bytes at PC and reporting page crossings.

use crate::bus::CpuBus;
use crate::cartridge::MemoryError;

use super::Cpu;

/// The thirteen 6502 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
}

impl AddressingMode {
    /// Operand bytes the mode consumes after the opcode.
    pub fn operand_len(self) -> u16 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | IndexedIndirect
            | IndirectIndexed => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }
}

/// Effective address plus whether index arithmetic carried into the high
/// address byte (the dispatcher turns that into an extra cycle for
/// page-sensitive opcodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub addr: u16,
    pub page_crossed: bool,
}

impl Resolved {
    fn at(addr: u16) -> Self {
        Resolved {
            addr,
            page_crossed: false,
        }
    }
}

fn crossed(base: u16, addr: u16) -> bool {
    (base & 0xFF00) != (addr & 0xFF00)
}

pub(crate) fn resolve(
    cpu: &mut Cpu,
    bus: &mut dyn CpuBus,
    mode: AddressingMode,
) -> Result<Resolved, MemoryError> {
    use AddressingMode::*;
    match mode {
        // No memory operand; the dispatcher never dereferences this.
        Implied | Accumulator => Ok(Resolved::at(0)),
        // The operand byte itself. Relative leaves interpretation of the
        // offset to the branch executor.
        Immediate | Relative => {
            let addr = cpu.pc;
            cpu.pc = cpu.pc.wrapping_add(1);
            Ok(Resolved::at(addr))
        }
        ZeroPage => {
            let aa = cpu.fetch_byte(bus)?;
            Ok(Resolved::at(aa as u16))
        }
        ZeroPageX => {
            let aa = cpu.fetch_byte(bus)?;
            Ok(Resolved::at(aa.wrapping_add(cpu.x) as u16))
        }
        ZeroPageY => {
            let aa = cpu.fetch_byte(bus)?;
            Ok(Resolved::at(aa.wrapping_add(cpu.y) as u16))
        }
        Absolute => {
            let base = cpu.fetch_word(bus)?;
            Ok(Resolved::at(base))
        }
        AbsoluteX => {
            let base = cpu.fetch_word(bus)?;
            let addr = base.wrapping_add(cpu.x as u16);
            Ok(Resolved {
                addr,
                page_crossed: crossed(base, addr),
            })
        }
        AbsoluteY => {
            let base = cpu.fetch_word(bus)?;
            let addr = base.wrapping_add(cpu.y as u16);
            Ok(Resolved {
                addr,
                page_crossed: crossed(base, addr),
            })
        }
        Indirect => {
            let ptr = cpu.fetch_word(bus)?;
            let low = bus.read(ptr)? as u16;
            let high = bus.read(ptr.wrapping_add(1))? as u16;
            Ok(Resolved::at((high << 8) | low))
        }
        IndexedIndirect => {
            // Pointer and pointer+1 both wrap within the zero page.
            let aa = cpu.fetch_byte(bus)?;
            let ptr = aa.wrapping_add(cpu.x);
            let low = bus.read(ptr as u16)? as u16;
            let high = bus.read(ptr.wrapping_add(1) as u16)? as u16;
            Ok(Resolved::at((high << 8) | low))
        }
        IndirectIndexed => {
            let aa = cpu.fetch_byte(bus)?;
            let low = bus.read(aa as u16)? as u16;
            let high = bus.read(aa.wrapping_add(1) as u16)? as u16;
            let base = (high << 8) | low;
            let addr = base.wrapping_add(cpu.y as u16);
            Ok(Resolved {
                addr,
                page_crossed: crossed(base, addr),
            })
        }
    }
}
