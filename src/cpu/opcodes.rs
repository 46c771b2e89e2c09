//! 256-entry opcode metadata: operation kind, addressing mode, flag-affect
//! mask, base cycle count and page-cross sensitivity per opcode byte.
//!
//! The table is the single source of truth for decode; the dispatcher in
//! `cpu::mod` consults it and never hand-matches opcode bytes. Values follow
//! the documented NMOS 6502 reference. The stable undocumented NOPs are
//! encoded as `*NOP` with their known cycle costs; every other undocumented
//! byte decodes to [`Op::Unknown`] and surfaces as an error.

use super::addressing::AddressingMode;
use super::StatusFlags;

/// Operation kind: what the instruction does once its operand is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty,
    Tax, Tay, Tsx, Txa, Txs, Tya,
    /// No defined behavior; executing it is a recoverable error.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub op: Op,
    pub mode: AddressingMode,
    /// Flag-affect mask in status-register bit layout.
    pub flags: u8,
    /// Base cycle count, before page-cross and branch penalties.
    pub cycles: u8,
    /// Whether an index carry into the high address byte costs one cycle.
    pub page_sensitive: bool,
}

pub fn opcode(byte: u8) -> &'static OpcodeEntry {
    &OPCODE_TABLE[byte as usize]
}

// Flag-affect masks. PLP and RTI load the whole register directly in the
// dispatcher, so their mask here is empty.
const NONE: u8 = 0;
const NZ: u8 = StatusFlags::NEGATIVE.bits() | StatusFlags::ZERO.bits();
const NZC: u8 = NZ | StatusFlags::CARRY.bits();
const NVZ: u8 = NZ | StatusFlags::OVERFLOW.bits();
const NVZC: u8 = NZC | StatusFlags::OVERFLOW.bits();
const C: u8 = StatusFlags::CARRY.bits();
const I: u8 = StatusFlags::INTERRUPT_DISABLE.bits();
const D: u8 = StatusFlags::DECIMAL.bits();
const V: u8 = StatusFlags::OVERFLOW.bits();
const BI: u8 = StatusFlags::BREAK.bits() | StatusFlags::INTERRUPT_DISABLE.bits();

const fn e(
    mnemonic: &'static str,
    op: Op,
    mode: AddressingMode,
    flags: u8,
    cycles: u8,
) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        op,
        mode,
        flags,
        cycles,
        page_sensitive: false,
    }
}

// Page-cross-sensitive variant.
const fn ep(
    mnemonic: &'static str,
    op: Op,
    mode: AddressingMode,
    flags: u8,
    cycles: u8,
) -> OpcodeEntry {
    OpcodeEntry {
        mnemonic,
        op,
        mode,
        flags,
        cycles,
        page_sensitive: true,
    }
}

pub static OPCODE_TABLE: [OpcodeEntry; 256] = {
    use AddressingMode::*;
    const XX: OpcodeEntry = e("???", Op::Unknown, Implied, NONE, 0);
    let mut t = [XX; 256];

    t[0x00] = e("BRK", Op::Brk, Implied, BI, 7);
    t[0x01] = e("ORA", Op::Ora, IndexedIndirect, NZ, 6);
    t[0x05] = e("ORA", Op::Ora, ZeroPage, NZ, 3);
    t[0x06] = e("ASL", Op::Asl, ZeroPage, NZC, 5);
    t[0x08] = e("PHP", Op::Php, Implied, NONE, 3);
    t[0x09] = e("ORA", Op::Ora, Immediate, NZ, 2);
    t[0x0A] = e("ASL", Op::Asl, Accumulator, NZC, 2);
    t[0x0D] = e("ORA", Op::Ora, Absolute, NZ, 4);
    t[0x0E] = e("ASL", Op::Asl, Absolute, NZC, 6);

    t[0x10] = e("BPL", Op::Bpl, Relative, NONE, 2);
    t[0x11] = ep("ORA", Op::Ora, IndirectIndexed, NZ, 5);
    t[0x15] = e("ORA", Op::Ora, ZeroPageX, NZ, 4);
    t[0x16] = e("ASL", Op::Asl, ZeroPageX, NZC, 6);
    t[0x18] = e("CLC", Op::Clc, Implied, C, 2);
    t[0x19] = ep("ORA", Op::Ora, AbsoluteY, NZ, 4);
    t[0x1D] = ep("ORA", Op::Ora, AbsoluteX, NZ, 4);
    t[0x1E] = e("ASL", Op::Asl, AbsoluteX, NZC, 7);

    t[0x20] = e("JSR", Op::Jsr, Absolute, NONE, 6);
    t[0x21] = e("AND", Op::And, IndexedIndirect, NZ, 6);
    t[0x24] = e("BIT", Op::Bit, ZeroPage, NVZ, 3);
    t[0x25] = e("AND", Op::And, ZeroPage, NZ, 3);
    t[0x26] = e("ROL", Op::Rol, ZeroPage, NZC, 5);
    t[0x28] = e("PLP", Op::Plp, Implied, NONE, 4);
    t[0x29] = e("AND", Op::And, Immediate, NZ, 2);
    t[0x2A] = e("ROL", Op::Rol, Accumulator, NZC, 2);
    t[0x2C] = e("BIT", Op::Bit, Absolute, NVZ, 4);
    t[0x2D] = e("AND", Op::And, Absolute, NZ, 4);
    t[0x2E] = e("ROL", Op::Rol, Absolute, NZC, 6);

    t[0x30] = e("BMI", Op::Bmi, Relative, NONE, 2);
    t[0x31] = ep("AND", Op::And, IndirectIndexed, NZ, 5);
    t[0x35] = e("AND", Op::And, ZeroPageX, NZ, 4);
    t[0x36] = e("ROL", Op::Rol, ZeroPageX, NZC, 6);
    t[0x38] = e("SEC", Op::Sec, Implied, C, 2);
    t[0x39] = ep("AND", Op::And, AbsoluteY, NZ, 4);
    t[0x3D] = ep("AND", Op::And, AbsoluteX, NZ, 4);
    t[0x3E] = e("ROL", Op::Rol, AbsoluteX, NZC, 7);

    t[0x40] = e("RTI", Op::Rti, Implied, NONE, 6);
    t[0x41] = e("EOR", Op::Eor, IndexedIndirect, NZ, 6);
    t[0x45] = e("EOR", Op::Eor, ZeroPage, NZ, 3);
    t[0x46] = e("LSR", Op::Lsr, ZeroPage, NZC, 5);
    t[0x48] = e("PHA", Op::Pha, Implied, NONE, 3);
    t[0x49] = e("EOR", Op::Eor, Immediate, NZ, 2);
    t[0x4A] = e("LSR", Op::Lsr, Accumulator, NZC, 2);
    t[0x4C] = e("JMP", Op::Jmp, Absolute, NONE, 3);
    t[0x4D] = e("EOR", Op::Eor, Absolute, NZ, 4);
    t[0x4E] = e("LSR", Op::Lsr, Absolute, NZC, 6);

    t[0x50] = e("BVC", Op::Bvc, Relative, NONE, 2);
    t[0x51] = ep("EOR", Op::Eor, IndirectIndexed, NZ, 5);
    t[0x55] = e("EOR", Op::Eor, ZeroPageX, NZ, 4);
    t[0x56] = e("LSR", Op::Lsr, ZeroPageX, NZC, 6);
    t[0x58] = e("CLI", Op::Cli, Implied, I, 2);
    t[0x59] = ep("EOR", Op::Eor, AbsoluteY, NZ, 4);
    t[0x5D] = ep("EOR", Op::Eor, AbsoluteX, NZ, 4);
    t[0x5E] = e("LSR", Op::Lsr, AbsoluteX, NZC, 7);

    t[0x60] = e("RTS", Op::Rts, Implied, NONE, 6);
    t[0x61] = e("ADC", Op::Adc, IndexedIndirect, NVZC, 6);
    t[0x65] = e("ADC", Op::Adc, ZeroPage, NVZC, 3);
    t[0x66] = e("ROR", Op::Ror, ZeroPage, NZC, 5);
    t[0x68] = e("PLA", Op::Pla, Implied, NZ, 4);
    t[0x69] = e("ADC", Op::Adc, Immediate, NVZC, 2);
    t[0x6A] = e("ROR", Op::Ror, Accumulator, NZC, 2);
    t[0x6C] = e("JMP", Op::Jmp, Indirect, NONE, 5);
    t[0x6D] = e("ADC", Op::Adc, Absolute, NVZC, 4);
    t[0x6E] = e("ROR", Op::Ror, Absolute, NZC, 6);

    t[0x70] = e("BVS", Op::Bvs, Relative, NONE, 2);
    t[0x71] = ep("ADC", Op::Adc, IndirectIndexed, NVZC, 5);
    t[0x75] = e("ADC", Op::Adc, ZeroPageX, NVZC, 4);
    t[0x76] = e("ROR", Op::Ror, ZeroPageX, NZC, 6);
    t[0x78] = e("SEI", Op::Sei, Implied, I, 2);
    t[0x79] = ep("ADC", Op::Adc, AbsoluteY, NVZC, 4);
    t[0x7D] = ep("ADC", Op::Adc, AbsoluteX, NVZC, 4);
    t[0x7E] = e("ROR", Op::Ror, AbsoluteX, NZC, 7);

    t[0x81] = e("STA", Op::Sta, IndexedIndirect, NONE, 6);
    t[0x84] = e("STY", Op::Sty, ZeroPage, NONE, 3);
    t[0x85] = e("STA", Op::Sta, ZeroPage, NONE, 3);
    t[0x86] = e("STX", Op::Stx, ZeroPage, NONE, 3);
    t[0x88] = e("DEY", Op::Dey, Implied, NZ, 2);
    t[0x8A] = e("TXA", Op::Txa, Implied, NZ, 2);
    t[0x8C] = e("STY", Op::Sty, Absolute, NONE, 4);
    t[0x8D] = e("STA", Op::Sta, Absolute, NONE, 4);
    t[0x8E] = e("STX", Op::Stx, Absolute, NONE, 4);

    t[0x90] = e("BCC", Op::Bcc, Relative, NONE, 2);
    t[0x91] = e("STA", Op::Sta, IndirectIndexed, NONE, 6);
    t[0x94] = e("STY", Op::Sty, ZeroPageX, NONE, 4);
    t[0x95] = e("STA", Op::Sta, ZeroPageX, NONE, 4);
    t[0x96] = e("STX", Op::Stx, ZeroPageY, NONE, 4);
    t[0x98] = e("TYA", Op::Tya, Implied, NZ, 2);
    t[0x99] = e("STA", Op::Sta, AbsoluteY, NONE, 5);
    t[0x9A] = e("TXS", Op::Txs, Implied, NONE, 2);
    t[0x9D] = e("STA", Op::Sta, AbsoluteX, NONE, 5);

    t[0xA0] = e("LDY", Op::Ldy, Immediate, NZ, 2);
    t[0xA1] = e("LDA", Op::Lda, IndexedIndirect, NZ, 6);
    t[0xA2] = e("LDX", Op::Ldx, Immediate, NZ, 2);
    t[0xA4] = e("LDY", Op::Ldy, ZeroPage, NZ, 3);
    t[0xA5] = e("LDA", Op::Lda, ZeroPage, NZ, 3);
    t[0xA6] = e("LDX", Op::Ldx, ZeroPage, NZ, 3);
    t[0xA8] = e("TAY", Op::Tay, Implied, NZ, 2);
    t[0xA9] = e("LDA", Op::Lda, Immediate, NZ, 2);
    t[0xAA] = e("TAX", Op::Tax, Implied, NZ, 2);
    t[0xAC] = e("LDY", Op::Ldy, Absolute, NZ, 4);
    t[0xAD] = e("LDA", Op::Lda, Absolute, NZ, 4);
    t[0xAE] = e("LDX", Op::Ldx, Absolute, NZ, 4);

    t[0xB0] = e("BCS", Op::Bcs, Relative, NONE, 2);
    t[0xB1] = ep("LDA", Op::Lda, IndirectIndexed, NZ, 5);
    t[0xB4] = e("LDY", Op::Ldy, ZeroPageX, NZ, 4);
    t[0xB5] = e("LDA", Op::Lda, ZeroPageX, NZ, 4);
    t[0xB6] = e("LDX", Op::Ldx, ZeroPageY, NZ, 4);
    t[0xB8] = e("CLV", Op::Clv, Implied, V, 2);
    t[0xB9] = ep("LDA", Op::Lda, AbsoluteY, NZ, 4);
    t[0xBA] = e("TSX", Op::Tsx, Implied, NZ, 2);
    t[0xBC] = ep("LDY", Op::Ldy, AbsoluteX, NZ, 4);
    t[0xBD] = ep("LDA", Op::Lda, AbsoluteX, NZ, 4);
    t[0xBE] = ep("LDX", Op::Ldx, AbsoluteY, NZ, 4);

    t[0xC0] = e("CPY", Op::Cpy, Immediate, NZC, 2);
    t[0xC1] = e("CMP", Op::Cmp, IndexedIndirect, NZC, 6);
    t[0xC4] = e("CPY", Op::Cpy, ZeroPage, NZC, 3);
    t[0xC5] = e("CMP", Op::Cmp, ZeroPage, NZC, 3);
    t[0xC6] = e("DEC", Op::Dec, ZeroPage, NZ, 5);
    t[0xC8] = e("INY", Op::Iny, Implied, NZ, 2);
    t[0xC9] = e("CMP", Op::Cmp, Immediate, NZC, 2);
    t[0xCA] = e("DEX", Op::Dex, Implied, NZ, 2);
    t[0xCC] = e("CPY", Op::Cpy, Absolute, NZC, 4);
    t[0xCD] = e("CMP", Op::Cmp, Absolute, NZC, 4);
    t[0xCE] = e("DEC", Op::Dec, Absolute, NZ, 6);

    t[0xD0] = e("BNE", Op::Bne, Relative, NONE, 2);
    t[0xD1] = ep("CMP", Op::Cmp, IndirectIndexed, NZC, 5);
    t[0xD5] = e("CMP", Op::Cmp, ZeroPageX, NZC, 4);
    t[0xD6] = e("DEC", Op::Dec, ZeroPageX, NZ, 6);
    t[0xD8] = e("CLD", Op::Cld, Implied, D, 2);
    t[0xD9] = ep("CMP", Op::Cmp, AbsoluteY, NZC, 4);
    t[0xDD] = ep("CMP", Op::Cmp, AbsoluteX, NZC, 4);
    t[0xDE] = e("DEC", Op::Dec, AbsoluteX, NZ, 7);

    t[0xE0] = e("CPX", Op::Cpx, Immediate, NZC, 2);
    t[0xE1] = e("SBC", Op::Sbc, IndexedIndirect, NVZC, 6);
    t[0xE4] = e("CPX", Op::Cpx, ZeroPage, NZC, 3);
    t[0xE5] = e("SBC", Op::Sbc, ZeroPage, NVZC, 3);
    t[0xE6] = e("INC", Op::Inc, ZeroPage, NZ, 5);
    t[0xE8] = e("INX", Op::Inx, Implied, NZ, 2);
    t[0xE9] = e("SBC", Op::Sbc, Immediate, NVZC, 2);
    t[0xEA] = e("NOP", Op::Nop, Implied, NONE, 2);
    t[0xEC] = e("CPX", Op::Cpx, Absolute, NZC, 4);
    t[0xED] = e("SBC", Op::Sbc, Absolute, NVZC, 4);
    t[0xEE] = e("INC", Op::Inc, Absolute, NZ, 6);

    t[0xF0] = e("BEQ", Op::Beq, Relative, NONE, 2);
    t[0xF1] = ep("SBC", Op::Sbc, IndirectIndexed, NVZC, 5);
    t[0xF5] = e("SBC", Op::Sbc, ZeroPageX, NVZC, 4);
    t[0xF6] = e("INC", Op::Inc, ZeroPageX, NZ, 6);
    t[0xF8] = e("SED", Op::Sed, Implied, D, 2);
    t[0xF9] = ep("SBC", Op::Sbc, AbsoluteY, NVZC, 4);
    t[0xFD] = ep("SBC", Op::Sbc, AbsoluteX, NVZC, 4);
    t[0xFE] = e("INC", Op::Inc, AbsoluteX, NZ, 7);

    // Stable undocumented NOPs, treated as documented no-ops with their
    // known operand sizes and cycle costs.
    t[0x1A] = e("*NOP", Op::Nop, Implied, NONE, 2);
    t[0x3A] = e("*NOP", Op::Nop, Implied, NONE, 2);
    t[0x5A] = e("*NOP", Op::Nop, Implied, NONE, 2);
    t[0x7A] = e("*NOP", Op::Nop, Implied, NONE, 2);
    t[0xDA] = e("*NOP", Op::Nop, Implied, NONE, 2);
    t[0xFA] = e("*NOP", Op::Nop, Implied, NONE, 2);
    t[0x80] = e("*NOP", Op::Nop, Immediate, NONE, 2);
    t[0x82] = e("*NOP", Op::Nop, Immediate, NONE, 2);
    t[0x89] = e("*NOP", Op::Nop, Immediate, NONE, 2);
    t[0xC2] = e("*NOP", Op::Nop, Immediate, NONE, 2);
    t[0xE2] = e("*NOP", Op::Nop, Immediate, NONE, 2);
    t[0x04] = e("*NOP", Op::Nop, ZeroPage, NONE, 3);
    t[0x44] = e("*NOP", Op::Nop, ZeroPage, NONE, 3);
    t[0x64] = e("*NOP", Op::Nop, ZeroPage, NONE, 3);
    t[0x14] = e("*NOP", Op::Nop, ZeroPageX, NONE, 4);
    t[0x34] = e("*NOP", Op::Nop, ZeroPageX, NONE, 4);
    t[0x54] = e("*NOP", Op::Nop, ZeroPageX, NONE, 4);
    t[0x74] = e("*NOP", Op::Nop, ZeroPageX, NONE, 4);
    t[0xD4] = e("*NOP", Op::Nop, ZeroPageX, NONE, 4);
    t[0xF4] = e("*NOP", Op::Nop, ZeroPageX, NONE, 4);
    t[0x0C] = e("*NOP", Op::Nop, Absolute, NONE, 4);
    t[0x1C] = ep("*NOP", Op::Nop, AbsoluteX, NONE, 4);
    t[0x3C] = ep("*NOP", Op::Nop, AbsoluteX, NONE, 4);
    t[0x5C] = ep("*NOP", Op::Nop, AbsoluteX, NONE, 4);
    t[0x7C] = ep("*NOP", Op::Nop, AbsoluteX, NONE, 4);
    t[0xDC] = ep("*NOP", Op::Nop, AbsoluteX, NONE, 4);
    t[0xFC] = ep("*NOP", Op::Nop, AbsoluteX, NONE, 4);

    t
};

/// Debug-time sanity check over the whole table. Violations are programming
/// errors; `Cpu::new` asserts this in debug builds.
pub(crate) fn table_is_consistent() -> bool {
    use AddressingMode::*;
    for entry in OPCODE_TABLE.iter() {
        match entry.op {
            Op::Unknown => {
                if entry.cycles != 0 || entry.flags != NONE || entry.page_sensitive {
                    return false;
                }
                continue;
            }
            _ => {
                if entry.cycles < 1 || entry.cycles > 7 {
                    return false;
                }
                // Base cost must at least cover the opcode fetch plus the
                // mode's operand fetches.
                if (entry.cycles as u16) <= entry.mode.operand_len() {
                    return false;
                }
            }
        }
        if entry.page_sensitive
            && !matches!(entry.mode, AbsoluteX | AbsoluteY | IndirectIndexed)
        {
            return false;
        }
        match entry.op {
            Op::Bcc | Op::Bcs | Op::Beq | Op::Bmi | Op::Bne | Op::Bpl | Op::Bvc | Op::Bvs => {
                if entry.mode != Relative || entry.cycles != 2 {
                    return false;
                }
            }
            Op::Sta | Op::Stx | Op::Sty => {
                // Stores touch no flags and never take the page penalty.
                if entry.flags != NONE || entry.page_sensitive {
                    return false;
                }
            }
            Op::Jmp => {
                if !matches!(entry.mode, Absolute | Indirect) {
                    return false;
                }
            }
            Op::Asl | Op::Lsr | Op::Rol | Op::Ror => {
                if entry.flags != NZC || entry.page_sensitive {
                    return false;
                }
            }
            _ => {
                if entry.mode == Accumulator {
                    return false;
                }
            }
        }
    }
    true
}
