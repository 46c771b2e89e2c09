//! Flag engine: recomputes the status register from an opcode's operands and
//! result, touching only the bits in the opcode's flag-affect mask.
//!
//! Every in-mask flag is first cleared, then set when the opcode-specific
//! condition holds. The mask gates which instructions may touch a bit; the
//! per-operation rules below decide the value. `result` is the 9-bit
//! intermediate (bit 8 carries addition overflow); `first`/`second` are the
//! pre-operation operands, e.g. accumulator and memory byte.

use super::opcodes::{Op, OpcodeEntry};
use super::StatusFlags;

pub(crate) fn update(
    status: &mut StatusFlags,
    entry: &OpcodeEntry,
    first: u8,
    second: u8,
    result: u16,
) {
    let mask = StatusFlags::from_bits_truncate(entry.flags);
    if mask.is_empty() {
        return;
    }

    if mask.contains(StatusFlags::NEGATIVE) {
        let negative = match entry.op {
            // BIT copies bit 7 of the memory operand.
            Op::Bit => second & 0x80 != 0,
            _ => result as u8 & 0x80 != 0,
        };
        status.set(StatusFlags::NEGATIVE, negative);
    }

    if mask.contains(StatusFlags::OVERFLOW) {
        let overflow = match entry.op {
            Op::Bit => second & 0x40 != 0,
            Op::Clv => false,
            // Signed overflow: both operands agree in sign and the result
            // disagrees. SBC feeds the complemented operand, which makes the
            // same formula exact.
            Op::Adc | Op::Sbc => {
                (!(first ^ second)) & (first ^ result as u8) & 0x80 != 0
            }
            _ => false,
        };
        status.set(StatusFlags::OVERFLOW, overflow);
    }

    if mask.contains(StatusFlags::ZERO) {
        let zero = match entry.op {
            Op::Bit => first & second == 0,
            _ => result as u8 == 0,
        };
        status.set(StatusFlags::ZERO, zero);
    }

    if mask.contains(StatusFlags::CARRY) {
        let carry = match entry.op {
            Op::Sec => true,
            Op::Clc => false,
            // Shift/rotate-left: the bit shifted out of bit 7 of the
            // pre-shift value. Right variants: the bit out of bit 0.
            Op::Asl | Op::Rol => first & 0x80 != 0,
            Op::Lsr | Op::Ror => first & 0x01 != 0,
            // Unsigned register-vs-memory comparison.
            Op::Cmp | Op::Cpx | Op::Cpy => first >= second,
            // Addition path: bit 8 of the 9-bit result.
            _ => result > 0xFF,
        };
        status.set(StatusFlags::CARRY, carry);
    }

    if mask.contains(StatusFlags::INTERRUPT_DISABLE) {
        status.set(
            StatusFlags::INTERRUPT_DISABLE,
            matches!(entry.op, Op::Sei | Op::Brk),
        );
    }

    if mask.contains(StatusFlags::DECIMAL) {
        status.set(StatusFlags::DECIMAL, matches!(entry.op, Op::Sed));
    }

    if mask.contains(StatusFlags::BREAK) {
        status.set(StatusFlags::BREAK, matches!(entry.op, Op::Brk));
    }

    // The unused bit reads as 1 no matter what an instruction did.
    status.insert(StatusFlags::UNUSED);
}
