use super::addressing;
use super::*;
use crate::bus::CpuBus;
use crate::cartridge::MemoryError;

#[path = "addressing_tests.rs"]
mod addressing_tests;

/// Flat 64 KiB bus with no routing, so tests can place bytes anywhere.
struct TestBus {
    mem: Vec<u8>,
}

impl TestBus {
    fn new() -> Self {
        let mut mem = vec![0u8; 0x10000];
        // Reset vector points at the test program origin.
        mem[0xFFFC] = 0x00;
        mem[0xFFFD] = 0x80;
        TestBus { mem }
    }

    fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = addr as usize;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl CpuBus for TestBus {
    fn read(&mut self, addr: u16) -> Result<u8, MemoryError> {
        Ok(self.mem[addr as usize])
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        self.mem[addr as usize] = value;
        Ok(())
    }
}

fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut bus = TestBus::new();
    bus.load(0x8000, program);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus).unwrap();
    (cpu, bus)
}

#[test]
fn reset_loads_vector_and_documented_state() {
    let (cpu, _) = setup(&[]);
    assert_eq!(cpu.pc, 0x8000);
    assert_eq!(cpu.sp, 0xFD);
    assert_eq!(cpu.a, 0);
    assert_eq!(cpu.x, 0);
    assert_eq!(cpu.y, 0);
    assert_eq!(cpu.status.bits(), 0x24);
    assert_eq!(cpu.cycles(), 8);
}

#[test]
fn lda_immediate() {
    let (mut cpu, mut bus) = setup(&[0xA9, 0x42]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.pc, 0x8002);
    assert!(!cpu.flag(StatusFlags::ZERO));
    assert!(!cpu.flag(StatusFlags::NEGATIVE));
}

#[test]
fn lda_sets_zero_and_negative() {
    let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xA9, 0x80]);
    cpu.step(&mut bus).unwrap();
    assert!(cpu.flag(StatusFlags::ZERO));
    assert!(!cpu.flag(StatusFlags::NEGATIVE));
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.flag(StatusFlags::ZERO));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
}

#[test]
fn lda_absolute_indexed_page_cross_costs_a_cycle() {
    let (mut cpu, mut bus) = setup(&[0xBD, 0xF0, 0x20]);
    bus.load(0x2110, &[0x55]);
    cpu.x = 0x20;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 5);
    assert_eq!(cpu.a, 0x55);
}

#[test]
fn lda_absolute_indexed_same_page() {
    let (mut cpu, mut bus) = setup(&[0xBD, 0xF0, 0x20]);
    bus.load(0x20F1, &[0x55]);
    cpu.x = 0x01;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 4);
}

#[test]
fn sta_zero_page_leaves_flags_alone() {
    let (mut cpu, mut bus) = setup(&[0x85, 0x10]);
    cpu.a = 0x99;
    cpu.status.insert(StatusFlags::ZERO);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 3);
    assert_eq!(bus.mem[0x0010], 0x99);
    assert!(cpu.flag(StatusFlags::ZERO));
}

#[test]
fn adc_signed_overflow() {
    let (mut cpu, mut bus) = setup(&[0x69, 0x01]);
    cpu.a = 0x7F;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x80);
    assert!(cpu.flag(StatusFlags::OVERFLOW));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
    assert!(!cpu.flag(StatusFlags::CARRY));
    assert!(!cpu.flag(StatusFlags::ZERO));
}

#[test]
fn adc_carry_out_and_in() {
    let (mut cpu, mut bus) = setup(&[0x69, 0x01, 0x69, 0x00]);
    cpu.a = 0xFF;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::ZERO));
    // Carry from the previous addition feeds the next one.
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x01);
    assert!(!cpu.flag(StatusFlags::CARRY));
}

#[test]
fn sbc_borrow() {
    let (mut cpu, mut bus) = setup(&[0x38, 0xE9, 0x20]);
    cpu.a = 0x10;
    cpu.step(&mut bus).unwrap(); // SEC
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0xF0);
    assert!(!cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
    assert!(!cpu.flag(StatusFlags::OVERFLOW));
}

#[test]
fn cmp_less_than() {
    let (mut cpu, mut bus) = setup(&[0xC9, 0x20]);
    cpu.a = 0x10;
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.flag(StatusFlags::CARRY));
    assert!(!cpu.flag(StatusFlags::ZERO));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
    assert_eq!(cpu.a, 0x10);
}

#[test]
fn cmp_equal_sets_carry_and_zero() {
    let (mut cpu, mut bus) = setup(&[0xC9, 0x10]);
    cpu.a = 0x10;
    cpu.step(&mut bus).unwrap();
    assert!(cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::ZERO));
}

#[test]
fn bit_reports_operand_bits() {
    let (mut cpu, mut bus) = setup(&[0x24, 0x10]);
    bus.load(0x0010, &[0xC0]);
    cpu.a = 0x0F;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 3);
    assert!(cpu.flag(StatusFlags::ZERO));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
    assert!(cpu.flag(StatusFlags::OVERFLOW));
    assert_eq!(cpu.a, 0x0F);
}

#[test]
fn asl_accumulator_carry() {
    let (mut cpu, mut bus) = setup(&[0x0A]);
    cpu.a = 0x80;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::ZERO));
}

#[test]
fn asl_memory_read_modify_write() {
    let (mut cpu, mut bus) = setup(&[0x06, 0x40]);
    bus.load(0x0040, &[0x41]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 5);
    assert_eq!(bus.mem[0x0040], 0x82);
    assert!(!cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
}

#[test]
fn rol_ror_shift_through_carry() {
    let (mut cpu, mut bus) = setup(&[0x2A, 0x6A]);
    cpu.status.insert(StatusFlags::CARRY);
    cpu.a = 0x80;
    cpu.step(&mut bus).unwrap(); // ROL A
    assert_eq!(cpu.a, 0x01);
    assert!(cpu.flag(StatusFlags::CARRY));
    cpu.step(&mut bus).unwrap(); // ROR A
    assert_eq!(cpu.a, 0x80);
    assert!(cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::NEGATIVE));
}

#[test]
fn lsr_moves_bit_zero_to_carry() {
    let (mut cpu, mut bus) = setup(&[0x4A]);
    cpu.a = 0x01;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flag(StatusFlags::CARRY));
    assert!(cpu.flag(StatusFlags::ZERO));
}

#[test]
fn inc_wraps_to_zero() {
    let (mut cpu, mut bus) = setup(&[0xE6, 0x40]);
    bus.load(0x0040, &[0xFF]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 5);
    assert_eq!(bus.mem[0x0040], 0x00);
    assert!(cpu.flag(StatusFlags::ZERO));
}

#[test]
fn dex_wraps_to_negative() {
    let (mut cpu, mut bus) = setup(&[0xCA]);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.x, 0xFF);
    assert!(cpu.flag(StatusFlags::NEGATIVE));
}

#[test]
fn transfers_update_flags_except_txs() {
    let (mut cpu, mut bus) = setup(&[0xBA, 0x9A]);
    cpu.step(&mut bus).unwrap(); // TSX
    assert_eq!(cpu.x, 0xFD);
    assert!(cpu.flag(StatusFlags::NEGATIVE));
    cpu.x = 0x00;
    cpu.status.remove(StatusFlags::ZERO);
    cpu.step(&mut bus).unwrap(); // TXS
    assert_eq!(cpu.sp, 0x00);
    assert!(!cpu.flag(StatusFlags::ZERO));
}

#[test]
fn branch_not_taken_costs_base_cycles() {
    let (mut cpu, mut bus) = setup(&[0xD0, 0x10]);
    cpu.status.insert(StatusFlags::ZERO);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 2);
    assert_eq!(cpu.pc, 0x8002);
}

#[test]
fn branch_taken_same_page() {
    let (mut cpu, mut bus) = setup(&[0xD0, 0x10]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 3);
    assert_eq!(cpu.pc, 0x8012);
}

#[test]
fn branch_taken_across_page() {
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0x80F0, &[0xD0, 0x20]);
    cpu.pc = 0x80F0;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 4);
    assert_eq!(cpu.pc, 0x8112);
}

#[test]
fn branch_backward() {
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0x8010, &[0xD0, 0xFC]); // BNE -4
    cpu.pc = 0x8010;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.pc, 0x800E);
}

#[test]
fn jmp_absolute() {
    let (mut cpu, mut bus) = setup(&[0x4C, 0x34, 0x12]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 3);
    assert_eq!(cpu.pc, 0x1234);
}

#[test]
fn jmp_indirect() {
    let (mut cpu, mut bus) = setup(&[0x6C, 0xF0, 0x10]);
    bus.load(0x10F0, &[0x34, 0x12]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 5);
    assert_eq!(cpu.pc, 0x1234);
}

#[test]
fn jsr_rts_round_trip() {
    let (mut cpu, mut bus) = setup(&[0x20, 0x00, 0x90]);
    bus.load(0x9000, &[0x60]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 6);
    assert_eq!(cpu.pc, 0x9000);
    assert_eq!(cpu.sp, 0xFB);
    // Pushed address is the last byte of the JSR instruction.
    assert_eq!(bus.mem[0x01FD], 0x80);
    assert_eq!(bus.mem[0x01FC], 0x02);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 6);
    assert_eq!(cpu.pc, 0x8003);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn pha_pla_round_trip() {
    let (mut cpu, mut bus) = setup(&[0x48, 0xA9, 0x00, 0x68]);
    cpu.a = 0x7E;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.sp, 0xFC);
    assert_eq!(bus.mem[0x01FD], 0x7E);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x00);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 4);
    assert_eq!(cpu.a, 0x7E);
    assert_eq!(cpu.sp, 0xFD);
    assert!(!cpu.flag(StatusFlags::ZERO));
}

#[test]
fn php_pushes_break_and_unused() {
    let (mut cpu, mut bus) = setup(&[0x38, 0x08, 0x28]);
    cpu.step(&mut bus).unwrap(); // SEC
    cpu.step(&mut bus).unwrap(); // PHP
    assert_eq!(bus.mem[0x01FD], 0x35);
    cpu.status = StatusFlags::from_bits_truncate(0xFF);
    cpu.step(&mut bus).unwrap(); // PLP
    // B is discarded on the way back in, unused stays set.
    assert_eq!(cpu.status.bits(), 0x25);
}

#[test]
fn explicit_flag_ops() {
    let (mut cpu, mut bus) = setup(&[0x38, 0x18, 0x78, 0x58, 0xF8, 0xD8, 0xB8]);
    cpu.step(&mut bus).unwrap();
    assert!(cpu.flag(StatusFlags::CARRY));
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.flag(StatusFlags::CARRY));
    cpu.step(&mut bus).unwrap();
    assert!(cpu.flag(StatusFlags::INTERRUPT_DISABLE));
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.flag(StatusFlags::INTERRUPT_DISABLE));
    cpu.step(&mut bus).unwrap();
    assert!(cpu.flag(StatusFlags::DECIMAL));
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.flag(StatusFlags::DECIMAL));
    cpu.status.insert(StatusFlags::OVERFLOW);
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.flag(StatusFlags::OVERFLOW));
}

#[test]
fn brk_rti_round_trip() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    bus.load(0xFFFE, &[0x00, 0x90]);
    bus.load(0x9000, &[0x40]);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 7);
    assert_eq!(cpu.pc, 0x9000);
    assert!(cpu.flag(StatusFlags::INTERRUPT_DISABLE));
    // Return address skips the signature byte after the opcode.
    assert_eq!(bus.mem[0x01FD], 0x80);
    assert_eq!(bus.mem[0x01FC], 0x02);
    assert_eq!(bus.mem[0x01FB], 0x34);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 6);
    assert_eq!(cpu.pc, 0x8002);
    assert_eq!(cpu.status.bits(), 0x24);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn unsupported_opcode_reports_location() {
    let (mut cpu, mut bus) = setup(&[0x02]);
    let err = cpu.step(&mut bus).unwrap_err();
    assert_eq!(
        err,
        CpuError::UnsupportedOpcode {
            opcode: 0x02,
            pc: 0x8000
        }
    );
    assert_eq!(cpu.pc, 0x8001);
}

#[test]
fn undocumented_nop_consumes_operand() {
    let (mut cpu, mut bus) = setup(&[0x1C, 0xF0, 0x20, 0xEA]);
    cpu.x = 0x20;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 5);
    assert_eq!(cpu.pc, 0x8003);
    cpu.x = 0x00;
    cpu.pc = 0x8000;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 4);
}

#[test]
fn dispatch_is_deterministic() {
    // Same pre-state twice gives identical post-state and cycle count.
    let program = [0x69, 0x33]; // ADC #$33
    let run = || {
        let (mut cpu, mut bus) = setup(&program);
        cpu.a = 0xF0;
        cpu.status.insert(StatusFlags::CARRY);
        let cycles = cpu.step(&mut bus).unwrap();
        (cycles, cpu.a, cpu.pc, cpu.status)
    };
    assert_eq!(run(), run());
}

#[test]
fn cycles_accumulate_across_steps() {
    let (mut cpu, mut bus) = setup(&[0xA9, 0x01, 0x85, 0x10]);
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.cycles(), 8 + 2 + 3);
}

#[test]
fn lda_indirect_indexed_page_cross_costs_a_cycle() {
    let (mut cpu, mut bus) = setup(&[0xB1, 0x10]);
    bus.load(0x0010, &[0xFF, 0x20]);
    bus.load(0x2100, &[0x77]);
    cpu.y = 0x01;
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 6);
    assert_eq!(cpu.a, 0x77);
}
