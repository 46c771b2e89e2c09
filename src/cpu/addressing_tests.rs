use super::*;

#[test]
fn zero_page_indexed_wraps_in_page() {
    let (mut cpu, mut bus) = setup(&[0xFF]);
    cpu.x = 0x02;
    let r = addressing::resolve(&mut cpu, &mut bus, AddressingMode::ZeroPageX).unwrap();
    assert_eq!(r.addr, 0x0001);
    assert!(!r.page_crossed);
}

#[test]
fn absolute_indexed_reports_crossing() {
    let (mut cpu, mut bus) = setup(&[0xFF, 0x20]);
    cpu.x = 0x01;
    let r = addressing::resolve(&mut cpu, &mut bus, AddressingMode::AbsoluteX).unwrap();
    assert_eq!(r.addr, 0x2100);
    assert!(r.page_crossed);
}

#[test]
fn indexed_indirect_pointer_wraps_in_zero_page() {
    let (mut cpu, mut bus) = setup(&[0xFF]);
    bus.load(0x00FF, &[0x34]);
    bus.load(0x0000, &[0x12]);
    let r = addressing::resolve(&mut cpu, &mut bus, AddressingMode::IndexedIndirect).unwrap();
    assert_eq!(r.addr, 0x1234);
}

#[test]
fn indirect_indexed_reports_crossing() {
    let (mut cpu, mut bus) = setup(&[0x10]);
    bus.load(0x0010, &[0xFF, 0x20]);
    cpu.y = 0x01;
    let r = addressing::resolve(&mut cpu, &mut bus, AddressingMode::IndirectIndexed).unwrap();
    assert_eq!(r.addr, 0x2100);
    assert!(r.page_crossed);
}

#[test]
fn indirect_reads_a_plain_word() {
    let (mut cpu, mut bus) = setup(&[0xF0, 0x10]);
    bus.load(0x10F0, &[0x34, 0x12]);
    let r = addressing::resolve(&mut cpu, &mut bus, AddressingMode::Indirect).unwrap();
    assert_eq!(r.addr, 0x1234);
    assert!(!r.page_crossed);
}
