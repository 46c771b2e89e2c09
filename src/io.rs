//! Memory-mapped I/O register window at `0x2000..0x4020`.
//!
//! The CPU core treats this window as an opaque byte surface: reads and
//! writes are forwarded verbatim to whatever implements [`IoBridge`]
//! (video, audio and controller chips live outside this crate). The
//! in-crate [`IoRegisters`] is an inert backing array for hosts and tests
//! that run the CPU without any chip implementations attached.

pub const IO_BASE: u16 = 0x2000;
pub const IO_END: u16 = 0x4020; // exclusive
pub const IO_WINDOW_SIZE: usize = (IO_END - IO_BASE) as usize;

/// Byte-level bridge to the externally emulated chips behind the I/O window.
///
/// `addr` is the full CPU address (`0x2000..0x4020`); semantic decoding of
/// individual registers is the implementor's business.
pub trait IoBridge {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
}

/// Default bridge: a flat register file with no side effects.
pub struct IoRegisters {
    regs: Vec<u8>,
}

impl IoRegisters {
    pub fn new() -> Self {
        IoRegisters {
            regs: vec![0; IO_WINDOW_SIZE],
        }
    }
}

impl Default for IoRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl IoBridge for IoRegisters {
    fn read(&mut self, addr: u16) -> u8 {
        self.regs[(addr - IO_BASE) as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.regs[(addr - IO_BASE) as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_are_plain_bytes() {
        let mut io = IoRegisters::new();
        io.write(0x2000, 0xAB);
        io.write(0x401F, 0xCD);
        assert_eq!(io.read(0x2000), 0xAB);
        assert_eq!(io.read(0x401F), 0xCD);
        assert_eq!(io.read(0x2001), 0x00);
    }
}
