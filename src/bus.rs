//! Address-space router: partitions the full 16-bit CPU space into internal
//! RAM, the I/O register window and the cartridge range.
//!
//! The three ranges cover the space with no gaps by construction, so routing
//! is total; the only recoverable failures come from the cartridge side
//! (nothing attached, or an unbacked sub-window).

use crate::cartridge::{Cartridge, MemoryError};
use crate::io::{IoBridge, IoRegisters};
use crate::memory::Ram;

/// First address routed to the cartridge.
pub const CART_BASE: u16 = 0x4020;

/// Minimal bus interface the CPU core executes against.
pub trait CpuBus {
    fn read(&mut self, addr: u16) -> Result<u8, MemoryError>;
    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError>;
}

pub struct Bus {
    ram: Ram,
    io: Box<dyn IoBridge>,
    cartridge: Option<Cartridge>,
}

impl Bus {
    pub fn new() -> Self {
        Bus {
            ram: Ram::new(),
            io: Box::new(IoRegisters::new()),
            cartridge: None,
        }
    }

    /// Builds a bus with externally emulated chips behind the I/O window.
    pub fn with_io(io: Box<dyn IoBridge>) -> Self {
        Bus {
            ram: Ram::new(),
            io,
            cartridge: None,
        }
    }

    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn cartridge_mut(&mut self) -> Option<&mut Cartridge> {
        self.cartridge.as_mut()
    }

    /// Character-ROM read for the video chip. [`MemoryError::ChrUnbacked`]
    /// tells the caller to use its own video RAM instead.
    pub fn read_chr(&self, addr: u16) -> Result<u8, MemoryError> {
        self.cartridge
            .as_ref()
            .ok_or(MemoryError::NoCartridge)?
            .read_chr(addr)
    }

    pub(crate) fn ram(&self) -> &Ram {
        &self.ram
    }

    pub(crate) fn ram_mut(&mut self) -> &mut Ram {
        &mut self.ram
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for Bus {
    fn read(&mut self, addr: u16) -> Result<u8, MemoryError> {
        match addr {
            0x0000..=0x1FFF => Ok(self.ram.read(addr)),
            0x2000..=0x401F => Ok(self.io.read(addr)),
            CART_BASE..=0xFFFF => self
                .cartridge
                .as_ref()
                .ok_or(MemoryError::NoCartridge)?
                .read(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        match addr {
            0x0000..=0x1FFF => {
                self.ram.write(addr, value);
                Ok(())
            }
            0x2000..=0x401F => {
                self.io.write(addr, value);
                Ok(())
            }
            CART_BASE..=0xFFFF => self
                .cartridge
                .as_mut()
                .ok_or(MemoryError::NoCartridge)?
                .write(addr, value),
        }
    }
}
