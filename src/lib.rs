//! Cycle-counted 6502 instruction core with the memory fabric of an
//! NES-style console: mirrored internal RAM, a routed I/O window, and a
//! mapper-banked cartridge space.
//!
//! The crate has three layers. [`cpu::Cpu`] fetches, decodes against a
//! dense 256-entry descriptor table, and executes one instruction per
//! [`cpu::Cpu::step`]. It talks to memory only through the [`bus::CpuBus`]
//! trait, whose stock implementation [`bus::Bus`] routes each address to
//! internal RAM, an [`io::IoBridge`], or an attached [`cartridge::Cartridge`].
//! The cartridge in turn delegates address translation to its [`cartridge::Mapper`].
//!
//! ```no_run
//! use nes_cpu::{Bus, Cartridge, Cpu};
//!
//! # fn run(prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut bus = Bus::new();
//! bus.attach_cartridge(Cartridge::new(0, prg_rom, chr_rom)?);
//! let mut cpu = Cpu::new();
//! cpu.reset(&mut bus)?;
//! loop {
//!     let cycles = cpu.step(&mut bus)?;
//!     let _ = cycles; // drive the rest of the machine
//! }
//! # }
//! ```

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod io;
pub mod memory;
pub mod snapshot;

pub use bus::{Bus, CpuBus};
pub use cartridge::{Cartridge, CartridgeError, MemoryError};
pub use cpu::{AddressingMode, Cpu, CpuError, StatusFlags};
pub use io::IoBridge;
pub use snapshot::MachineSnapshot;
