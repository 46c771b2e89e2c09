//! Machine state capture and restore.
//!
//! A snapshot freezes the register file, internal RAM, and cartridge save
//! RAM into a plain value that serializes with bincode. ROM contents are
//! deliberately not captured; a snapshot is only meaningful when restored
//! onto a machine holding the same cartridge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cpu::{Cpu, StatusFlags};
use crate::memory::RAM_SIZE;

#[derive(Debug)]
pub enum SnapshotError {
    Serialize(bincode::Error),
    /// Snapshot geometry does not match the machine it is being restored
    /// onto.
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Serialize(e) => write!(f, "snapshot serialization failed: {}", e),
            SnapshotError::SizeMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "snapshot {} size mismatch: expected {}, got {}",
                what, expected, actual
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<bincode::Error> for SnapshotError {
    fn from(e: bincode::Error) -> Self {
        SnapshotError::Serialize(e)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub cpu: CpuSnapshot,
    pub ram: Vec<u8>,
    pub sram: Vec<u8>,
}

impl MachineSnapshot {
    pub fn capture(cpu: &Cpu, bus: &Bus) -> Self {
        MachineSnapshot {
            cpu: CpuSnapshot {
                a: cpu.a,
                x: cpu.x,
                y: cpu.y,
                sp: cpu.sp,
                pc: cpu.pc,
                status: cpu.status.bits(),
                cycles: cpu.cycles,
            },
            ram: bus.ram().as_slice().to_vec(),
            sram: bus
                .cartridge()
                .map(|cart| cart.sram().to_vec())
                .unwrap_or_default(),
        }
    }

    pub fn restore(&self, cpu: &mut Cpu, bus: &mut Bus) -> Result<(), SnapshotError> {
        if self.ram.len() != RAM_SIZE {
            return Err(SnapshotError::SizeMismatch {
                what: "ram",
                expected: RAM_SIZE,
                actual: self.ram.len(),
            });
        }
        if let Some(cart) = bus.cartridge_mut() {
            let sram = cart.sram_mut();
            if self.sram.len() != sram.len() {
                return Err(SnapshotError::SizeMismatch {
                    what: "sram",
                    expected: sram.len(),
                    actual: self.sram.len(),
                });
            }
            sram.copy_from_slice(&self.sram);
        }
        bus.ram_mut().load(&self.ram);
        cpu.a = self.cpu.a;
        cpu.x = self.cpu.x;
        cpu.y = self.cpu.y;
        cpu.sp = self.cpu.sp;
        cpu.pc = self.cpu.pc;
        cpu.status = StatusFlags::from_bits_truncate(self.cpu.status) | StatusFlags::UNUSED;
        cpu.cycles = self.cpu.cycles;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
