//! Cartridge store: page counts and owned byte buffers for program ROM,
//! character ROM, save RAM and expansion ROM/RAM.
//!
//! The store is inert data populated by an external loader; this crate never
//! parses a cartridge-image container. Program and character ROM are
//! read-only after construction, save RAM and expansion RAM stay writable
//! for the whole session.

pub mod mapper;

use std::fmt;

pub use mapper::{
    CartRegion, Location, Mapper, MemoryError, Nrom, CHR_PAGE_SIZE, PRG_PAGE_SIZE,
};

/// Load-time cartridge rejection, reported before any instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeError {
    UnsupportedMapper(u8),
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::UnsupportedMapper(id) => write!(f, "unsupported mapper {}", id),
        }
    }
}

impl std::error::Error for CartridgeError {}

pub struct Cartridge {
    prg_rom_pages: u8,
    chr_rom_pages: u8,
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    sram: Vec<u8>,
    expansion: Vec<u8>,
    mapper: Box<dyn Mapper>,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("prg_rom_pages", &self.prg_rom_pages)
            .field("chr_rom_pages", &self.chr_rom_pages)
            .finish_non_exhaustive()
    }
}

impl Cartridge {
    /// Builds a store from loader-supplied buffers and selects the bank
    /// mapper once. Anything other than mapper 0 is rejected here.
    pub fn new(mapper_id: u8, prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Result<Self, CartridgeError> {
        let mapper: Box<dyn Mapper> = match mapper_id {
            0 => Box::new(Nrom),
            id => return Err(CartridgeError::UnsupportedMapper(id)),
        };
        let prg_rom_pages = (prg_rom.len() / PRG_PAGE_SIZE) as u8;
        let chr_rom_pages = (chr_rom.len() / CHR_PAGE_SIZE) as u8;
        Ok(Cartridge {
            prg_rom_pages,
            chr_rom_pages,
            prg_rom,
            chr_rom,
            sram: vec![0; 0x2000],
            expansion: Vec::new(),
            mapper,
        })
    }

    /// Replaces the save RAM buffer, e.g. with battery-backed contents the
    /// host restored from disk.
    pub fn with_sram(mut self, sram: Vec<u8>) -> Self {
        self.sram = sram;
        self
    }

    /// Populates the expansion ROM/RAM window (absent on most cartridges).
    pub fn with_expansion(mut self, expansion: Vec<u8>) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn prg_rom_pages(&self) -> u8 {
        self.prg_rom_pages
    }

    pub fn chr_rom_pages(&self) -> u8 {
        self.chr_rom_pages
    }

    /// Battery-backed RAM, for hosts that persist it between sessions.
    pub fn sram(&self) -> &[u8] {
        &self.sram
    }

    pub fn sram_mut(&mut self) -> &mut [u8] {
        &mut self.sram
    }

    /// CPU read anywhere in the cartridge range (`0x4020..=0xFFFF`).
    pub fn read(&self, addr: u16) -> Result<u8, MemoryError> {
        let loc = self.mapper.locate(self, addr)?;
        Ok(self.region(loc.region)[loc.offset])
    }

    /// CPU write into the cartridge range. ROM-class regions swallow the
    /// write (the physical pins do nothing on NROM); RAM-class regions take
    /// it.
    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        let loc = self.mapper.locate(self, addr)?;
        match loc.region {
            CartRegion::SaveRam => self.sram[loc.offset] = value,
            CartRegion::Expansion => self.expansion[loc.offset] = value,
            CartRegion::PrgRom | CartRegion::ChrRom => {
                log::warn!(
                    "ignoring write of {:#04x} to ROM at {:#06x}",
                    value,
                    addr
                );
            }
        }
        Ok(())
    }

    /// Character-ROM read for the video chip (`0x0000..0x2000`). When the
    /// cartridge carries no CHR pages this reports [`MemoryError::ChrUnbacked`]
    /// so the caller falls back to its own video RAM.
    pub fn read_chr(&self, addr: u16) -> Result<u8, MemoryError> {
        let loc = self.mapper.locate_chr(self, addr)?;
        Ok(self.chr_rom[loc.offset])
    }

    pub(crate) fn region_len(&self, region: CartRegion) -> usize {
        self.region(region).len()
    }

    fn region(&self, region: CartRegion) -> &[u8] {
        match region {
            CartRegion::Expansion => &self.expansion,
            CartRegion::SaveRam => &self.sram,
            CartRegion::PrgRom => &self.prg_rom,
            CartRegion::ChrRom => &self.chr_rom,
        }
    }
}
