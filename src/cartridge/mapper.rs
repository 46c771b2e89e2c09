//! Bank mapper: routes logical addresses to physical cartridge storage.
//!
//! The mapper is selected once when the cartridge is built and never swapped
//! afterwards. Only the fixed-window NROM scheme (mapper 0) is implemented;
//! other schemes are rejected at load time before any instruction runs.

use std::fmt;

use super::Cartridge;

/// CPU-visible cartridge sub-window boundaries.
pub const EXPANSION_BASE: u16 = 0x4020;
pub const SRAM_BASE: u16 = 0x6000;
pub const PRG_LOWER_BASE: u16 = 0x8000;
pub const PRG_UPPER_BASE: u16 = 0xC000;

/// 16 KiB program-ROM page, 8 KiB character-ROM page.
pub const PRG_PAGE_SIZE: usize = 0x4000;
pub const CHR_PAGE_SIZE: usize = 0x2000;

/// Physical storage classes inside the cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRegion {
    Expansion,
    SaveRam,
    PrgRom,
    ChrRom,
}

/// A resolved physical byte location: which buffer, and the offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub region: CartRegion,
    pub offset: usize,
}

/// Recoverable memory-routing failures, surfaced at the mapper boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// The address landed in a region whose backing buffer is absent or
    /// smaller than the resolved offset.
    Unbacked { region: CartRegion, offset: usize },
    /// Character-ROM read with no CHR pages populated; the video chip must
    /// fall back to its own video RAM.
    ChrUnbacked,
    /// Cartridge-range access with no cartridge attached to the bus.
    NoCartridge,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::Unbacked { region, offset } => {
                write!(f, "unbacked {:?} access at offset {:#06x}", region, offset)
            }
            MemoryError::ChrUnbacked => {
                write!(f, "no character ROM present, defer to video RAM")
            }
            MemoryError::NoCartridge => write!(f, "no cartridge attached"),
        }
    }
}

impl std::error::Error for MemoryError {}

/// Bank-switching strategy. `locate` handles the CPU cartridge range
/// (`0x4020..=0xFFFF`); `locate_chr` handles the video chip's pattern range
/// (`0x0000..0x2000`).
pub trait Mapper {
    fn locate(&self, cart: &Cartridge, addr: u16) -> Result<Location, MemoryError>;
    fn locate_chr(&self, cart: &Cartridge, addr: u16) -> Result<Location, MemoryError>;
}

/// Mapper 0: fixed sub-windows, no switching.
pub struct Nrom;

impl Mapper for Nrom {
    fn locate(&self, cart: &Cartridge, addr: u16) -> Result<Location, MemoryError> {
        debug_assert!(addr >= EXPANSION_BASE);
        let (region, offset) = if addr < SRAM_BASE {
            (CartRegion::Expansion, (addr - EXPANSION_BASE) as usize)
        } else if addr < PRG_LOWER_BASE {
            (CartRegion::SaveRam, (addr - SRAM_BASE) as usize)
        } else {
            let mut offset = (addr - PRG_LOWER_BASE) as usize;
            // A single 16 KiB PRG page appears in both banks.
            if cart.prg_rom_pages() == 1 {
                offset &= PRG_PAGE_SIZE - 1;
            }
            (CartRegion::PrgRom, offset)
        };
        if offset >= cart.region_len(region) {
            return Err(MemoryError::Unbacked { region, offset });
        }
        Ok(Location { region, offset })
    }

    fn locate_chr(&self, cart: &Cartridge, addr: u16) -> Result<Location, MemoryError> {
        debug_assert!(addr < 0x2000);
        if cart.chr_rom_pages() == 0 {
            return Err(MemoryError::ChrUnbacked);
        }
        let offset = addr as usize;
        if offset >= cart.region_len(CartRegion::ChrRom) {
            return Err(MemoryError::Unbacked {
                region: CartRegion::ChrRom,
                offset,
            });
        }
        Ok(Location {
            region: CartRegion::ChrRom,
            offset,
        })
    }
}
