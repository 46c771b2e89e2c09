//! Internal CPU work RAM: a 2 KiB array mirrored across the 8 KiB window
//! at `0x0000..0x2000`, so only the low 11 bits of the address matter.

pub const RAM_SIZE: usize = 0x800;

pub struct Ram {
    ram: [u8; RAM_SIZE],
}

impl Ram {
    pub fn new() -> Self {
        Ram { ram: [0; RAM_SIZE] }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.ram[(addr & 0x7FF) as usize]
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.ram[(addr & 0x7FF) as usize] = data;
    }

    // Snapshot access
    pub fn as_slice(&self) -> &[u8] {
        &self.ram
    }

    pub fn load(&mut self, data: &[u8]) {
        let n = data.len().min(RAM_SIZE);
        self.ram[..n].copy_from_slice(&data[..n]);
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}
