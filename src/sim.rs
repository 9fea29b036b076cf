//! Simulated address space: a flash window holding an image and a RAM window.
//!
//! Every access is bounds checked. Touching an unmapped address, writing
//! flash, or misaligned access panics, which is what an off-by-one in the
//! startup loops should do under test.

use core::cell::Cell;
use std::vec::Vec;

use derive_more::Display;
use hal::memory::Memory;

use crate::layout::{DataRegion, Region, WORD_SIZE};

pub const FLASH_BASE: usize = 0x0800_0000;
pub const FLASH_SIZE: usize = 1024 * 1024;
pub const RAM_BASE: usize = 0x2000_0000;
pub const RAM_SIZE: usize = 128 * 1024;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum SimError {
    #[display(fmt = "image of {} words exceeds flash", _0)]
    FlashOverflow(usize),
    #[display(fmt = "{} words exceeds ram", _0)]
    RamOverflow(usize),
}

#[derive(Clone, Debug)]
pub struct SimMemory {
    flash: Vec<usize>,
    ram: Vec<usize>,
    reads: Cell<usize>,
    writes: usize,
}

fn fits(words: usize, size: usize) -> bool {
    words.checked_mul(WORD_SIZE).map_or(false, |bytes| bytes <= size)
}

impl SimMemory {
    /// Checks window sizes before anything is allocated for them.
    pub fn check_size(flash_words: usize, ram_words: usize) -> Result<(), SimError> {
        if !fits(flash_words, FLASH_SIZE) {
            return Err(SimError::FlashOverflow(flash_words));
        }
        if !fits(ram_words, RAM_SIZE) {
            return Err(SimError::RamOverflow(ram_words));
        }
        Ok(())
    }

    pub fn new(image: &[usize], ram_words: usize) -> Result<Self, SimError> {
        Self::check_size(image.len(), ram_words)?;
        let ram = std::vec![0; ram_words];
        Ok(Self { flash: image.to_vec(), ram, reads: Cell::new(0), writes: 0 })
    }

    pub fn flash(&self) -> Region {
        Region::new(FLASH_BASE, FLASH_BASE + self.flash.len() * WORD_SIZE)
    }

    pub fn ram(&self) -> Region {
        Region::new(RAM_BASE, RAM_BASE + self.ram.len() * WORD_SIZE)
    }

    /// Data region loading the start of the image to `start`.
    pub fn data_region(&self, start: usize, words: usize) -> DataRegion {
        DataRegion { load: FLASH_BASE, start, end: start + words * WORD_SIZE }
    }

    /// Overwrites all of RAM without counting as accesses.
    pub fn fill_ram(&mut self, word: usize) {
        self.ram.iter_mut().for_each(|w| *w = word);
    }

    /// Reads a word without counting as an access.
    pub fn peek(&self, address: usize) -> usize {
        match self.flash().contains(address) {
            true => self.flash[Self::word_index(self.flash(), address)],
            false => self.ram[Self::word_index(self.ram(), address)],
        }
    }

    pub fn ram_words(&self, region: Region) -> &[usize] {
        let start = Self::offset(self.ram(), region.start);
        &self.ram[start..start + region.words()]
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Offset of a range boundary, which may sit at the end of the window.
    fn offset(window: Region, address: usize) -> usize {
        assert!(address % WORD_SIZE == 0, "misaligned access at {:#x}", address);
        assert!(
            window.start <= address && address <= window.end,
            "access to unmapped address {:#x}",
            address
        );
        (address - window.start) / WORD_SIZE
    }

    fn word_index(window: Region, address: usize) -> usize {
        assert!(window.contains(address), "access to unmapped address {:#x}", address);
        Self::offset(window, address)
    }
}

impl Memory for SimMemory {
    unsafe fn read_word(&self, address: usize) -> usize {
        self.reads.set(self.reads.get() + 1);
        self.peek(address)
    }

    unsafe fn write_word(&mut self, address: usize, word: usize) {
        let index = Self::word_index(self.ram(), address);
        self.ram[index] = word;
        self.writes += 1;
    }

    unsafe fn copy_words(&mut self, src: usize, dst: usize, count: usize) {
        let (src, dst) = (Self::offset(self.flash(), src), Self::offset(self.ram(), dst));
        self.ram[dst..dst + count].copy_from_slice(&self.flash[src..src + count]);
        self.reads.set(self.reads.get() + count);
        self.writes += count;
    }

    unsafe fn fill_words(&mut self, dst: usize, count: usize, word: usize) {
        let dst = Self::offset(self.ram(), dst);
        self.ram[dst..dst + count].iter_mut().for_each(|w| *w = word);
        self.writes += count;
    }
}

mod test {
    #[test]
    fn test_windows() {
        use super::{SimMemory, FLASH_BASE, RAM_BASE};
        use crate::layout::WORD_SIZE;

        let memory = SimMemory::new(&[1, 2, 3], 4).unwrap();
        assert_eq!(memory.flash().end, FLASH_BASE + 3 * WORD_SIZE);
        assert_eq!(memory.ram().end, RAM_BASE + 4 * WORD_SIZE);
        assert_eq!(memory.peek(FLASH_BASE + 2 * WORD_SIZE), 3);
        assert_eq!(memory.peek(RAM_BASE), 0);
    }

    #[test]
    fn test_oversized() {
        use super::{SimError, SimMemory, RAM_SIZE};
        use crate::layout::WORD_SIZE;

        let words = RAM_SIZE / WORD_SIZE + 1;
        assert_eq!(SimMemory::new(&[], words).unwrap_err(), SimError::RamOverflow(words));
        assert_eq!(SimMemory::check_size(0, usize::MAX), Err(SimError::RamOverflow(usize::MAX)));
        assert_eq!(SimMemory::check_size(usize::MAX / 4, 0), Err(SimError::FlashOverflow(usize::MAX / 4)));
        assert_eq!(SimMemory::check_size(super::FLASH_SIZE / WORD_SIZE, RAM_SIZE / WORD_SIZE), Ok(()));
    }

    #[test]
    #[should_panic(expected = "unmapped")]
    fn test_write_past_ram() {
        use hal::memory::Memory;

        let mut memory = super::SimMemory::new(&[], 4).unwrap();
        let end = memory.ram().end;
        unsafe { memory.write_word(end, 0) };
    }

    #[test]
    #[should_panic(expected = "unmapped")]
    fn test_write_flash() {
        use hal::memory::Memory;

        let mut memory = super::SimMemory::new(&[1], 4).unwrap();
        unsafe { memory.write_word(super::FLASH_BASE, 0) };
    }
}
