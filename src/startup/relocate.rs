use hal::memory::Memory;

use crate::config::MemPrimitives;
use crate::layout::{DataRegion, Region, WORD_SIZE};

/// Copies the initialized-data image from flash into its RAM range.
///
/// # Safety
///
/// `region` must describe word-aligned, non-overlapping ranges mapped by
/// `memory`, and nothing else may be using the destination range.
pub unsafe fn copy_data<M: Memory>(memory: &mut M, region: &DataRegion, primitives: MemPrimitives) {
    let count = region.words();
    match primitives {
        MemPrimitives::Provided => memory.copy_words(region.load, region.start, count),
        MemPrimitives::Freestanding => {
            let (mut src, mut dst) = (region.load, region.start);
            for _ in 0..count {
                let word = memory.read_word(src);
                memory.write_word(dst, word);
                src += WORD_SIZE;
                dst += WORD_SIZE;
            }
        }
    }
}

/// Zero-fills `region`.
///
/// # Safety
///
/// Same as [`copy_data`].
pub unsafe fn zero_bss<M: Memory>(memory: &mut M, region: &Region, primitives: MemPrimitives) {
    let count = region.words();
    match primitives {
        MemPrimitives::Provided => memory.fill_words(region.start, count, 0),
        MemPrimitives::Freestanding => {
            let mut dst = region.start;
            for _ in 0..count {
                memory.write_word(dst, 0);
                dst += WORD_SIZE;
            }
        }
    }
}

mod test {
    #[cfg(test)]
    use crate::sim::SimMemory;

    #[cfg(test)]
    const SENTINEL: usize = 0xDEAD_BEEF;

    #[cfg(test)]
    fn pattern(index: usize) -> usize {
        0x5A00_0000 | (index * 7 + 3)
    }

    #[cfg(test)]
    fn data_image(words: usize) -> SimMemory {
        let image: std::vec::Vec<usize> = (0..words).map(pattern).collect();
        SimMemory::new(&image, words + 2).unwrap()
    }

    #[test]
    fn test_copy_data() {
        use super::copy_data;
        use crate::config::MemPrimitives;
        use crate::layout::WORD_SIZE;

        for primitives in [MemPrimitives::Provided, MemPrimitives::Freestanding] {
            let mut memory = data_image(100);
            memory.fill_ram(SENTINEL);
            let ram = memory.ram();
            let region = memory.data_region(ram.start + WORD_SIZE, 100);
            unsafe { copy_data(&mut memory, &region, primitives) };

            let copied: std::vec::Vec<usize> = memory.ram_words(region.ram()).to_vec();
            let expected: std::vec::Vec<usize> = (0..100).map(pattern).collect();
            assert_eq!(copied, expected);
            assert_eq!(memory.peek(region.start - WORD_SIZE), SENTINEL);
            assert_eq!(memory.peek(region.end), SENTINEL);
            assert_eq!(memory.writes(), 100);
        }
    }

    #[test]
    fn test_zero_bss() {
        use super::zero_bss;
        use crate::config::MemPrimitives;
        use crate::layout::{Region, WORD_SIZE};

        for primitives in [MemPrimitives::Provided, MemPrimitives::Freestanding] {
            let mut memory = SimMemory::new(&[], 52).unwrap();
            memory.fill_ram(SENTINEL);
            let start = memory.ram().start + WORD_SIZE;
            let region = Region::new(start, start + 50 * WORD_SIZE);
            unsafe { zero_bss(&mut memory, &region, primitives) };

            assert!(memory.ram_words(region).iter().all(|&word| word == 0));
            assert_eq!(memory.peek(region.start - WORD_SIZE), SENTINEL);
            assert_eq!(memory.peek(region.end), SENTINEL);
            assert_eq!(memory.writes(), 50);
        }
    }

    #[test]
    fn test_empty_regions() {
        use super::{copy_data, zero_bss};
        use crate::config::MemPrimitives;
        use crate::layout::Region;

        let mut memory = data_image(0);
        memory.fill_ram(SENTINEL);
        let start = memory.ram().start;
        let data = memory.data_region(start, 0);
        unsafe {
            copy_data(&mut memory, &data, MemPrimitives::Freestanding);
            zero_bss(&mut memory, &Region::new(start, start), MemPrimitives::Freestanding);
        }
        assert_eq!(memory.writes(), 0);
        assert!(memory.ram_words(memory.ram()).iter().all(|&word| word == SENTINEL));
    }
}
