use core::mem::size_of;

use derive_more::Display;

pub const WORD_SIZE: usize = size_of::<usize>();

/// Half-open address range `[start, end)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of whole words covered by the range.
    pub fn words(&self) -> usize {
        self.end.saturating_sub(self.start) / WORD_SIZE
    }

    pub fn contains(&self, address: usize) -> bool {
        self.start <= address && address < self.end
    }

    fn overlaps(&self, other: &Region) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Initialized data: an image in flash at `load` and its runtime range in RAM.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DataRegion {
    pub load: usize,
    pub start: usize,
    pub end: usize,
}

impl DataRegion {
    pub fn ram(&self) -> Region {
        Region::new(self.start, self.end)
    }

    pub fn image(&self) -> Region {
        Region::new(self.load, self.load + (self.end.saturating_sub(self.start)))
    }

    pub fn words(&self) -> usize {
        self.ram().words()
    }
}

/// Memory layout resolved by the linker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub stack_top: usize,
    pub data: DataRegion,
    pub bss: Region,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum LayoutError {
    #[display(fmt = "address {:#x} is not word aligned", _0)]
    Misaligned(usize),
    #[display(fmt = "range {:#x}..{:#x} ends before it starts", _0, _1)]
    Inverted(usize, usize),
    #[display(fmt = "range {:#x}..{:#x} overlaps {:#x}..{:#x}", _0, _1, _2, _3)]
    Overlap(usize, usize, usize, usize),
}

fn check_region(region: &Region) -> Result<(), LayoutError> {
    if region.end < region.start {
        return Err(LayoutError::Inverted(region.start, region.end));
    }
    for address in [region.start, region.end] {
        if address % WORD_SIZE != 0 {
            return Err(LayoutError::Misaligned(address));
        }
    }
    Ok(())
}

impl Layout {
    /// Validates what the linker script is expected to guarantee. The reset
    /// path never calls this; it exists for tooling and tests.
    pub fn check(&self) -> Result<(), LayoutError> {
        let (data, image, bss) = (self.data.ram(), self.data.image(), self.bss);
        check_region(&data)?;
        check_region(&bss)?;
        if self.data.load % WORD_SIZE != 0 {
            return Err(LayoutError::Misaligned(self.data.load));
        }
        if self.stack_top % WORD_SIZE != 0 {
            return Err(LayoutError::Misaligned(self.stack_top));
        }
        for (a, b) in [(&data, &bss), (&image, &data), (&image, &bss)] {
            if a.overlaps(b) {
                return Err(LayoutError::Overlap(a.start, a.end, b.start, b.end));
            }
        }
        Ok(())
    }
}

mod test {
    #[cfg(test)]
    fn layout() -> super::Layout {
        use super::{DataRegion, Layout, Region, WORD_SIZE};

        Layout {
            stack_top: 0x2002_0000,
            data: DataRegion { load: 0x0800_4000, start: 0x2000_0000, end: 0x2000_0000 + 4 * WORD_SIZE },
            bss: Region::new(0x2000_0000 + 4 * WORD_SIZE, 0x2000_0000 + 10 * WORD_SIZE),
        }
    }

    #[test]
    fn test_well_formed_layout() {
        let layout = layout();
        assert_eq!(layout.check(), Ok(()));
        assert_eq!(layout.data.words(), 4);
        assert_eq!(layout.bss.words(), 6);
        assert_eq!(layout.data.image().end, 0x0800_4000 + 4 * super::WORD_SIZE);
    }

    #[test]
    fn test_empty_regions() {
        let mut layout = layout();
        layout.data.end = layout.data.start;
        layout.bss.start = layout.bss.end;
        assert_eq!(layout.check(), Ok(()));
        assert_eq!(layout.data.words(), 0);
        assert_eq!(layout.bss.words(), 0);
    }

    #[test]
    fn test_malformed_layout() {
        use super::LayoutError;

        let mut layout = layout();
        layout.bss.end = layout.bss.start - super::WORD_SIZE;
        assert_eq!(layout.check(), Err(LayoutError::Inverted(layout.bss.start, layout.bss.end)));

        let mut layout = self::layout();
        layout.data.end += 1;
        assert_eq!(layout.check(), Err(LayoutError::Misaligned(layout.data.end)));

        let mut layout = self::layout();
        layout.bss.start -= super::WORD_SIZE;
        let (data, bss) = (layout.data, layout.bss);
        assert_eq!(layout.check(), Err(LayoutError::Overlap(data.start, data.end, bss.start, bss.end)));
        assert_eq!(
            std::format!("{}", layout.check().unwrap_err()),
            std::format!("range {:#x}..{:#x} overlaps {:#x}..{:#x}", data.start, data.end, bss.start, bss.end)
        );
    }
}
