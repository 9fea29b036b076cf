/// Word-granular access to an address space.
///
/// Addresses are plain integers. A word is `usize` wide, so the target sees
/// 32-bit accesses while a host simulation sees native words.
///
/// # Safety
///
/// Implementors backed by real memory dereference raw addresses; callers must
/// only pass word-aligned addresses that belong to a mapped region.
pub trait Memory {
    unsafe fn read_word(&self, address: usize) -> usize;
    unsafe fn write_word(&mut self, address: usize, word: usize);

    /// Copies `count` words from `src` to `dst`. The ranges never overlap.
    unsafe fn copy_words(&mut self, src: usize, dst: usize, count: usize);
    /// Writes `word` to `count` consecutive words starting at `dst`.
    unsafe fn fill_words(&mut self, dst: usize, count: usize, word: usize);
}
