/// How the runtime image is relocated and zeroed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemPrimitives {
    /// The environment provides bulk copy/fill (memcpy/memset).
    Provided,
    /// Explicit word-by-word loops, no library support assumed.
    Freestanding,
}

impl Default for MemPrimitives {
    fn default() -> Self {
        match cfg!(feature = "freestanding") {
            true => Self::Freestanding,
            false => Self::Provided,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub mem_primitives: MemPrimitives,
}

impl Config {
    pub const fn new(mem_primitives: MemPrimitives) -> Self {
        Self { mem_primitives }
    }
}
