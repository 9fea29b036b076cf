pub mod vectors;

pub use vectors::VECTORS;
