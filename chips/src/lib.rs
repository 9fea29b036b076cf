#![no_std]

extern crate cortex_boot;
#[cfg(feature = "stm32")]
extern crate cortex_m;
extern crate hal;
#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
#[cfg(test)]
extern crate std;

#[cfg(feature = "stm32")]
pub mod cortex_m4;
#[cfg(all(feature = "stm32", feature = "newlib"))]
pub mod newlib;
#[cfg(feature = "stm32")]
pub mod stm32f4;
