#![no_std]

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

extern crate derive_more;
extern crate hal;
#[macro_use]
extern crate log;

pub mod config;
pub mod layout;
pub mod logger;
#[cfg(any(test, feature = "std"))]
pub mod sim;
pub mod startup;
pub mod sys;
pub mod vector;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
