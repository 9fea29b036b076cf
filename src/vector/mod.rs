//! Vector table description.
//!
//! The table is described once, as an ordered list of [`Slot`]s indexed by
//! exception number. The chip crate turns that list into the addresses the
//! processor reads after reset, so the layout tested here is the layout that
//! gets linked.

pub mod stm32f405;

use derive_more::Display;

pub use stm32f405::{VECTOR_LAYOUT, VECTOR_TABLE_LEN};

/// Handler bound to a vector slot. Every handler except `Reset` parks
/// execution forever.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    Reset,
    Nmi,
    HardFault,
    MemManage,
    BusFault,
    UsageFault,
    SvCall,
    DebugMon,
    PendSv,
    SysTick,
    Exti0,
    Tim1Up,
    Usart1,
    I2c1Ev,
    Default,
}

impl Handler {
    /// Exported symbol name.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Reset => "Reset_Handler",
            Self::Nmi => "NMI_Handler",
            Self::HardFault => "HardFault_Handler",
            Self::MemManage => "MemManage_Handler",
            Self::BusFault => "BusFault_Handler",
            Self::UsageFault => "UsageFault_Handler",
            Self::SvCall => "SVC_Handler",
            Self::DebugMon => "DebugMon_Handler",
            Self::PendSv => "PendSV_Handler",
            Self::SysTick => "SysTick_Handler",
            Self::Exti0 => "EXTI0_Handler",
            Self::Tim1Up => "TIM1_UP_Handler",
            Self::Usart1 => "USART1_Handler",
            Self::I2c1Ev => "I2C1_EV_Handler",
            Self::Default => "Default_Handler",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Initial main stack pointer, loaded by hardware on reset.
    StackPointer,
    Handler(Handler),
    /// Holds zero.
    Reserved,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum VectorError {
    #[display(fmt = "vector {} is not an exception", _0)]
    NotAnException(usize),
    #[display(fmt = "vector {} out of range", _0)]
    OutOfRange(usize),
}

pub fn slot(index: usize) -> Option<Slot> {
    VECTOR_LAYOUT.get(index).copied()
}

/// First slot bound to `handler`.
pub fn index_of(handler: Handler) -> Option<usize> {
    VECTOR_LAYOUT.iter().position(|&slot| slot == Slot::Handler(handler))
}

/// Handler that runs when exception `index` is taken.
///
/// A reserved slot holds address zero; fetching it faults, so the processor
/// ends up in the hard fault handler.
pub fn resolve(index: usize) -> Result<Handler, VectorError> {
    match slot(index) {
        None => Err(VectorError::OutOfRange(index)),
        Some(Slot::StackPointer) | Some(Slot::Handler(Handler::Reset)) => {
            Err(VectorError::NotAnException(index))
        }
        Some(Slot::Handler(handler)) => Ok(handler),
        Some(Slot::Reserved) => Ok(Handler::HardFault),
    }
}

mod test {
    #[test]
    fn test_resolve() {
        use super::{resolve, Handler, VectorError, VECTOR_TABLE_LEN};

        assert_eq!(resolve(0), Err(VectorError::NotAnException(0)));
        assert_eq!(resolve(1), Err(VectorError::NotAnException(1)));
        assert_eq!(resolve(3), Ok(Handler::HardFault));
        assert_eq!(resolve(7), Ok(Handler::HardFault));
        assert_eq!(resolve(15), Ok(Handler::SysTick));
        assert_eq!(resolve(16), Ok(Handler::Default));
        assert_eq!(resolve(VECTOR_TABLE_LEN), Err(VectorError::OutOfRange(VECTOR_TABLE_LEN)));
    }

    #[test]
    fn test_index_of() {
        use super::{index_of, Handler};

        assert_eq!(index_of(Handler::Reset), Some(1));
        assert_eq!(index_of(Handler::PendSv), Some(14));
        assert_eq!(index_of(Handler::Usart1), Some(16 + 37));
        assert_eq!(index_of(Handler::Default), Some(16));
    }
}
