//! STM32F405 vector layout: 16 Cortex-M4 system slots followed by 82
//! interrupt lines.

use super::{Handler, Slot};

pub const NUM_EXCEPTIONS: usize = 16;
pub const NUM_INTERRUPTS: usize = 82;
pub const VECTOR_TABLE_LEN: usize = NUM_EXCEPTIONS + NUM_INTERRUPTS;

pub const EXTI0: usize = 6;
pub const TIM1_UP_TIM10: usize = 25;
pub const I2C1_EV: usize = 31;
pub const USART1: usize = 37;

/// Lines defined for the STM32F4 family but not implemented on the F405:
/// ETH, ETH_WKUP, DCMI, CRYP.
pub const ABSENT_INTERRUPTS: [usize; 4] = [61, 62, 78, 79];

/// Exception number of interrupt line `irq`.
pub const fn irq(irq: usize) -> usize {
    NUM_EXCEPTIONS + irq
}

const fn layout() -> [Slot; VECTOR_TABLE_LEN] {
    let mut slots = [Slot::Handler(Handler::Default); VECTOR_TABLE_LEN];
    slots[0] = Slot::StackPointer;
    slots[1] = Slot::Handler(Handler::Reset);
    slots[2] = Slot::Handler(Handler::Nmi);
    slots[3] = Slot::Handler(Handler::HardFault);
    slots[4] = Slot::Handler(Handler::MemManage);
    slots[5] = Slot::Handler(Handler::BusFault);
    slots[6] = Slot::Handler(Handler::UsageFault);
    slots[7] = Slot::Reserved;
    slots[8] = Slot::Reserved;
    slots[9] = Slot::Reserved;
    slots[10] = Slot::Reserved;
    slots[11] = Slot::Handler(Handler::SvCall);
    slots[12] = Slot::Handler(Handler::DebugMon);
    slots[13] = Slot::Reserved;
    slots[14] = Slot::Handler(Handler::PendSv);
    slots[15] = Slot::Handler(Handler::SysTick);

    slots[irq(EXTI0)] = Slot::Handler(Handler::Exti0);
    slots[irq(TIM1_UP_TIM10)] = Slot::Handler(Handler::Tim1Up);
    slots[irq(I2C1_EV)] = Slot::Handler(Handler::I2c1Ev);
    slots[irq(USART1)] = Slot::Handler(Handler::Usart1);

    let mut i = 0;
    while i < ABSENT_INTERRUPTS.len() {
        slots[irq(ABSENT_INTERRUPTS[i])] = Slot::Reserved;
        i += 1;
    }
    slots
}

pub const VECTOR_LAYOUT: [Slot; VECTOR_TABLE_LEN] = layout();

mod test {
    #[test]
    fn test_system_slots() {
        use super::super::{Handler::*, Slot, Slot::Reserved};
        use super::VECTOR_LAYOUT;

        let expected = [
            Slot::StackPointer,
            Slot::Handler(Reset),
            Slot::Handler(Nmi),
            Slot::Handler(HardFault),
            Slot::Handler(MemManage),
            Slot::Handler(BusFault),
            Slot::Handler(UsageFault),
            Reserved,
            Reserved,
            Reserved,
            Reserved,
            Slot::Handler(SvCall),
            Slot::Handler(DebugMon),
            Reserved,
            Slot::Handler(PendSv),
            Slot::Handler(SysTick),
        ];
        assert_eq!(&VECTOR_LAYOUT[..16], &expected[..]);
    }

    #[test]
    fn test_interrupt_slots() {
        use super::super::{Handler, Slot};
        use super::*;

        assert_eq!(VECTOR_LAYOUT.len(), 98);
        assert_eq!(VECTOR_LAYOUT[22], Slot::Handler(Handler::Exti0));
        assert_eq!(VECTOR_LAYOUT[41], Slot::Handler(Handler::Tim1Up));
        assert_eq!(VECTOR_LAYOUT[47], Slot::Handler(Handler::I2c1Ev));
        assert_eq!(VECTOR_LAYOUT[53], Slot::Handler(Handler::Usart1));
        for index in [77, 78, 94, 95] {
            assert_eq!(VECTOR_LAYOUT[index], Slot::Reserved);
        }
        let named = [22, 41, 47, 53, 77, 78, 94, 95];
        for index in (NUM_EXCEPTIONS..VECTOR_TABLE_LEN).filter(|i| !named.contains(i)) {
            assert!(VECTOR_LAYOUT[index] == Slot::Handler(Handler::Default), "slot {}", index);
        }
    }

    #[test]
    fn test_handler_symbols() {
        use super::super::{Handler, Slot};
        use super::VECTOR_LAYOUT;

        let symbols: [(usize, &str); 6] = [
            (1, "Reset_Handler"),
            (3, "HardFault_Handler"),
            (11, "SVC_Handler"),
            (15, "SysTick_Handler"),
            (22, "EXTI0_Handler"),
            (97, "Default_Handler"),
        ];
        for (index, symbol) in symbols.iter() {
            match VECTOR_LAYOUT[*index] {
                Slot::Handler(handler) => assert_eq!(handler.symbol(), *symbol),
                slot => panic!("slot {} is {:?}", index, slot),
            }
        }
        assert_eq!(Handler::Default.symbol(), "Default_Handler");
    }
}
