use cortex_boot::vector::{Handler, Slot, VECTOR_LAYOUT, VECTOR_TABLE_LEN};

use crate::cortex_m4::*;

#[derive(Copy, Clone)]
#[repr(C)]
pub union Vector {
    handler: unsafe extern "C" fn() -> !,
    reserved: usize,
}

const fn handler(handler: Handler) -> unsafe extern "C" fn() -> ! {
    match handler {
        Handler::Reset => Reset_Handler,
        Handler::Nmi => NMI_Handler,
        Handler::HardFault => HardFault_Handler,
        Handler::MemManage => MemManage_Handler,
        Handler::BusFault => BusFault_Handler,
        Handler::UsageFault => UsageFault_Handler,
        Handler::SvCall => SVC_Handler,
        Handler::DebugMon => DebugMon_Handler,
        Handler::PendSv => PendSV_Handler,
        Handler::SysTick => SysTick_Handler,
        Handler::Exti0 => EXTI0_Handler,
        Handler::Tim1Up => TIM1_UP_Handler,
        Handler::Usart1 => USART1_Handler,
        Handler::I2c1Ev => I2C1_EV_Handler,
        Handler::Default => Default_Handler,
    }
}

const fn vectors() -> [Vector; VECTOR_TABLE_LEN - 1] {
    let mut vectors = [Vector { reserved: 0 }; VECTOR_TABLE_LEN - 1];
    let mut index = 1;
    while index < VECTOR_TABLE_LEN {
        vectors[index - 1] = match VECTOR_LAYOUT[index] {
            Slot::Handler(h) => Vector { handler: handler(h) },
            Slot::StackPointer | Slot::Reserved => Vector { reserved: 0 },
        };
        index += 1;
    }
    vectors
}

/// Slots 1.. of the vector table. Slot 0, the initial stack pointer, is
/// emitted by the linker script right before this.
#[used]
#[no_mangle]
#[link_section = ".isr_vector.handlers"]
pub static VECTORS: [Vector; VECTOR_TABLE_LEN - 1] = vectors();

mod test {
    #[test]
    fn test_vectors_follow_layout() {
        use cortex_boot::vector::{Slot, VECTOR_LAYOUT, VECTOR_TABLE_LEN};

        use super::{handler, VECTORS};

        assert_eq!(VECTORS.len(), VECTOR_TABLE_LEN - 1);
        for index in 1..VECTOR_TABLE_LEN {
            let address = unsafe { VECTORS[index - 1].reserved };
            let expected = match VECTOR_LAYOUT[index] {
                Slot::Handler(h) => handler(h) as usize,
                Slot::StackPointer | Slot::Reserved => 0,
            };
            assert!(address == expected, "slot {}", index);
        }
    }

    #[test]
    fn test_vectors_bind_exported_handlers() {
        use super::VECTORS;
        use crate::cortex_m4::*;

        let named: [(usize, unsafe extern "C" fn() -> !); 16] = [
            (1, Reset_Handler),
            (2, NMI_Handler),
            (3, HardFault_Handler),
            (4, MemManage_Handler),
            (5, BusFault_Handler),
            (6, UsageFault_Handler),
            (11, SVC_Handler),
            (12, DebugMon_Handler),
            (14, PendSV_Handler),
            (15, SysTick_Handler),
            (16, Default_Handler),
            (22, EXTI0_Handler),
            (41, TIM1_UP_Handler),
            (47, I2C1_EV_Handler),
            (53, USART1_Handler),
            (97, Default_Handler),
        ];
        for (index, function) in named.iter() {
            let address = unsafe { VECTORS[index - 1].reserved };
            assert!(address == *function as usize, "slot {}", index);
        }

        for index in [7, 8, 9, 10, 13, 77, 78, 94, 95].iter() {
            assert_eq!(unsafe { VECTORS[index - 1].reserved }, 0);
        }
    }
}
