#![allow(non_snake_case)]

use core::ptr::{self, addr_of};

use cortex_boot::config::Config;
use cortex_boot::layout::{DataRegion, Layout, Region};
use cortex_boot::startup::{Halt, Startup, State};
use cortex_boot::vector::Handler;
use hal::memory::Memory;

#[cfg(not(test))]
extern "C" {
    static _estack: u32;
    static _la_data: u32;
    static _sdata: u32;
    static _edata: u32;
    static _sbss: u32;
    static _ebss: u32;
}

#[cfg(not(test))]
extern "Rust" {
    fn main();
}

/// Host test builds have no linker script or application.
#[cfg(test)]
#[allow(non_upper_case_globals)]
mod symbols {
    pub static _estack: u32 = 0;
    pub static _la_data: u32 = 0;
    pub static _sdata: u32 = 0;
    pub static _edata: u32 = 0;
    pub static _sbss: u32 = 0;
    pub static _ebss: u32 = 0;

    pub unsafe fn main() {}
}

#[cfg(test)]
use symbols::*;

/// Physical memory, accessed through raw pointers.
pub struct RawMemory;

impl Memory for RawMemory {
    unsafe fn read_word(&self, address: usize) -> usize {
        ptr::read_volatile(address as *const usize)
    }

    unsafe fn write_word(&mut self, address: usize, word: usize) {
        ptr::write_volatile(address as *mut usize, word)
    }

    unsafe fn copy_words(&mut self, src: usize, dst: usize, count: usize) {
        ptr::copy_nonoverlapping(src as *const usize, dst as *mut usize, count)
    }

    unsafe fn fill_words(&mut self, dst: usize, count: usize, word: usize) {
        match word {
            0 => ptr::write_bytes(dst as *mut usize, 0, count),
            _ => (0..count).for_each(|i| ptr::write_volatile((dst as *mut usize).add(i), word)),
        }
    }
}

pub fn linker_layout() -> Layout {
    Layout {
        stack_top: addr_of!(_estack) as usize,
        data: DataRegion {
            load: addr_of!(_la_data) as usize,
            start: addr_of!(_sdata) as usize,
            end: addr_of!(_edata) as usize,
        },
        bss: Region::new(addr_of!(_sbss) as usize, addr_of!(_ebss) as usize),
    }
}

/// Parks the core forever.
#[inline(never)]
pub fn park(halt: Halt) -> ! {
    // keep the cause alive in the frame for a debugger
    let _halt = core::hint::black_box(halt);
    loop {
        cortex_m::asm::nop();
    }
}

/// The entry point.
///
/// # Safety
///
/// This function should not be called by software.
#[no_mangle]
pub unsafe extern "C" fn Reset_Handler() -> ! {
    let mut startup = Startup::new(RawMemory, linker_layout(), Config::default(), || main());
    loop {
        if let State::Halted(halt) = startup.step() {
            park(halt)
        }
    }
}

macro_rules! parking_handlers {
    ($($symbol:ident => $handler:ident,)+) => {
        $(
            #[no_mangle]
            pub unsafe extern "C" fn $symbol() -> ! {
                park(Halt::Unhandled(Handler::$handler))
            }
        )+
    };
}

parking_handlers! {
    NMI_Handler => Nmi,
    HardFault_Handler => HardFault,
    MemManage_Handler => MemManage,
    BusFault_Handler => BusFault,
    UsageFault_Handler => UsageFault,
    SVC_Handler => SvCall,
    DebugMon_Handler => DebugMon,
    PendSV_Handler => PendSv,
    SysTick_Handler => SysTick,
    EXTI0_Handler => Exti0,
    TIM1_UP_Handler => Tim1Up,
    USART1_Handler => Usart1,
    I2C1_EV_Handler => I2c1Ev,
    Default_Handler => Default,
}
