#![no_main]
#![no_std]

extern crate chips;
extern crate cortex_boot;
#[macro_use]
extern crate log;

use core::panic::PanicInfo;
use core::ptr::addr_of_mut;

use chips::cortex_m4::park;
use cortex_boot::logger;
use cortex_boot::startup::Halt;

static mut LOG_BUFFER: [u8; 1024] = [0u8; 1024];

fn board_name() -> &'static str {
    "STM32F405"
}

#[inline]
fn halt() -> ! {
    cortex_m::asm::bkpt();
    loop {}
}

/// Application entry, called once `.data` and `.bss` are initialized.
#[export_name = "main"]
pub fn app_main() {
    logger::init(unsafe { &mut *addr_of_mut!(LOG_BUFFER) });
    info!("{} started, vector table at {:p}", board_name(), chips::stm32f4::VECTORS.as_ptr());
    // the RTOS scheduler takes over from here once linked
    loop {
        cortex_m::asm::wfi();
    }
}

#[panic_handler]
fn begin_panic(pi: &PanicInfo<'_>) -> ! {
    error!("{}", pi);
    match cfg!(feature = "debug") {
        true => halt(),
        false => park(Halt::Panic),
    }
}
