//! Runtime bring-up: relocate `.data`, zero `.bss`, hand off to the entry
//! point, park if it ever returns.

pub mod relocate;
pub mod state;

use hal::memory::Memory;

use crate::config::Config;
use crate::layout::Layout;
use crate::vector::{self, VectorError};

pub use state::{Event, Halt, State};

pub struct Startup<M, E> {
    memory: M,
    layout: Layout,
    config: Config,
    entry: E,
    state: State,
}

impl<M: Memory, E: FnMut()> Startup<M, E> {
    pub fn new(memory: M, layout: Layout, config: Config, entry: E) -> Self {
        Self { memory, layout, config, entry, state: State::Booting }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn into_memory(self) -> M {
        self.memory
    }

    /// Advances by one phase. Stepping a halted machine changes nothing.
    ///
    /// # Safety
    ///
    /// The layout must be well formed for the underlying memory and the
    /// relocated ranges must not be in use by anything else.
    pub unsafe fn step(&mut self) -> State {
        let primitives = self.config.mem_primitives;
        let event = match self.state {
            State::Booting => Event::Start,
            State::Relocating => {
                relocate::copy_data(&mut self.memory, &self.layout.data, primitives);
                Event::Relocated
            }
            State::ZeroFilling => {
                relocate::zero_bss(&mut self.memory, &self.layout.bss, primitives);
                // statics are valid from here on, logging included
                debug!(
                    "Runtime ready, data {} words, bss {} words",
                    self.layout.data.words(),
                    self.layout.bss.words()
                );
                Event::Zeroed
            }
            State::Running => {
                (self.entry)();
                error!("Entry point returned");
                Event::EntryReturned
            }
            State::Halted(_) => return self.state,
        };
        self.state = self.state.next(event);
        self.state
    }

    /// Steps until halted or `watchdog` steps have elapsed.
    ///
    /// # Safety
    ///
    /// Same as [`Startup::step`].
    pub unsafe fn run(&mut self, watchdog: usize) -> State {
        for _ in 0..watchdog {
            if self.step().is_halted() {
                break;
            }
        }
        self.state
    }

    /// Takes exception `index` as the processor would.
    pub fn raise(&mut self, index: usize) -> Result<State, VectorError> {
        let handler = vector::resolve(index)?;
        self.state = self.state.next(Event::Exception(handler));
        Ok(self.state)
    }
}

mod test {
    #[cfg(test)]
    use crate::sim::SimMemory;

    #[cfg(test)]
    const SENTINEL: usize = 0xA5A5_A5A5;

    #[cfg(test)]
    fn memory() -> (SimMemory, crate::layout::Layout) {
        use crate::layout::{Layout, Region, WORD_SIZE};

        let image: std::vec::Vec<usize> = (0..100).map(|i| i * 3 + 1).collect();
        let mut memory = SimMemory::new(&image, 160).unwrap();
        memory.fill_ram(SENTINEL);
        let ram = memory.ram();
        let data = memory.data_region(ram.start + WORD_SIZE, 100);
        let bss = Region::new(data.end, data.end + 50 * WORD_SIZE);
        let layout = Layout { stack_top: ram.end, data, bss };
        (memory, layout)
    }

    #[test]
    fn test_boot_to_entry() {
        use core::cell::Cell;

        use super::{Halt, Startup, State};
        use crate::config::Config;

        let (memory, layout) = memory();
        assert_eq!(layout.check(), Ok(()));
        let calls = Cell::new(0);
        let mut startup = Startup::new(memory, layout, Config::default(), || calls.set(calls.get() + 1));

        let states: std::vec::Vec<State> = (0..4).map(|_| unsafe { startup.step() }).collect();
        assert_eq!(
            states,
            [State::Relocating, State::ZeroFilling, State::Running, State::Halted(Halt::EntryReturned)]
        );
        assert_eq!(calls.get(), 1);

        let memory = startup.memory();
        let expected: std::vec::Vec<usize> = (0..100).map(|i| i * 3 + 1).collect();
        assert_eq!(memory.ram_words(layout.data.ram()), &expected[..]);
        assert!(memory.ram_words(layout.bss).iter().all(|&word| word == 0));
        assert_eq!(memory.peek(layout.data.start - crate::layout::WORD_SIZE), SENTINEL);
        assert_eq!(memory.peek(layout.bss.end), SENTINEL);
    }

    #[test]
    fn test_entry_return_parks() {
        use core::cell::Cell;

        use super::{Halt, Startup, State};
        use crate::config::Config;

        let (memory, layout) = memory();
        let calls = Cell::new(0);
        let mut startup = Startup::new(memory, layout, Config::default(), || calls.set(calls.get() + 1));
        let state = unsafe { startup.run(10) };
        assert_eq!(state, State::Halted(Halt::EntryReturned));

        let writes = startup.memory().writes();
        let reads = startup.memory().reads();
        for _ in 0..1000 {
            assert_eq!(unsafe { startup.step() }, State::Halted(Halt::EntryReturned));
        }
        assert_eq!(startup.memory().writes(), writes);
        assert_eq!(startup.memory().reads(), reads);
        assert_eq!(calls.get(), 1);
        assert_eq!(startup.raise(15), Ok(State::Halted(Halt::EntryReturned)));
    }

    #[test]
    fn test_unassigned_interrupt_halts() {
        use core::cell::Cell;

        use super::{Halt, Startup, State};
        use crate::config::Config;
        use crate::vector::{stm32f405::irq, Handler};

        let (memory, layout) = memory();
        let calls = Cell::new(0);
        let mut startup = Startup::new(memory, layout, Config::default(), || calls.set(calls.get() + 1));
        while unsafe { startup.step() } != State::Running {}

        let writes = startup.memory().writes();
        let state = startup.raise(irq(5)).unwrap();
        assert_eq!(state, State::Halted(Halt::Unhandled(Handler::Default)));
        assert_eq!(unsafe { startup.run(1000) }, state);
        assert_eq!(calls.get(), 0);
        assert_eq!(startup.memory().writes(), writes);
    }

    #[test]
    fn test_exception_routing() {
        use super::{Halt, Startup, State};
        use crate::config::Config;
        use crate::vector::{stm32f405::irq, stm32f405::EXTI0, Handler, VectorError};

        let cases = [
            (15, Handler::SysTick),
            (irq(EXTI0), Handler::Exti0),
            (8, Handler::HardFault),
            (irq(61), Handler::HardFault),
        ];
        for (index, handler) in cases.iter() {
            let (memory, layout) = memory();
            let mut startup = Startup::new(memory, layout, Config::default(), || ());
            assert_eq!(startup.raise(*index), Ok(State::Halted(Halt::Unhandled(*handler))));
        }

        let (memory, layout) = memory();
        let mut startup = Startup::new(memory, layout, Config::default(), || ());
        assert_eq!(startup.raise(1), Err(VectorError::NotAnException(1)));
        assert_eq!(startup.raise(98), Err(VectorError::OutOfRange(98)));
        assert_eq!(startup.state(), State::Booting);
    }

    #[test]
    fn test_reboot_reproduces_state() {
        use super::Startup;
        use crate::config::{Config, MemPrimitives};

        let (memory, layout) = memory();
        let config = Config::new(MemPrimitives::Freestanding);
        let mut startup = Startup::new(memory, layout, config, || ());
        unsafe { startup.run(10) };
        let mut memory = startup.into_memory();
        let first = memory.ram_words(memory.ram()).to_vec();

        memory.fill_ram(0x1234);
        let mut startup = Startup::new(memory, layout, Config::new(MemPrimitives::Provided), || ());
        unsafe { startup.run(10) };
        let memory = startup.memory();
        let mut second = memory.ram_words(memory.ram()).to_vec();
        // words outside the two regions keep whatever was there before
        let guard = (layout.data.start - memory.ram().start) / crate::layout::WORD_SIZE;
        assert_eq!(second[guard - 1], 0x1234);
        second[guard - 1] = SENTINEL;
        for word in second[guard + 150..].iter_mut() {
            *word = SENTINEL;
        }
        assert_eq!(second, first);
    }
}
