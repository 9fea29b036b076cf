#[macro_use]
extern crate log;
extern crate cortex_boot;

use std::cell::Cell;

use cortex_boot::config::{self, MemPrimitives};
use cortex_boot::layout::{Layout, LayoutError, Region, WORD_SIZE};
use cortex_boot::sim::{SimError, SimMemory};
use cortex_boot::startup::{Halt, Startup, State};
use cortex_boot::vector::VectorError;
use derive_more::{Display, From};

/// Power-on content of RAM.
pub const GARBAGE: usize = 0xDEAD_BEEF;

pub struct Config {
    pub data_words: usize,
    pub bss_words: usize,
    pub mem_primitives: MemPrimitives,
    /// Exception taken once the entry point is reached.
    pub fire: Option<usize>,
    pub watchdog: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_words: 100,
            bss_words: 50,
            mem_primitives: MemPrimitives::default(),
            fire: None,
            watchdog: 1000,
        }
    }
}

#[derive(Debug, Display, From, PartialEq)]
pub enum Error {
    #[display(fmt = "Simulated memory: {}", _0)]
    Sim(SimError),
    #[display(fmt = "Layout: {}", _0)]
    Layout(LayoutError),
    #[display(fmt = "Vector: {}", _0)]
    Vector(VectorError),
}

#[derive(Debug, PartialEq)]
pub struct Report {
    pub transitions: Vec<State>,
    pub halt: Option<Halt>,
    pub entry_calls: usize,
    pub steps: usize,
    pub data_intact: bool,
    pub bss_zeroed: bool,
    pub guards_intact: bool,
}

fn pattern(index: usize) -> usize {
    0xC0DE_0000 ^ index
}

pub struct Simulator {
    config: Config,
}

impl Simulator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn memory(&self) -> Result<(SimMemory, Layout), Error> {
        let (data_words, bss_words) = (self.config.data_words, self.config.bss_words);
        // One guard word on each side of data and bss
        let ram_words = data_words.saturating_add(bss_words).saturating_add(2);
        SimMemory::check_size(data_words, ram_words)?;
        let image: Vec<usize> = (0..data_words).map(pattern).collect();
        let mut memory = SimMemory::new(&image, ram_words)?;
        memory.fill_ram(GARBAGE);
        let ram = memory.ram();
        let data = memory.data_region(ram.start + WORD_SIZE, data_words);
        let bss = Region::new(data.end, data.end + bss_words * WORD_SIZE);
        let layout = Layout { stack_top: ram.end, data, bss };
        layout.check()?;
        Ok((memory, layout))
    }

    pub fn run(&self) -> Result<Report, Error> {
        let (memory, layout) = self.memory()?;
        let calls = Cell::new(0);
        let config = config::Config::new(self.config.mem_primitives);
        let mut startup = Startup::new(memory, layout, config, || calls.set(calls.get() + 1));

        let mut transitions = vec![startup.state()];
        let mut steps = 0;
        while steps < self.config.watchdog {
            let state = match (startup.state(), self.config.fire) {
                (State::Running, Some(index)) if calls.get() == 0 => startup.raise(index)?,
                _ => unsafe { startup.step() },
            };
            steps += 1;
            if transitions.last() != Some(&state) {
                info!("{:?}", state);
                transitions.push(state);
            }
        }

        let halt = match startup.state() {
            State::Halted(halt) => {
                warn!("Halted: {}", halt);
                Some(halt)
            }
            state => {
                warn!("Watchdog expired in {:?}", state);
                None
            }
        };

        let memory = startup.memory();
        let ram = memory.ram();
        let data = memory.ram_words(layout.data.ram());
        let data_intact = data.iter().enumerate().all(|(i, &word)| word == pattern(i));
        let bss_zeroed = memory.ram_words(layout.bss).iter().all(|&word| word == 0);
        let guards_intact =
            memory.peek(ram.start) == GARBAGE && memory.peek(ram.end - WORD_SIZE) == GARBAGE;
        Ok(Report {
            transitions,
            halt,
            entry_calls: calls.get(),
            steps,
            data_intact,
            bss_zeroed,
            guards_intact,
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use cortex_boot::config::MemPrimitives;
    use cortex_boot::sim::SimError;
    use cortex_boot::startup::{Halt, State};
    use cortex_boot::vector::{Handler, VectorError};

    use super::{Config, Error, Simulator};

    #[test]
    fn test_entry_return() {
        let report = Simulator::new(Config::default()).run().unwrap();
        let expected = vec![
            State::Booting,
            State::Relocating,
            State::ZeroFilling,
            State::Running,
            State::Halted(Halt::EntryReturned),
        ];
        assert_eq!(report.transitions, expected);
        assert_eq!(report.entry_calls, 1);
        assert_eq!(report.steps, 1000);
        assert!(report.data_intact && report.bss_zeroed && report.guards_intact);
    }

    #[test]
    fn test_fire_unassigned_interrupt() {
        let config =
            Config { fire: Some(16 + 3), mem_primitives: MemPrimitives::Freestanding, ..Default::default() };
        let report = Simulator::new(config).run().unwrap();
        assert_eq!(report.halt, Some(Halt::Unhandled(Handler::Default)));
        assert_eq!(report.entry_calls, 0);
        assert!(report.data_intact && report.bss_zeroed && report.guards_intact);
    }

    #[test]
    fn test_watchdog_expires() {
        let config = Config { watchdog: 2, ..Default::default() };
        let report = Simulator::new(config).run().unwrap();
        assert_eq!(report.halt, None);
        assert_eq!(report.transitions.last(), Some(&State::ZeroFilling));
        assert!(report.data_intact);
        assert!(!report.bss_zeroed);
    }

    #[test]
    fn test_fire_reset_rejected() {
        let config = Config { fire: Some(1), ..Default::default() };
        let error = Simulator::new(config).run().unwrap_err();
        assert_eq!(error, Error::Vector(VectorError::NotAnException(1)));
        assert_eq!(format!("{}", error), "Vector: vector 1 is not an exception");
    }

    #[test]
    fn test_oversized_image_rejected() {
        let config = Config { data_words: usize::MAX / 4, ..Default::default() };
        let error = Simulator::new(config).run().unwrap_err();
        assert_eq!(error, Error::Sim(SimError::FlashOverflow(usize::MAX / 4)));

        let config = Config { bss_words: usize::MAX, ..Default::default() };
        let error = Simulator::new(config).run().unwrap_err();
        assert_eq!(error, Error::Sim(SimError::RamOverflow(usize::MAX)));
        assert_eq!(format!("{}", error), format!("Simulated memory: {} words exceeds ram", usize::MAX));
    }
}
