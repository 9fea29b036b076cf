use derive_more::Display;

use crate::vector::Handler;

/// Why execution stopped making progress.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Halt {
    #[display(fmt = "entry point returned")]
    EntryReturned,
    #[display(fmt = "unhandled exception, {}", "_0.symbol()")]
    Unhandled(Handler),
    #[display(fmt = "exit with status {}", _0)]
    Exit(i32),
    #[display(fmt = "panic")]
    Panic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Booting,
    Relocating,
    ZeroFilling,
    Running,
    /// Terminal, only a hardware reset leaves it.
    Halted(Halt),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    Relocated,
    Zeroed,
    EntryReturned,
    Exception(Handler),
}

impl State {
    pub fn next(self, event: Event) -> Self {
        match (self, event) {
            (Self::Halted(halt), _) => Self::Halted(halt),
            (_, Event::Exception(handler)) => Self::Halted(Halt::Unhandled(handler)),
            (Self::Booting, Event::Start) => Self::Relocating,
            (Self::Relocating, Event::Relocated) => Self::ZeroFilling,
            (Self::ZeroFilling, Event::Zeroed) => Self::Running,
            (Self::Running, Event::EntryReturned) => Self::Halted(Halt::EntryReturned),
            (state, _) => state,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted(_))
    }
}

mod test {
    #[test]
    fn test_boot_sequence() {
        use super::{Event, Halt, State};

        let mut state = State::Booting;
        for event in [Event::Start, Event::Relocated, Event::Zeroed] {
            state = state.next(event);
        }
        assert_eq!(state, State::Running);
        assert_eq!(state.next(Event::EntryReturned), State::Halted(Halt::EntryReturned));
    }

    #[test]
    fn test_out_of_order_events() {
        use super::{Event, State};

        assert_eq!(State::Booting.next(Event::Zeroed), State::Booting);
        assert_eq!(State::Relocating.next(Event::EntryReturned), State::Relocating);
        assert_eq!(State::Running.next(Event::Start), State::Running);
    }

    #[test]
    fn test_halted_is_terminal() {
        use super::{Event, Halt, State};
        use crate::vector::Handler;

        let states = [State::Booting, State::Relocating, State::ZeroFilling, State::Running];
        for state in states.iter() {
            let halted = state.next(Event::Exception(Handler::BusFault));
            assert_eq!(halted, State::Halted(Halt::Unhandled(Handler::BusFault)));
        }

        let halted = State::Halted(Halt::EntryReturned);
        let events = [
            Event::Start,
            Event::Relocated,
            Event::Zeroed,
            Event::EntryReturned,
            Event::Exception(Handler::HardFault),
        ];
        for event in events.iter() {
            assert_eq!(halted.next(*event), halted);
        }
    }

    #[test]
    fn test_halt_display() {
        use super::Halt;
        use crate::vector::Handler;

        let halt = Halt::Unhandled(Handler::SysTick);
        assert_eq!(std::format!("{}", halt), "unhandled exception, SysTick_Handler");
        assert_eq!(std::format!("{}", Halt::EntryReturned), "entry point returned");
        assert_eq!(std::format!("{}", Halt::Exit(2)), "exit with status 2");
        assert_eq!(std::format!("{}", Halt::Panic), "panic");
    }
}
