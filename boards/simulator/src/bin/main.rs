#[macro_use]
extern crate log;

use std::process;

use env_logger::Env;

use cortex_boot::config::MemPrimitives;
use simulator::{Config, Simulator};

fn parse<'a>(matches: &'a clap::ArgMatches<'a>, name: &str, default: usize) -> Result<usize, String> {
    match matches.value_of(name) {
        Some(value) => value.parse::<usize>().map_err(|_| format!("{} not a number", name)),
        None => Ok(default),
    }
}

fn init<'a>(matches: &'a clap::ArgMatches<'a>) -> Result<Config, String> {
    let default = Config::default();
    let mem_primitives = match matches.is_present("freestanding") {
        true => MemPrimitives::Freestanding,
        false => default.mem_primitives,
    };
    let fire = match matches.value_of("fire") {
        Some(_) => Some(parse(matches, "fire", 0)?),
        None => None,
    };
    Ok(Config {
        data_words: parse(matches, "data-words", default.data_words)?,
        bss_words: parse(matches, "bss-words", default.bss_words)?,
        mem_primitives,
        fire,
        watchdog: parse(matches, "watchdog", default.watchdog)?,
    })
}

fn app() -> clap::App<'static, 'static> {
    clap::App::new("simulator")
        .version("0.1")
        .author("qiuchengxuan")
        .about("Boot sequence simulator")
        .arg(clap::Arg::with_name("data-words").long("data-words").help("Words of .data").takes_value(true))
        .arg(clap::Arg::with_name("bss-words").long("bss-words").help("Words of .bss").takes_value(true))
        .arg(clap::Arg::with_name("freestanding").long("freestanding").help("Copy with explicit word loops"))
        .arg(clap::Arg::with_name("fire").long("fire").help("Exception to take at entry").takes_value(true))
        .arg(clap::Arg::with_name("watchdog").long("watchdog").help("Step bound").takes_value(true))
}

fn run<'a>(matches: &'a clap::ArgMatches<'a>) -> Result<(), String> {
    let config = init(matches)?;
    debug!("Using {:?} memory primitives", config.mem_primitives);
    let report = Simulator::new(config).run().map_err(|e| e.to_string())?;
    match report.halt {
        Some(halt) => println!("Halted after {} steps: {}", report.steps, halt),
        None => println!("Watchdog expired after {} steps", report.steps),
    }
    println!("Entry point called {} time(s)", report.entry_calls);
    println!("Data intact: {}", report.data_intact);
    println!("Bss zeroed: {}", report.bss_zeroed);
    println!("Guards intact: {}", report.guards_intact);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let matches = app().get_matches();
    if let Err(error) = run(&matches) {
        eprintln!("{}", error);
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{app, run};

    #[test]
    fn test_errors_reported() {
        let matches = app().get_matches_from(vec!["simulator", "--data-words", "many"]);
        assert_eq!(run(&matches), Err("data-words not a number".to_string()));

        let matches = app().get_matches_from(vec!["simulator", "--fire", "1"]);
        assert_eq!(run(&matches), Err("Vector: vector 1 is not an exception".to_string()));

        let matches = app().get_matches_from(vec!["simulator", "--watchdog", "10"]);
        assert_eq!(run(&matches), Ok(()));
    }
}
