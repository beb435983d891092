// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs a Chip-8 ROM without a window, then prints the screen and registers

use gumdrop::*;
use owo_colors::OwoColorize;
use std::{num::ParseIntError, path::PathBuf, str::FromStr};
use vip8::{error::Result, prelude::*};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on vip8.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Print each instruction as it runs.")]
    pub debug: bool,
    #[options(help = "Run at most this many cycles.", default = "1000")]
    pub cycles: usize,
    #[options(help = "Queue keys before running (hex, comma separated: 1,a,f)")]
    pub keys: Option<Keys>,
    #[options(help = "Hexdump program memory after running.")]
    pub memory: bool,
}

/// A comma-separated list of hexadecimal keys
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Keys(Vec<u8>);

impl FromStr for Keys {
    type Err = ParseIntError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.split(',')
            .map(|key| u8::from_str_radix(key.trim(), 16))
            .collect::<std::result::Result<_, _>>()
            .map(Keys)
    }
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    env_logger::Builder::from_default_env()
        .filter_level(match options.debug {
            true => log::LevelFilter::Debug,
            false => log::LevelFilter::Warn,
        })
        .init();

    let mut cpu = CPU::with_rom(&options.file)?;
    cpu.flags.debug = options.debug;
    for &key in options.keys.iter().flat_map(|keys| keys.0.iter()) {
        if let Err(e) = cpu.press(key) {
            log::warn!("{e}");
        }
    }

    run(&mut cpu, options.cycles);

    println!("{}", cpu.screen());
    cpu.dump();
    if options.memory {
        println!("{}", cpu.mem().window(Region::Program.range()));
    }
    Ok(())
}

/// Runs up to `cycles` cycles.
///
/// Stops at the first error that leaves the CPU stuck, or when the program
/// waits on a key that will never come.
fn run(cpu: &mut CPU, cycles: usize) {
    for _ in 0..cycles {
        match cpu.tick() {
            Ok(_) => {}
            Err(e) if e.is_recoverable() => log::warn!("{e}"),
            Err(e) => {
                eprintln!("{}", e.bold().red());
                return;
            }
        }
        if cpu.is_waiting() && cpu.keys().is_empty() {
            log::info!("halted at {:03x}: waiting for a key", cpu.pc());
            return;
        }
    }
}
