// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints a colorized listing of a Chip-8 ROM
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};
use vip8::{cpu::mem::ENTRY_POINT, error::Result, prelude::*};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
    #[options(help = "Stop after this many instructions")]
    pub count: Option<usize>,
    #[options(help = "Don't color the output")]
    pub plain: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    let disassembler = match options.plain {
        true => Dis::plain(),
        false => Dis::default(),
    };
    let Some(contents) = contents.get(options.offset..) else {
        log::warn!(
            "offset {:x} is past the end of {} ({} bytes)",
            options.offset,
            options.file.display(),
            contents.len()
        );
        return Ok(());
    };
    if contents.len() % 2 != 0 {
        log::warn!("ignoring trailing odd byte");
    }
    let count = options.count.unwrap_or(usize::MAX);
    for (index, word) in contents.chunks_exact(2).take(count).enumerate() {
        let word = u16::from_be_bytes([word[0], word[1]]);
        let addr = ENTRY_POINT + options.offset + 2 * index;
        if options.plain {
            println!("{addr:03x}: {} {word:04x}", disassembler.once(word));
        } else {
            println!(
                "{:03x}: {} {:04x}",
                addr,
                disassembler.once(word),
                word.bright_black()
            );
        }
    }
    Ok(())
}
