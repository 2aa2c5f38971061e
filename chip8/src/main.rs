use std::fs;
use std::process;

use log::error;

use chipvm_core::{PseudoRandom, Vm};
use chipvm_display::SdlDisplay;

fn main() {
    env_logger::init();

    let rom_path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: chipvm <rom>");
            process::exit(2);
        }
    };

    let rom = match fs::read(&rom_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("unable to read {}: {}", rom_path, e);
            process::exit(1);
        }
    };

    let sdl = match sdl2::init() {
        Ok(context) => context,
        Err(e) => {
            error!("sdl init failed: {}", e);
            process::exit(1);
        }
    };
    let display = match SdlDisplay::new(&sdl) {
        Ok(display) => display,
        Err(e) => {
            error!("unable to open display: {}", e);
            process::exit(1);
        }
    };

    let mut vm = Vm::new(display, PseudoRandom::new());
    if let Err(e) = vm.load(&rom) {
        error!("unable to load {}: {}", rom_path, e);
        process::exit(1);
    }
    vm.run();
}
