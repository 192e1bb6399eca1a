use std::path::Path;

use suanpan_bytecode::{Module, disassemble};

use super::read_container;

pub fn run(file: &Path) {
    let bytes = read_container(file);
    let module = match Module::from_bytes(bytes) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    print!("{}", disassemble(&module));
}
