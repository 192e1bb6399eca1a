use std::path::Path;

use suanpan_vm::{Machine, Value};

use super::read_container;

pub fn run(file: &Path, args: &[String]) {
    let bytes = read_container(file);

    let mut machine = Machine::with_stdlib();
    if let Err(e) = machine.load(bytes) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    for (position, text) in args.iter().enumerate() {
        match Value::parse(text, 10) {
            Some(value) => machine.push(value),
            None => {
                eprintln!("error: argument {} is not a number: {}", position + 1, text);
                std::process::exit(1);
            }
        }
    }

    match machine.call(args.len()) {
        Ok(0) => {}
        Ok(_) => match machine.pop() {
            Ok(value) => println!("{}", value),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
