pub mod dump;
pub mod run;

use std::path::Path;

pub(crate) fn read_container(path: &Path) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
