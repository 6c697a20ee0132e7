#![cfg(test)]

use std::io::Read;

fn replay(corpus: &str) {
    match std::fs::read_dir(corpus) {
        Err(e) => {
            eprintln!(
                "Failed to open dir {corpus}: {e}, curr dir: {}",
                std::env::current_dir().unwrap().to_string_lossy()
            );
        }
        Ok(dir) => {
            for entry in dir.flatten() {
                let path = entry.path();
                if path.is_file()
                    && let Ok(mut file) = std::fs::File::open(&path)
                {
                    let mut buffer = Vec::new();
                    if file.read_to_end(&mut buffer).is_ok() {
                        let mut decoder = cbor_codec::Decoder::new(&buffer);
                        while let Ok(true) = decoder.skip() {}
                        _ = format!("{decoder:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn test_all() {
    replay("./corpus/skip");
    replay("./corpus/roundtrip");
}
