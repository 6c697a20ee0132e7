/*!
Where the tools read from and write to: a named file, or stdio for `-`
*/

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        let data = match self {
            Source::Stdin => {
                let mut data = Vec::new();
                io::stdin().lock().read_to_end(&mut data)?;
                data
            }
            Source::File(path) => fs::read(path)?,
        };
        debug!(source = ?self, bytes = data.len(), "Read input");
        Ok(data)
    }

    pub fn read_text(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_bytes()?)
            .map_err(|e| anyhow::anyhow!("Input is not valid UTF-8: {e}"))
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Source::Stdin,
            path => Source::File(PathBuf::from(path)),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum Sink {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Sink {
    pub fn is_stdout(&self) -> bool {
        matches!(self, Sink::Stdout)
    }

    pub fn write_bytes(&self, data: &[u8]) -> io::Result<()> {
        debug!(sink = ?self, bytes = data.len(), "Writing output");
        match self {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(data)?;
                out.flush()
            }
            Sink::File(path) => fs::write(path, data),
        }
    }
}

impl FromStr for Sink {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "-" => Sink::Stdout,
            path => Sink::File(PathBuf::from(path)),
        })
    }
}
