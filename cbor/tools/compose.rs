/*!
Compose command - convert text formats to CBOR
*/

use crate::io::{Sink, Source};
use cbor_codec::{Decoder, Encoder};
use clap::Parser;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum InputFormat {
    /// JSON (no tags, byte strings or undefined)
    Json,
    /// Hex-encoded CBOR, checked for well-formedness
    Hex,
}

/// Convert text formats to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert text formats to CBOR binary",
    long_about = "Parse JSON or hex text and write CBOR binary.\n\n\
                  JSON numbers become the shortest integer encoding when integral, \
                  otherwise 64-bit floats."
)]
pub struct Command {
    /// Input format
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    format: InputFormat,

    /// Write arrays and objects as indefinite-length items
    #[arg(long)]
    indefinite: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Sink>,

    /// Input file (use '-' for stdin)
    input: Source,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let text = self.input.read_text()?;

        let data = match self.format {
            InputFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(&text)?;
                let mut encoder = Encoder::new();
                encode_json(&mut encoder, &value, self.indefinite);
                encoder.build()
            }
            InputFormat::Hex => {
                let data = hex::decode(text.split_whitespace().collect::<String>())?;
                let mut decoder = Decoder::new(&data);
                while decoder.skip()? {}
                data
            }
        };
        info!(bytes = data.len(), "Composed CBOR");

        self.output.unwrap_or_default().write_bytes(&data)?;
        Ok(())
    }
}

pub fn encode_json(e: &mut Encoder, value: &serde_json::Value, indefinite: bool) {
    use serde_json::Value as J;

    match value {
        J::Null => {
            e.null();
        }
        J::Bool(b) => {
            e.bool(*b);
        }
        J::Number(n) => {
            if let Some(u) = n.as_u64() {
                e.unsigned(u);
            } else if let Some(i) = n.as_i64() {
                e.int(i);
            } else if let Some(f) = n.as_f64() {
                e.f64(f);
            }
        }
        J::String(s) => {
            e.text(s);
        }
        J::Array(items) => {
            if indefinite {
                e.array_begin();
            } else {
                e.array(items.len());
            }
            for item in items {
                encode_json(e, item, indefinite);
            }
            if indefinite {
                e.array_end();
            }
        }
        J::Object(entries) => {
            if indefinite {
                e.object_begin();
            } else {
                e.object(entries.len());
            }
            for (key, value) in entries {
                e.text(key);
                encode_json(e, value, indefinite);
            }
            if indefinite {
                e.object_end();
            }
        }
    }
}
