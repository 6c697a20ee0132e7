/*!
Inspect command - display CBOR data in various formats

Input is treated as a CBOR sequence: every top-level item is checked with
[`Decoder::skip`] under the configured limits before it is rendered, so the
renderers below only ever walk well-formed, bounded values.
*/

use crate::io::{Sink, Source};
use base64::prelude::*;
use cbor_codec::{Config, DecodeError, Decoder};
use clap::Parser;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), json (lossy), hex"
    )]
    format: OutputFormat,

    /// Decoder limits as a JSON file, e.g. {"max_length": 1024, "max_depth": 8}
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Largest length any string, array or map may declare
    #[arg(long, value_name = "N")]
    max_length: Option<usize>,

    /// Deepest nesting of arrays, maps and tags accepted
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Sink>,

    /// Input CBOR file (use '-' for stdin)
    input: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Diagnostic notation (human-readable)
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON (lossy: tags, undefined and byte strings are flattened)
    Json,
    /// Hexadecimal dump
    Hex,
}

impl Command {
    fn decoder_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read config '{}': {e}", path.display())
                })?;
                serde_json::from_str(&text).map_err(|e| {
                    anyhow::anyhow!("Invalid config '{}': {e}", path.display())
                })?
            }
            None => Config::default(),
        };
        if let Some(max_length) = self.max_length {
            config = config.with_max_length(max_length);
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        Ok(config)
    }

    pub fn exec(self) -> anyhow::Result<()> {
        let config = self.decoder_config()?;
        info!(?config, "Decoder limits");

        let data = self.input.read_bytes()?;
        let mut text = match self.format {
            OutputFormat::Diag => format_sequence(&data, config, format_diag)?,
            OutputFormat::Json => format_sequence(&data, config, format_json)?,
            OutputFormat::Hex => hex::encode(&data),
        };

        let output = self.output.unwrap_or_default();
        if output.is_stdout() {
            text.push('\n');
        }
        output.write_bytes(text.as_bytes())?;
        Ok(())
    }
}

/// Validate and render every top-level item, one per line.
fn format_sequence(
    data: &[u8],
    config: Config,
    render: fn(&mut Decoder) -> Result<String, DecodeError>,
) -> anyhow::Result<String> {
    let mut decoder = Decoder::with_config(data, config);
    let mut lines = Vec::new();
    while !decoder.is_empty() {
        let start = decoder.position();
        decoder
            .clone()
            .skip()
            .map_err(|e| anyhow::anyhow!("Invalid CBOR at offset {start}: {e}"))?;
        lines.push(render(&mut decoder)?);
        debug!(offset = start, len = decoder.position() - start, "Rendered item");
    }
    Ok(lines.join("\n"))
}

/// Read the next header by hand: major type and argument.
///
/// Tags and unassigned simple values have no typed reader, so they are
/// picked apart here with the raw primitives.
fn read_header(d: &mut Decoder) -> Result<(u8, u64), DecodeError> {
    let byte = d.read_u8()?;
    let arg = match byte & 0x1f {
        24 => d.read_u8()?.into(),
        25 => d.read_u16()?.into(),
        26 => d.read_u32()?.into(),
        27 => d.read_u64()?,
        minor => minor.into(),
    };
    Ok((byte >> 5, arg))
}

fn peek_header_byte(d: &Decoder) -> Result<u8, DecodeError> {
    d.clone().read_u8()
}

fn negative(d: &mut Decoder) -> Result<i128, DecodeError> {
    let (_, n) = read_header(d)?;
    Ok(-1 - i128::from(n))
}

fn quote(s: &str) -> String {
    // JSON string escaping is also valid diagnostic notation
    serde_json::Value::from(s).to_string()
}

fn format_float(f: f64) -> String {
    match f {
        f if f.is_nan() => "NaN".into(),
        f64::INFINITY => "Infinity".into(),
        f64::NEG_INFINITY => "-Infinity".into(),
        f => {
            // Exponents are written as 1.0e+300, mantissas always carry a point
            let s = format!("{f:?}");
            match s.split_once('e') {
                Some((mantissa, exp)) => {
                    let point = if mantissa.contains('.') { "" } else { ".0" };
                    let sign = if exp.starts_with('-') { "" } else { "+" };
                    format!("{mantissa}{point}e{sign}{exp}")
                }
                None => s,
            }
        }
    }
}

/// Render one item in RFC 8949 diagnostic notation.
pub fn format_diag(d: &mut Decoder) -> Result<String, DecodeError> {
    let byte = peek_header_byte(d)?;
    let indefinite = byte & 0x1f == 31;
    let mut s = String::new();
    match byte >> 5 {
        0 => _ = write!(s, "{}", d.unsigned()?),
        1 => _ = write!(s, "{}", negative(d)?),
        2 if indefinite => {
            d.read_u8()?;
            let mut chunks = Vec::new();
            while !d.at_break()? {
                chunks.push(format!("h'{}'", hex::encode(d.bytes()?)));
            }
            if chunks.is_empty() {
                s.push_str("''_");
            } else {
                _ = write!(s, "(_ {})", chunks.join(", "));
            }
        }
        2 => _ = write!(s, "h'{}'", hex::encode(d.bytes()?)),
        3 if indefinite => {
            d.read_u8()?;
            let mut chunks = Vec::new();
            while !d.at_break()? {
                chunks.push(quote(d.text()?));
            }
            if chunks.is_empty() {
                s.push_str("\"\"_");
            } else {
                _ = write!(s, "(_ {})", chunks.join(", "));
            }
        }
        3 => s = quote(d.text()?),
        4 => {
            let mut items = d.array_items()?;
            let mut parts = Vec::new();
            while let Some(item) = items.next_item()? {
                parts.push(format_diag(item)?);
            }
            let open = if items.is_definite() { "[" } else { "[_ " };
            _ = write!(s, "{open}{}]", parts.join(", "));
        }
        5 => {
            let mut entries = d.object_entries()?;
            let mut parts = Vec::new();
            while let Some(entry) = entries.next_item()? {
                let key = format_diag(entry)?;
                let value = format_diag(entry)?;
                parts.push(format!("{key}: {value}"));
            }
            let open = if entries.is_definite() { "{" } else { "{_ " };
            _ = write!(s, "{open}{}}}", parts.join(", "));
        }
        6 => {
            let (_, tag) = read_header(d)?;
            _ = write!(s, "{tag}({})", format_diag(d)?);
        }
        _ => match byte & 0x1f {
            20 | 21 => _ = write!(s, "{}", d.bool()?),
            22 => {
                d.read_u8()?;
                s.push_str("null");
            }
            23 => {
                d.read_u8()?;
                s.push_str("undefined");
            }
            25..=27 => s = format_float(d.f64()?),
            _ => {
                let (_, n) = read_header(d)?;
                _ = write!(s, "simple({n})");
            }
        },
    }
    Ok(s)
}

fn json_value(d: &mut Decoder) -> Result<serde_json::Value, DecodeError> {
    use serde_json::Value as J;

    let byte = peek_header_byte(d)?;
    let indefinite = byte & 0x1f == 31;
    Ok(match byte >> 5 {
        0 => J::from(d.unsigned()?),
        1 => {
            let n = negative(d)?;
            i64::try_from(n).map_or_else(|_| J::from(n as f64), J::from)
        }
        2 => {
            let mut all = Vec::new();
            if indefinite {
                d.read_u8()?;
                while !d.at_break()? {
                    all.extend_from_slice(d.bytes()?);
                }
            } else {
                all.extend_from_slice(d.bytes()?);
            }
            J::from(BASE64_URL_SAFE_NO_PAD.encode(&all))
        }
        3 => {
            let mut all = String::new();
            if indefinite {
                d.read_u8()?;
                while !d.at_break()? {
                    all.push_str(d.text()?);
                }
            } else {
                all.push_str(d.text()?);
            }
            J::from(all)
        }
        4 => {
            let mut items = d.array_items()?;
            let mut array = Vec::new();
            while let Some(item) = items.next_item()? {
                array.push(json_value(item)?);
            }
            J::Array(array)
        }
        5 => {
            let mut entries = d.object_entries()?;
            let mut object = serde_json::Map::new();
            while let Some(entry) = entries.next_item()? {
                // JSON keys must be strings
                let key = match json_value(entry)? {
                    J::String(s) => s,
                    other => other.to_string(),
                };
                object.insert(key, json_value(entry)?);
            }
            J::Object(object)
        }
        // Tags are dropped, keeping the tagged item
        6 => {
            read_header(d)?;
            json_value(d)?
        }
        _ => match byte & 0x1f {
            20 | 21 => J::from(d.bool()?),
            25..=27 => serde_json::Number::from_f64(d.f64()?).map_or(J::Null, J::Number),
            // null, undefined and simple values
            _ => {
                read_header(d)?;
                J::Null
            }
        },
    })
}

/// Render one item as JSON.
pub fn format_json(d: &mut Decoder) -> Result<String, DecodeError> {
    json_value(d).map(|v| v.to_string())
}
