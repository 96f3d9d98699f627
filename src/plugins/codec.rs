//! Parsing and serialization for JSON and TRON.
//!
//! `Format::Auto` sniffs the first non-whitespace byte: `{` means JSON is
//! tried first, and anything that fails as JSON is decoded as TRON (a JSON
//! superset). Reader input is capped; see [`CodecConfig::max_document_size`].

use crate::core::config::CodecConfig;
use crate::core::error::VbriefError;
use crate::core::model::Document;
use crate::plugins::tron;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Tron,
    Auto,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Tron => "tron",
            Format::Auto => "auto",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = VbriefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "tron" => Ok(Format::Tron),
            "auto" => Ok(Format::Auto),
            other => Err(VbriefError::UnknownFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Parser {
    format: Format,
    max_document_size: usize,
}

impl Parser {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            max_document_size: CodecConfig::default().max_document_size,
        }
    }

    /// Parser for the configured default format and size cap.
    pub fn from_config(config: &CodecConfig) -> Result<Self, VbriefError> {
        Ok(Self::new(config.format()?).with_config(config))
    }

    pub fn with_config(mut self, config: &CodecConfig) -> Self {
        self.max_document_size = config.max_document_size;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Reads at most the configured cap; larger input fails with
    /// `DocumentTooLarge` instead of being buffered.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Document, VbriefError> {
        let data = read_all_limited(reader, self.max_document_size)?;
        self.parse_bytes(&data)
    }

    pub fn parse_bytes(&self, data: &[u8]) -> Result<Document, VbriefError> {
        match self.format {
            Format::Json => parse_json(data),
            Format::Tron => parse_tron(data),
            Format::Auto => parse_auto(data),
        }
    }

    pub fn parse_str(&self, s: &str) -> Result<Document, VbriefError> {
        self.parse_bytes(s.as_bytes())
    }
}

fn read_all_limited<R: Read>(reader: R, max: usize) -> Result<Vec<u8>, VbriefError> {
    let mut data = Vec::new();
    // one byte past the cap tells "exactly max" apart from "too large"
    reader
        .take(max as u64 + 1)
        .read_to_end(&mut data)
        .map_err(VbriefError::IoError)?;
    if data.len() > max {
        return Err(VbriefError::DocumentTooLarge { max });
    }
    Ok(data)
}

fn parse_json(data: &[u8]) -> Result<Document, VbriefError> {
    Ok(serde_json::from_slice(data)?)
}

fn parse_tron(data: &[u8]) -> Result<Document, VbriefError> {
    let text = std::str::from_utf8(data).map_err(|e| VbriefError::Tron {
        line: 1,
        column: e.valid_up_to() + 1,
        message: format!("input is not valid UTF-8: {e}"),
    })?;
    let value = tron::decode(text)?;
    Ok(serde_json::from_value(value)?)
}

fn parse_auto(data: &[u8]) -> Result<Document, VbriefError> {
    if data.trim_ascii_start().first() == Some(&b'{') {
        match parse_json(data) {
            Ok(doc) => {
                log::debug!("auto-detected JSON document");
                return Ok(doc);
            }
            Err(e) => log::debug!("JSON parse failed, falling back to TRON: {e}"),
        }
    }
    log::debug!("decoding document as TRON");
    parse_tron(data)
}

pub fn parse_str(s: &str, format: Format) -> Result<Document, VbriefError> {
    Parser::new(format).parse_str(s)
}

pub fn parse_bytes(data: &[u8], format: Format) -> Result<Document, VbriefError> {
    Parser::new(format).parse_bytes(data)
}

pub fn parse_reader<R: Read>(reader: R, format: Format) -> Result<Document, VbriefError> {
    Parser::new(format).parse_reader(reader)
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Serializer {
    pretty_json: bool,
    default_format: Option<Format>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CodecConfig) -> Result<Self, VbriefError> {
        Ok(Self {
            pretty_json: config.pretty_json,
            default_format: Some(config.format()?),
        })
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    /// `Format::Auto` names no encoding and fails with `UnknownFormat`.
    pub fn convert(&self, doc: &Document, format: Format) -> Result<Vec<u8>, VbriefError> {
        match format {
            Format::Json if self.pretty_json => Ok(serde_json::to_vec_pretty(doc)?),
            Format::Json => Ok(serde_json::to_vec(doc)?),
            Format::Tron => {
                let value = serde_json::to_value(doc)?;
                Ok(tron::encode(&value).into_bytes())
            }
            Format::Auto => Err(VbriefError::UnknownFormat(format.as_str().to_string())),
        }
    }

    /// Converts with the configured default format (JSON when unset).
    pub fn convert_default(&self, doc: &Document) -> Result<Vec<u8>, VbriefError> {
        self.convert(doc, self.default_format.unwrap_or(Format::Json))
    }

    pub fn convert_to<W: Write>(
        &self,
        doc: &Document,
        format: Format,
        mut writer: W,
    ) -> Result<(), VbriefError> {
        let data = self.convert(doc, format)?;
        writer.write_all(&data).map_err(VbriefError::IoError)?;
        Ok(())
    }
}

pub fn convert(doc: &Document, format: Format) -> Result<Vec<u8>, VbriefError> {
    Serializer::new().convert(doc, format)
}

pub fn convert_to<W: Write>(
    doc: &Document,
    format: Format,
    writer: W,
) -> Result<(), VbriefError> {
    Serializer::new().convert_to(doc, format, writer)
}

pub fn to_json(doc: &Document) -> Result<Vec<u8>, VbriefError> {
    convert(doc, Format::Json)
}

pub fn to_json_pretty(doc: &Document) -> Result<Vec<u8>, VbriefError> {
    Serializer::new().pretty(true).convert(doc, Format::Json)
}

pub fn to_tron(doc: &Document) -> Result<Vec<u8>, VbriefError> {
    convert(doc, Format::Tron)
}

/// SHA-256 over the compact JSON encoding. Narratives and metadata are
/// ordered maps, so equal documents hash equally.
pub fn digest_hex(doc: &Document) -> Result<String, VbriefError> {
    let bytes = to_json(doc)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
