//! JSON rendering of SNS message payloads
//!
//! Payloads are written with `": "` / `", "` separators and with every
//! non-ASCII character escaped as `\uXXXX`, which is the byte layout existing
//! subscribers of the notification topic receive today.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// Formatter producing spaced separators and ASCII-only output
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatFormatter;

impl Formatter for CompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\u{7f}' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialize any value with [`CompatFormatter`]
pub fn to_compat_string<T: Serialize + ?Sized>(value: &T) -> crate::Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, CompatFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| crate::Error::Other(e.into()))?;

    String::from_utf8(out).map_err(|e| crate::Error::Other(e.into()))
}

/// `{"default": <text>}`, the single-protocol SNS structured message
pub fn default_payload(text: &str) -> crate::Result<String> {
    #[derive(Serialize)]
    struct DefaultPayload<'a> {
        default: &'a str,
    }

    to_compat_string(&DefaultPayload { default: text })
}
