//! Static payload encoding.
//!
//! Rule payloads are TOML tables. TOML has native date/time values, which have
//! no JSON counterpart, so the table is first walked into a `serde_json::Value`
//! with every datetime rendered as its ISO-8601 text. The result is written
//! with `", "` / `": "` separators and ASCII-only string escapes.
//! Keys come out sorted, so the same table always yields the same bytes.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::PayloadError;

/// Convert a TOML table into a JSON object, rendering datetimes as ISO-8601 strings.
pub fn to_json(table: &toml::Table) -> Result<serde_json::Value, PayloadError> {
    let mut map = serde_json::Map::new();
    for (k, v) in table {
        map.insert(k.clone(), value_to_json(v, k)?);
    }
    Ok(serde_json::Value::Object(map))
}

fn value_to_json(value: &toml::Value, path: &str) -> Result<serde_json::Value, PayloadError> {
    use serde_json::Value as J;
    Ok(match value {
        toml::Value::String(s) => J::String(s.clone()),
        toml::Value::Integer(i) => J::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(J::Number)
            .ok_or_else(|| PayloadError::NonFiniteFloat {
                path: path.to_string(),
            })?,
        toml::Value::Boolean(b) => J::Bool(*b),
        toml::Value::Datetime(dt) => J::String(dt.to_string()),
        toml::Value::Array(items) => J::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| value_to_json(v, &format!("{}[{}]", path, i)))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(t) => {
            let mut map = serde_json::Map::new();
            for (k, v) in t {
                map.insert(k.clone(), value_to_json(v, &format!("{}.{}", path, k))?);
            }
            J::Object(map)
        }
    })
}

/// Encode a static payload table into the exact request body bytes.
pub fn encode(table: &toml::Table) -> Result<Vec<u8>, PayloadError> {
    let value = to_json(table)?;
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Compact JSON with a space after `,` and `:`; non-ASCII escaped as `\uXXXX`.
#[derive(Debug, Clone, Copy, Default)]
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
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
        if fragment.bytes().all(|b| b < 0x7f) {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if (c as u32) < 0x7f {
                let mut b = [0u8; 4];
                writer.write_all(c.encode_utf8(&mut b).as_bytes())?;
            } else {
                for unit in c.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
