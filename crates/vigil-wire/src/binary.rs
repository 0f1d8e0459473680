//! Length-prefixed typed binary codec.
//!
//! Uses a "VOBS" file identifier and version 1.
//!
//! Wire format:
//! ```text
//! [4 bytes] magic "VOBS"
//! [2 bytes] version (little-endian u16)
//! [record]
//! ```
//!
//! Each record:
//! ```text
//! [4 bytes] subject id (LE u32)
//! [1 byte]  subject type
//! [2 bytes] attribs_number (LE u16)
//! [2 bytes] items_number (LE u16)
//! [attribs_number × attribute]
//! [items_number × record]       (recursive, one level in practice)
//! ```
//!
//! Each attribute:
//! ```text
//! [2 bytes] key length (LE u16), then key bytes (UTF-8)
//! [1 byte]  kind tag
//! value: Bool → 1 byte; Number → LE f64;
//!        Text → LE u16 length + bytes
//! ```
//!
//! The declared counts are written from the record's repeated-field
//! lengths and the decoder reads exactly that many entries, so
//! `attribs_number == len(rawAttributes)` holds on every record that
//! round-trips.

use crate::fmt::serialize_value;
use crate::record::StateRecord;
use vigil_core::{AttrKind, AttrValue, SubjectId, SubjectType, WireError};

const MAGIC: &[u8; 4] = b"VOBS";
const VERSION: u16 = 1;

/// Serialize a record to binary bytes.
///
/// Returns `Err` if any repeated field exceeds its wire-format range
/// (more than `u16::MAX` attributes, nested items, or string bytes).
pub fn encode(record: &StateRecord) -> Result<Vec<u8>, WireError> {
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    write_record(&mut buf, record)?;
    Ok(buf)
}

fn write_record(buf: &mut Vec<u8>, record: &StateRecord) -> Result<(), WireError> {
    buf.extend_from_slice(&record.id.0.to_le_bytes());
    buf.push(record.subject_type.code());

    let n_attr = checked_u16(record.attribs_number(), "attribute")?;
    let n_item = checked_u16(record.items_number(), "nested item")?;
    buf.extend_from_slice(&n_attr.to_le_bytes());
    buf.extend_from_slice(&n_item.to_le_bytes());

    for attr in &record.attributes {
        write_str(buf, &attr.key)?;
        buf.push(attr.kind().code());
        match &attr.value {
            AttrValue::Bool(b) => buf.push(u8::from(*b)),
            AttrValue::Number(n) => buf.extend_from_slice(&n.to_le_bytes()),
            AttrValue::Text(s) => write_str(buf, s)?,
            // Opaque references go out as their prefixed identity
            // token, under the Text kind their tag already declares.
            opaque @ AttrValue::Opaque { .. } => write_str(buf, &serialize_value(opaque))?,
        }
    }

    for nested in &record.nested {
        write_record(buf, nested)?;
    }

    Ok(())
}

fn checked_u16(len: usize, what: &'static str) -> Result<u16, WireError> {
    u16::try_from(len).map_err(|_| WireError::CountMismatch {
        what,
        declared: len,
        actual: u16::MAX as usize,
    })
}

fn write_str(buf: &mut Vec<u8>, s: &str) -> Result<(), WireError> {
    let len = checked_u16(s.len(), "string byte")?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Deserialize a record from binary bytes.
pub fn decode(bytes: &[u8]) -> Result<StateRecord, WireError> {
    let mut r = Reader::new(bytes);

    let magic = r.read_bytes(4)?;
    if magic != MAGIC {
        return Err(WireError::InvalidMagic {
            found: [magic[0], magic[1], magic[2], magic[3]],
        });
    }

    let version = r.read_u16()?;
    if version > VERSION {
        return Err(WireError::UnsupportedVersion { version });
    }

    let record = read_record(&mut r)?;

    if r.pos != bytes.len() {
        return Err(WireError::Malformed {
            reason: format!("{} trailing bytes", bytes.len() - r.pos),
        });
    }

    Ok(record)
}

fn read_record(r: &mut Reader<'_>) -> Result<StateRecord, WireError> {
    let id = r.read_u32()?;
    let ty_code = r.read_u8()?;
    let subject_type = SubjectType::from_code(ty_code).ok_or(WireError::UnknownTag {
        what: "subject type",
        code: ty_code,
    })?;
    let n_attr = r.read_u16()? as usize;
    let n_item = r.read_u16()? as usize;

    let mut record = StateRecord::new(SubjectId(id), subject_type);

    for _ in 0..n_attr {
        let key = read_str(r)?;
        let tag = r.read_u8()?;
        let kind = AttrKind::from_code(tag).ok_or(WireError::UnknownTag {
            what: "attribute kind",
            code: tag,
        })?;
        let value = match kind {
            AttrKind::Bool => AttrValue::Bool(r.read_u8()? != 0),
            // DateTime reduces to Number.
            AttrKind::Number | AttrKind::DateTime => AttrValue::Number(r.read_f64()?),
            AttrKind::Text => AttrValue::Text(read_str(r)?),
        };
        record.push_attribute(key, value);
    }

    for _ in 0..n_item {
        record.push_nested(read_record(r)?);
    }

    Ok(record)
}

fn read_str(r: &mut Reader<'_>) -> Result<String, WireError> {
    let len = r.read_u16()? as usize;
    let bytes = r.read_bytes(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| WireError::Malformed {
        reason: "string is not valid UTF-8".into(),
    })
}

/// Simple cursor reader for safe byte parsing.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if self.pos + n > self.data.len() {
            return Err(WireError::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, WireError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f64(&mut self) -> Result<f64, WireError> {
        let b = self.read_bytes(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }
}
