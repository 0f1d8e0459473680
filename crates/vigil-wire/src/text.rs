//! Separator-delimited text codec.
//!
//! Tokens are joined by the reserved separator byte
//! [`PROTOCOL_SEPARATOR`], which is not permitted inside unescaped
//! keys or values (the format does not escape; the encoder rejects).
//!
//! Record shape:
//! ```text
//! id SEP type SEP attrCount SEP itemCount SEP
//!     (key SEP typeTag SEP value SEP)*
//! SEP (nestedRecord)* SEP
//! ```
//! Nested records repeat the same shape inline, so the stream is
//! decodable with a single forward token cursor and the declared
//! counts.

use crate::fmt::{parse_number, serialize_value};
use crate::record::StateRecord;
use vigil_core::{AttrKind, AttrValue, SubjectId, SubjectType, WireError};

/// The reserved separator byte (ASCII unit separator).
pub const PROTOCOL_SEPARATOR: u8 = 0x1F;

const SEP: char = '\u{1F}';

/// Encode a record as delimited text.
///
/// Returns [`WireError::ReservedByte`] if any key or serialized value
/// contains the separator byte.
pub fn encode(record: &StateRecord) -> Result<Vec<u8>, WireError> {
    let mut out = String::with_capacity(128);
    encode_record(record, &mut out)?;
    Ok(out.into_bytes())
}

fn push_token(out: &mut String, token: &str) {
    out.push_str(token);
    out.push(SEP);
}

fn checked(token: String) -> Result<String, WireError> {
    if token.contains(SEP) {
        return Err(WireError::ReservedByte { token });
    }
    Ok(token)
}

fn encode_record(record: &StateRecord, out: &mut String) -> Result<(), WireError> {
    push_token(out, &record.id.to_string());
    push_token(out, &record.subject_type.code().to_string());
    push_token(out, &record.attribs_number().to_string());
    push_token(out, &record.items_number().to_string());

    for attr in &record.attributes {
        push_token(out, &checked(attr.key.clone())?);
        push_token(out, &attr.kind().code().to_string());
        push_token(out, &checked(serialize_value(&attr.value))?);
    }
    // Boundary between the attribute triples and the nested records.
    push_token(out, "");

    for nested in &record.nested {
        encode_record(nested, out)?;
    }
    // Record terminator.
    push_token(out, "");

    Ok(())
}

/// Decode a delimited text message.
pub fn decode(bytes: &[u8]) -> Result<StateRecord, WireError> {
    let text = std::str::from_utf8(bytes).map_err(|_| WireError::Malformed {
        reason: "message is not valid UTF-8".into(),
    })?;
    // Every token is emitted with a trailing separator, so a complete
    // message always ends in one.
    let body = text.strip_suffix(SEP).ok_or(WireError::Truncated)?;
    let tokens: Vec<&str> = body.split(SEP).collect();

    let mut cursor = Cursor { tokens: &tokens, pos: 0 };
    let record = decode_record(&mut cursor)?;
    if cursor.pos != tokens.len() {
        return Err(WireError::Malformed {
            reason: format!("{} trailing tokens", tokens.len() - cursor.pos),
        });
    }
    Ok(record)
}

fn decode_record(cursor: &mut Cursor<'_>) -> Result<StateRecord, WireError> {
    let id: u32 = cursor.parsed("subject id")?;
    let ty_code: u8 = cursor.parsed("subject type")?;
    let subject_type = SubjectType::from_code(ty_code).ok_or(WireError::UnknownTag {
        what: "subject type",
        code: ty_code,
    })?;
    let n_attr: usize = cursor.parsed("attribute count")?;
    let n_item: usize = cursor.parsed("item count")?;

    let mut record = StateRecord::new(SubjectId(id), subject_type);

    for _ in 0..n_attr {
        let key = cursor.next()?.to_string();
        let tag: u8 = cursor.parsed("attribute kind")?;
        let kind = AttrKind::from_code(tag).ok_or(WireError::UnknownTag {
            what: "attribute kind",
            code: tag,
        })?;
        let raw = cursor.next()?;
        record.push_attribute(key, decode_value(kind, raw)?);
    }

    cursor.expect_empty("attribute/nested boundary")?;
    for _ in 0..n_item {
        record.push_nested(decode_record(cursor)?);
    }
    cursor.expect_empty("record terminator")?;

    Ok(record)
}

fn decode_value(kind: AttrKind, raw: &str) -> Result<AttrValue, WireError> {
    match kind {
        AttrKind::Bool => {
            let n: i64 = raw.parse().map_err(|_| WireError::Malformed {
                reason: format!("invalid boolean '{raw}'"),
            })?;
            Ok(AttrValue::Bool(n != 0))
        }
        // DateTime reduces to Number.
        AttrKind::Number | AttrKind::DateTime => Ok(AttrValue::Number(parse_number(raw)?)),
        AttrKind::Text => Ok(AttrValue::Text(raw.to_string())),
    }
}

/// Forward-only token cursor over a split message.
struct Cursor<'a> {
    tokens: &'a [&'a str],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Result<&'a str, WireError> {
        let token = self.tokens.get(self.pos).ok_or(WireError::Truncated)?;
        self.pos += 1;
        Ok(token)
    }

    fn parsed<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, WireError> {
        let token = self.next()?;
        token.parse().map_err(|_| WireError::Malformed {
            reason: format!("invalid {what} '{token}'"),
        })
    }

    fn expect_empty(&mut self, what: &str) -> Result<(), WireError> {
        let token = self.next()?;
        if !token.is_empty() {
            return Err(WireError::Malformed {
                reason: format!("expected {what}, found '{token}'"),
            });
        }
        Ok(())
    }
}
