//! Canonical serialized forms for attribute values.
//!
//! The serialized text of a value is load-bearing twice over: it is
//! what the text codec puts on the wire, and it is what the diff cache
//! compares to decide whether an attribute changed. Both sides must
//! therefore agree on one canonical form per value.

use vigil_core::{AttrValue, WireError};

/// Format a number canonically.
///
/// Uses shortest round-trip formatting: the output is the shortest
/// decimal string that parses back to exactly the same `f64`, always
/// within a 20-significant-digit budget. Integral values print without
/// a fractional part (`11`, not `11.0`), so two polls that compute the
/// same value through different arithmetic serialize identically and
/// the diff cache stays quiet.
pub fn format_number(v: f64) -> String {
    v.to_string()
}

/// Parse a number previously produced by [`format_number`].
pub fn parse_number(token: &str) -> Result<f64, WireError> {
    token.parse::<f64>().map_err(|_| WireError::Malformed {
        reason: format!("invalid number '{token}'"),
    })
}

/// The canonical serialized text of a value.
///
/// - `Bool` → `1` / `0`
/// - `Number` → [`format_number`]
/// - `Text` → the text itself
/// - `Opaque` → the kind's fixed prefix plus the identity token, e.g.
///   `ref(table):42`; identity changes, not content changes, are what
///   the diff cache can see for these.
pub fn serialize_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(true) => "1".to_string(),
        AttrValue::Bool(false) => "0".to_string(),
        AttrValue::Number(n) => format_number(*n),
        AttrValue::Text(s) => s.clone(),
        AttrValue::Opaque { kind, handle } => format!("{}{handle}", kind.prefix()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{OpaqueHandle, OpaqueKind};

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(format_number(11.0), "11");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn fractional_numbers_round_trip() {
        for v in [10.5, 0.1, -2.25, 1.0e300, f64::MIN_POSITIVE, 1.0 / 3.0] {
            let s = format_number(v);
            assert_eq!(parse_number(&s).unwrap(), v, "failed for {s}");
        }
    }

    #[test]
    fn bool_serializes_as_digit() {
        assert_eq!(serialize_value(&AttrValue::Bool(true)), "1");
        assert_eq!(serialize_value(&AttrValue::Bool(false)), "0");
    }

    #[test]
    fn opaque_serializes_with_prefix() {
        let handle = OpaqueHandle::next();
        let v = AttrValue::Opaque {
            kind: OpaqueKind::Table,
            handle,
        };
        assert_eq!(serialize_value(&v), format!("ref(table):{handle}"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_number("ten").is_err());
        assert!(parse_number("").is_err());
    }
}
