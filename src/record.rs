//! GPSD record decoding.
//!
//! GPSD emits one JSON object per line. Each object carries a `class`
//! discriminator (`"TPV"`, `"SKY"`, `"VERSION"`, `"DEVICES"`..).
//! [decode] parses one line and only retains the class the
//! caller is interested in, expressed as a [Message] implementation.
use serde_json::{Map, Value};

use crate::ParsingError;

/// JSON object, as decoded from a single line
pub type Object = Map<String, Value>;

/// [Message] is implemented by all GPSD message classes we support.
pub trait Message: Sized {
    /// Value of the `class` field identifying this message
    const CLASS: &'static str;

    /// Builds Self from a decoded JSON object.
    /// `index` is the 0-based line index, within the source.
    fn from_object(index: usize, object: &Object) -> Result<Self, ParsingError>;
}

/// Parses one line into a JSON object, whatever its class.
/// `index` is the 0-based line index, within the source.
pub fn parse(index: usize, line: impl AsRef<[u8]>) -> Result<Object, ParsingError> {
    let text = std::str::from_utf8(line.as_ref()).map_err(|source| ParsingError::Utf8 {
        line: index + 1,
        source,
    })?;

    let value: Value = serde_json::from_str(text).map_err(|source| ParsingError::Json {
        line: index + 1,
        source,
    })?;

    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ParsingError::NotAnObject { line: index + 1 }),
    }
}

/// Decodes one line. Returns `Ok(None)` when the line is a valid
/// JSON object of another class.
pub fn decode<M: Message>(
    index: usize,
    line: impl AsRef<[u8]>,
) -> Result<Option<M>, ParsingError> {
    let object = parse(index, line)?;
    match object.get("class").and_then(Value::as_str) {
        Some(class) if class == M::CLASS => M::from_object(index, &object).map(Some),
        _ => Ok(None),
    }
}

/// Returns the numerical field, NaN when missing or not a number.
pub(crate) fn f64_or_nan(object: &Object, field: &str) -> f64 {
    object
        .get(field)
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN)
}

/// Returns the numerical field, or [ParsingError::MissingField].
pub(crate) fn required_f64(
    index: usize,
    object: &Object,
    field: &'static str,
) -> Result<f64, ParsingError> {
    object
        .get(field)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .ok_or(ParsingError::MissingField {
            line: index + 1,
            field,
        })
}
