//! Reference decoder for octet-counted RFC 5424 frames.
//!
//! Collectors and tests use [`decode_frame`] to split a byte stream produced
//! by the writers back into [`SyslogFrame`] values.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::{formatter::NIL, priority::Priority};

/// Longest accepted `MSG-LEN` prefix, in digits.
const MAX_LENGTH_DIGITS: usize = 10;

/// One decoded syslog message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyslogFrame {
    pub priority: Priority,
    pub version: u8,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub hostname: Option<String>,
    pub app_name: Option<String>,
    pub proc_id: Option<String>,
    pub msg_id: Option<String>,
    /// Raw structured data elements, unparsed.
    pub structured_data: Option<String>,
    pub message: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// More bytes are required before the frame is complete.
    #[error("incomplete frame: {needed} more bytes required")]
    Incomplete { needed: usize },
    #[error("invalid octet count prefix")]
    InvalidLength,
    #[error("invalid priority")]
    InvalidPriority,
    #[error("invalid version")]
    InvalidVersion,
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("{0} field is not valid UTF-8")]
    NonUtf8Field(&'static str),
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
    #[error("malformed structured data")]
    InvalidStructuredData,
}

/// Decode one frame from the front of `input`.
///
/// Returns the frame and the number of bytes it occupied, so callers can
/// advance through a buffer holding several frames.
pub fn decode_frame(input: &[u8]) -> Result<(SyslogFrame, usize), DecodeError> {
    let Some(space) = input
        .iter()
        .take(MAX_LENGTH_DIGITS + 1)
        .position(|&b| b == b' ')
    else {
        return if input.len() > MAX_LENGTH_DIGITS {
            Err(DecodeError::InvalidLength)
        } else {
            Err(DecodeError::Incomplete { needed: 1 })
        };
    };
    let len = parse_decimal(&input[..space]).ok_or(DecodeError::InvalidLength)?;
    let start = space + 1;
    let end = start.checked_add(len).ok_or(DecodeError::InvalidLength)?;
    if input.len() < end {
        return Err(DecodeError::Incomplete {
            needed: end - input.len(),
        });
    }
    let frame = decode_message(&input[start..end])?;
    Ok((frame, end))
}

/// Decode a single unframed RFC 5424 message.
pub fn decode_message(message: &[u8]) -> Result<SyslogFrame, DecodeError> {
    let rest = message
        .strip_prefix(b"<")
        .ok_or(DecodeError::InvalidPriority)?;
    let close = rest
        .iter()
        .take(4)
        .position(|&b| b == b'>')
        .ok_or(DecodeError::InvalidPriority)?;
    let priority = parse_decimal(&rest[..close])
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|v| Priority::new(v).ok())
        .ok_or(DecodeError::InvalidPriority)?;
    let mut rest = &rest[close + 1..];

    let version = next_token(&mut rest, "version")?;
    let version = parse_decimal(version)
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or(DecodeError::InvalidVersion)?;

    let timestamp = match text_field(next_token(&mut rest, "timestamp")?, "timestamp")? {
        None => None,
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(&raw).map_err(|_| DecodeError::InvalidTimestamp(raw))?,
        ),
    };
    let hostname = text_field(next_token(&mut rest, "hostname")?, "hostname")?;
    let app_name = text_field(next_token(&mut rest, "app-name")?, "app-name")?;
    let proc_id = text_field(next_token(&mut rest, "procid")?, "procid")?;
    let msg_id = text_field(next_token(&mut rest, "msgid")?, "msgid")?;
    let structured_data = structured_data(&mut rest)?;

    let message = match rest {
        [] => Vec::new(),
        [b' ', body @ ..] => body.to_vec(),
        _ => return Err(DecodeError::InvalidStructuredData),
    };

    Ok(SyslogFrame {
        priority,
        version,
        timestamp,
        hostname,
        app_name,
        proc_id,
        msg_id,
        structured_data,
        message,
    })
}

fn parse_decimal(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn next_token<'a>(rest: &mut &'a [u8], field: &'static str) -> Result<&'a [u8], DecodeError> {
    let input: &'a [u8] = *rest;
    let space = input
        .iter()
        .position(|&b| b == b' ')
        .ok_or(DecodeError::MissingField(field))?;
    let token = &input[..space];
    if token.is_empty() {
        return Err(DecodeError::MissingField(field));
    }
    *rest = &input[space + 1..];
    Ok(token)
}

fn text_field(token: &[u8], field: &'static str) -> Result<Option<String>, DecodeError> {
    let text = std::str::from_utf8(token).map_err(|_| DecodeError::NonUtf8Field(field))?;
    Ok((text != NIL).then(|| text.to_owned()))
}

fn structured_data<'a>(rest: &mut &'a [u8]) -> Result<Option<String>, DecodeError> {
    let input: &'a [u8] = *rest;
    if let Some(after) = input.strip_prefix(NIL.as_bytes()) {
        *rest = after;
        return Ok(None);
    }
    let mut end = 0;
    while input.get(end) == Some(&b'[') {
        end += element_len(&input[end..]).ok_or(DecodeError::InvalidStructuredData)?;
    }
    if end == 0 {
        return Err(DecodeError::InvalidStructuredData);
    }
    let raw = std::str::from_utf8(&input[..end])
        .map_err(|_| DecodeError::NonUtf8Field("structured-data"))?
        .to_owned();
    *rest = &input[end..];
    Ok(Some(raw))
}

/// Length of the SD-ELEMENT at the start of `input`, including brackets.
fn element_len(input: &[u8]) -> Option<usize> {
    let mut escaped = false;
    for (idx, &byte) in input.iter().enumerate().skip(1) {
        match byte {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b']' => return Some(idx + 1),
            _ => {}
        }
    }
    None
}
