use lazy_static::lazy_static;
use regex::Regex;

use super::RawFrame;
use crate::command::ResponseValues;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedValue {
    pub raw: String,
    pub label: Option<String>,
}

/// Whitespace-separated tokens of the `Z` line, if the frame has one.
fn z_tokens(frame: &RawFrame) -> Option<Vec<String>> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"\nZ\s+([^\r]+)\r").unwrap();
    }

    let text = frame.to_text();
    let captures = RE.captures(&text)?;
    let tokens: Vec<String> = captures
        .get(1)?
        .as_str()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if tokens.len() < 2 {
        return None;
    }
    Some(tokens)
}

/// Pulls the value out of the `Z` line of a reply.
///
/// The first two tokens of the line echo the opcode and function code and
/// are dropped; the rest is joined with single spaces.
pub fn extract_payload(frame: &RawFrame) -> Option<String> {
    z_tokens(frame).map(|tokens| tokens[2..].join(" "))
}

/// Opcode and function code the device echoed back.
pub fn reply_echo(frame: &RawFrame) -> Option<(u8, u16)> {
    let tokens = z_tokens(frame)?;
    Some((tokens[0].parse().ok()?, tokens[1].parse().ok()?))
}

/// Decodes a reply and looks up its label, `None` if the frame is malformed.
pub fn interpret(frame: &RawFrame, values: Option<&ResponseValues>) -> Option<DecodedValue> {
    let raw = extract_payload(frame)?;
    let label = values.and_then(|values| values.get(&raw)).cloned();
    Some(DecodedValue { raw, label })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(s: &str) -> RawFrame {
        RawFrame(s.as_bytes().to_vec())
    }

    fn values(pairs: &[(&str, &str)]) -> ResponseValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn echo_tokens_are_dropped() {
        assert_eq!(
            extract_payload(&frame("Y 8 0\r\nZ 8 0 1080i\r\n")),
            Some("1080i".to_string())
        );
        assert_eq!(
            extract_payload(&frame("\nZ 4 0 1 DVI\r")),
            Some("1 DVI".to_string())
        );
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            extract_payload(&frame("\nZ   2  16    64\r")),
            Some("64".to_string())
        );
        assert_eq!(
            extract_payload(&frame("\nZ 8 0 1280x768   60Hz \r")),
            Some("1280x768 60Hz".to_string())
        );
    }

    #[test]
    fn bare_echo_gives_empty_value() {
        assert_eq!(extract_payload(&frame("\nZ 4 0\r")), Some(String::new()));
        assert_eq!(extract_payload(&frame("\nZ 4\r")), None);
    }

    #[test]
    fn malformed_frames() {
        assert_eq!(extract_payload(&frame("Z 4 0 2\r")), None);
        assert_eq!(extract_payload(&frame("\nZ 4 0 2")), None);
        assert_eq!(extract_payload(&frame("\nE 4 0 2\r")), None);
        assert_eq!(extract_payload(&frame("")), None);
    }

    #[test]
    fn echo_is_numeric() {
        assert_eq!(reply_echo(&frame("Y 8 0\r\nZ 8 0 1080i\r\n")), Some((8, 0)));
        assert_eq!(reply_echo(&frame("\nZ 3 21\r\nDone")), Some((3, 21)));
        assert_eq!(reply_echo(&frame("\nZ x 0 1\r")), None);
        assert_eq!(reply_echo(&frame("\nZ 4\r")), None);
    }

    #[test]
    fn label_lookup() {
        let table = values(&[("0", "VGA-1"), ("1", "VGA-2"), ("2", "DVI")]);
        assert_eq!(
            interpret(&frame("\nZ 4 0 2\r"), Some(&table)),
            Some(DecodedValue {
                raw: "2".to_string(),
                label: Some("DVI".to_string())
            })
        );
        assert_eq!(
            interpret(&frame("\nZ 4 0 7\r"), Some(&table)),
            Some(DecodedValue {
                raw: "7".to_string(),
                label: None
            })
        );
    }

    #[test]
    fn no_table_no_label() {
        assert_eq!(
            interpret(&frame("\nZ 4 0 2\r"), None),
            Some(DecodedValue {
                raw: "2".to_string(),
                label: None
            })
        );
        assert_eq!(interpret(&frame("garbage"), None), None);
    }
}
