//! NDJSON messages exchanged with the interpreter bootstrap.

use serde::{Deserialize, Serialize};

use super::Channel;

/// One run request, written to the interpreter's stdin.
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub id: u64,
    pub code: &'a str,
}

impl Request<'_> {
    /// Encode as a single newline-terminated line.
    pub fn encode(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Messages read from the interpreter's stdout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Ready { version: String },
    Line { id: u64, channel: Channel, text: String },
    Done { id: u64, error: Option<String> },
}

pub fn parse_event(line: &str) -> serde_json::Result<Event> {
    serde_json::from_str(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_one_line() {
        let req = Request { id: 7, code: "console.log(1);\nconsole.log(2);" };
        let line = req.encode().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        let back: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(back["id"], 7);
        assert_eq!(back["code"], "console.log(1);\nconsole.log(2);");
    }

    #[test]
    fn test_parse_line_event() {
        let ev = parse_event(r#"{"type":"line","id":3,"channel":"info","text":"hi"}"#).unwrap();
        assert_eq!(
            ev,
            Event::Line { id: 3, channel: Channel::Info, text: "hi".into() }
        );
    }

    #[test]
    fn test_parse_done_with_and_without_error() {
        let ok = parse_event(r#"{"type":"done","id":1,"error":null}"#).unwrap();
        assert_eq!(ok, Event::Done { id: 1, error: None });
        let missing = parse_event(r#"{"type":"done","id":1}"#).unwrap();
        assert_eq!(missing, Event::Done { id: 1, error: None });
        let failed = parse_event(r#"{"type":"done","id":2,"error":"boom"}"#).unwrap();
        assert_eq!(failed, Event::Done { id: 2, error: Some("boom".into()) });
    }

    #[test]
    fn test_parse_ready() {
        let ev = parse_event("{\"type\":\"ready\",\"version\":\"v20.11.0\"}\r\n").unwrap();
        assert_eq!(ev, Event::Ready { version: "v20.11.0".into() });
    }

    #[test]
    fn test_stray_output_is_rejected() {
        assert!(parse_event("hello from process.stdout.write").is_err());
        assert!(parse_event(r#"{"type":"line","id":1,"channel":"debug","text":"x"}"#).is_err());
    }
}
