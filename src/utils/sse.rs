//! Incremental decoder for the `text/event-stream` wire format.
//!
//! Bytes arrive in arbitrary chunks from the response body; the decoder keeps
//! the partial line and the fields of the event being assembled between calls.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SseFrame {
  pub event: Option<String>,
  pub data: String,
  pub id: Option<String>
}

#[derive(Debug)]
pub struct SseDecoder {
  line: Vec<u8>,
  // a CR ended the last line; swallow the LF of a CRLF pair
  skip_lf: bool,
  // the first line of a stream may carry a byte order mark
  first_line: bool,
  event: Option<String>,
  data: String,
  has_data: bool,
  last_event_id: Option<String>,
  retry: Option<u64>
}

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl Default for SseDecoder {
  fn default() -> Self {
    Self {
      line: Vec::new(),
      skip_lf: false,
      first_line: true,
      event: None,
      data: String::new(),
      has_data: false,
      last_event_id: None,
      retry: None
    }
  }
}

impl SseDecoder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
    let mut frames = Vec::new();
    for &byte in chunk {
      if self.skip_lf {
        self.skip_lf = false;
        if byte == b'\n' {
          continue;
        }
      }
      match byte {
        b'\n' => self.end_line(&mut frames),
        b'\r' => {
          self.skip_lf = true;
          self.end_line(&mut frames);
        },
        _ => self.line.push(byte)
      }
    }
    frames
  }

  /// Drops the partial line and pending event of a dead connection. The last
  /// event id and retry delay survive so the next request can resume.
  pub fn reset(&mut self) {
    self.line.clear();
    self.skip_lf = false;
    self.first_line = true;
    self.event = None;
    self.data.clear();
    self.has_data = false;
  }

  /// Reconnection delay in milliseconds last announced by the server.
  pub fn retry(&self) -> Option<u64> {
    self.retry
  }

  pub fn last_event_id(&self) -> Option<&str> {
    self.last_event_id.as_deref()
  }

  fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
    let raw = std::mem::take(&mut self.line);
    let bytes = if std::mem::replace(&mut self.first_line, false) {
      raw.strip_prefix(BOM).unwrap_or(&raw[..])
    } else {
      &raw[..]
    };
    let line = String::from_utf8_lossy(bytes);

    if line.is_empty() {
      if let Some(frame) = self.dispatch() {
        frames.push(frame);
      }
      return;
    }
    if line.starts_with(':') {
      return;
    }

    let (field, value) = match line.split_once(':') {
      Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
      None => (&line[..], "")
    };

    match field {
      "event" => self.event = Some(value.to_string()),
      "data" => {
        if self.has_data {
          self.data.push('\n');
        }
        self.data.push_str(value);
        self.has_data = true;
      },
      "id" => {
        if !value.contains('\0') {
          self.last_event_id = Some(value.to_string());
        }
      },
      "retry" => {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
          if let Ok(ms) = value.parse() {
            self.retry = Some(ms);
          }
        }
      },
      _ => {}
    }
  }

  fn dispatch(&mut self) -> Option<SseFrame> {
    let event = self.event.take();
    if !self.has_data {
      return None;
    }
    self.has_data = false;
    Some(SseFrame {
      event: event.filter(|name| !name.is_empty()),
      data: std::mem::take(&mut self.data),
      id: self.last_event_id.clone()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_named_event() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: market.info\ndata: BTC 65000\n\n");
    assert_eq!(frames, vec![SseFrame { event: Some("market.info".to_string()), data: "BTC 65000".to_string(), id: None }]);
  }

  #[test]
  fn test_frame_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: trad").is_empty());
    assert!(decoder.feed(b"ing.events\r").is_empty());
    assert!(decoder.feed(b"\ndata: filled 0.1").is_empty());
    let frames = decoder.feed(b"\r\n\r\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event.as_deref(), Some("trading.events"));
    assert_eq!(frames[0].data, "filled 0.1");
  }

  #[test]
  fn test_multiline_data_and_comments() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b": keep-alive\ndata: first\ndata:second\n\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event, None);
    assert_eq!(frames[0].data, "first\nsecond");
  }

  #[test]
  fn test_event_without_data_is_not_dispatched() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: heartbeat\n\n").is_empty());
    // the pending event name must not leak into the next frame
    let frames = decoder.feed(b"data: ping\n\n");
    assert_eq!(frames[0].event, None);
  }

  #[test]
  fn test_empty_data_line_dispatches_empty_payload() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: INIT\ndata\n\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data, "");
  }

  #[test]
  fn test_id_and_retry_fields() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"retry: 5000\nid: 41\ndata: a\n\nretry: soon\ndata: b\n\n");
    assert_eq!(decoder.retry(), Some(5000));
    assert_eq!(decoder.last_event_id(), Some("41"));
    assert_eq!(frames[0].id.as_deref(), Some("41"));
    assert_eq!(frames[1].id.as_deref(), Some("41"));
  }

  #[test]
  fn test_reset_keeps_resume_state() {
    let mut decoder = SseDecoder::new();
    decoder.feed(b"retry: 1500\nid: 9\ndata: done\n\nevent: market.info\ndata: half");
    decoder.reset();
    let frames = decoder.feed(b"data: fresh\n\n");
    assert_eq!(frames, vec![SseFrame { event: None, data: "fresh".to_string(), id: Some("9".to_string()) }]);
    assert_eq!(decoder.retry(), Some(1500));
  }

  #[test]
  fn test_oversized_retry_keeps_previous_value() {
    let mut decoder = SseDecoder::new();
    decoder.feed(b"retry: 2500\n\nretry: 99999999999999999999999\n\n");
    assert_eq!(decoder.retry(), Some(2500));
  }

  #[test]
  fn test_leading_bom_is_stripped() {
    let mut decoder = SseDecoder::new();
    // the mark arrives split across chunks
    assert!(decoder.feed(b"\xEF\xBB").is_empty());
    let frames = decoder.feed(b"\xBFevent: INIT\ndata: ok\n\n");
    assert_eq!(frames[0].event.as_deref(), Some("INIT"));

    // only the first line of a stream may carry it
    let frames = decoder.feed(b"\xEF\xBB\xBFevent: INIT\ndata: again\n\n");
    assert_eq!(frames[0].event, None);
  }

  #[test]
  fn test_utf8_split_across_chunks() {
    let payload = "data: 체결 완료\n\n".as_bytes();
    let (head, tail) = payload.split_at(8);
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(head).is_empty());
    let frames = decoder.feed(tail);
    assert_eq!(frames[0].data, "체결 완료");
  }
}
