use std::io::{BufRead, BufReader, Read};
use std::thread::{self, JoinHandle};

/// What a reader thread reports for one output stream.
pub(crate) enum StreamEvent {
    Line(String),
    Closed,
}

/// Reads `reader` line by line on a background thread.
///
/// Bytes are decoded lossily so invalid UTF-8 never aborts the stream. `emit`
/// returns `false` once nobody is listening anymore, which stops the thread;
/// [`StreamEvent::Closed`] is emitted last in every other case.
pub(crate) fn spawn_reader<R, F>(
    reader: R,
    name: String,
    mut emit: F,
) -> std::io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
    F: FnMut(StreamEvent) -> bool + Send + 'static,
{
    thread::Builder::new().name(name).spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    if !emit(StreamEvent::Line(decode_line(&buffer))) {
                        return;
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "output stream read failed");
                    break;
                }
            }
        }
        emit(StreamEvent::Closed);
    })
}

pub(crate) fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn decode_replaces_invalid_bytes() {
        assert_eq!(decode_line(b"ok\xff\r\n"), "ok\u{fffd}");
    }

    #[test]
    fn reader_emits_lines_then_closed() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_reader(
            Cursor::new(b"one\ntwo\npartial".to_vec()),
            "test-reader".into(),
            move |event| {
                let label = match event {
                    StreamEvent::Line(line) => line,
                    StreamEvent::Closed => "<closed>".to_string(),
                };
                tx.send(label).is_ok()
            },
        )
        .unwrap();
        handle.join().unwrap();
        let collected: Vec<String> = rx.try_iter().collect();
        assert_eq!(collected, vec!["one", "two", "partial", "<closed>"]);
    }
}
