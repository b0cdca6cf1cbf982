use crate::log_debug;
use crossbeam_channel::Sender;
use std::io::{self, BufRead, BufReader, Read};
use std::thread;

/// Read `source` one newline-terminated line at a time and forward each raw line.
///
/// A trailing fragment without a newline is forwarded as a final line. The thread ends
/// on end of stream, on a read error, or once the receiving side is gone; dropping the
/// sender is how the matcher learns that the stream closed.
pub(super) fn spawn_line_reader<R>(
    source: R,
    tx: Sender<Vec<u8>>,
) -> io::Result<thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("kerneltest-stdout".to_string())
        .spawn(move || {
            let mut reader = BufReader::new(source);
            loop {
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log_debug(&format!("subject stdout read error: {err}"));
                        break;
                    }
                }
            }
        })
}
