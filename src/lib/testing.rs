use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use crate::protocol::Link;

/// Scripted stand-in for a scaler on the other end of the serial line.
///
/// Each complete request line is answered with its scripted reply; unknown
/// requests get no answer, so reads time out like a silent device. Replies
/// arrive in the order they were sent, a slow one holding back those after it.
#[derive(Default)]
pub(crate) struct SimDevice {
    replies: HashMap<String, (Vec<u8>, Duration)>,
    pending: VecDeque<(Instant, u8)>,
    line: Vec<u8>,
    written: Vec<u8>,
    ignore: usize,
    discarded: usize,
}

impl SimDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, request: &str, reply: &str) -> Self {
        self.reply_after(request, reply, Duration::ZERO)
    }

    /// Answers `request` only once `delay` has passed since it was written.
    pub fn reply_after(mut self, request: &str, reply: &str, delay: Duration) -> Self {
        self.replies
            .insert(request.to_string(), (reply.as_bytes().to_vec(), delay));
        self
    }

    /// Leave the next `n` requests unanswered.
    pub fn drop_first(mut self, n: usize) -> Self {
        self.ignore = n;
        self
    }

    pub fn written(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }

    /// Bytes thrown away by `discard_input`.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    fn arrived(&self) -> bool {
        matches!(self.pending.front(), Some((at, _)) if *at <= Instant::now())
    }

    fn handle_line(&mut self) {
        let line = String::from_utf8_lossy(&self.line).trim().to_string();
        self.line.clear();

        if self.ignore > 0 {
            self.ignore -= 1;
            return;
        }
        if let Some((reply, delay)) = self.replies.get(&line) {
            let at = Instant::now() + *delay;
            let at = self.pending.back().map_or(at, |(last, _)| at.max(*last));
            self.pending.extend(reply.iter().map(|&b| (at, b)));
        }
    }
}

impl Write for SimDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            self.written.push(b);
            if b == b'\n' {
                self.handle_line();
            } else {
                self.line.push(b);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for SimDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.arrived() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
        }
        match self.pending.pop_front() {
            Some((_, b)) => {
                buf[0] = b;
                Ok(1)
            }
            None => Err(io::Error::new(io::ErrorKind::TimedOut, "no data")),
        }
    }
}

impl Link for SimDevice {
    fn discard_input(&mut self) -> io::Result<()> {
        while self.arrived() {
            self.pending.pop_front();
            self.discarded += 1;
        }
        Ok(())
    }
}
