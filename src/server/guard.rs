// Request head screening
// Every request head is parsed before hyper reads it, so a malformed one can be
// answered with the full header policy instead of hyper's bare error response

use hyper::{StatusCode, Uri};
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Largest accepted request head; anything longer is refused with 414 or 431
pub const MAX_HEAD_BYTES: usize = 16 * 1024;

/// Same limit hyper applies by default
const MAX_HEADERS: usize = 100;

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for the next complete request head
    Head,
    /// Inside a body with this many bytes left
    Body(u64),
    /// Chunked body or end of input; bytes pass through unchecked from here on
    Passthrough,
    /// A head was refused; the reader sees end of input
    Rejected(StatusCode),
}

/// Outcome of parsing the start of the buffer as a request head
#[derive(Debug, PartialEq, Eq)]
enum Screened {
    Partial,
    Complete { head_len: usize, next: State },
    Invalid(StatusCode),
}

/// Read-side wrapper that only releases request heads that parse.
///
/// After a refused head the reader sees end of input, so hyper finishes the
/// responses it owes and hands the stream back; `rejected()` then names the
/// status to answer with. Writes go straight to the inner stream.
pub struct HeadGuard<S> {
    inner: S,
    buf: Vec<u8>,
    /// Leading bytes of `buf` that are validated and may be read
    released: usize,
    state: State,
}

impl<S> HeadGuard<S> {
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            released: 0,
            state: State::Head,
        }
    }

    /// Status for the request head that was refused, if any
    pub const fn rejected(&self) -> Option<StatusCode> {
        match self.state {
            State::Rejected(status) => Some(status),
            _ => None,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AsyncRead + Unpin> HeadGuard<S> {
    /// Append one read from the inner stream to `buf`; `0` means end of input
    fn poll_fill(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<usize>> {
        let start = self.buf.len();
        self.buf.resize(start + READ_CHUNK, 0);

        let mut read_buf = ReadBuf::new(&mut self.buf[start..]);
        let result = Pin::new(&mut self.inner).poll_read(cx, &mut read_buf);
        let n = read_buf.filled().len();

        self.buf.truncate(start + n);
        result.map_ok(|()| n)
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for HeadGuard<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        out: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        loop {
            if this.released > 0 {
                let n = this.released.min(out.remaining());
                out.put_slice(&this.buf[..n]);
                this.buf.drain(..n);
                this.released -= n;
                return Poll::Ready(Ok(()));
            }

            match this.state {
                State::Rejected(_) => return Poll::Ready(Ok(())),
                State::Passthrough => {
                    if this.buf.is_empty() {
                        return Pin::new(&mut this.inner).poll_read(cx, out);
                    }
                    this.released = this.buf.len();
                }
                State::Body(0) => this.state = State::Head,
                State::Body(remaining) => {
                    if this.buf.is_empty() && ready!(this.poll_fill(cx))? == 0 {
                        // Body cut short; hyper reports the incomplete message
                        this.state = State::Passthrough;
                        continue;
                    }
                    let n = usize::try_from(remaining)
                        .map_or(this.buf.len(), |r| r.min(this.buf.len()));
                    this.released = n;
                    this.state = State::Body(remaining - n as u64);
                }
                State::Head => match screen(&this.buf) {
                    Screened::Complete { head_len, next } => {
                        this.released = head_len;
                        this.state = next;
                    }
                    Screened::Invalid(status) => this.state = State::Rejected(status),
                    Screened::Partial => {
                        if ready!(this.poll_fill(cx))? == 0 {
                            // Closed between requests or mid-head
                            this.state = State::Passthrough;
                        }
                    }
                },
            }
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for HeadGuard<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write_vectored(cx, bufs)
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Parse the request head at the start of `buf` the way hyper will
fn screen(buf: &[u8]) -> Screened {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);

    let head_len = match req.parse(buf) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) if buf.len() <= MAX_HEAD_BYTES => return Screened::Partial,
        Ok(httparse::Status::Partial) => {
            // No line break yet: the request target alone is too long
            let status = if buf.contains(&b'\n') {
                StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE
            } else {
                StatusCode::URI_TOO_LONG
            };
            return Screened::Invalid(status);
        }
        Err(httparse::Error::TooManyHeaders) => {
            return Screened::Invalid(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
        }
        Err(_) => return Screened::Invalid(StatusCode::BAD_REQUEST),
    };

    if head_len > MAX_HEAD_BYTES {
        return Screened::Invalid(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
    }
    if !req.path.is_some_and(|path| path.parse::<Uri>().is_ok()) {
        return Screened::Invalid(StatusCode::BAD_REQUEST);
    }

    match body_framing(&req) {
        Some(next) => Screened::Complete { head_len, next },
        None => Screened::Invalid(StatusCode::BAD_REQUEST),
    }
}

/// Where the body ends, `None` if the framing headers are unusable
fn body_framing(req: &httparse::Request<'_, '_>) -> Option<State> {
    let mut content_length = None;

    for header in req.headers.iter() {
        if header.name.eq_ignore_ascii_case("transfer-encoding") {
            // Chunked must be the final coding, and HTTP/1.0 has none
            let chunked_last = std::str::from_utf8(header.value)
                .ok()
                .and_then(|value| value.rsplit(',').next())
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
            return (req.version == Some(1) && chunked_last).then_some(State::Passthrough);
        }

        if header.name.eq_ignore_ascii_case("content-length") {
            let len: u64 = std::str::from_utf8(header.value).ok()?.trim().parse().ok()?;
            if content_length.is_some_and(|previous| previous != len) {
                return None;
            }
            content_length = Some(len);
        }
    }

    Some(State::Body(content_length.unwrap_or(0)))
}
