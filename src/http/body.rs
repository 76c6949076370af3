//! Response body types
//!
//! Generated responses (errors, listings, redirects) carry their bytes in
//! memory. Regular files are streamed from disk in fixed-size reads.

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// Body of every response the server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Size of a single read from a streamed file
const CHUNK_SIZE: usize = 64 * 1024;

/// In-memory body
pub fn full(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

/// File contents read on demand, ending after exactly `len` bytes
pub struct FileBody {
    file: File,
    remaining: u64,
    buf: Box<[u8]>,
}

impl FileBody {
    pub fn new(file: File, len: u64) -> Self {
        Self {
            file,
            remaining: len,
            buf: vec![0; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    pub fn boxed(self) -> ResponseBody {
        BodyExt::boxed_unsync(self)
    }
}

impl Body for FileBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
        let this = self.get_mut();
        if this.remaining == 0 {
            return Poll::Ready(None);
        }

        let limit = usize::try_from(this.remaining)
            .map_or(this.buf.len(), |r| r.min(this.buf.len()));
        let mut read_buf = ReadBuf::new(&mut this.buf[..limit]);

        match Pin::new(&mut this.file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Ok(())) => {
                let chunk = read_buf.filled();
                if chunk.is_empty() {
                    // Content-Length is already on the wire
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file shrank while it was being sent",
                    ))));
                }
                this.remaining -= chunk.len() as u64;
                Poll::Ready(Some(Ok(Frame::data(Bytes::copy_from_slice(chunk)))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "nocache-body-{}-{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_body_streams_whole_file() {
        // Larger than one read so several frames are produced
        let contents: Vec<u8> = (0..CHUNK_SIZE * 2 + 123).map(|i| (i % 251) as u8).collect();
        let path = temp_file("large.bin", &contents);

        let file = File::open(&path).await.unwrap();
        let body = FileBody::new(file, contents.len() as u64);
        assert_eq!(body.size_hint().exact(), Some(contents.len() as u64));

        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), contents.as_slice());
    }

    #[tokio::test]
    async fn test_file_body_stops_at_length() {
        let path = temp_file("prefix.txt", b"0123456789");

        let file = File::open(&path).await.unwrap();
        let bytes = FileBody::new(file, 4).collect().await.unwrap().to_bytes();
        assert_eq!(bytes, "0123");
    }

    #[tokio::test]
    async fn test_file_body_errors_when_file_is_short() {
        let path = temp_file("short.txt", b"abc");

        let file = File::open(&path).await.unwrap();
        let err = FileBody::new(file, 10).collect().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_full_body() {
        let bytes = full("hello").collect().await.unwrap().to_bytes();
        assert_eq!(bytes, "hello");
        assert!(empty().is_end_stream());
    }
}
