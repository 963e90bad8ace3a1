//! aws-chunked stream
//!
//! Each chunk is `HEXSIZE;chunk-signature=<sig>CRLF<data>CRLF`, terminated by
//! a zero-size chunk. Chunk signatures are parsed but not verified; the
//! stream yields the decoded payload bytes.

use crate::utils::Apply;

use std::io;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::vec;

use bytes::Bytes;
use futures::stream::Stream;
use memchr::memchr;
use pin_project_lite::pin_project;

pin_project! {
    /// aws-chunked decoder
    pub struct ChunkedStream<S> {
        #[pin]
        body: S,

        state: State,
    }
}

/// state machine
#[derive(Debug)]
enum State {
    /// reading chunk metadata up to its LF
    ReadingMeta {
        /// previous bytes
        prev_bytes: Option<Bytes>,
        /// buf
        buf: Vec<u8>,
    },
    /// reading chunk data and its trailing CRLF
    ReadingData {
        /// bytes to read
        remaining_data_size: usize,
        /// previous bytes
        prev_bytes: Option<Bytes>,
        /// buf
        buf: Vec<Bytes>,
    },
    /// releasing decoded data
    ReleasingData {
        /// decoded data
        data_iter: vec::IntoIter<Bytes>,
        /// remaining bytes
        remaining_bytes: Option<Bytes>,
    },
    /// unrecoverable error
    Error {
        /// error kind
        kind: ErrorKind,
    },
}

/// `ChunkedStreamError`
#[derive(Debug, thiserror::Error)]
pub enum ChunkedStreamError {
    /// IO error
    #[error("ChunkedStreamError: Io: {}",.0)]
    Io(io::Error),
    /// Encoding error
    #[error("ChunkedStreamError: EncodingError")]
    EncodingError,
    /// Incomplete stream
    #[error("ChunkedStreamError: Incomplete")]
    Incomplete,
}

/// unrecoverable error kind
#[derive(Debug, Clone, Copy)]
enum ErrorKind {
    /// Encoding error
    EncodingError,
    /// Incomplete stream
    Incomplete,
}

impl<S> ChunkedStream<S>
where
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    /// Constructs a new `ChunkedStream`
    pub fn new(body: S) -> Self {
        Self {
            body,
            state: State::ReadingMeta {
                prev_bytes: None,
                buf: Vec::new(),
            },
        }
    }
}

/// Chunk metadata: the declared size. The signature is parsed and discarded.
struct ChunkMeta {
    /// chunk size
    size: usize,
}

/// nom parser for `HEXSIZE;chunk-signature=<sig>\r\n`
fn parse_chunk_meta(input: &[u8]) -> nom::IResult<&[u8], ChunkMeta> {
    use nom::{
        bytes::complete::{tag, take_till, take_till1},
        combinator::{all_consuming, map_res},
        number::complete::hex_u32,
        sequence::tuple,
    };

    let mut parser = all_consuming(tuple((
        take_till1(|c| c == b';'),
        tag(b";chunk-signature="),
        take_till(|c| c == b'\r'),
        tag(b"\r\n"),
    )));

    let (input, (size_str, _, _signature, _)) = parser(input)?;

    let (_, size) = map_res(all_consuming(hex_u32), TryInto::try_into)(size_str)?;

    Ok((input, ChunkMeta { size }))
}

/// state machine: poll read meta
fn poll_read_meta<S: Stream<Item = io::Result<Bytes>> + Send + 'static>(
    mut body: Pin<&mut S>,
    cx: &mut Context<'_>,
    prev_bytes: &mut Option<Bytes>,
    buf: &mut Vec<u8>,
) -> Poll<Option<Result<State, ChunkedStreamError>>> {
    let mut push_meta_bytes = |mut bytes: Bytes| {
        if let Some(idx) = memchr(b'\n', bytes.as_ref()) {
            let len = idx.wrapping_add(1); // NOTE: idx < bytes.len()
            let leading = bytes.split_to(len);
            buf.extend_from_slice(leading.as_ref());
            Some(bytes)
        } else {
            buf.extend_from_slice(bytes.as_ref());
            None
        }
    };

    let mut poll_meta = || {
        if let Some(bytes) = prev_bytes.take() {
            if let Some(remaining_bytes) = push_meta_bytes(bytes) {
                return Poll::Ready(Some(Ok(remaining_bytes)));
            }
        }
        loop {
            match futures::ready!(body.as_mut().poll_next(cx)) {
                None => return Poll::Ready(None),
                Some(Err(e)) => return Poll::Ready(Some(Err(ChunkedStreamError::Io(e)))),
                Some(Ok(bytes)) => {
                    if let Some(remaining_bytes) = push_meta_bytes(bytes) {
                        return Poll::Ready(Some(Ok(remaining_bytes)));
                    }
                }
            }
        }
    };

    let prev_bytes = match futures::ready!(poll_meta()?) {
        None => return Poll::Ready(None),
        Some(remaining_bytes) => {
            if remaining_bytes.is_empty() {
                None
            } else {
                Some(remaining_bytes)
            }
        }
    };

    match parse_chunk_meta(buf) {
        Ok((_, meta)) => State::ReadingData {
            remaining_data_size: meta.size,
            prev_bytes,
            buf: Vec::new(),
        },
        Err(_) => State::Error {
            kind: ErrorKind::EncodingError,
        },
    }
    .apply(|s| Poll::Ready(Some(Ok(s))))
}

/// state machine: poll read data
fn poll_read_data<S: Stream<Item = io::Result<Bytes>> + Send + 'static>(
    mut body: Pin<&mut S>,
    cx: &mut Context<'_>,
    remaining_data_size: &mut usize,
    prev_bytes: &mut Option<Bytes>,
    bytes_buffer: &mut Vec<Bytes>,
) -> Poll<Option<Result<State, ChunkedStreamError>>> {
    let mut push_bytes = |mut bytes: Bytes| {
        if *remaining_data_size == 0 {
            return Some(bytes);
        }
        if *remaining_data_size <= bytes.len() {
            let data = bytes.split_to(*remaining_data_size);
            bytes_buffer.push(data);
            *remaining_data_size = 0;
            Some(bytes)
        } else {
            *remaining_data_size = remaining_data_size.wrapping_sub(bytes.len());
            bytes_buffer.push(bytes);
            None
        }
    };
    let mut remaining_bytes = 'outer: loop {
        if let Some(bytes) = prev_bytes.take() {
            let opt = push_bytes(bytes);
            if opt.is_some() {
                break 'outer opt;
            }
        }
        loop {
            match futures::ready!(body.as_mut().poll_next(cx)) {
                None => {
                    return State::Error {
                        kind: ErrorKind::Incomplete,
                    }
                    .apply(|s| Poll::Ready(Some(Ok(s))))
                }
                Some(Err(e)) => {
                    return Poll::Ready(Some(Err(ChunkedStreamError::Io(e))));
                }
                Some(Ok(bytes)) => {
                    let opt = push_bytes(bytes);
                    if opt.is_some() {
                        break 'outer opt;
                    }
                }
            }
        }
    };
    for expected_byte in b"\r\n" {
        loop {
            match remaining_bytes {
                None => match futures::ready!(body.as_mut().poll_next(cx)) {
                    None => {
                        return State::Error {
                            kind: ErrorKind::Incomplete,
                        }
                        .apply(|s| Poll::Ready(Some(Ok(s))))
                    }
                    Some(Err(e)) => {
                        return Poll::Ready(Some(Err(ChunkedStreamError::Io(e))));
                    }
                    Some(Ok(bytes)) => remaining_bytes = Some(bytes),
                },
                Some(ref mut bytes) => match bytes.as_ref() {
                    [] => {
                        remaining_bytes = None;
                        continue;
                    }
                    [x, ..] if x == expected_byte => {
                        drop(bytes.split_to(1));
                        break;
                    }
                    _ => {
                        return State::Error {
                            kind: ErrorKind::EncodingError,
                        }
                        .apply(|s| Poll::Ready(Some(Ok(s))));
                    }
                },
            }
        }
    }

    let remaining_bytes =
        remaining_bytes.and_then(|bytes| if bytes.is_empty() { None } else { Some(bytes) });

    State::ReleasingData {
        data_iter: mem::take(bytes_buffer).into_iter(),
        remaining_bytes,
    }
    .apply(|s| Poll::Ready(Some(Ok(s))))
}

impl<S> Stream for ChunkedStream<S>
where
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    type Item = Result<Bytes, ChunkedStreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let mut body: Pin<&mut S> = this.body;
        let state: &mut State = this.state;

        'state_machine: loop {
            match state {
                State::ReadingMeta { prev_bytes, buf } => {
                    match futures::ready!(poll_read_meta(body.as_mut(), cx, prev_bytes, buf)?) {
                        None => return Poll::Ready(None),
                        Some(s) => *state = s,
                    }
                    continue 'state_machine;
                }
                State::ReadingData {
                    remaining_data_size,
                    prev_bytes,
                    buf,
                } => {
                    match futures::ready!(poll_read_data(
                        body.as_mut(),
                        cx,
                        remaining_data_size,
                        prev_bytes,
                        buf,
                    )?) {
                        None => return Poll::Ready(None),
                        Some(s) => *state = s,
                    }
                    continue 'state_machine;
                }
                State::ReleasingData {
                    data_iter,
                    remaining_bytes,
                } => {
                    if let Some(bytes) = data_iter.next() {
                        return Poll::Ready(Some(Ok(bytes)));
                    }
                    *state = State::ReadingMeta {
                        prev_bytes: remaining_bytes.take(),
                        buf: Vec::new(),
                    };
                    continue 'state_machine;
                }
                State::Error { kind } => {
                    return match kind {
                        ErrorKind::EncodingError => ChunkedStreamError::EncodingError,
                        ErrorKind::Incomplete => ChunkedStreamError::Incomplete,
                    }
                    .apply(|e| Poll::Ready(Some(Err(e))))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::stream::{StreamExt, TryStreamExt};

    async fn decode_to_vec(
        chunks: Vec<io::Result<Bytes>>,
    ) -> Result<Vec<u8>, ChunkedStreamError> {
        let stream = futures::stream::iter(chunks.into_iter());
        ChunkedStream::new(stream)
            .try_fold(Vec::new(), |mut acc, bytes| async move {
                acc.extend_from_slice(&bytes);
                Ok(acc)
            })
            .await
    }

    #[tokio::test]
    async fn decode_two_chunks() {
        let body = b"5;chunk-signature=abc\r\nhello\r\n\
                     6;chunk-signature=def\r\n world\r\n\
                     0;chunk-signature=end\r\n\r\n";

        let ans = decode_to_vec(vec![Ok(Bytes::from_static(body))]).await.unwrap();
        assert_eq!(ans, b"hello world");
    }

    #[tokio::test]
    async fn decode_split_across_reads() {
        let body: &[&[u8]] = &[
            b"5;chunk-sig",
            b"nature=abc\r\nhel",
            b"lo\r\n0;chunk-signature=",
            b"end\r\n\r\n",
        ];
        let chunks = body.iter().map(|b| Ok(Bytes::from_static(b))).collect();

        let ans = decode_to_vec(chunks).await.unwrap();
        assert_eq!(ans, b"hello");
    }

    #[tokio::test]
    async fn decode_large_chunk() {
        let data = vec![b'a'; 0x10000];
        let mut body = Vec::new();
        body.extend_from_slice(
            b"10000;chunk-signature=ad80c730a21e5b8d04586a2213dd63b9a0e99e0e2307b0ade35a65485a288648\r\n",
        );
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n0;chunk-signature=0\r\n\r\n");

        let ans = decode_to_vec(vec![Ok(Bytes::from(body))]).await.unwrap();
        assert_eq!(ans, data);
    }

    #[tokio::test]
    async fn encoding_error() {
        let body = b"zz;chunk-signature=abc\r\nhello\r\n";
        let mut stream = ChunkedStream::new(futures::stream::iter(vec![Ok(
            Bytes::from_static(body),
        )]));

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, ChunkedStreamError::EncodingError));
    }

    #[tokio::test]
    async fn incomplete_stream() {
        let body = b"5;chunk-signature=abc\r\nhel";
        let mut stream = ChunkedStream::new(futures::stream::iter(vec![Ok(
            Bytes::from_static(body),
        )]));

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, ChunkedStreamError::Incomplete));
    }
}
