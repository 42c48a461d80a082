//! The body of responses produced by handlers and by the router itself.
//!
//! Most answers are a single buffer (`405`, `404`, text returned by a handler), kept inline.
//! A handler that streams wraps any [`http_body::Body`] with [`ResponseBody::stream`].

use crate::error::BoxError;
use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

pub struct ResponseBody(Repr);

enum Repr {
    /// taken on the first poll
    Full(Option<Bytes>),
    Streaming(UnsyncBoxBody<Bytes, BoxError>),
}

impl ResponseBody {
    #[inline]
    pub fn empty() -> Self {
        Self(Repr::Full(None))
    }

    /// A body of one buffer; an empty buffer gives an empty body.
    pub fn full(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() { Self::empty() } else { Self(Repr::Full(Some(bytes))) }
    }

    pub fn stream<B>(body: B) -> Self
    where
        B: Body<Data = Bytes, Error = BoxError> + Send + 'static,
    {
        Self(Repr::Streaming(UnsyncBoxBody::new(body)))
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Full(bytes) => f.debug_tuple("ResponseBody").field(bytes).finish(),
            Repr::Streaming(_) => f.debug_tuple("ResponseBody").field(&"<stream>").finish(),
        }
    }
}

macro_rules! full_body_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ResponseBody {
                fn from(value: $ty) -> Self {
                    Self::full(value)
                }
            }
        )*
    };
}

full_body_from!(Bytes, String, &'static str, Vec<u8>);

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl From<Option<Bytes>> for ResponseBody {
    fn from(bytes: Option<Bytes>) -> Self {
        bytes.map_or_else(Self::empty, Self::full)
    }
}

impl Body for ResponseBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Bytes>, BoxError>>> {
        match &mut self.get_mut().0 {
            Repr::Full(bytes) => Poll::Ready(bytes.take().map(Frame::data).map(Ok)),
            Repr::Streaming(body) => Pin::new(body).poll_frame(cx),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.0 {
            Repr::Full(bytes) => bytes.is_none(),
            Repr::Streaming(body) => body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.0 {
            Repr::Full(bytes) => SizeHint::with_exact(bytes.as_ref().map_or(0, |b| b.len() as u64)),
            Repr::Streaming(body) => body.size_hint(),
        }
    }
}
