use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, ready};

use poem::web::headers::{ContentLength, HeaderMapExt};
use poem::{Body, Endpoint, IntoResponse, Middleware, Request, Response};
use tokio::io::{AsyncRead, ReadBuf};

use crate::errors::StoreError;

/// Room left for multipart boundaries and part headers on top of the file limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

/// Caps request bodies so oversized uploads are refused while streaming
///
/// A declared `Content-Length` over the cap is refused before the handler
/// runs. Bodies without one are counted as they are read and the request is
/// answered with 413 once the cap is crossed.
pub struct UploadLimit {
    max_file_bytes: usize,
}

impl UploadLimit {
    pub fn new(max_file_bytes: usize) -> Self {
        Self { max_file_bytes }
    }
}

impl<E: Endpoint> Middleware<E> for UploadLimit {
    type Output = UploadLimitEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        UploadLimitEndpoint {
            inner: ep,
            max_file_bytes: self.max_file_bytes,
        }
    }
}

pub struct UploadLimitEndpoint<E> {
    inner: E,
    max_file_bytes: usize,
}

impl<E> UploadLimitEndpoint<E> {
    fn max_body_bytes(&self) -> usize {
        self.max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    fn too_large(&self) -> Response {
        StoreError::payload_too_large(self.max_file_bytes).into_response()
    }
}

impl<E: Endpoint> Endpoint for UploadLimitEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> poem::Result<Self::Output> {
        let max_body_bytes = self.max_body_bytes();

        if let Some(ContentLength(declared)) = req.headers().typed_get::<ContentLength>() {
            if declared > max_body_bytes as u64 {
                tracing::warn!("Refused request body of {} bytes (cap {})", declared, max_body_bytes);
                return Ok(self.too_large());
            }
        }

        let exceeded = Arc::new(AtomicBool::new(false));
        let body = req.take_body();
        req.set_body(Body::from_async_read(CappedReader {
            inner: body.into_async_read(),
            remaining: max_body_bytes,
            exceeded: exceeded.clone(),
        }));

        let result = self.inner.call(req).await;

        if exceeded.load(Ordering::Relaxed) {
            tracing::warn!("Aborted request body past {} bytes", max_body_bytes);
            return Ok(self.too_large());
        }

        result.map(IntoResponse::into_response)
    }
}

/// Fails the read once more than `remaining` bytes have come through
struct CappedReader<R> {
    inner: R,
    remaining: usize,
    exceeded: Arc<AtomicBool>,
}

impl<R: AsyncRead + Unpin> AsyncRead for CappedReader<R> {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        ready!(Pin::new(&mut self.inner).poll_read(cx, buf))?;
        let read = buf.filled().len() - before;

        if read > self.remaining {
            self.exceeded.store(true, Ordering::Relaxed);
            return Poll::Ready(Err(io::Error::other("request body exceeds the upload limit")));
        }

        self.remaining -= read;
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem::{EndpointExt, handler, post};

    #[handler]
    async fn echo_len(body: Body) -> poem::Result<String> {
        let bytes = body.into_vec().await?;
        Ok(bytes.len().to_string())
    }

    fn client(max_file_bytes: usize) -> TestClient<impl Endpoint> {
        TestClient::new(post(echo_len).with(UploadLimit::new(max_file_bytes)))
    }

    #[tokio::test]
    async fn test_small_body_passes_through() {
        let cli = client(8);

        let resp = cli.post("/").body(vec![b'x'; 100]).send().await;

        resp.assert_status_is_ok();
        resp.assert_text("100").await;
    }

    #[tokio::test]
    async fn test_declared_length_over_cap_is_refused() {
        let cli = client(8);
        let size = 8 + MULTIPART_OVERHEAD_BYTES + 1;

        let resp = cli
            .post("/")
            .header("content-length", size)
            .body(vec![b'x'; size])
            .send()
            .await;

        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        resp.assert_json(serde_json::json!({
            "error": "payload_too_large",
            "message": "File exceeds the 8 byte limit",
            "status_code": 413,
        }))
        .await;
    }

    #[tokio::test]
    async fn test_streamed_body_over_cap_is_refused() {
        let cli = client(8);
        let data = vec![b'x'; 8 + MULTIPART_OVERHEAD_BYTES + 1];

        let resp = cli
            .post("/")
            .body(Body::from_async_read(std::io::Cursor::new(data)))
            .send()
            .await;

        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
