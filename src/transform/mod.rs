//! Response body transformation.
//!
//! Only `text/html` bodies are rewritten. Anything else, and any body the
//! minifier cannot handle, is returned untouched.

pub mod html;

use bytes::Bytes;

pub use html::minify_html;

/// Why a body could not be minified.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("HTML rewrite failed: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Whether a `Content-Type` value names HTML. Parameters such as `charset`
/// are ignored.
pub fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("text/html"))
}

/// Minify `body` when `content_type` is HTML; otherwise pass it through.
///
/// Never fails: a body that cannot be minified is returned as it came.
pub fn transform(body: Bytes, content_type: &str) -> Bytes {
    if !is_html(content_type) {
        return body;
    }
    match try_minify(&body) {
        Ok(minified) => minified,
        Err(e) => {
            tracing::warn!(error = %e, content_type, "Minification failed, serving original body");
            body
        }
    }
}

fn try_minify(body: &[u8]) -> Result<Bytes, TransformError> {
    let text = std::str::from_utf8(body)?;
    Ok(Bytes::from(minify_html(text)?))
}

/// Configured transformation step applied to every origin reply.
#[derive(Debug, Clone, Copy)]
pub struct ContentTransformer {
    minify_html: bool,
}

impl ContentTransformer {
    pub fn new(minify_html: bool) -> Self {
        Self { minify_html }
    }

    pub fn apply(&self, body: Bytes, content_type: &str) -> Bytes {
        if self.minify_html {
            transform(body, content_type)
        } else {
            body
        }
    }
}

impl Default for ContentTransformer {
    fn default() -> Self {
        Self::new(true)
    }
}
