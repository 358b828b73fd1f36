//! Turning uploaded CV files into something the model can read.
//!
//! PDFs go through text extraction first. When that yields nothing (scanned
//! documents, exotic encodings, parser panics) the caller falls back to
//! attaching the raw PDF so the model reads it directly.

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageFormat;
use tracing::warn;

use crate::llm_client::Attachment;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Given raw PDF bytes, produce text. Returns an empty string on failure.
///
/// Injected into `CvAnalyzer` as `Arc<dyn DocumentTextExtractor>`.
#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    async fn extract_text(&self, pdf: Bytes) -> String;
}

/// `pdf-extract` backed extractor. Parsing is CPU-bound and runs on the
/// blocking pool; a panic inside the parser counts as "no text".
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentTextExtractor for PdfTextExtractor {
    async fn extract_text(&self, pdf: Bytes) -> String {
        let result =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf)).await;

        match result {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("PDF text extraction failed: {e}");
                String::new()
            }
            Err(e) => {
                warn!("PDF text extraction aborted: {e}");
                String::new()
            }
        }
    }
}

pub fn pdf_attachment(pdf: Bytes) -> Attachment {
    Attachment {
        mime_type: PDF_MIME_TYPE.to_string(),
        data: pdf,
    }
}

/// Sniffs the image format from its magic bytes. Only PNG and JPEG are accepted,
/// whatever the file name claimed.
pub fn image_attachment(image: Bytes) -> Option<Attachment> {
    let format = image::guess_format(&image).ok()?;
    let mime_type = match format {
        ImageFormat::Png | ImageFormat::Jpeg => format.to_mime_type(),
        _ => return None,
    };
    Some(Attachment {
        mime_type: mime_type.to_string(),
        data: image,
    })
}

/// True when extracted text carries nothing worth sending.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
