//! Result payload decoding
//!
//! A raw page body is first decompressed according to the response's
//! `Content-Encoding` header (the payload itself is never inspected to
//! guess), then parsed in the requested [`ResultFormat`] into records and
//! failed identifiers.
//!
//! Decoding is pure: the same bytes always yield the same page.

mod entry;
mod json;
mod tsv;
mod xml;

use crate::error::{MapperError, Result};
use crate::fields::FieldRegistry;
use crate::types::{DecodedPage, ResultFormat};
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::io::Read;
use std::sync::Arc;

/// What kind of result set is being decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// ID-mapping results: every row has a `from` and a `to`
    Mapping,
    /// UniProtKB search hits: the entry accession is both source and target
    Search,
}

/// Turns raw result pages into [`DecodedPage`]s
#[derive(Clone)]
pub struct Decoder {
    kind: PayloadKind,
    format: ResultFormat,
    fields: Vec<String>,
    registry: Arc<dyn FieldRegistry>,
}

impl Decoder {
    pub fn new(
        kind: PayloadKind,
        format: ResultFormat,
        fields: Vec<String>,
        registry: Arc<dyn FieldRegistry>,
    ) -> Self {
        Self {
            kind,
            format,
            fields,
            registry,
        }
    }

    /// Decode one page body
    ///
    /// `content_encoding` is the response header value, if any.
    pub fn decode(
        &self,
        raw: &[u8],
        content_encoding: Option<&str>,
        page_index: usize,
    ) -> Result<DecodedPage> {
        let body = decompress(raw, content_encoding, page_index)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(DecodedPage::default());
        }

        match self.format {
            ResultFormat::Json => json::decode(&body, self.kind, &self.fields, page_index),
            ResultFormat::Tsv => {
                let text = utf8(&body, page_index)?;
                tsv::decode(text, self.kind, &self.fields, self.registry.as_ref(), page_index)
            }
            ResultFormat::Xml => {
                let text = utf8(&body, page_index)?;
                xml::decode(text, &self.fields, page_index)
            }
        }
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("kind", &self.kind)
            .field("format", &self.format)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Undo the transfer encoding declared by the response
pub fn decompress<'a>(
    raw: &'a [u8],
    content_encoding: Option<&str>,
    page_index: usize,
) -> Result<Cow<'a, [u8]>> {
    let encoding = content_encoding
        .map(|e| e.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match encoding.as_str() {
        "" | "identity" => Ok(Cow::Borrowed(raw)),
        "gzip" | "x-gzip" => {
            let mut decoder = GzDecoder::new(raw);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out).map_err(|e| {
                MapperError::decode(page_index, format!("gzip decompression failed: {}", e))
            })?;
            Ok(Cow::Owned(out))
        }
        other => Err(MapperError::decode(
            page_index,
            format!("unsupported content encoding '{}'", other),
        )),
    }
}

fn utf8(body: &[u8], page_index: usize) -> Result<&str> {
    std::str::from_utf8(body)
        .map_err(|e| MapperError::decode(page_index, format!("payload is not UTF-8: {}", e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fields::StaticRegistry;
    use crate::types::{FailureReason, FieldValue};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn decoder(kind: PayloadKind, format: ResultFormat, fields: &[&str]) -> Decoder {
        Decoder::new(
            kind,
            format,
            fields.iter().map(|s| s.to_string()).collect(),
            Arc::new(StaticRegistry),
        )
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    const MAPPING_JSON: &str = r#"{
        "results": [
            {"from": "P30542", "to": "ENSG00000163485.17"},
            {"from": "Q16678", "to": "ENSG00000138061.12"}
        ],
        "failedIds": ["P00000"]
    }"#;

    #[test]
    fn test_decode_gzip_declared_by_header() {
        let d = decoder(PayloadKind::Mapping, ResultFormat::Json, &[]);
        let plain = d.decode(MAPPING_JSON.as_bytes(), None, 0).unwrap();
        let zipped = d
            .decode(&gzip(MAPPING_JSON.as_bytes()), Some("gzip"), 0)
            .unwrap();
        assert_eq!(plain, zipped);
        assert_eq!(plain.records.len(), 2);
        assert_eq!(plain.failed.len(), 1);
        assert_eq!(plain.failed[0].reason, FailureReason::NotFound);
    }

    #[test]
    fn test_gzip_payload_without_header_is_not_sniffed() {
        let d = decoder(PayloadKind::Mapping, ResultFormat::Json, &[]);
        let err = d
            .decode(&gzip(MAPPING_JSON.as_bytes()), None, 3)
            .unwrap_err();
        assert!(matches!(err, MapperError::Decode { page_index: 3, .. }));
    }

    #[test]
    fn test_corrupt_gzip_is_decode_error() {
        let err = decompress(b"definitely not gzip", Some("gzip"), 1).unwrap_err();
        assert!(matches!(err, MapperError::Decode { page_index: 1, .. }));
    }

    #[test]
    fn test_unsupported_encoding() {
        assert!(decompress(b"x", Some("br"), 0).is_err());
        assert!(decompress(b"x", Some("identity"), 0).is_ok());
    }

    #[test]
    fn test_empty_body_is_empty_page() {
        let d = decoder(PayloadKind::Mapping, ResultFormat::Tsv, &[]);
        assert_eq!(d.decode(b"\n", None, 0).unwrap(), DecodedPage::default());
    }

    #[test]
    fn test_decoding_is_repeatable() {
        let d = decoder(PayloadKind::Mapping, ResultFormat::Json, &["length"]);
        let first = d.decode(MAPPING_JSON.as_bytes(), None, 0).unwrap();
        let second = d.decode(MAPPING_JSON.as_bytes(), None, 0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.records[0].field("length"), Some(&FieldValue::Absent));
    }
}
