//! Content type detection by byte signature.
//!
//! Implements the WHATWG MIME sniffing table: the first bytes of a payload
//! are compared against known signatures and, when nothing matches, the
//! payload is classified as plain text or opaque binary depending on whether
//! it contains control bytes. File names and extensions are never consulted.

/// Number of leading bytes considered when sniffing
pub const SNIFF_LEN: usize = 512;

/// Returned when no signature matches and the data looks binary
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returned for data without binary control bytes
pub const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

enum Signature {
    /// Bytes must appear verbatim at offset 0.
    Exact(&'static [u8], &'static str),
    /// `data & mask == pattern`, optionally after leading whitespace.
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_ws: bool,
        content_type: &'static str,
    },
    /// Case-insensitive HTML tag after leading whitespace, terminated by
    /// a space or `>`.
    Html(&'static [u8]),
    /// ISO base media file with an `mp4` brand.
    Mp4,
}

const HTML: &str = "text/html; charset=utf-8";

const FF4: &[u8] = b"\xFF\xFF\xFF\xFF";
const RIFF_MASK: &[u8] = b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF";

static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_ws: true,
        content_type: "text/xml; charset=utf-8",
    },
    Signature::Exact(b"%PDF-", "application/pdf"),
    Signature::Exact(b"%!PS-Adobe-", "application/postscript"),
    // byte order marks
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFE\xFF\x00\x00",
        skip_ws: false,
        content_type: "text/plain; charset=utf-16be",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFF\xFE\x00\x00",
        skip_ws: false,
        content_type: "text/plain; charset=utf-16le",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\x00",
        pattern: b"\xEF\xBB\xBF\x00",
        skip_ws: false,
        content_type: PLAIN_TEXT,
    },
    // images
    Signature::Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Exact(b"BM", "image/bmp"),
    Signature::Exact(b"GIF87a", "image/gif"),
    Signature::Exact(b"GIF89a", "image/gif"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        skip_ws: false,
        content_type: "image/webp",
    },
    Signature::Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // audio and video
    Signature::Masked {
        mask: RIFF_MASK,
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        skip_ws: false,
        content_type: "audio/aiff",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF",
        pattern: b"ID3",
        skip_ws: false,
        content_type: "audio/mpeg",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"OggS\x00",
        skip_ws: false,
        content_type: "application/ogg",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"MThd\x00\x00\x00\x06",
        skip_ws: false,
        content_type: "audio/midi",
    },
    Signature::Masked {
        mask: RIFF_MASK,
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        skip_ws: false,
        content_type: "video/avi",
    },
    Signature::Masked {
        mask: RIFF_MASK,
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        skip_ws: false,
        content_type: "audio/wave",
    },
    Signature::Mp4,
    Signature::Exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // fonts
    Signature::Masked {
        mask: FF4,
        pattern: b"\x00\x01\x00\x00",
        skip_ws: false,
        content_type: "font/ttf",
    },
    Signature::Exact(b"OTTO", "font/otf"),
    Signature::Exact(b"ttcf", "font/collection"),
    Signature::Exact(b"wOFF", "font/woff"),
    Signature::Exact(b"wOF2", "font/woff2"),
    // archives
    Signature::Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Exact(b"PK\x03\x04", "application/zip"),
    Signature::Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Exact(b"\x00\x61\x73\x6D", "application/wasm"),
];

/// Determine the content type of `data` from its leading bytes.
///
/// Always returns a valid MIME type; [`OCTET_STREAM`] when nothing else fits.
pub fn detect(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(data.len());

    for sig in SIGNATURES {
        if let Some(ct) = sig.matches(data, first_non_ws) {
            return ct;
        }
    }

    if data[first_non_ws..].iter().any(|b| is_binary(*b)) {
        OCTET_STREAM
    } else {
        PLAIN_TEXT
    }
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Signature::Exact(sig, ct) => data.starts_with(sig).then_some(*ct),
            Signature::Masked {
                mask,
                pattern,
                skip_ws,
                content_type,
            } => {
                let data = if *skip_ws { &data[first_non_ws..] } else { data };
                if data.len() < pattern.len() {
                    return None;
                }
                let hit = pattern
                    .iter()
                    .zip(mask.iter())
                    .zip(data)
                    .all(|((p, m), d)| d & m == *p);
                hit.then_some(*content_type)
            }
            Signature::Html(tag) => {
                let data = &data[first_non_ws..];
                if data.len() < tag.len() + 1 {
                    return None;
                }
                let hit = tag.iter().zip(data).all(|(t, d)| {
                    if t.is_ascii_uppercase() {
                        *t == d.to_ascii_uppercase()
                    } else {
                        t == d
                    }
                });
                // the tag must be terminated
                let terminated = matches!(data[tag.len()], b' ' | b'>');
                (hit && terminated).then_some(HTML)
            }
            Signature::Mp4 => is_mp4(data).then_some("video/mp4"),
        }
    }
}

fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || !box_size.is_multiple_of(4) {
        return false;
    }
    if &data[4..8] != b"ftyp" {
        return false;
    }
    // major brand at 8, minor version at 12, compatible brands follow
    (8..box_size)
        .step_by(4)
        .filter(|&st| st != 12 && st + 3 <= box_size)
        .any(|st| &data[st..st + 3] == b"mp4")
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_is_an_image() {
        let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
        png.extend_from_slice(b"\x00\x00\x00\rIHDR");
        assert_eq!(detect(&png), "image/png");
    }

    #[test]
    fn binary_falls_back_to_octet_stream() {
        assert_eq!(detect(&[0x01, 0x02, 0x03, 0xFE, 0x00, 0x10]), OCTET_STREAM);
    }

    #[test]
    fn text_and_empty() {
        assert_eq!(detect(b"hello, world\n"), PLAIN_TEXT);
        assert_eq!(detect(b""), PLAIN_TEXT);
    }

    #[test]
    fn html_is_case_insensitive_after_whitespace() {
        assert_eq!(detect(b"  \n<html><body></body></html>"), HTML);
        assert_eq!(detect(b"<!doctype html>\n"), HTML);
        // <B must be followed by a terminator, so <BLOCKQUOTE is not <B
        assert_eq!(detect(b"<BLOCKQUOTE>"), PLAIN_TEXT);
    }

    #[test]
    fn exact_signatures() {
        assert_eq!(detect(b"%PDF-1.7\n"), "application/pdf");
        assert_eq!(detect(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(detect(b"\xFF\xD8\xFF\xE0"), "image/jpeg");
        assert_eq!(detect(b"PK\x03\x04\x14\x00"), "application/zip");
        assert_eq!(detect(b"\x1F\x8B\x08\x00"), "application/x-gzip");
        assert_eq!(detect(b"RKYV\x00\x00"), OCTET_STREAM);
    }

    #[test]
    fn masked_signatures() {
        assert_eq!(detect(b"RIFF\x24\x08\x00\x00WAVEfmt "), "audio/wave");
        assert_eq!(detect(b"   <?xml version=\"1.0\"?>"), "text/xml; charset=utf-8");
        assert_eq!(detect(b"\xEF\xBB\xBFhello"), PLAIN_TEXT);
    }

    #[test]
    fn mp4_brand() {
        let mut data = vec![0x00, 0x00, 0x00, 0x1C];
        data.extend_from_slice(b"ftypisom\x00\x00\x02\x00isomiso2mp41");
        assert_eq!(detect(&data), "video/mp4");
    }

    #[test]
    fn only_leading_bytes_are_sniffed() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect(&data), PLAIN_TEXT);
    }
}
