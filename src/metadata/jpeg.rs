//! Minimal JPEG segment handling: enough to swap the EXIF APP1 segment
//! without touching any other marker segment or the entropy coded data.

use crate::error::{ProcessingError, Result};

const MARKER_PREFIX: u8 = 0xFF;
const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const TEM: u8 = 0x01;

pub const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Largest payload a marker segment can carry (length field is u16 and counts itself)
const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    marker: u8,
    start: usize,
    payload: usize,
    end: usize,
}

pub fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == MARKER_PREFIX && data[1] == SOI
}

/// Walk the header segments up to (not including) the scan.
///
/// Returns the segments and the offset where the untouched remainder starts.
fn header_segments(data: &[u8]) -> Result<(Vec<Segment>, usize)> {
    if !is_jpeg(data) {
        return Err(ProcessingError::MetadataWrite(
            "Not a JPEG file (missing SOI marker)".to_string(),
        ));
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        if pos >= data.len() {
            return Err(ProcessingError::MetadataWrite(
                "Truncated JPEG: no scan data found".to_string(),
            ));
        }
        if data[pos] != MARKER_PREFIX {
            return Err(ProcessingError::MetadataWrite(format!(
                "Corrupt JPEG: expected marker at offset {}",
                pos
            )));
        }

        // Fill bytes may precede a marker
        let mut marker_pos = pos + 1;
        while marker_pos < data.len() && data[marker_pos] == MARKER_PREFIX {
            marker_pos += 1;
        }
        let marker = *data.get(marker_pos).ok_or_else(|| {
            ProcessingError::MetadataWrite("Truncated JPEG marker".to_string())
        })?;

        match marker {
            SOS | EOI => return Ok((segments, pos)),
            TEM | 0xD0..=0xD7 => {
                segments.push(Segment {
                    marker,
                    start: pos,
                    payload: marker_pos + 1,
                    end: marker_pos + 1,
                });
                pos = marker_pos + 1;
            }
            _ => {
                let len_hi = data.get(marker_pos + 1).copied();
                let len_lo = data.get(marker_pos + 2).copied();
                let length = match (len_hi, len_lo) {
                    (Some(hi), Some(lo)) => u16::from_be_bytes([hi, lo]) as usize,
                    _ => {
                        return Err(ProcessingError::MetadataWrite(
                            "Truncated JPEG segment length".to_string(),
                        ))
                    }
                };
                if length < 2 {
                    return Err(ProcessingError::MetadataWrite(format!(
                        "Invalid JPEG segment length {} at offset {}",
                        length, pos
                    )));
                }
                let end = marker_pos + 1 + length;
                if end > data.len() {
                    return Err(ProcessingError::MetadataWrite(
                        "Truncated JPEG segment".to_string(),
                    ));
                }
                segments.push(Segment {
                    marker,
                    start: pos,
                    payload: marker_pos + 3,
                    end,
                });
                pos = end;
            }
        }
    }
}

fn is_exif_segment(data: &[u8], segment: &Segment) -> bool {
    if segment.marker != APP1 {
        return false;
    }
    data.get(segment.payload..segment.end)
        .map(|payload| payload.starts_with(EXIF_HEADER))
        .unwrap_or(false)
}

/// Replace (or add) the EXIF APP1 segment of a JPEG with `tiff`.
///
/// Any existing EXIF APP1 segments are dropped. The new segment goes right
/// after SOI, or after a leading JFIF APP0 segment when there is one. All
/// other segments and the scan data are copied verbatim.
pub fn replace_exif_segment(data: &[u8], tiff: &[u8]) -> Result<Vec<u8>> {
    let (segments, body_start) = header_segments(data)?;

    let payload_len = EXIF_HEADER.len() + tiff.len();
    if payload_len > MAX_SEGMENT_PAYLOAD {
        return Err(ProcessingError::MetadataWrite(format!(
            "EXIF block of {} bytes does not fit in one APP1 segment",
            payload_len
        )));
    }

    let mut app1 = Vec::with_capacity(payload_len + 4);
    app1.extend_from_slice(&[MARKER_PREFIX, APP1]);
    app1.extend_from_slice(&((payload_len + 2) as u16).to_be_bytes());
    app1.extend_from_slice(EXIF_HEADER);
    app1.extend_from_slice(tiff);

    let mut out = Vec::with_capacity(data.len() + app1.len());
    out.extend_from_slice(&data[..2]);

    let mut kept = segments
        .iter()
        .filter(|segment| !is_exif_segment(data, segment))
        .peekable();

    if let Some(first) = kept.peek() {
        if first.marker == APP0 {
            out.extend_from_slice(&data[first.start..first.end]);
            kept.next();
        }
    }
    out.extend_from_slice(&app1);
    for segment in kept {
        out.extend_from_slice(&data[segment.start..segment.end]);
    }
    out.extend_from_slice(&data[body_start..]);

    Ok(out)
}

/// TIFF payload of the first EXIF APP1 segment, if any
pub fn exif_payload(data: &[u8]) -> Result<Option<&[u8]>> {
    let (segments, _) = header_segments(data)?;
    Ok(segments
        .iter()
        .find(|segment| is_exif_segment(data, segment))
        .map(|segment| &data[segment.payload + EXIF_HEADER.len()..segment.end]))
}
