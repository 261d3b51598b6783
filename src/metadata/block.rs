use exif::experimental::Writer;
use exif::{Exif, Field, In, Rational, Reader, Tag, Value};
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{ProcessingError, Result};
use crate::metadata::jpeg;
use crate::models::geo::{Axis, Dms, GeoCoordinate, Hemisphere};
use crate::utils::coordinates::dms_to_decimal;

/// Tags the writer derives itself from the layout it produces
const LAYOUT_TAGS: [Tag; 9] = [
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::TileOffsets,
    Tag::TileByteCounts,
];

const GPS_POSITION_TAGS: [Tag; 4] = [
    Tag::GPSLatitudeRef,
    Tag::GPSLatitude,
    Tag::GPSLongitudeRef,
    Tag::GPSLongitude,
];

/// All EXIF fields of one image plus its embedded thumbnail.
///
/// Reading collects every field of every IFD; writing re-serialises them
/// unchanged apart from the GPS position tags, so other tag groups survive
/// a GPS merge.
#[derive(Debug, Clone, Default)]
pub struct ImageMetadataBlock {
    fields: Vec<Field>,
    thumbnail: Option<Vec<u8>>,
    little_endian: bool,
}

impl ImageMetadataBlock {
    /// A block with no tag groups at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the metadata container of an image file.
    ///
    /// An image without any EXIF data yields an empty block; an unreadable
    /// file or a corrupt container is a [`ProcessingError::MetadataRead`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ProcessingError::MetadataRead(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let mut reader = BufReader::new(file);
        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(Self::from_exif(&exif)),
            Err(exif::Error::NotFound(_)) => {
                trace!("No EXIF data in {}", path.display());
                Ok(Self::empty())
            }
            Err(e) => Err(ProcessingError::MetadataRead(format!(
                "Failed to read EXIF data from {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn from_exif(exif: &Exif) -> Self {
        let mut fields = Vec::new();
        for field in exif.fields() {
            if LAYOUT_TAGS.contains(&field.tag) {
                continue;
            }
            if let Value::Unknown(..) = field.value {
                debug!("Dropping field {} with unknown value type", field.tag);
                continue;
            }
            fields.push(field.clone());
        }

        Self {
            fields,
            thumbnail: thumbnail_from(exif),
            little_endian: exif.little_endian(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.thumbnail.is_none()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn field(&self, tag: Tag) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.tag == tag && f.ifd_num == In::PRIMARY)
    }

    /// True when the GPS group carries a latitude tag
    pub fn has_gps_latitude(&self) -> bool {
        self.field(Tag::GPSLatitude).is_some()
    }

    /// Decode the GPS position.
    ///
    /// `Ok(None)` when latitude or longitude is absent. Malformed rationals are
    /// a [`ProcessingError::MetadataRead`]; a decoded position off the globe is
    /// a [`ProcessingError::InvalidCoordinate`].
    pub fn gps_coordinate(&self) -> Result<Option<GeoCoordinate>> {
        let (lat_field, lon_field) = match (
            self.field(Tag::GPSLatitude),
            self.field(Tag::GPSLongitude),
        ) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Ok(None),
        };

        let latitude = self.decode_axis(lat_field, Tag::GPSLatitudeRef, Axis::Latitude)?;
        let longitude = self.decode_axis(lon_field, Tag::GPSLongitudeRef, Axis::Longitude)?;

        GeoCoordinate::new(latitude, longitude).map(Some)
    }

    fn decode_axis(&self, field: &Field, ref_tag: Tag, axis: Axis) -> Result<f64> {
        let rationals = match &field.value {
            Value::Rational(v) if v.len() >= 3 => v,
            other => {
                return Err(ProcessingError::MetadataRead(format!(
                    "{} is not a DMS rational triple: {:?}",
                    field.tag, other
                )))
            }
        };

        let reference = self.field(ref_tag).and_then(|f| match &f.value {
            Value::Ascii(parts) => parts.first().map(Vec::as_slice),
            Value::Byte(bytes) => Some(bytes.as_slice()),
            _ => None,
        });

        let dms = Dms {
            degrees: (rationals[0].num, rationals[0].denom),
            minutes: (rationals[1].num, rationals[1].denom),
            seconds: (rationals[2].num, rationals[2].denom),
            hemisphere: Hemisphere::from_ref(axis, reference),
        };

        dms_to_decimal(&dms).map_err(|e| ProcessingError::MetadataRead(e.to_string()))
    }

    /// `DateTimeOriginal` as written by the camera
    pub fn date_time_original(&self) -> Option<String> {
        match &self.field(Tag::DateTimeOriginal)?.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|p| String::from_utf8_lossy(p).trim().to_string()),
            _ => None,
        }
    }

    /// Compass direction the camera was facing, in degrees
    pub fn gps_direction(&self) -> Option<f64> {
        match &self.field(Tag::GPSImgDirection)?.value {
            Value::Rational(v) => v.first().filter(|r| r.denom != 0).map(|r| r.to_f64()),
            _ => None,
        }
    }

    /// Replace the GPS position tags, leaving every other field untouched
    pub fn set_gps(&mut self, coordinate: &GeoCoordinate) {
        self.fields
            .retain(|f| !(f.ifd_num == In::PRIMARY && GPS_POSITION_TAGS.contains(&f.tag)));

        let lat = coordinate.latitude_dms();
        let lon = coordinate.longitude_dms();

        self.fields.push(ascii_field(Tag::GPSLatitudeRef, lat.hemisphere.code()));
        self.fields.push(rational_field(Tag::GPSLatitude, &lat));
        self.fields.push(ascii_field(Tag::GPSLongitudeRef, lon.hemisphere.code()));
        self.fields.push(rational_field(Tag::GPSLongitude, &lon));
    }

    /// Serialise to a TIFF-structured EXIF block
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new();
        for field in &self.fields {
            writer.push_field(field);
        }
        if let Some(thumbnail) = &self.thumbnail {
            writer.set_jpeg(thumbnail, In::THUMBNAIL);
        }

        let mut buf = Cursor::new(Vec::new());
        writer
            .write(&mut buf, self.little_endian)
            .map_err(|e| ProcessingError::MetadataWrite(format!("Failed to encode EXIF: {}", e)))?;
        Ok(buf.into_inner())
    }

    /// Write this block into a JPEG file, leaving pixel data untouched.
    ///
    /// The new file is assembled next to the target and moved over it, so a
    /// failure part way leaves the original file intact.
    pub fn save_into(&self, path: &Path) -> Result<()> {
        let tiff = self.encode()?;
        let original = fs::read(path).map_err(|e| {
            ProcessingError::MetadataWrite(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let updated = jpeg::replace_exif_segment(&original, &tiff)?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let write_err = |e: std::io::Error| {
            ProcessingError::MetadataWrite(format!("Failed to write {}: {}", path.display(), e))
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
        staged.write_all(&updated).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        let permissions = fs::metadata(path).map_err(write_err)?.permissions();
        fs::set_permissions(staged.path(), permissions).map_err(write_err)?;
        staged.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} bytes of EXIF into {}", tiff.len(), path.display());
        Ok(())
    }
}

fn ascii_field(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn rational_field(tag: Tag, dms: &Dms) -> Field {
    let rational = |(num, denom): (u32, u32)| Rational { num, denom };
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![
            rational(dms.degrees),
            rational(dms.minutes),
            rational(dms.seconds),
        ]),
    }
}

fn thumbnail_from(exif: &Exif) -> Option<Vec<u8>> {
    let offset = exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    let length = exif
        .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    exif.buf()
        .get(offset..offset.checked_add(length)?)
        .map(<[u8]>::to_vec)
}
