//! The `edgy` container: a fixed header of little-endian 32-bit fields followed by
//! tightly packed sections.
//!
//! Font container:
//! ```text
//! Magic, LineHeight, AtlasWidth, AtlasHeight, GlyphCount, KerningPairCount,
//! GlyphInfoOffset, PixelDataOffset, KerningDataOffset, SpaceWidth
//! [GlyphRenderInfo; GlyphCount] [u32; AtlasWidth * AtlasHeight] [KerningPair; KerningPairCount]
//! ```
//!
//! Image container:
//! ```text
//! Magic, Width, Height
//! [RGBA8; Width * Height]
//! ```

use std::io::Write;

use log::info;

use crate::MAGIC;
use crate::error::{EdgyError, Result};
use crate::glyph::{ContainerRecord, GlyphRenderInfo, KerningPair};
use crate::raw_image::RawImageFile;

const FIELD: usize = std::mem::size_of::<i32>();
const PIXEL: usize = std::mem::size_of::<u32>();

/// Number of 32-bit fields in the font header.
pub const FONT_HEADER_FIELDS: usize = 10;

/// Number of 32-bit fields in the image header.
pub const IMAGE_HEADER_FIELDS: usize = 3;

/// Section offsets of a font container, in bytes from the start of the file.
///
/// Every offset fits the signed 32-bit header field it is stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetTable {
    pub glyph_info: i32,
    pub pixel_data: i32,
    pub kerning_data: i32,
    /// One past the last kerning record; the expected file length.
    pub end: i32,
}

impl OffsetTable {
    /// Fails with [`EdgyError::ContainerTooLarge`] when any offset would overflow an `i32`.
    pub fn compute(
        glyph_count: usize,
        atlas_width: u32,
        atlas_height: u32,
        kerning_count: usize,
    ) -> Result<Self> {
        Self::checked(
            glyph_count as u64,
            atlas_width.into(),
            atlas_height.into(),
            kerning_count as u64,
        )
        .ok_or_else(|| {
            EdgyError::ContainerTooLarge(format!(
                "{glyph_count} glyphs, a {atlas_width}x{atlas_height} atlas and \
                 {kerning_count} kerning pairs overflow 32-bit offsets"
            ))
        })
    }

    fn checked(glyphs: u64, width: u64, height: u64, kerning: u64) -> Option<Self> {
        let glyph_info = (FONT_HEADER_FIELDS * FIELD) as u64;
        let pixel_data = glyph_info.checked_add(glyphs.checked_mul(GlyphRenderInfo::SIZE as u64)?)?;
        let pixel_bytes = width.checked_mul(height)?.checked_mul(PIXEL as u64)?;
        let kerning_data = pixel_data.checked_add(pixel_bytes)?;
        let end = kerning_data.checked_add(kerning.checked_mul(KerningPair::SIZE as u64)?)?;
        Some(Self {
            glyph_info: i32::try_from(glyph_info).ok()?,
            pixel_data: i32::try_from(pixel_data).ok()?,
            kerning_data: i32::try_from(kerning_data).ok()?,
            end: i32::try_from(end).ok()?,
        })
    }
}

/// Decoded font header, field order as on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontHeader {
    pub magic: u32,
    pub line_height: i32,
    pub atlas_width: i32,
    pub atlas_height: i32,
    pub glyph_count: i32,
    pub kerning_count: i32,
    pub glyph_info_offset: i32,
    pub pixel_data_offset: i32,
    pub kerning_data_offset: i32,
    pub space_width: i32,
}

impl FontHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let fields = read_fields::<FONT_HEADER_FIELDS>(bytes)?;
        let header = Self {
            magic: fields[0] as u32,
            line_height: fields[1],
            atlas_width: fields[2],
            atlas_height: fields[3],
            glyph_count: fields[4],
            kerning_count: fields[5],
            glyph_info_offset: fields[6],
            pixel_data_offset: fields[7],
            kerning_data_offset: fields[8],
            space_width: fields[9],
        };
        check_magic(header.magic)?;
        Ok(header)
    }
}

/// Decoded image header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub magic: u32,
    pub width: i32,
    pub height: i32,
}

impl ImageHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let fields = read_fields::<IMAGE_HEADER_FIELDS>(bytes)?;
        let header = Self {
            magic: fields[0] as u32,
            width: fields[1],
            height: fields[2],
        };
        check_magic(header.magic)?;
        Ok(header)
    }
}

/// Fully populated font atlas, staged in memory before anything is written.
#[derive(Clone, Debug, PartialEq)]
pub struct FontAtlasFile {
    pub line_height: i32,
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub space_width: i32,
    /// One record per glyph; index is `char - 33`.
    pub glyphs: Vec<GlyphRenderInfo>,
    /// Row-major atlas pixels, little-endian bytes `R, G, B, A`.
    pub pixels: Vec<u32>,
    pub kerning: Vec<KerningPair>,
}

impl FontAtlasFile {
    pub fn offsets(&self) -> Result<OffsetTable> {
        OffsetTable::compute(
            self.glyphs.len(),
            self.atlas_width,
            self.atlas_height,
            self.kerning.len(),
        )
    }

    pub fn header(&self) -> Result<FontHeader> {
        let offsets = self.offsets()?;
        Ok(FontHeader {
            magic: MAGIC,
            line_height: self.line_height,
            atlas_width: header_field("atlas width", self.atlas_width)?,
            atlas_height: header_field("atlas height", self.atlas_height)?,
            glyph_count: header_field("glyph count", self.glyphs.len())?,
            kerning_count: header_field("kerning pair count", self.kerning.len())?,
            glyph_info_offset: offsets.glyph_info,
            pixel_data_offset: offsets.pixel_data,
            kerning_data_offset: offsets.kerning_data,
            space_width: self.space_width,
        })
    }

    /// Serialize the whole container into one contiguous buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let offsets = self.offsets()?;
        let h = self.header()?;
        let expected = self.atlas_width as usize * self.atlas_height as usize;
        if self.pixels.len() != expected {
            return Err(EdgyError::Malformed(format!(
                "atlas holds {} pixels, {}x{} needs {expected}",
                self.pixels.len(),
                self.atlas_width,
                self.atlas_height
            )));
        }
        let mut out = Vec::with_capacity(offsets.end as usize);

        for field in [
            h.magic as i32,
            h.line_height,
            h.atlas_width,
            h.atlas_height,
            h.glyph_count,
            h.kerning_count,
            h.glyph_info_offset,
            h.pixel_data_offset,
            h.kerning_data_offset,
            h.space_width,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        debug_assert_eq!(out.len(), offsets.glyph_info as usize);

        extend_records(&mut out, &self.glyphs);
        debug_assert_eq!(out.len(), offsets.pixel_data as usize);

        extend_pixels(&mut out, &self.pixels);
        debug_assert_eq!(out.len(), offsets.kerning_data as usize);

        extend_records(&mut out, &self.kerning);
        debug_assert_eq!(out.len(), offsets.end as usize);
        Ok(out)
    }

    /// Write the container to `writer`. The writer is only borrowed; closing it is the
    /// caller's job.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        info!(
            "serialized font atlas: {}x{}, {} glyphs, {} kerning pairs, {} bytes",
            self.atlas_width,
            self.atlas_height,
            self.glyphs.len(),
            self.kerning.len(),
            bytes.len()
        );
        Ok(())
    }
}

impl RawImageFile {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let width = header_field("image width", self.width)?;
        let height = header_field("image height", self.height)?;
        let mut out = Vec::with_capacity(IMAGE_HEADER_FIELDS * FIELD + self.pixels.len());
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&self.pixels);
        Ok(out)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        info!(
            "serialized image: {}x{}, {} pixel bytes",
            self.width,
            self.height,
            self.pixels.len()
        );
        Ok(())
    }
}

/// Parse a font container, trusting the offsets recorded in its header.
///
/// Every byte must belong to exactly one section.
pub fn read_font_atlas(bytes: &[u8]) -> Result<FontAtlasFile> {
    let header = FontHeader::parse(bytes)?;
    let count = |name: &str, v: i32| -> Result<usize> {
        usize::try_from(v).map_err(|_| EdgyError::Malformed(format!("negative {name}: {v}")))
    };
    let glyph_count = count("glyph count", header.glyph_count)?;
    let kerning_count = count("kerning pair count", header.kerning_count)?;
    let width = count("atlas width", header.atlas_width)?;
    let height = count("atlas height", header.atlas_height)?;
    let glyph_start = count("glyph info offset", header.glyph_info_offset)?;
    let pixel_start = count("pixel data offset", header.pixel_data_offset)?;
    let kerning_start = count("kerning data offset", header.kerning_data_offset)?;

    let glyph_bytes = section(bytes, "glyph info", glyph_start, pixel_start)?;
    let pixel_bytes = section(bytes, "pixel data", pixel_start, kerning_start)?;
    let kerning_bytes = section(bytes, "kerning data", kerning_start, bytes.len())?;

    expect_len("glyph info", glyph_bytes, glyph_count * GlyphRenderInfo::SIZE)?;
    let pixel_len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(PIXEL))
        .ok_or_else(|| EdgyError::Malformed(format!("atlas size {width}x{height} overflows")))?;
    expect_len("pixel data", pixel_bytes, pixel_len)?;
    expect_len("kerning data", kerning_bytes, kerning_count * KerningPair::SIZE)?;
    if glyph_start != FONT_HEADER_FIELDS * FIELD {
        return Err(EdgyError::Malformed(format!(
            "glyph info starts at {glyph_start}, header is {} bytes",
            FONT_HEADER_FIELDS * FIELD
        )));
    }

    Ok(FontAtlasFile {
        line_height: header.line_height,
        atlas_width: width as u32,
        atlas_height: height as u32,
        space_width: header.space_width,
        glyphs: read_records(glyph_bytes),
        pixels: pixel_bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        kerning: read_records(kerning_bytes),
    })
}

/// Parse an image container.
pub fn read_image(bytes: &[u8]) -> Result<RawImageFile> {
    let header = ImageHeader::parse(bytes)?;
    let (width, height) = match (u32::try_from(header.width), u32::try_from(header.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(EdgyError::Malformed(format!(
                "negative image size {}x{}",
                header.width, header.height
            )));
        }
    };
    let pixels = &bytes[IMAGE_HEADER_FIELDS * FIELD..];
    let pixel_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(RawImageFile::BYTES_PER_PIXEL))
        .ok_or_else(|| EdgyError::Malformed(format!("image size {width}x{height} overflows")))?;
    expect_len("image pixels", pixels, pixel_len)?;
    Ok(RawImageFile {
        width,
        height,
        source_channels: RawImageFile::BYTES_PER_PIXEL as u8,
        pixels: pixels.to_vec(),
    })
}

#[cfg(target_endian = "little")]
fn extend_records<T: ContainerRecord>(out: &mut Vec<u8>, records: &[T]) {
    out.extend_from_slice(bytemuck::cast_slice(records));
}

#[cfg(target_endian = "big")]
fn extend_records<T: ContainerRecord>(out: &mut Vec<u8>, records: &[T]) {
    for record in records {
        out.extend_from_slice(bytemuck::bytes_of(&record.to_le()));
    }
}

/// Decode a section whose length is already known to be a whole number of records.
fn read_records<T: ContainerRecord>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(std::mem::size_of::<T>())
        .map(|chunk| bytemuck::pod_read_unaligned::<T>(chunk).to_le())
        .collect()
}

fn header_field<T>(name: &str, value: T) -> Result<i32>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value.try_into().map_err(|_| {
        EdgyError::ContainerTooLarge(format!("{name} {value} does not fit a 32-bit field"))
    })
}

#[cfg(target_endian = "little")]
fn extend_pixels(out: &mut Vec<u8>, pixels: &[u32]) {
    out.extend_from_slice(bytemuck::cast_slice(pixels));
}

#[cfg(target_endian = "big")]
fn extend_pixels(out: &mut Vec<u8>, pixels: &[u32]) {
    for p in pixels {
        out.extend_from_slice(&p.to_le_bytes());
    }
}

fn read_fields<const N: usize>(bytes: &[u8]) -> Result<[i32; N]> {
    if bytes.len() < N * FIELD {
        return Err(EdgyError::Malformed(format!(
            "file is {} bytes, header needs {}",
            bytes.len(),
            N * FIELD
        )));
    }
    let mut fields = [0i32; N];
    for (i, chunk) in bytes[..N * FIELD].chunks_exact(FIELD).enumerate() {
        fields[i] = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(fields)
}

fn check_magic(magic: u32) -> Result<()> {
    if magic != MAGIC {
        return Err(EdgyError::Malformed(format!(
            "bad magic {:?}",
            String::from_utf8_lossy(&magic.to_le_bytes())
        )));
    }
    Ok(())
}

fn section<'a>(bytes: &'a [u8], name: &str, start: usize, end: usize) -> Result<&'a [u8]> {
    if start > end || end > bytes.len() {
        return Err(EdgyError::Malformed(format!(
            "{name} section {start}..{end} is outside a {}-byte file",
            bytes.len()
        )));
    }
    Ok(&bytes[start..end])
}

fn expect_len(name: &str, section: &[u8], expected: usize) -> Result<()> {
    if section.len() != expected {
        return Err(EdgyError::Malformed(format!(
            "{name} holds {} bytes, header implies {expected}",
            section.len()
        )));
    }
    Ok(())
}
