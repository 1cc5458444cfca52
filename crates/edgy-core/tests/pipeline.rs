use anyhow::Result;
use edgy_core::{
    AtlasBuildOptions, EdgyError, EdgySink, FontAtlasBuilder, GLYPH_COUNT, GlyphBitmap,
    GlyphRasterizer, GlyphRenderInfo, KerningPair, PackOptions, read_font_atlas,
};

/// Deterministic stand-in for a real font: each glyph is a soft-edged block whose
/// size depends on the character code.
struct SyntheticFont {
    size: u32,
}

impl SyntheticFont {
    fn blob(&self, ch: char) -> GlyphBitmap {
        let code = ch as u32;
        let width = self.size / 2 + code % 5;
        let height = self.size - 2 - code % 3;
        let mut coverage = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                // Soft edges, solid centre.
                let edge = x.min(width - 1 - x).min(y).min(height - 1 - y);
                coverage[(y * width + x) as usize] = (64 + edge * 64).min(255) as u8;
            }
        }
        GlyphBitmap {
            cell_width: width + 6,
            cell_height: self.size,
            offset_x: 0,
            offset_y: (code % 3) as i32,
            width,
            height,
            coverage,
        }
    }
}

impl GlyphRasterizer for SyntheticFont {
    fn rasterize_char(&self, ch: char) -> edgy_core::Result<GlyphBitmap> {
        Ok(self.blob(ch))
    }

    fn kerning_pairs(&self) -> Vec<KerningPair> {
        vec![
            KerningPair::new('A', 'V', -3),
            KerningPair::new('T', 'o', -2),
            KerningPair::new('f', 'f', 1),
        ]
    }

    fn line_height(&self) -> u32 {
        self.size
    }

    fn space_advance(&self) -> u32 {
        self.size / 4
    }
}

#[test]
fn identical_rasterizer_output_gives_identical_bytes() -> Result<()> {
    let builder = FontAtlasBuilder::default();
    let first = builder.build(&SyntheticFont { size: 40 })?.to_bytes()?;
    let second = builder.build(&SyntheticFont { size: 40 })?.to_bytes()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn offset_table_matches_section_sizes() -> Result<()> {
    let atlas = FontAtlasBuilder::default().build(&SyntheticFont { size: 40 })?;
    let header = atlas.header()?;
    assert_eq!(header.glyph_info_offset, 40);
    assert_eq!(
        header.pixel_data_offset - header.glyph_info_offset,
        header.glyph_count * GlyphRenderInfo::SIZE as i32
    );
    assert_eq!(
        header.kerning_data_offset - header.pixel_data_offset,
        header.atlas_width * header.atlas_height * 4
    );
    assert_eq!(header.glyph_count as usize, GLYPH_COUNT);
    assert_eq!(header.kerning_count, 3);
    assert_eq!(header.space_width, 10);
    Ok(())
}

#[test]
fn reader_recovers_exact_sections() -> Result<()> {
    let atlas = FontAtlasBuilder::default().build(&SyntheticFont { size: 40 })?;
    let bytes = atlas.to_bytes()?;
    let offsets = atlas.offsets()?;
    assert_eq!(bytes.len(), offsets.end as usize);

    let parsed = read_font_atlas(&bytes)?;
    assert_eq!(parsed.glyphs.len(), GLYPH_COUNT);
    assert_eq!(parsed.pixels.len(), 2048 * 256);
    assert_eq!(parsed.kerning.len(), 3);
    assert_eq!(parsed, atlas);
    Ok(())
}

#[test]
fn every_box_is_ordered_and_inside_the_atlas() -> Result<()> {
    let atlas = FontAtlasBuilder::default().build(&SyntheticFont { size: 40 })?;
    for g in &atlas.glyphs {
        assert!(g.x0 <= g.x1 && g.y0 <= g.y1);
        assert!(g.x1 < atlas.atlas_width as i32 && g.y1 < atlas.atlas_height as i32);
        assert!(g.uv0[0] < g.uv1[0] && g.uv0[1] < g.uv1[1]);
        assert!(g.uv1[0] <= 1.0 && g.uv1[1] <= 1.0);
    }
    Ok(())
}

#[test]
fn nominal_packing_uses_more_room_than_tight_packing() -> Result<()> {
    let font = SyntheticFont { size: 40 };
    let tight = FontAtlasBuilder::default().build(&font)?;
    let loose = FontAtlasBuilder::new(AtlasBuildOptions {
        pack: PackOptions {
            tight: false,
            gutter: 2,
        },
        ..AtlasBuildOptions::default()
    })
    .build(&font)?;
    let last = |a: &edgy_core::FontAtlasFile| {
        let g = a.glyphs[GLYPH_COUNT - 1];
        (g.y0 / 40, g.x1)
    };
    assert!(last(&loose) > last(&tight));
    Ok(())
}

#[test]
fn wrapped_rows_start_at_the_left_edge() -> Result<()> {
    let atlas = FontAtlasBuilder::default().build(&SyntheticFont { size: 60 })?;
    let mut row_starts = std::collections::BTreeMap::new();
    for g in &atlas.glyphs {
        let origin_x = g.x0 - g.left_gap as i32;
        let origin_y = g.y0 - g.top_gap as i32;
        assert_eq!(origin_y % 60, 0, "rows are one line height apart");
        let start = row_starts.entry(origin_y).or_insert(origin_x);
        *start = (*start).min(origin_x);
    }
    assert!(row_starts.len() > 1, "expected glyphs to wrap onto several rows");
    assert!(row_starts.values().all(|&x| x == 0));
    Ok(())
}

#[test]
fn overflow_is_reported_and_nothing_is_written() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("huge.edgy");

    let result = FontAtlasBuilder::default()
        .build(&SyntheticFont { size: 120 })
        .and_then(|atlas| {
            let mut sink = EdgySink::create(&out)?;
            atlas.write_to(&mut sink)?;
            sink.commit()
        });

    assert!(matches!(
        result,
        Err(EdgyError::AtlasCapacityExceeded { available: 256, .. })
    ));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn same_font_under_two_names_gives_identical_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut written = Vec::new();
    for name in ["Synthetic", "fonts/SyntheticCopy.ttf"] {
        let file_name = edgy_core::output_file_name(name).unwrap();
        let atlas = FontAtlasBuilder::default().build(&SyntheticFont { size: 40 })?;
        let mut sink = EdgySink::create(dir.path().join(file_name))?;
        atlas.write_to(&mut sink)?;
        written.push(sink.commit()?);
    }
    assert_eq!(
        written[0].file_name().unwrap(),
        std::ffi::OsStr::new("Synthetic.edgy")
    );
    assert_eq!(
        written[1].file_name().unwrap(),
        std::ffi::OsStr::new("SyntheticCopy.ttf.edgy")
    );
    assert_eq!(std::fs::read(&written[0])?, std::fs::read(&written[1])?);
    Ok(())
}
