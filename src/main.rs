mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{error, info};

use cli::{Command, Invocation, USAGE, UsageError};
use edgy_config::EdgyConfig;
use edgy_core::{
    AtlasBuildOptions, EdgySink, FontAtlasBuilder, FontHeader, ImageHeader, PackOptions,
    decode_image, output_file_name, read_font_atlas, read_image,
};
use edgy_text::FontdueRasterizer;

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let invocation = match cli::parse_args(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(err) => {
            error!("{err}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            if err.downcast_ref::<UsageError>().is_some() {
                eprintln!("{USAGE}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation) -> Result<()> {
    match invocation.command {
        Command::Font(name) => {
            let config = EdgyConfig::load(invocation.config.as_deref())?;
            let path = bake_font(&name, &config)?;
            println!("Saved font to file {}", path.display());
        }
        Command::Png(input) => {
            let config = EdgyConfig::load(invocation.config.as_deref())?;
            let path = bake_image(&input, &config)?;
            println!("Saved image to file {}", path.display());
        }
        Command::Info(path) => describe(&path)?,
    }
    Ok(())
}

fn build_options(config: &EdgyConfig) -> AtlasBuildOptions {
    AtlasBuildOptions {
        atlas_width: config.atlas.width,
        atlas_height: config.atlas.height,
        pack: PackOptions {
            tight: config.atlas.tight_packing,
            gutter: config.atlas.gutter,
        },
        scan_padding: config.atlas.scan_padding,
    }
}

fn output_path(config: &EdgyConfig, input: &str) -> Result<PathBuf> {
    let name = output_file_name(input)
        .ok_or_else(|| UsageError::InvalidArguments(format!("no file name in {input:?}")))?;
    Ok(config.output.directory.join(name))
}

fn bake_font(name: &str, config: &EdgyConfig) -> Result<PathBuf> {
    let rasterizer = FontdueRasterizer::load(name, config.font.pixel_size)
        .with_context(|| format!("failed to load font {name:?}"))?;
    let atlas = FontAtlasBuilder::new(build_options(config))
        .build(&rasterizer)
        .with_context(|| format!("failed to build atlas for {name:?}"))?;

    let path = output_path(config, name)?;
    let mut sink = EdgySink::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    atlas.write_to(&mut sink)?;
    let path = sink.commit()?;
    info!(
        "wrote {} glyphs, {} kerning pairs to {}",
        atlas.glyphs.len(),
        atlas.kerning.len(),
        path.display()
    );
    Ok(path)
}

fn bake_image(input: &str, config: &EdgyConfig) -> Result<PathBuf> {
    let image = decode_image(input)?;

    let path = output_path(config, input)?;
    let mut sink = EdgySink::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    image.write_to(&mut sink)?;
    let path = sink.commit()?;
    info!(
        "wrote {}x{} image to {}",
        image.width,
        image.height,
        path.display()
    );
    Ok(path)
}

/// Print the header of a container, checking that its sections line up.
fn describe(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    // Both containers share the magic; only a well-formed image has exactly
    // width * height pixel records after its three-field header.
    if read_image(&bytes).is_ok() {
        let header = ImageHeader::parse(&bytes)?;
        println!("{}: image {}x{}", path.display(), header.width, header.height);
        return Ok(());
    }

    let atlas = read_font_atlas(&bytes)
        .with_context(|| format!("{} is not a valid edgy container", path.display()))?;
    let FontHeader {
        line_height,
        atlas_width,
        atlas_height,
        glyph_count,
        kerning_count,
        glyph_info_offset,
        pixel_data_offset,
        kerning_data_offset,
        space_width,
        ..
    } = atlas.header()?;
    println!("{}: font atlas {}x{}", path.display(), atlas_width, atlas_height);
    println!("  line height       {line_height}");
    println!("  space width       {space_width}");
    println!("  glyphs            {glyph_count} @ {glyph_info_offset}");
    println!("  pixels            @ {pixel_data_offset}");
    println!("  kerning pairs     {kerning_count} @ {kerning_data_offset}");
    Ok(())
}
