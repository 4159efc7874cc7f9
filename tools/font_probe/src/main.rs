use anyhow::{bail, Context, Result};
use breakout_engine::foundation::logging::{self, LevelFilter};
use breakout_engine::prelude::*;
use breakout_engine::render::text::{FontRasterizer, DEFAULT_BASELINE_ANCHOR};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::rc::Rc;

const DEFAULT_PIXEL_SIZE: &str = "16";
const DEFAULT_SAMPLE_TEXT: &str = "Breakout! Score: 1234";

fn main() -> Result<()> {
    let matches = Command::new("font_probe")
        .about("Loads fonts the way the text renderer does and reports glyph metrics and text measurements")
        .arg(
            Arg::new("font")
                .value_name("FONT")
                .help("Font file to probe")
                .required_unless_present("config"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Probe every font listed in a text config (.toml or .ron)")
                .conflicts_with("font"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("PIXELS")
                .help("Pixel size to rasterize at")
                .value_parser(clap::value_parser!(u32))
                .default_value(DEFAULT_PIXEL_SIZE),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Text to measure")
                .default_value(DEFAULT_SAMPLE_TEXT),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .value_name("FACTOR")
                .help("Scale factor applied to the layout")
                .value_parser(clap::value_parser!(f32))
                .default_value("1.0"),
        )
        .arg(
            Arg::new("anchor")
                .long("anchor")
                .value_name("CHAR")
                .help("Baseline anchor glyph")
                .value_parser(clap::value_parser!(char))
                .default_value("H"),
        )
        .arg(
            Arg::new("face-index")
                .long("face-index")
                .value_name("INDEX")
                .help("Face to select inside a font collection")
                .value_parser(clap::value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            Arg::new("skip-unmapped")
                .long("skip-unmapped")
                .help("Skip codes the font has no glyph for instead of caching .notdef")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("glyphs")
                .short('g')
                .long("glyphs")
                .help("Print per-glyph metrics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging (otherwise RUST_LOG, default info)")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("verbose") {
        logging::init_with_level(LevelFilter::Debug);
    } else {
        logging::init();
    }

    let context = Rc::new(HeadlessContext::new());
    let program = context.create_program();
    let shader = Rc::new(ShaderProgram::from_raw(&context, program, "text"));
    let mut registry = TextRendererRegistry::new(&context, shader);

    let text = matches.get_one::<String>("text").map_or(DEFAULT_SAMPLE_TEXT, String::as_str);
    let scale = *matches.get_one::<f32>("scale").unwrap_or(&1.0);
    if scale <= 0.0 {
        bail!("scale must be positive, got {scale}");
    }

    if let Some(config_path) = matches.get_one::<String>("config") {
        let config = TextRenderConfig::load_from_file(config_path)
            .with_context(|| format!("Failed to read text config {config_path}"))?;
        let reports = registry
            .load_from_config(&config.rasterizer(), &config)
            .with_context(|| format!("Failed to load fonts from {config_path}"))?;
        log::debug!("Loaded {} fonts from {config_path}", reports.len());
        for (name, report) in &reports {
            print_report(&registry, name, report, text, scale, matches.get_flag("glyphs"))?;
        }
        return Ok(());
    }

    let font = matches
        .get_one::<String>("font")
        .context("a font path or --config is required")?;
    let rasterizer = FontdueRasterizer::new()
        .with_face_index(*matches.get_one::<u32>("face-index").unwrap_or(&0))
        .with_skip_unmapped(matches.get_flag("skip-unmapped"));
    let anchor = *matches.get_one::<char>("anchor").unwrap_or(&DEFAULT_BASELINE_ANCHOR);
    registry = registry.with_baseline_anchor(anchor);

    let report = probe(&mut registry, &rasterizer, font, &matches)?;
    print_report(&registry, font, &report, text, scale, matches.get_flag("glyphs"))
}

fn probe<R: FontRasterizer>(
    registry: &mut TextRendererRegistry<HeadlessContext>,
    rasterizer: &R,
    font: &str,
    matches: &ArgMatches,
) -> Result<LoadReport> {
    let size = *matches.get_one::<u32>("size").unwrap_or(&16);
    log::debug!("Probing {font} at {size}px");
    let (_, report) = registry
        .load_named_with_report(rasterizer, font, font, size, 800, 600)
        .with_context(|| format!("Failed to load {font} at {size}px"))?;
    Ok(report)
}

fn print_report(
    registry: &TextRendererRegistry<HeadlessContext>,
    name: &str,
    report: &LoadReport,
    text: &str,
    scale: f32,
    show_glyphs: bool,
) -> Result<()> {
    let renderer = registry.get_named(name)?;
    let metrics = renderer.metrics();

    println!("== {name}");
    println!("  pixel size:  {}", metrics.pixel_size);
    println!("  ascent:      {}", metrics.ascent);
    println!("  descent:     {}", metrics.descent);
    println!("  line height: {}", renderer.line_height(scale));
    println!("  glyphs:      {} cached, {} skipped", report.glyph_count, report.warnings.len());
    for warning in &report.warnings {
        println!("    {warning}");
    }

    if show_glyphs {
        for glyph in renderer.glyphs().iter() {
            let m = glyph.metrics();
            println!(
                "    {:#04x} {:?}: size {}x{} bearing ({}, {}) advance {}",
                glyph.code(),
                char::from(glyph.code()),
                m.size.x,
                m.size.y,
                m.bearing.x,
                m.bearing.y,
                m.advance_px()
            );
        }
    }

    let bounds = renderer.measure_rendered_text_bounds(text, 0.0, 0.0, scale)?;
    let (left, top, width, height) = bounds.to_rect();
    println!("  text:        {text:?} at scale {scale}");
    println!("  width:       {}", renderer.measure_text_width(text, scale));
    println!("  bounds:      left {left} top {top} width {width} height {height}");
    Ok(())
}
