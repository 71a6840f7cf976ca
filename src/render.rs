use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::BarColoring;
use crate::error::ReportError;
use crate::figure::{Bar, Figure, Panel};

/// Bar width in category units.
const BAR_WIDTH: f64 = 0.8;
const FONT_FAMILY: &str = "sans-serif";

const PNG_SIGNATURE_LEN: usize = 8;
/// Length of the IHDR chunk including its length, type and CRC fields.
const IHDR_CHUNK_LEN: usize = 25;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Pixels per inch of the output raster.
    pub dpi: u32,
    /// Crop the canvas to its drawn content plus `pad_inches`.
    pub tight_bbox: bool,
    pub pad_inches: f64,
    pub coloring: BarColoring,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            tight_bbox: true,
            pad_inches: 0.1,
            coloring: BarColoring::Uniform,
        }
    }
}

/// Font sizes and spacing in pixels for a given resolution.
#[derive(Debug, Clone, Copy)]
struct Typography {
    title: f64,
    tick: f64,
    value: f64,
    line: u32,
    margin: u32,
    tick_pad: i32,
}

impl Typography {
    fn new(dpi: u32) -> Self {
        let pt = |points: f64| points * dpi as f64 / 72.0;
        Self {
            title: pt(12.0),
            tick: pt(10.0),
            value: pt(10.0),
            line: pt(0.8).round().max(1.0) as u32,
            margin: (dpi / 10).max(1),
            tick_pad: pt(3.5).round() as i32,
        }
    }

    fn tick_font(&self) -> FontDesc<'static> {
        (FONT_FAMILY, self.tick).into_font()
    }
}

/// Canvas size in pixels.
pub fn canvas_size(size_inches: (f64, f64), dpi: u32) -> (u32, u32) {
    (
        (size_inches.0 * dpi as f64).round() as u32,
        (size_inches.1 * dpi as f64).round() as u32,
    )
}

/// Category label waiting to be stamped below its tick.
#[derive(Debug, Clone)]
struct TickLabel {
    text: String,
    /// Top-centre of the rotated label, in canvas pixels.
    anchor: (i32, i32),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Render the whole figure and encode it as PNG bytes.
pub fn render_png(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>, ReportError> {
    let size = canvas_size(figure.size_inches, options.dpi);
    let fonts = Typography::new(options.dpi);
    log::debug!("Rendering {}x{} px canvas at {} dpi", size.0, size.1, options.dpi);

    let mut buffer = vec![0u8; size.0 as usize * size.1 as usize * 3];
    let ticks = draw_panels(figure, &fonts, &mut buffer, size)?;
    for tick in &ticks {
        stamp_label(&mut buffer, size, tick, figure.tick_rotation, &fonts)?;
    }

    let mut canvas = RgbImage::from_raw(size.0, size.1, buffer)
        .ok_or_else(|| ReportError::Render("canvas buffer size mismatch".to_string()))?;
    if options.tight_bbox {
        let pad = (options.pad_inches * options.dpi as f64).round() as u32;
        canvas = crop_to_content(&canvas, pad);
    }

    encode_png(&canvas, options.dpi)
}

/// Render and write to `path`, replacing any existing file.
///
/// Nothing is written unless the whole image encoded successfully.
pub fn save_png(figure: &Figure, path: &Path, options: &RenderOptions) -> Result<(), ReportError> {
    let bytes = render_png(figure, options)?;
    write_atomic(path, &bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_panels(
    figure: &Figure,
    fonts: &Typography,
    buffer: &mut [u8],
    size: (u32, u32),
) -> Result<Vec<TickLabel>, ReportError> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE).map_err(ReportError::render)?;

    let cells = root.split_evenly((figure.rows, figure.cols));
    let mut ticks = Vec::new();
    for panel in &figure.panels {
        let cell = cells
            .get(panel.row * figure.cols + panel.col)
            .ok_or_else(|| ReportError::Render(format!("no grid cell for '{}'", panel.title)))?;
        draw_panel(cell, panel, figure.tick_rotation, fonts, &mut ticks)?;
    }

    root.present().map_err(ReportError::render)?;
    Ok(ticks)
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &Panel,
    rotation: f64,
    fonts: &Typography,
    ticks: &mut Vec<TickLabel>,
) -> Result<(), ReportError> {
    let (x_area, y_area) = label_areas(panel, rotation, fonts)?;
    let n = panel.bars.len().max(1) as f64;
    let y_range = panel.value_range();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, (FONT_FAMILY, fonts.title).into_font())
        .margin(fonts.margin)
        .x_label_area_size(x_area)
        .y_label_area_size(y_area)
        .build_cartesian_2d(-0.5f64..(n - 0.5), y_range.clone())
        .map_err(ReportError::render)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(panel.bars.len().max(1))
        .x_label_formatter(&|_| String::new())
        .y_labels(6)
        .y_label_formatter(&|v| axis_label(*v))
        .label_style(fonts.tick_font())
        .axis_style(BLACK.stroke_width(fonts.line))
        .draw()
        .map_err(ReportError::render)?;

    chart
        .draw_series(drawn_bars(panel).map(|(i, bar)| {
            let x = i as f64;
            let fill: RGBColor = bar.color.into();
            Rectangle::new(
                [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, bar.height)],
                fill.filled(),
            )
        }))
        .map_err(ReportError::render)?;

    let value_style = (FONT_FAMILY, fonts.value)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(drawn_bars(panel).map(|(i, bar)| {
            Text::new(bar.label.clone(), (i as f64, bar.height), value_style.clone())
        }))
        .map_err(ReportError::render)?;

    for (i, bar) in panel.bars.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64, y_range.start));
        ticks.push(TickLabel {
            text: bar.category.clone(),
            anchor: (x, y + fonts.tick_pad),
        });
    }
    Ok(())
}

fn drawn_bars(panel: &Panel) -> impl Iterator<Item = (usize, &Bar)> {
    panel.bars.iter().enumerate().filter(|(_, b)| b.is_drawn())
}

/// Size the x label area to fit the tallest rotated category label and the y
/// label area to fit the widest axis value.
fn label_areas(panel: &Panel, rotation: f64, fonts: &Typography) -> Result<(u32, u32), ReportError> {
    let font = fonts.tick_font();
    let (sin, cos) = rotation.to_radians().sin_cos();

    let mut x_area = fonts.tick;
    for bar in &panel.bars {
        let (w, h) = font.box_size(&bar.category).map_err(ReportError::render)?;
        x_area = x_area.max(w as f64 * sin.abs() + h as f64 * cos.abs());
    }

    let range = panel.value_range();
    let mut y_area = fonts.tick;
    for v in [range.start, range.end] {
        let (w, _) = font.box_size(&axis_label(v)).map_err(ReportError::render)?;
        y_area = y_area.max(w as f64);
    }

    let pad = 2.0 * fonts.tick_pad as f64;
    Ok(((x_area + pad).ceil() as u32, (y_area + pad).ceil() as u32))
}

/// Y tick text: at most two decimals, trailing zeros dropped.
fn axis_label(v: f64) -> String {
    let text = format!("{v:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        t => t.to_string(),
    }
}

/// Rasterise one tick label upright, then rotate it onto the canvas.
///
/// The bitmap backend only rotates text by quarter turns.
fn stamp_label(
    canvas: &mut [u8],
    canvas_size: (u32, u32),
    tick: &TickLabel,
    rotation: f64,
    fonts: &Typography,
) -> Result<(), ReportError> {
    let font = fonts.tick_font();
    let (w, h) = font.box_size(&tick.text).map_err(ReportError::render)?;
    let pad = 2;
    let size = (w + 2 * pad, h + 2 * pad);

    let mut glyphs = vec![0u8; size.0 as usize * size.1 as usize * 3];
    {
        let area = BitMapBackend::with_buffer(&mut glyphs, size).into_drawing_area();
        area.fill(&WHITE).map_err(ReportError::render)?;
        area.draw(&Text::new(
            tick.text.as_str(),
            (pad as i32, pad as i32),
            font.color(&BLACK),
        ))
        .map_err(ReportError::render)?;
        area.present().map_err(ReportError::render)?;
    }

    composite_rotated(canvas, canvas_size, &glyphs, size, tick.anchor, rotation);
    Ok(())
}

/// Darken-blend `src` rotated counter-clockwise by `degrees` onto `dst`,
/// placing the top-centre of the rotated bounding box at `top_center`.
///
/// Both buffers are packed RGB8. Pixels falling outside `dst` are dropped.
fn composite_rotated(
    dst: &mut [u8],
    dst_size: (u32, u32),
    src: &[u8],
    src_size: (u32, u32),
    top_center: (i32, i32),
    degrees: f64,
) {
    let (sw, sh) = (src_size.0 as f64, src_size.1 as f64);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let half_w = (sw / 2.0 * cos).abs() + (sh / 2.0 * sin).abs();
    let half_h = (sw / 2.0 * sin).abs() + (sh / 2.0 * cos).abs();
    let cx = top_center.0 as f64;
    let cy = top_center.1 as f64 + half_h;

    let y_lo = (cy - half_h).floor().max(0.0) as i64;
    let y_hi = ((cy + half_h).ceil() as i64).min(dst_size.1 as i64 - 1);
    let x_lo = (cx - half_w).floor().max(0.0) as i64;
    let x_hi = ((cx + half_w).ceil() as i64).min(dst_size.0 as i64 - 1);

    for dy in y_lo..=y_hi {
        for dx in x_lo..=x_hi {
            let ox = dx as f64 + 0.5 - cx;
            let oy = dy as f64 + 0.5 - cy;
            // Inverse of a counter-clockwise turn in y-down pixel space.
            let sx = ox * cos - oy * sin + sw / 2.0;
            let sy = ox * sin + oy * cos + sh / 2.0;
            if sx < 0.0 || sy < 0.0 || sx >= sw || sy >= sh {
                continue;
            }
            let si = (sy as usize * src_size.0 as usize + sx as usize) * 3;
            let di = (dy as usize * dst_size.0 as usize + dx as usize) * 3;
            for c in 0..3 {
                dst[di + c] = dst[di + c].min(src[si + c]);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Crop to the bounding box of non-white pixels grown by `pad` on each side.
/// A blank canvas is returned unchanged.
fn crop_to_content(image: &RgbImage, pad: u32) -> RgbImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in image.enumerate_pixels() {
        if px.0 == [255, 255, 255] {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return image.clone();
    };
    let x0 = x0.saturating_sub(pad);
    let y0 = y0.saturating_sub(pad);
    let x1 = (x1 + pad).min(image.width() - 1);
    let y1 = (y1 + pad).min(image.height() - 1);
    image::imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
}

fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>, ReportError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(with_physical_dpi(bytes, dpi))
}

/// Insert a `pHYs` chunk after IHDR so viewers pick up the resolution.
fn with_physical_dpi(png: Vec<u8>, dpi: u32) -> Vec<u8> {
    let split = PNG_SIGNATURE_LEN + IHDR_CHUNK_LEN;
    if png.len() < split || &png[12..16] != b"IHDR" {
        return png;
    }

    let pixels_per_meter = (dpi as f64 / 0.0254).round() as u32;
    let mut body = Vec::with_capacity(13);
    body.extend_from_slice(b"pHYs");
    body.extend_from_slice(&pixels_per_meter.to_be_bytes());
    body.extend_from_slice(&pixels_per_meter.to_be_bytes());
    body.push(1); // unit: metre
    let crc = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC).checksum(&body);

    let mut out = Vec::with_capacity(png.len() + 21);
    out.extend_from_slice(&png[..split]);
    out.extend_from_slice(&9u32.to_be_bytes());
    out.extend_from_slice(&body);
    out.extend_from_slice(&crc.to_be_bytes());
    out.extend_from_slice(&png[split..]);
    out
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "figure.png".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let tmp = temp_path(path);
    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = result {
        fs::remove_file(&tmp).ok();
        return Err(ReportError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
