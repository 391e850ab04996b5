// SPDX-License-Identifier: GPL-3.0-or-later
// src/cli.rs
//
// Headless host: replay edit operations on an image and save the export.
//
//   exhibit photo.jpg -o out.jpg --op "pixelate 40,60,120,30" --op rotate
//   exhibit photo.jpg --data-url --op "arrow 10,10,200,150" --op "text 20,40,Exhibit 3"

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use kurbo::Point;

use exhibit::app::{CommitOutcome, Editor, EditorHost, EditorMessage, FixedPrompt, ToolId};
use exhibit::config::AppConfig;
use exhibit::domain::document::EncodedImage;
use exhibit::domain::document::operations::AdjustmentKind;
use exhibit::domain::metadata::read_capture_metadata;
use exhibit::domain::view::Viewport;

/// Viewport used to route pointer input when no fit box is given.
const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 800.0);

/// Annotate and redact an evidence photo without a GUI.
#[derive(Parser, Debug)]
#[command(name = "exhibit", version, about)]
pub struct CliArgs {
    /// Source image.
    pub input: PathBuf,

    /// Where to write the exported JPEG.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Edit operation, applied in order. Repeatable.
    ///
    /// arrow X0,Y0,X1,Y1 | text X,Y,LABEL | pixelate X,Y,W,H | crop X,Y,W,H |
    /// rotate | flip-h | flip-v | brightness N | contrast N | saturation N |
    /// exposure N | thickness N | block N | color #RRGGBB | zoom DELTA | undo
    #[arg(long = "op", value_name = "OP")]
    pub ops: Vec<Op>,

    /// Config file (defaults to the user config directory).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Device pixel ratio.
    #[arg(long)]
    pub dpr: Option<f64>,

    /// Fit the image into a WxH box.
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub fit: Option<(u32, u32)>,

    /// TrueType/OpenType font for text stamps.
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// JPEG quality (1-100).
    #[arg(short, long, value_name = "1-100")]
    pub quality: Option<u8>,

    /// Print capture timestamp and GPS position.
    #[arg(long)]
    pub metadata: bool,

    /// Print the export as a data URL instead of writing a file.
    #[arg(long)]
    pub data_url: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

/// One replayable edit, in logical coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Arrow(Point, Point),
    Text(Point, String),
    Pixelate(Point, Point),
    Crop(Point, Point),
    Rotate,
    FlipH,
    FlipV,
    Adjust(AdjustmentKind, u8),
    Thickness(u32),
    Block(u32),
    Color(String),
    Zoom(f64),
    Undo,
}

fn numbers<const N: usize>(text: &str) -> Result<[f64; N], String> {
    let values: Vec<f64> = text
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<_, _>>()?;
    values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected {N} numbers, got {}", v.len()))
}

fn rect_points(text: &str) -> Result<(Point, Point), String> {
    let [x, y, w, h] = numbers::<4>(text)?;
    Ok((Point::new(x, y), Point::new(x + w, y + h)))
}

impl FromStr for Op {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (name, rest) = text.split_once(' ').unwrap_or((text, ""));
        let rest = rest.trim();
        let int = || rest.parse::<u32>().map_err(|e| format!("{name}: {e}"));
        let level = || rest.parse::<u8>().map_err(|e| format!("{name}: {e}"));

        match name {
            "arrow" => {
                let [x0, y0, x1, y1] = numbers::<4>(rest)?;
                Ok(Op::Arrow(Point::new(x0, y0), Point::new(x1, y1)))
            }
            "text" => {
                let mut parts = rest.splitn(3, ',');
                let (Some(x), Some(y), Some(label)) = (parts.next(), parts.next(), parts.next()) else {
                    return Err("text: expected X,Y,LABEL".to_string());
                };
                let [x, y] = numbers::<2>(&format!("{x},{y}"))?;
                Ok(Op::Text(Point::new(x, y), label.to_string()))
            }
            "pixelate" => rect_points(rest).map(|(a, b)| Op::Pixelate(a, b)),
            "crop" => rect_points(rest).map(|(a, b)| Op::Crop(a, b)),
            "rotate" => Ok(Op::Rotate),
            "flip-h" => Ok(Op::FlipH),
            "flip-v" => Ok(Op::FlipV),
            "brightness" => Ok(Op::Adjust(AdjustmentKind::Brightness, level()?)),
            "contrast" => Ok(Op::Adjust(AdjustmentKind::Contrast, level()?)),
            "saturation" => Ok(Op::Adjust(AdjustmentKind::Saturation, level()?)),
            "exposure" => Ok(Op::Adjust(AdjustmentKind::Exposure, level()?)),
            "thickness" => Ok(Op::Thickness(int()?)),
            "block" => Ok(Op::Block(int()?)),
            "color" => Ok(Op::Color(rest.to_string())),
            "zoom" => rest
                .parse::<f64>()
                .map(Op::Zoom)
                .map_err(|e| format!("zoom: {e}")),
            "undo" => Ok(Op::Undo),
            other => Err(format!("unknown operation {other:?}")),
        }
    }
}

fn parse_size(text: &str) -> Result<(u32, u32), String> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {text:?}"))?;
    let w = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 {
        return Err("size must be non-zero".to_string());
    }
    Ok((w, h))
}

fn load_config(args: &CliArgs) -> anyhow::Result<AppConfig> {
    let mut config = match args.config.clone().or_else(AppConfig::default_path) {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };
    if let Some(dpr) = args.dpr {
        config.device_pixel_ratio = dpr;
    }
    if let Some((w, h)) = args.fit {
        config.fit_width = Some(w);
        config.fit_height = Some(h);
    }
    if let Some(font) = &args.font {
        config.font_path = Some(font.clone());
    }
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality;
    }
    Ok(config.sanitized())
}

/// Drive a stroke through the viewport so mapping and tool state are used
/// exactly as for live pointer input.
fn stroke(editor: &mut Editor, tool: ToolId, start: Point, end: Point) -> CommitOutcome {
    editor.update(EditorMessage::SelectTool(tool));
    let (Some(a), Some(b)) = (editor.to_viewport(start), editor.to_viewport(end)) else {
        return CommitOutcome::Ignored;
    };
    editor.update(EditorMessage::PointerDown { x: a.x, y: a.y });
    editor.update(EditorMessage::PointerMove { x: b.x, y: b.y });
    editor.update(EditorMessage::PointerUp { x: b.x, y: b.y })
}

async fn apply(editor: &mut Editor, op: &Op) -> CommitOutcome {
    match op {
        Op::Arrow(a, b) => stroke(editor, ToolId::Arrow, *a, *b),
        Op::Pixelate(a, b) => stroke(editor, ToolId::Pixelate, *a, *b),
        Op::Crop(a, b) => stroke(editor, ToolId::Crop, *a, *b),
        Op::Text(at, label) => match stroke(editor, ToolId::Text, *at, *at) {
            CommitOutcome::TextRequested(_) => editor.resolve_text(&FixedPrompt::new(label.clone())).await,
            other => other,
        },
        Op::Rotate => editor.update(EditorMessage::RotateCw),
        Op::FlipH => editor.update(EditorMessage::FlipHorizontal),
        Op::FlipV => editor.update(EditorMessage::FlipVertical),
        Op::Adjust(kind, value) => editor.update(EditorMessage::SetAdjustment(*kind, *value)),
        Op::Thickness(value) => editor.update(EditorMessage::SetThickness(*value)),
        Op::Block(value) => editor.update(EditorMessage::SetBlockSize(*value)),
        Op::Color(hex) => editor.update(EditorMessage::SetColor(hex.clone())),
        Op::Zoom(delta) => editor.update(EditorMessage::ZoomBy(*delta)),
        Op::Undo => editor.update(EditorMessage::Undo),
    }
}

#[derive(Default)]
struct Capture {
    image: Option<EncodedImage>,
}

impl EditorHost for Capture {
    fn on_save(&mut self, image: EncodedImage) {
        self.image = Some(image);
    }

    fn on_cancel(&mut self) {}
}

/// Run the headless editor.
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.output.is_none() && !args.data_url {
        bail!("nothing to do: pass --output FILE or --data-url");
    }
    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    if args.metadata {
        let meta = read_capture_metadata(&bytes);
        println!(
            "captured: {}",
            meta.capture_timestamp.as_deref().unwrap_or("unknown")
        );
        match meta.gps {
            Some(gps) => println!("gps: {:.6}, {:.6}", gps.lat, gps.lng),
            None => println!("gps: unknown"),
        }
    }

    let config = load_config(&args)?;
    let (vw, vh) = config
        .fit_box()
        .map_or(DEFAULT_VIEWPORT, |(w, h)| (f64::from(w), f64::from(h)));
    let mut editor = Editor::new(config, Viewport::new(vw, vh));
    editor.open(bytes).await?;

    for op in &args.ops {
        let outcome = apply(&mut editor, op).await;
        log::info!("{op:?}: {outcome:?}");
    }

    let mut capture = Capture::default();
    editor.save(&mut capture)?;
    let image = capture
        .image
        .context("Editor finished without producing an image")?;

    if args.data_url {
        println!("{}", image.to_data_url());
    }
    if let Some(output) = &args.output {
        tokio::fs::write(output, &image.bytes)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        log::info!("Wrote {} ({} bytes)", output.display(), image.bytes.len());
    }
    Ok(())
}
