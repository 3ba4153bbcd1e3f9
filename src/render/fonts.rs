//! Font discovery for chart text.
//!
//! Plotters is built with the `ab_glyph` text engine, which rasterizes glyphs
//! from font bytes we hand it instead of querying fontconfig. We look for a
//! font in this order:
//!
//! 1. the `--font` path, if given (failure here is a usage error)
//! 2. a short list of well-known system locations
//! 3. DejaVu Sans, compiled into the binary (`assets/`)

use std::fs;
use std::path::{Path, PathBuf};

use plotters::style::{FontStyle, register_font};
use tracing::debug;

use crate::error::AppError;

/// Family name every text element in the chart asks for.
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_REGULAR: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const SYSTEM_BOLD: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

static BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

/// Where the registered chart font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Explicit(PathBuf),
    System(PathBuf),
    Bundled,
}

impl std::fmt::Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSource::Explicit(path) | FontSource::System(path) => write!(f, "{}", path.display()),
            FontSource::Bundled => write!(f, "bundled DejaVu Sans"),
        }
    }
}

/// Locate and register fonts for [`FONT_FAMILY`].
pub fn install_fonts(explicit: Option<&Path>) -> Result<FontSource, AppError> {
    if let Some(path) = explicit {
        let bytes = read_font(path)
            .map_err(|e| AppError::usage(format!("Failed to read font '{}': {e}", path.display())))?;
        register(FontStyle::Normal, bytes)
            .map_err(|e| AppError::usage(format!("Invalid font '{}': {e}", path.display())))?;
        register(FontStyle::Bold, bytes)
            .map_err(|e| AppError::usage(format!("Invalid font '{}': {e}", path.display())))?;
        debug!(font = %path.display(), "using explicit font");
        return Ok(FontSource::Explicit(path.to_path_buf()));
    }

    let Some((regular, bytes)) = first_registered(SYSTEM_REGULAR, FontStyle::Normal) else {
        debug!("no usable system font found");
        return install_bundled();
    };

    if first_registered(SYSTEM_BOLD, FontStyle::Bold).is_none() {
        // Bold text falls back to the regular face.
        let _ = register(FontStyle::Bold, bytes);
    }

    debug!(font = %regular.display(), "using system font");
    Ok(FontSource::System(regular))
}

/// Register the fonts compiled into the binary.
pub fn install_bundled() -> Result<FontSource, AppError> {
    register(FontStyle::Normal, BUNDLED_REGULAR)
        .and_then(|()| register(FontStyle::Bold, BUNDLED_BOLD))
        .map_err(|e| AppError::render(format!("Bundled font rejected: {e}")))?;
    debug!("using bundled font");
    Ok(FontSource::Bundled)
}

fn first_registered(candidates: &[&str], style: FontStyle) -> Option<(PathBuf, &'static [u8])> {
    candidates.iter().map(Path::new).find_map(|path| {
        let bytes = read_font(path).ok()?;
        match register(style, bytes) {
            Ok(()) => Some((path.to_path_buf(), bytes)),
            Err(e) => {
                debug!(font = %path.display(), error = %e, "skipping unusable font");
                None
            }
        }
    })
}

/// Font bytes live for the rest of the process: the text engine keeps
/// `'static` references to them.
fn read_font(path: &Path) -> std::io::Result<&'static [u8]> {
    let bytes = fs::read(path)?;
    Ok(Box::leak(bytes.into_boxed_slice()))
}

fn register(style: FontStyle, bytes: &'static [u8]) -> Result<(), String> {
    register_font(FONT_FAMILY, style, bytes).map_err(|_| "not a valid TrueType/OpenType font".to_string())
}
