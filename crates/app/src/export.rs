//! PNG export of the ink surface

use std::path::Path;

use anyhow::{Context, Result};
use ballpoint_config::Viewport;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use ink::InkSurface;
use tracing::info;

use crate::cli::OutputArgs;

/// Display scale requested on the command line
pub fn viewport_for(args: &OutputArgs, width: u32, height: u32) -> Viewport {
    match args.window {
        Some((ww, wh)) => Viewport::fit(ww as f64, wh as f64, width, height, args.zoom),
        None => Viewport::fit(width as f64, height as f64, width, height, args.scale),
    }
}

/// Copy the surface into an image buffer, resampled by the viewport scale
pub fn to_image(surface: &InkSurface, viewport: &Viewport) -> Result<RgbaImage> {
    let image = RgbaImage::from_raw(surface.width, surface.height, surface.as_bytes().to_vec())
        .context("surface buffer does not match its extent")?;

    if (viewport.scale - 1.0).abs() < f64::EPSILON {
        return Ok(image);
    }
    let (w, h) = viewport.scaled_size(surface.width, surface.height);
    Ok(imageops::resize(&image, w, h, FilterType::Triangle))
}

pub fn write_png(surface: &InkSurface, args: &OutputArgs, path: &Path) -> Result<()> {
    let viewport = viewport_for(args, surface.width, surface.height);
    let image = to_image(surface, &viewport)?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(
        "wrote {} ({}x{}, scale {:.3})",
        path.display(),
        image.width(),
        image.height(),
        viewport.scale
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink::Rgb;
    use std::path::PathBuf;

    fn args(scale: f64, window: Option<(u32, u32)>) -> OutputArgs {
        OutputArgs {
            output: PathBuf::from("out.png"),
            scale,
            window,
            zoom: 1.0,
        }
    }

    #[test]
    fn test_unscaled_export_copies_pixels() {
        let surface = InkSurface::new(4, 3, Rgb::new(240, 235, 219));
        let image = to_image(&surface, &viewport_for(&args(1.0, None), 4, 3)).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(3, 2).0, [240, 235, 219, 255]);
    }

    #[test]
    fn test_scaled_export() {
        let surface = InkSurface::new(80, 40, Rgb::new(255, 255, 255));
        let image = to_image(&surface, &viewport_for(&args(0.5, None), 80, 40)).unwrap();
        assert_eq!(image.dimensions(), (40, 20));
    }

    #[test]
    fn test_window_fit() {
        let viewport = viewport_for(&args(1.0, Some((400, 100))), 800, 800);
        assert!((viewport.scale - 0.125).abs() < 1e-12);
    }
}
