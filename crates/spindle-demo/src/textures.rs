//! Procedural texture content for the cube.
//!
//! Both images are drawn with tiny-skia and handed to the engine as
//! premultiplied RGBA8, which is what a `Pixmap` stores.

use std::f32::consts::{FRAC_PI_2, PI};

use anyhow::{Context, Result};
use rand::Rng;
use spindle_engine::render::TextureImage;
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point,
    RadialGradient, SpreadMode, Stroke, Transform,
};

pub const IMAGE1_SIZE: u32 = 256;
pub const IMAGE2_SIZE: u32 = 128;

const STAR_COUNT: usize = 10;

/// Translucent white card with an emblem and scattered stars.
pub fn image1() -> Result<TextureImage> {
    image1_with(&mut rand::thread_rng())
}

/// Translucent dark red card with a gradient-filled star and scattered stars.
pub fn image2() -> Result<TextureImage> {
    image2_with(&mut rand::thread_rng())
}

fn image1_with(rng: &mut impl Rng) -> Result<TextureImage> {
    let size = IMAGE1_SIZE;
    let mut pixmap = new_pixmap(size)?;
    pixmap.fill(Color::from_rgba8(255, 255, 255, 178));

    let s = size as f32;
    let centre = s * 0.5;

    let disc = PathBuilder::from_circle(centre, centre, s * 0.4).context("emblem disc path")?;
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(s, s),
        vec![
            GradientStop::new(0.0, Color::from_rgba8(255, 140, 0, 255)),
            GradientStop::new(1.0, Color::from_rgba8(110, 40, 170, 255)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .context("emblem gradient")?;
    pixmap.fill_path(&disc, &paint, FillRule::Winding, Transform::identity(), None);

    let ring = PathBuilder::from_circle(centre, centre, s * 0.3).context("emblem ring path")?;
    let mut ring_paint = Paint::default();
    ring_paint.anti_alias = true;
    ring_paint.set_color_rgba8(255, 255, 255, 230);
    let stroke = Stroke {
        width: s * 0.04,
        ..Stroke::default()
    };
    pixmap.stroke_path(&ring, &ring_paint, &stroke, Transform::identity(), None);

    draw_random_stars(&mut pixmap, rng)?;
    into_texture(pixmap)
}

fn image2_with(rng: &mut impl Rng) -> Result<TextureImage> {
    let size = IMAGE2_SIZE;
    let mut pixmap = new_pixmap(size)?;
    pixmap.fill(Color::from_rgba8(139, 0, 0, 178));

    let s = size as f32;
    let centre = Point::from_xy(s * 0.5, s * 0.5);
    let star = star_path(centre, 11, s * 0.3, s * 0.5).context("centre star path")?;

    // Blue at the centre fading to green at the distance of (0.2, 0.2).
    let radius = (centre.x - s * 0.2).hypot(centre.y - s * 0.2);
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.shader = RadialGradient::new(
        centre,
        0.0,
        centre,
        radius,
        vec![
            GradientStop::new(0.0, Color::from_rgba8(0, 0, 255, 255)),
            GradientStop::new(1.0, Color::from_rgba8(0, 128, 0, 255)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .context("centre star gradient")?;
    pixmap.fill_path(&star, &paint, FillRule::Winding, Transform::identity(), None);

    draw_random_stars(&mut pixmap, rng)?;
    into_texture(pixmap)
}

/// Scatters small translucent pink stars with 3 to 10 points.
fn draw_random_stars(pixmap: &mut Pixmap, rng: &mut impl Rng) -> Result<()> {
    let (w, h) = (pixmap.width(), pixmap.height());

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color_rgba8(255, 192, 203, 102);

    for _ in 0..STAR_COUNT {
        let centre = Point::from_xy(rng.gen_range(0..w) as f32, rng.gen_range(0..h) as f32);
        let points = rng.gen_range(3..=10);
        let star = star_path(centre, points, 10.0, 20.0).context("star path")?;
        pixmap.fill_path(&star, &paint, FillRule::Winding, Transform::identity(), None);
    }
    Ok(())
}

/// Star polygon alternating between `outer` and `inner` radius, first point up.
fn star_path(centre: Point, points: u32, inner: f32, outer: f32) -> Option<Path> {
    if points < 2 {
        return None;
    }

    let step = PI / points as f32;
    let mut pb = PathBuilder::new();
    for i in 0..points * 2 {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = i as f32 * step - FRAC_PI_2;
        let (x, y) = (centre.x + r * angle.cos(), centre.y + r * angle.sin());
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.close();
    pb.finish()
}

fn new_pixmap(size: u32) -> Result<Pixmap> {
    Pixmap::new(size, size).with_context(|| format!("failed to allocate {size}x{size} pixmap"))
}

fn into_texture(pixmap: Pixmap) -> Result<TextureImage> {
    let (w, h) = (pixmap.width(), pixmap.height());
    TextureImage::from_premul_rgba(w, h, pixmap.take())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn images_have_fixed_sizes() {
        let a = image1().unwrap();
        let b = image2().unwrap();
        assert_eq!(a.size(), (256, 256));
        assert_eq!(b.size(), (128, 128));
        assert_eq!(a.pixels().len(), 256 * 256 * 4);
        assert_eq!(b.pixels().len(), 128 * 128 * 4);
    }

    #[test]
    fn image1_background_is_translucent_white() {
        let img = image1_with(&mut StdRng::seed_from_u64(7)).unwrap();
        // Corners sit outside the emblem disc.
        let px = img.pixel(0, 0).unwrap();
        assert!(px[3] < 255 && px[3] > 100, "alpha {}", px[3]);
        assert_eq!(px[0], px[3]);
    }

    #[test]
    fn image2_centre_is_opaque_blue() {
        let img = image2_with(&mut StdRng::seed_from_u64(7)).unwrap();
        let [r, g, b, a] = img.pixel(64, 64).unwrap();
        assert_eq!(a, 255);
        // Stray pink stars may overlap the centre; blue still dominates.
        assert!(b > r && b > g, "got {r},{g},{b}");
    }

    #[test]
    fn pixels_are_premultiplied() {
        let img = image2_with(&mut StdRng::seed_from_u64(1)).unwrap();
        for px in img.pixels().chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
    }

    #[test]
    fn star_path_needs_two_points() {
        assert!(star_path(Point::from_xy(0.0, 0.0), 1, 1.0, 2.0).is_none());
        assert!(star_path(Point::from_xy(0.0, 0.0), 5, 1.0, 2.0).is_some());
    }
}
