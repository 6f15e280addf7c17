/// Saturation/lightness shared by every slice, in percent.
pub const SLICE_SATURATION: f64 = 100.0;
pub const SLICE_LIGHTNESS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue in degrees for slice `index` of `total`. Evenly spaced around the
/// color wheel, with slice zero at red.
pub fn hue(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    index as f64 * 360.0 / total as f64
}

/// CSS-style color string for slice `index`, e.g. `hsl(90, 100%, 50%)`.
pub fn css(index: usize, total: usize) -> String {
    format!(
        "hsl({}, {}%, {}%)",
        hue(index, total),
        SLICE_SATURATION,
        SLICE_LIGHTNESS
    )
}

pub fn slice_color(index: usize, total: usize) -> Rgb {
    hsl_to_rgb(
        hue(index, total),
        SLICE_SATURATION / 100.0,
        SLICE_LIGHTNESS / 100.0,
    )
}

/// `h` in degrees (any value, wrapped), `s` and `l` in [0, 1].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r1), channel(g1), channel(b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_even_spacing() {
        for total in 1..=24 {
            for i in 0..total {
                let next = hue((i + 1) % total, total);
                let step = (next - hue(i, total)).rem_euclid(360.0);
                let expected = (360.0 / total as f64).rem_euclid(360.0);
                assert!((step - expected).abs() < 1e-9, "n={total} i={i}");
            }
        }
    }

    #[test]
    fn test_hue_is_deterministic() {
        assert_eq!(hue(3, 7), hue(3, 7));
        assert_eq!(css(1, 4), "hsl(90, 100%, 50%)");
        assert_eq!(css(0, 3), "hsl(0, 100%, 50%)");
    }

    #[test]
    fn test_hue_zero_total() {
        assert_eq!(hue(0, 0), 0.0);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(60.0, 1.0, 0.5), Rgb::new(255, 255, 0));
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_hsl_grey_and_extremes() {
        assert_eq!(hsl_to_rgb(200.0, 0.0, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(hsl_to_rgb(10.0, 1.0, 1.0), Rgb::WHITE);
        assert_eq!(hsl_to_rgb(10.0, 1.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn test_slice_color_matches_hue() {
        assert_eq!(slice_color(0, 4), Rgb::new(255, 0, 0));
        assert_eq!(slice_color(2, 6), Rgb::new(0, 255, 0));
    }
}
