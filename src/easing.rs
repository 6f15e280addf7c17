/// Cubic ease-out: `b + c * (u³ - 3u² + 3u)` where `u = t / d`.
///
/// Starts at `b` with full slope and settles on `b + c` with zero slope, which
/// is what gives a spin its soft stop. Callers keep `t <= d`; a non-positive
/// `d` is treated as an already finished curve.
pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if d <= 0.0 {
        return b + c;
    }
    let u = t / d;
    let u2 = u * u;
    let u3 = u2 * u;
    b + c * (u3 - 3.0 * u2 + 3.0 * u)
}
