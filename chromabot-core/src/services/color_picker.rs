//! Picks the next palette color, never repeating the current one.

use rand::Rng;

use chromabot_common::models::Color;

/// Draws a uniformly random index into `colors` that differs from `current`.
///
/// Equivalent to redrawing until the index changes, but takes exactly one
/// draw: the candidate range skips over `current`. An out-of-range `current`
/// excludes nothing.
///
/// * empty slice ⇒ `None`
/// * one color ⇒ `Some((0, that color))`, the only possible answer
pub fn pick_next<'a, R>(colors: &'a [Color], current: usize, rng: &mut R) -> Option<(usize, &'a Color)>
where
    R: Rng,
{
    let index = match colors.len() {
        0 => return None,
        1 => 0,
        len if current < len => {
            let candidate = rng.random_range(0..len - 1);
            if candidate >= current { candidate + 1 } else { candidate }
        }
        len => rng.random_range(0..len),
    };
    Some((index, &colors[index]))
}
