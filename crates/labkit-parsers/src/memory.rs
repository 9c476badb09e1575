//! Byte count rendering.

/// Unit prefixes used by [`byte_num_repr`].
const REPR_UNITS: [char; 3] = ['K', 'M', 'G'];

/// Unit prefixes used by [`human_size`].
const SIZE_UNITS: [&str; 5] = ["", "K", "M", "G", "T"];

/// Render a byte count for memory reports.
///
/// Counts below 1024 print as plain bytes (`"512 B"`). Larger counts use the
/// first of KiB, MiB, GiB whose next unit is still more than 1.25x away, i.e.
/// a unit is kept until the value reaches 0.8 of the next unit's threshold.
/// GiB is the largest unit. Scaled values have one decimal (`"1.5 KB"`).
pub fn byte_num_repr(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let value = bytes as f64;
    let mut unit = 0;
    while unit < REPR_UNITS.len() - 1 {
        if value < 0.8 * 1024f64.powi(unit as i32 + 2) {
            break;
        }
        unit += 1;
    }

    let scaled = value / 1024f64.powi(unit as i32 + 1);
    format!("{:.1} {}B", scaled, REPR_UNITS[unit])
}

/// Render a size with the default limit (0.9) and base (1024).
pub fn human_size(value: u64) -> String {
    human_size_with(value, "B", 0.9, 1024)
}

/// Render a size, escalating to the next unit while `value * limit` exceeds it.
///
/// Unscaled values print as integers, scaled ones with two decimals.
pub fn human_size_with(value: u64, postfix: &str, limit: f64, base: u64) -> String {
    let value = value as f64;
    let base = base as f64;
    let mut divisor = 1.0;
    let mut unit = 0;
    while unit < SIZE_UNITS.len() - 1 && value * limit > divisor * base {
        divisor *= base;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}{}", value as u64, SIZE_UNITS[unit], postfix)
    } else {
        format!("{:.2} {}{}", value / divisor, SIZE_UNITS[unit], postfix)
    }
}
