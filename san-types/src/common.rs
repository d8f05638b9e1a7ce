//! Capacity formatting shared by plan summaries and the console

use anyhow::Result;
use num_format::{Locale, ToFormattedString};

const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Convert bytes to human-readable format (e.g., "1.50 GB")
pub fn bytes_to_pretty(bytes: &u64, add_bytes: bool) -> String {
    let mut steps = 0;
    let mut val: f64 = *bytes as f64;

    while val > 1024. && steps < UNITS.len() - 1 {
        val /= 1024.;
        steps += 1;
    }

    let unit = UNITS[steps];

    if add_bytes {
        let bytes_str = bytes.to_formatted_string(&Locale::en);
        format!("{:.2} {} ({} bytes)", val, unit, bytes_str)
    } else {
        format!("{:.2} {}", val, unit)
    }
}

/// Parse a capacity such as "16 GB", "1.5 TB" or a plain byte count.
pub fn pretty_to_bytes(pretty: &str) -> Result<u64> {
    let split = pretty.split_whitespace().collect::<Vec<&str>>();
    let string_value = split
        .first()
        .ok_or_else(|| anyhow::anyhow!("Invalid input"))?;

    if split.len() == 1 {
        return Ok(string_value.parse()?);
    }

    let mut val: f64 = string_value.parse()?;
    let unit = *split
        .last()
        .ok_or_else(|| anyhow::anyhow!("Invalid input"))?;

    let steps = UNITS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(unit))
        .ok_or_else(|| anyhow::anyhow!("Invalid unit: {}", unit))?;

    for _ in 0..steps {
        val *= 1024.;
    }

    if !val.is_finite() || val < 0. {
        anyhow::bail!("Capacity out of range: {}", pretty);
    }

    Ok(val as u64)
}
