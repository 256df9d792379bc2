use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print rows under `headers`, columns padded to their widest cell.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(String::len)
                .fold(h.len(), usize::max)
        })
        .collect();

    print_row(headers, &widths);
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&sep.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
    for row in rows {
        print_row(&row.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
    }
}

fn print_row(cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{c:w$}"))
        .collect();
    println!("{}", padded.join("  ").trim_end());
}

/// Seconds as a compact human duration: `45s`, `3m05s`, `1h02m`.
pub fn format_secs(secs: f64) -> String {
    let total = secs.round().max(0.0) as u64;
    match total {
        0..=59 => format!("{total}s"),
        60..=3599 => format!("{}m{:02}s", total / 60, total % 60),
        _ => format!("{}h{:02}m", total / 3600, (total % 3600) / 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(format_secs(0.4), "0s");
        assert_eq!(format_secs(45.0), "45s");
        assert_eq!(format_secs(185.0), "3m05s");
        assert_eq!(format_secs(3720.0), "1h02m");
    }
}
