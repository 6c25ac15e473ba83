const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];

/// Human readable size for listings, 1024 based with one decimal above bytes.
pub fn format_size(size: u64) -> String {
    let mut unit = 0;
    let mut scaled = size as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{size}B")
    } else {
        format!("{scaled:.1}{}", UNITS[unit])
    }
}
