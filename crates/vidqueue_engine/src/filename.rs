use vidqueue_core::JobId;

const MAX_NAME_BYTES: usize = 200;

/// Turn a processor-reported filename into a single safe directory entry.
///
/// Separators, control characters and Windows-forbidden characters become
/// `_`; leading/trailing dots and spaces are dropped so the name can never be
/// `.` or `..`. Falls back to `artifact-{job_id}` when nothing is left.
pub fn safe_entry_name(raw: &str, job_id: JobId) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse runs of underscores left by replaced characters.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    if compacted.is_empty() {
        return format!("artifact-{job_id}");
    }

    let mut name = truncate_keeping_extension(&compacted, MAX_NAME_BYTES);
    if is_reserved_windows_name(stem(&name)) {
        name.insert(0, '_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' | '\u{7F}'
    )
}

fn stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn truncate_keeping_extension(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < 16 && !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let budget = max_bytes - ext.map_or(0, |ext| ext.len() + 1);
    let mut cut = budget.min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    match ext {
        Some(ext) => format!("{}.{}", &stem[..cut], ext),
        None => stem[..cut].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(safe_entry_name("My_Video-1080p.mp4", 1), "My_Video-1080p.mp4");
        assert_eq!(safe_entry_name("Ünïcode clip.webm", 1), "Ünïcode clip.webm");
    }

    #[test]
    fn traversal_is_neutralized() {
        assert_eq!(safe_entry_name("../../etc/passwd", 4), "etc_passwd");
        assert_eq!(safe_entry_name("..", 5), "artifact-5");
        assert_eq!(safe_entry_name("C:\\temp\\x.mp4", 6), "C_temp_x.mp4");
    }

    #[test]
    fn reserved_device_names_are_prefixed() {
        assert_eq!(safe_entry_name("con.mp4", 1), "_con.mp4");
        assert_eq!(safe_entry_name("console.mp4", 1), "console.mp4");
    }

    #[test]
    fn long_names_keep_extension() {
        let long = format!("{}.mp4", "é".repeat(150));
        let safe = safe_entry_name(&long, 1);
        assert!(safe.len() <= MAX_NAME_BYTES);
        assert!(safe.ends_with(".mp4"));
    }
}
