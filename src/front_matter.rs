pub const DELIMITER: &str = "---";

/// Drops a leading `---` metadata block and trims the rest.
///
/// The opening delimiter must be the first line; the block ends at the first
/// later line consisting solely of the delimiter. Without a closing line the
/// whole text is kept.
pub fn strip_front_matter(text: &str) -> &str {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return text.trim();
    };
    if first.trim_end_matches(['\r', '\n']) != DELIMITER {
        return text.trim();
    }

    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return text[offset..].trim();
        }
    }
    text.trim()
}
