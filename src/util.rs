/// Strips the braces and quotes of a Postgres text-array literal so keywords
/// read as a plain comma list.
pub fn clean_keywords(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '{' | '}' | '"' | '\''))
        .collect()
}

pub fn short_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut shortened = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    shortened.push('…');
    shortened
}
