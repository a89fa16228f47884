/// Name of the value-list constant for an attribute: pluralized, upper-cased.
/// `status` -> `STATUSES`, `locale` -> `LOCALES`, `category` -> `CATEGORIES`.
pub(crate) fn constant_name(attribute: &str) -> String {
    pluralize(attribute).to_uppercase()
}

fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        let preceded_by_vowel = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if !preceded_by_vowel {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}
