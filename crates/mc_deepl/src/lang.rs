/// Maps a catalog locale column (`de_DE`, `fr`, `pt-BR`) to a DeepL `target_lang`.
///
/// Region suffixes written with `_` are dropped; hyphenated codes are kept
/// as DeepL variants.
pub fn target_lang_for_locale(locale: &str) -> String {
    let locale = locale.trim();
    let base = match locale.split_once('_') {
        Some((prefix, _)) => prefix,
        None => locale,
    };
    base.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_lang_001_region_suffix_dropped() {
        assert_eq!(target_lang_for_locale("de_DE"), "DE");
        assert_eq!(target_lang_for_locale("en_US"), "EN");
    }

    #[test]
    fn t_lang_002_plain_and_hyphenated_codes() {
        assert_eq!(target_lang_for_locale("fr"), "FR");
        assert_eq!(target_lang_for_locale(" it "), "IT");
        assert_eq!(target_lang_for_locale("pt-BR"), "PT-BR");
    }
}
