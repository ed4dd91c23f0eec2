//! Keyboard-layout transliteration.
//!
//! Maps characters typed with a Latin (QWERTY) layout active to the Cyrillic characters
//! on the same keys of the standard Russian (ЙЦУКЕН) layout. Used to retry a search when
//! the user forgot to switch layouts.

/// Latin key → Cyrillic character on the same key.
const LAYOUT: [(char, char); 64] = [
    ('q', 'й'),
    ('w', 'ц'),
    ('e', 'у'),
    ('r', 'к'),
    ('t', 'е'),
    ('y', 'н'),
    ('u', 'г'),
    ('i', 'ш'),
    ('o', 'щ'),
    ('p', 'з'),
    ('[', 'х'),
    (']', 'ъ'),
    ('a', 'ф'),
    ('s', 'ы'),
    ('d', 'в'),
    ('f', 'а'),
    ('g', 'п'),
    ('h', 'р'),
    ('j', 'о'),
    ('k', 'л'),
    ('l', 'д'),
    (';', 'ж'),
    ('\'', 'э'),
    ('z', 'я'),
    ('x', 'ч'),
    ('c', 'с'),
    ('v', 'м'),
    ('b', 'и'),
    ('n', 'т'),
    ('m', 'ь'),
    (',', 'б'),
    ('.', 'ю'),
    ('Q', 'Й'),
    ('W', 'Ц'),
    ('E', 'У'),
    ('R', 'К'),
    ('T', 'Е'),
    ('Y', 'Н'),
    ('U', 'Г'),
    ('I', 'Ш'),
    ('O', 'Щ'),
    ('P', 'З'),
    ('{', 'Х'),
    ('}', 'Ъ'),
    ('A', 'Ф'),
    ('S', 'Ы'),
    ('D', 'В'),
    ('F', 'А'),
    ('G', 'П'),
    ('H', 'Р'),
    ('J', 'О'),
    ('K', 'Л'),
    ('L', 'Д'),
    (':', 'Ж'),
    ('"', 'Э'),
    ('Z', 'Я'),
    ('X', 'Ч'),
    ('C', 'С'),
    ('V', 'М'),
    ('B', 'И'),
    ('N', 'Т'),
    ('M', 'Ь'),
    ('<', 'Б'),
    ('>', 'Ю'),
];

/// Returns the Cyrillic character on the same key as `ch`, if any.
pub fn map_key(ch: char) -> Option<char> {
    LAYOUT
        .iter()
        .find_map(|&(latin, cyrillic)| (latin == ch).then_some(cyrillic))
}

/// Transliterates text typed in the wrong layout.
///
/// Characters without a mapping (including spaces and digits) are dropped. The result is
/// trimmed.
pub fn transliterate(text: &str) -> String {
    let out: String = text.chars().filter_map(map_key).collect();
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate_greeting() {
        assert_eq!(transliterate("ghbdtn"), "привет");
    }

    #[test]
    fn test_transliterate_name_with_punctuation_keys() {
        // Names typed with a QWERTY layout active; `{` sits on the Х key.
        assert_eq!(transliterate("Bdfyjd"), "Иванов");
        assert_eq!(transliterate("Gmthj"), "Пьеро");
        assert_eq!(transliterate("{jkjlysq"), "Холодный");
    }

    #[test]
    fn test_transliterate_drops_unmapped() {
        assert_eq!(transliterate("ivan petrov"), "шмфтзуекщм");
        assert_eq!(transliterate("123 !?"), "");
        assert_eq!(transliterate("уже"), "");
    }

    #[test]
    fn test_layout_is_a_bijection() {
        let mut cyrillic: Vec<char> = LAYOUT.iter().map(|&(_, c)| c).collect();
        cyrillic.sort_unstable();
        cyrillic.dedup();
        assert_eq!(cyrillic.len(), LAYOUT.len());
        assert_eq!(map_key('x'), Some('ч'));
        assert_eq!(map_key('1'), None);
    }
}
