//! String predicates shared by the parser passes.

/// Hyphen and the Unicode dash family.
pub const DASHES: &[char] = &[
    '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}',
];

/// Byte offset of the first ASCII digit.
pub fn find_number_in_string(s: &str) -> Option<usize> {
    s.find(|c: char| c.is_ascii_digit())
}

/// Byte offset of the first character that is not an ASCII digit.
pub fn find_non_number_in_string(s: &str) -> Option<usize> {
    s.find(|c: char| !c.is_ascii_digit())
}

pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_hexadecimal(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Eight hex digits, the usual embedded checksum.
pub fn is_crc32(s: &str) -> bool {
    s.len() == 8 && is_hexadecimal(s)
}

pub fn is_dash(c: char) -> bool {
    DASHES.contains(&c)
}

/// Exactly one dash character.
pub fn is_dash_character(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_dash(c))
}

/// Season number spelled as an ordinal ("2nd", "Third").
pub fn number_from_ordinal(s: &str) -> Option<&'static str> {
    const ORDINALS: [(&str, &str, &str); 9] = [
        ("1st", "first", "1"),
        ("2nd", "second", "2"),
        ("3rd", "third", "3"),
        ("4th", "fourth", "4"),
        ("5th", "fifth", "5"),
        ("6th", "sixth", "6"),
        ("7th", "seventh", "7"),
        ("8th", "eighth", "8"),
        ("9th", "ninth", "9"),
    ];
    ORDINALS
        .iter()
        .find(|(short, long, _)| s.eq_ignore_ascii_case(short) || s.eq_ignore_ascii_case(long))
        .map(|(_, _, number)| *number)
}

fn is_latin_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{024F}'
        | '\u{0250}'..='\u{02AF}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{2C60}'..='\u{2C7F}'
        | '\u{A720}'..='\u{A7FF}'
        | '\u{FF21}'..='\u{FF3A}'
        | '\u{FF41}'..='\u{FF5A}')
}

/// At least half of the characters are Latin letters.
pub fn is_mostly_latin_string(s: &str) -> bool {
    let total = s.chars().count();
    if total == 0 {
        return false;
    }
    let latin = s.chars().filter(|&c| is_latin_char(c)).count();
    latin * 2 >= total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_positions() {
        assert_eq!(find_number_in_string("EP01"), Some(2));
        assert_eq!(find_number_in_string("Title"), None);
        assert_eq!(find_non_number_in_string("12a"), Some(2));
        assert_eq!(find_non_number_in_string("123"), None);
    }

    #[test]
    fn checksum_shape() {
        assert!(is_crc32("650B731B"));
        assert!(is_crc32("ba70ba9c"));
        assert!(!is_crc32("650B731"));
        assert!(!is_crc32("650B731G"));
    }

    #[test]
    fn dashes() {
        assert!(is_dash_character("-"));
        assert!(is_dash_character("\u{2014}"));
        assert!(!is_dash_character("--"));
        assert!(!is_dash_character(""));
    }

    #[test]
    fn ordinals() {
        assert_eq!(number_from_ordinal("2nd"), Some("2"));
        assert_eq!(number_from_ordinal("Third"), Some("3"));
        assert_eq!(number_from_ordinal("tenth"), None);
    }

    #[test]
    fn latin_ratio() {
        assert!(is_mostly_latin_string("Kiddy Grade"));
        assert!(is_mostly_latin_string("Pokémon"));
        assert!(!is_mostly_latin_string("魔法少女"));
        assert!(!is_mostly_latin_string(""));
    }
}
