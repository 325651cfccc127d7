//! Placeholder metadata shown before a cover image loads

/// Palette cycled through by gallery number
pub const PLACEHOLDER_COLORS: [&str; 6] = [
    "#3b82f6", "#8b5cf6", "#10b981", "#f59e0b", "#ef4444", "#ec4899",
];

/// Picks a palette colour from the number in a `gallery-N` id.
///
/// Ids without a leading number map to the first colour. The modulus is
/// taken digit by digit so timestamp ids of any length are handled.
pub fn color_for_id(id: &str) -> &'static str {
    let digits = id.replacen("gallery-", "", 1);
    let modulus = PLACEHOLDER_COLORS.len() as u32;
    let index = digits
        .trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, d| (acc * 10 + d) % modulus);
    PLACEHOLDER_COLORS[index as usize]
}

/// Short label for a gallery name
pub fn initials(name: &str) -> String {
    if name.is_empty() {
        return "?".to_string();
    }

    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= 3 {
        return name.to_string();
    }

    if chars.iter().any(|c| is_cjk(*c)) {
        return chars[..2].iter().collect();
    }

    let words: Vec<&str> = name
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() >= 2 {
        return words[..2]
            .iter()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
    }

    chars[..2].iter().flat_map(|c| c.to_uppercase()).collect()
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles_by_number() {
        assert_eq!(color_for_id("gallery-0"), PLACEHOLDER_COLORS[0]);
        assert_eq!(color_for_id("gallery-1"), PLACEHOLDER_COLORS[1]);
        assert_eq!(color_for_id("gallery-7"), PLACEHOLDER_COLORS[1]);
    }

    #[test]
    fn test_color_for_timestamp_id() {
        // 1700000000000 % 6 == 2
        assert_eq!(color_for_id("gallery-1700000000000"), PLACEHOLDER_COLORS[2]);
    }

    #[test]
    fn test_color_for_non_numeric_id() {
        assert_eq!(color_for_id("custom"), PLACEHOLDER_COLORS[0]);
        assert_eq!(color_for_id(""), PLACEHOLDER_COLORS[0]);
    }

    #[test]
    fn test_initials_short_names_verbatim() {
        assert_eq!(initials(""), "?");
        assert_eq!(initials("ab"), "ab");
        assert_eq!(initials("Cat"), "Cat");
    }

    #[test]
    fn test_initials_cjk() {
        assert_eq!(initials("夏日海灘旅行"), "夏日");
    }

    #[test]
    fn test_initials_multi_word() {
        assert_eq!(initials("summer trip"), "ST");
        assert_eq!(initials("night_city-lights"), "NC");
    }

    #[test]
    fn test_initials_single_word() {
        assert_eq!(initials("landscapes"), "LA");
    }
}
