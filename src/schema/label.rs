use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("word pattern should be valid"));

/// Turn a record key into a column heading: underscores become spaces and
/// the first letter of every word is upper-cased (`gross_weight` ->
/// `Gross Weight`). The rest of each word is left untouched.
pub fn header_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    WORD.replace_all(&spaced, |caps: &regex::Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_snake_case() {
        assert_eq!(header_label("package_no"), "Package No");
        assert_eq!(header_label("gross_weight"), "Gross Weight");
        assert_eq!(header_label("item_name"), "Item Name");
        assert_eq!(header_label("volume"), "Volume");
    }

    #[test]
    fn keeps_inner_case_and_punctuation() {
        assert_eq!(header_label("hsCode"), "HsCode");
        assert_eq!(header_label("net-weight (kg)"), "Net-Weight (Kg)");
        assert_eq!(header_label("__lead"), "  Lead");
        assert_eq!(header_label("2nd_line"), "2nd Line");
        assert_eq!(header_label(""), "");
    }
}
