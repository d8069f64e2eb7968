//! Text and price normalization for extracted values

use std::sync::LazyLock;

use regex::Regex;

/// Longest description kept, in characters
pub const DESCRIPTION_LIMIT: usize = 500;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d.,]*").unwrap());
/// Like [`NUMBER`], but digit groups may also be split by a space, NBSP or
/// narrow NBSP ("1 299,00 €")
static GROUPED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:[\d.,]|[ \x{a0}\x{202f}]\d)*").unwrap());

const SPACE_SEPARATORS: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

/// Strips markup, decodes entities and collapses whitespace.
///
/// Repeats until nothing changes, so encoded markup such as `&lt;b&gt;` is
/// removed as well and a second call is always a no-op.
pub fn clean_text(input: &str) -> String {
    // A pass never grows the string, so this settles.
    let mut current = input.to_string();
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(input: &str) -> String {
    let stripped = TAG.replace_all(input, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

/// [`clean_text`] capped at [`DESCRIPTION_LIMIT`] characters
pub fn clean_description(input: &str) -> String {
    truncate_chars(&clean_text(input), DESCRIPTION_LIMIT)
}

/// Cuts on a character boundary so multi-byte scripts survive intact
pub fn truncate_chars(input: &str, limit: usize) -> String {
    match input.char_indices().nth(limit) {
        Some((cut, _)) => input[..cut].trim_end().to_string(),
        None => input.to_string(),
    }
}

/// Parses the first number in a price label, ignoring currency symbols and
/// thousands separators. Zero and negative amounts count as absent.
pub fn parse_price(text: &str) -> Option<f64> {
    let token = GROUPED_NUMBER
        .find(text)?
        .as_str()
        .trim_end_matches(['.', ','])
        .replace(SPACE_SEPARATORS, "");
    let token = token.as_str();

    let normalized = match (token.rfind('.'), token.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => token.replace(',', ""),
        (Some(_), Some(_)) => token.replace('.', "").replace(',', "."),
        (None, Some(comma)) => {
            let decimals = token.len() - comma - 1;
            if token.matches(',').count() == 1 && decimals <= 2 {
                token.replace(',', ".")
            } else {
                token.replace(',', "")
            }
        }
        (Some(_), None) if token.matches('.').count() > 1 => token.replace('.', ""),
        _ => token.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .map(round_price)
}

/// Rounds to cents
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reads a star rating, accepting only values on a 0-5 scale
pub fn parse_rating(text: &str) -> Option<f64> {
    let token = NUMBER.find(text)?.as_str().trim_end_matches(['.', ',']);
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| (0.0..=5.0).contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_entities_and_whitespace() {
        assert_eq!(
            clean_text("  <b>Noise&nbsp;Cancelling</b>\n\t Headphones &amp; Case "),
            "Noise Cancelling Headphones & Case"
        );
        assert_eq!(clean_text("<li>one</li><li>two</li>"), "one two");
    }

    #[test]
    fn clean_text_is_stable() {
        let clean = "Wireless Earbuds, 40h battery";
        assert_eq!(clean_text(clean), clean);

        let dirty = "&lt;p&gt;Sale&lt;/p&gt; <span>50%&amp;amp; off</span>";
        let once = clean_text(dirty);
        assert_eq!(clean_text(&once), once);
        assert_eq!(once, "Sale 50%& off");
    }

    #[test]
    fn deeply_encoded_markup_settles_in_one_call() {
        let mut nested = "<b>x</b>".to_string();
        for _ in 0..10 {
            nested = nested.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
        }
        let once = clean_text(&nested);
        assert_eq!(once, "x");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn preserves_hebrew_text() {
        let hebrew = "אוזניות Bluetooth אלחוטיות מקצועיות";
        assert_eq!(clean_text(&format!("<h1>{hebrew}</h1>")), hebrew);
    }

    #[test]
    fn descriptions_are_capped_by_characters() {
        let long = "ש".repeat(DESCRIPTION_LIMIT + 40);
        let capped = clean_description(&long);
        assert_eq!(capped.chars().count(), DESCRIPTION_LIMIT);
        assert_eq!(clean_description(&capped), capped);
    }

    #[test]
    fn parses_common_price_formats() {
        assert_eq!(parse_price("$49.90"), Some(49.90));
        assert_eq!(parse_price("US $1,299.99"), Some(1299.99));
        assert_eq!(parse_price("1.299,50 €"), Some(1299.50));
        assert_eq!(parse_price("₪ 79,9"), Some(79.9));
        assert_eq!(parse_price("1,299"), Some(1299.0));
        assert_eq!(parse_price("£12.345.678"), Some(12_345_678.0));
        assert_eq!(parse_price("$19.99 - $24.99"), Some(19.99));
    }

    #[test]
    fn parses_space_grouped_prices() {
        assert_eq!(parse_price("1 299,00 €"), Some(1299.0));
        assert_eq!(parse_price("1\u{202f}299,00 €"), Some(1299.0));
        assert_eq!(parse_price("2\u{a0}499,99 €"), Some(2499.99));
        assert_eq!(parse_price("12 345 678 Ft"), Some(12_345_678.0));
        assert_eq!(parse_price("79,90 € 99,90 €"), Some(79.9));
    }

    #[test]
    fn non_positive_or_missing_prices_are_absent() {
        assert_eq!(parse_price("$0.00"), None);
        assert_eq!(parse_price("Currently unavailable"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn ratings_must_fit_five_star_scale() {
        assert_eq!(parse_rating("4.6 out of 5 stars"), Some(4.6));
        assert_eq!(parse_rating("4,2"), Some(4.2));
        assert_eq!(parse_rating("17"), None);
    }
}
