/// Returns `true` when `name` is a legal tag name: an ASCII lowercase letter
/// followed by ASCII letters, digits, or `_`.
pub fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => chars.all(is_tag_char),
        _ => false,
    }
}

/// Character allowed after the first character of a tag name.
pub fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Character allowed in ref identifiers and symbols.
pub fn is_ref_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.' | '~')
}

pub(crate) fn is_ref_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(is_ref_char)
}

/// Character that starts or continues the unit of a Zinc number.
pub(crate) fn is_unit_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '%' | '$' | '/') || !c.is_ascii()
}

/// Returns `true` when `unit` reads back as the unit of a Zinc number, e.g.
/// `kW`, `°F`, `m/s` or `m²`.
pub fn is_unit(unit: &str) -> bool {
    let mut chars = unit.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    // `e5` or `E-3` after the digits would read as an exponent.
    let exponent = matches!(first, 'e' | 'E')
        && chars
            .clone()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
    is_unit_char(first)
        && !exponent
        && chars.all(|c| is_unit_char(c) || c == '_' || c.is_ascii_digit())
        && !unit.contains("//")
        && !unit.contains("/*")
}

/// Returns `true` when `tz` is a timezone name Zinc can carry after a date
/// time: `New_York`, `Port-au-Prince`, `GMT+5`.
pub fn is_tz_name(tz: &str) -> bool {
    let chars: Vec<char> = tz.chars().collect();
    if !chars.first().is_some_and(char::is_ascii_uppercase) {
        return false;
    }
    chars.iter().enumerate().all(|(i, &c)| {
        let next = chars.get(i + 1);
        is_tag_char(c)
            || (c == '-' && next.is_some_and(char::is_ascii_alphabetic))
            || (matches!(c, '+' | '-')
                && chars[..i] == ['G', 'M', 'T']
                && next.is_some_and(char::is_ascii_digit))
    })
}
