#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

/// Splits a raw sample value like `11000W`, `1,5 kWh` or `95%` into its
/// number and unit suffix.
///
/// Returns `None` when the text does not start with a number or the
/// remainder is not a plain unit (`true`, `1h2m3s`, `[1 2 3]`).
pub fn parse_quantity(raw: &str) -> Option<Quantity> {
    let text = raw.trim();
    let split = text
        .char_indices()
        .find(|(index, char)| !is_numeric_char(*index, *char))
        .map(|(index, _)| index)
        .unwrap_or(text.len());

    let (number, unit) = text.split_at(split);
    let unit = unit.trim();

    if !unit.chars().all(is_unit_char) {
        return None;
    }

    let value = normalize_numeric_token(number)?.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(Quantity {
        value,
        unit: unit.to_string(),
    })
}

fn is_numeric_char(index: usize, char: char) -> bool {
    char.is_ascii_digit() || char == '.' || char == ',' || (index == 0 && (char == '-' || char == '+'))
}

fn is_unit_char(char: char) -> bool {
    char.is_alphabetic() || matches!(char, '%' | '°' | '/')
}

fn normalize_numeric_token(token: &str) -> Option<String> {
    if !token.chars().any(|char| char.is_ascii_digit()) {
        return None;
    }

    let comma_count = token.matches(',').count();
    let dot_count = token.matches('.').count();

    if comma_count > 0 && dot_count > 0 {
        let comma_index = token.rfind(',')?;
        let dot_index = token.rfind('.')?;
        if comma_index > dot_index {
            return Some(token.replace('.', "").replace(',', "."));
        }
        return Some(token.replace(',', ""));
    }

    if comma_count == 1 {
        return Some(token.replace(',', "."));
    }

    if comma_count > 1 {
        return Some(token.replace(',', ""));
    }

    if dot_count > 1 {
        return Some(token.replace('.', ""));
    }

    Some(token.to_string())
}
