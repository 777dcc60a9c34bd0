use crate::models::{Property, Purpose};

const NO_PRICE: &str = "—";

/// `AED 1,250,000`: rounded to whole dirhams, thousands grouped.
pub fn format_aed(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("AED {}{}", sign, grouped)
}

/// Price shown on cards and detail pages. `priceDisplay` wins; rent gets a
/// `/year` suffix; anything without a positive amount shows a dash.
pub fn display_price(property: &Property) -> String {
    if let Some(display) = property.price_display.as_deref().map(str::trim) {
        if !display.is_empty() {
            return display.to_string();
        }
    }
    match property.price_amount() {
        Some(amount) if amount > 0.0 => {
            let formatted = format_aed(amount);
            if property.purpose == Some(Purpose::Rent) {
                format!("{}/year", formatted)
            } else {
                formatted
            }
        }
        _ => NO_PRICE.to_string(),
    }
}
