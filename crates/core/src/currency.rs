//! Amount formatting shared by the response synthesizer and the CLI.

/// Fixed rate between the base currency and Happy Paisa: 1 HP = 1000 INR.
pub const INR_PER_HAPPY_PAISA: f64 = 1000.0;

pub fn inr_to_happy_paisa(inr: f64) -> f64 {
    inr / INR_PER_HAPPY_PAISA
}

pub fn happy_paisa_to_inr(happy_paisa: f64) -> f64 {
    happy_paisa * INR_PER_HAPPY_PAISA
}

/// Formats an amount with en-IN digit grouping and no fractional digits,
/// e.g. `format_currency(1500000.0, "INR") == "₹15,00,000"`. Rounds half away
/// from zero.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let grouped = group_en_in(rounded.abs() as u64);

    let code = currency.trim().to_uppercase();
    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{grouped}"),
        None => format!("{sign}{code} {grouped}"),
    }
}

pub fn format_happy_paisa(amount: f64) -> String {
    format!("{amount:.3} HP")
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "INR" => Some("₹"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

// Last three digits form one group, every group above that has two.
fn group_en_in(units: u64) -> String {
    let digits = units.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
