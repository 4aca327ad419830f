use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Field, Result, ScrapeError};

// sign, currency symbol, magnitude, unit word
static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<sign>[-+])?\s*[$€£¥]?\s*(?P<mag>[-+]?(?:[0-9][0-9,]*(?:\.[0-9]*)?|\.[0-9]+))?\s*(?P<unit>[A-Za-z]+)?$",
    )
    .unwrap()
});

/// Remove every configured extraneous substring from a cell.
pub fn strip_noise(text: &str, noise: &[String]) -> String {
    noise
        .iter()
        .filter(|n| !n.is_empty())
        .fold(text.to_string(), |acc, n| acc.replace(n.as_str(), ""))
}

/// Blank → 0, otherwise the text must be a non-negative integer.
pub fn normalize_year(text: &str) -> Result<u32> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(0);
    }
    t.parse::<u32>()
        .map_err(|_| ScrapeError::format(Field::Year, text))
}

/// `"-3.5%"` → -3.5. Blank (or a bare `%`) → 0.0.
pub fn normalize_percentage(text: &str) -> Result<f64> {
    let t = text.trim();
    let t = t.strip_suffix('%').unwrap_or(t).trim_end();
    if t.is_empty() {
        return Ok(0.0);
    }
    parse_finite(t).ok_or_else(|| ScrapeError::format(Field::Change, text))
}

/// `"$8.73 B"` → 8.73e9. Units expand to base currency units; unknown units count as ×1.
pub fn normalize_currency(text: &str) -> Result<f64> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(0.0);
    }

    let caps = CURRENCY_RE
        .captures(t)
        .ok_or_else(|| ScrapeError::format(Field::Revenue, text))?;
    let unit = caps.name("unit").map(|m| m.as_str());
    let exponent = unit.map(unit_exponent);

    let Some(mag) = caps.name("mag") else {
        // "$" or "$ B" carry no value; a lone sign or unknown word ("NA") is garbage
        if caps.name("sign").is_some() || exponent == Some(None) {
            return Err(ScrapeError::format(Field::Revenue, text));
        }
        return Ok(0.0);
    };

    let outer_negative = caps.name("sign").map(|s| s.as_str()) == Some("-");
    let digits = mag.as_str();
    if caps.name("sign").is_some() && digits.starts_with(['-', '+']) {
        return Err(ScrapeError::format(Field::Revenue, text));
    }

    // scale in the decimal literal so the parse rounds once
    let scaled = format!("{}e{}", digits.replace(',', ""), exponent.flatten().unwrap_or(0));
    let value = parse_finite(&scaled).ok_or_else(|| ScrapeError::format(Field::Revenue, text))?;
    Ok(if outer_negative { -value } else { value })
}

fn unit_exponent(unit: &str) -> Option<u32> {
    match unit.to_ascii_uppercase().as_str() {
        "B" | "BN" | "BILLION" => Some(9),
        "M" | "MN" | "MILLION" => Some(6),
        "K" | "THOUSAND" => Some(3),
        _ => None,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
