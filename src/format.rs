//! Number display
//!
//! Thousands grouping for amounts and counts, with at most three fraction
//! digits and trailing zeros dropped (`1234.5` → `1,234.5`).

/// Separator characters used when displaying numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberFormat {
    pub thousands: char,
    pub decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands: ',',
            decimal: '.',
        }
    }
}

impl NumberFormat {
    pub fn new(thousands: char, decimal: char) -> Self {
        Self { thousands, decimal }
    }

    /// Format an amount with grouping and up to three fraction digits
    pub fn amount(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let rounded = format!("{:.3}", value.abs());
        let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
        let frac = frac_part.trim_end_matches('0');

        let mut out = String::with_capacity(rounded.len() + 4);
        if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
            out.push('-');
        }
        out.push_str(&self.group(int_part));
        if !frac.is_empty() {
            out.push(self.decimal);
            out.push_str(frac);
        }
        out
    }

    pub fn count(&self, value: usize) -> String {
        self.group(&value.to_string())
    }

    fn group(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.thousands);
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.amount(0.0), "0");
        assert_eq!(fmt.amount(350.0), "350");
        assert_eq!(fmt.amount(1234.5), "1,234.5");
        assert_eq!(fmt.amount(1234567.0), "1,234,567");
        assert_eq!(fmt.amount(100000.0), "100,000");
    }

    #[test]
    fn test_fraction_digits_capped_at_three() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.amount(1.23456), "1.235");
        assert_eq!(fmt.amount(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_negative_values() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.amount(-2500.25), "-2,500.25");
        assert_eq!(fmt.amount(-0.0001), "0");
    }

    #[test]
    fn test_custom_separators() {
        let fmt = NumberFormat::new('.', ',');
        assert_eq!(fmt.amount(1234.5), "1.234,5");
        assert_eq!(fmt.count(1_000_000), "1.000.000");
    }
}
