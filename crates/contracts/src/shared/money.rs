/// Round an amount to whole cents, half away from zero
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Render an amount in pesos, e.g. `₱618.00`
pub fn format_peso(amount: f64) -> String {
    format!("₱{:.2}", round_cents(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(59.999), 60.0);
        assert_eq!(round_cents(29.9), 29.9);
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_format_peso() {
        assert_eq!(format_peso(618.0), "₱618.00");
        assert_eq!(format_peso(19.996), "₱20.00");
    }
}
