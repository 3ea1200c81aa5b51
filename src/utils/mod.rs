/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(2.005_000_1), 2.01);
        assert_eq!(round2(-0.014), -0.01);
        assert_eq!(round2(3.0), 3.0);
    }
}
