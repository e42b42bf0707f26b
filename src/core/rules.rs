use crate::domain::model::PoolMember;

/// 2025 FuelEU GHG intensity target in gCO₂e/MJ.
pub const TARGET_GHG: f64 = 89.3368;

/// Percentage deviation of `current` from `baseline`. Returns 0 when the baseline is 0.
pub fn calculate_diff(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    ((current / baseline) - 1.0) * 100.0
}

pub fn is_compliant(intensity: f64) -> bool {
    is_compliant_against(intensity, TARGET_GHG)
}

pub fn is_compliant_against(intensity: f64, target: f64) -> bool {
    intensity <= target
}

pub fn pool_total(members: &[PoolMember]) -> f64 {
    members.iter().map(|m| m.verified_cb).sum()
}

/// A pool total is valid when it is zero or more.
pub fn is_valid_total(total: f64) -> bool {
    total >= 0.0
}

/// A pool is valid when the members' compliance balances sum to zero or more.
pub fn validate_pool(members: &[PoolMember]) -> bool {
    is_valid_total(pool_total(members))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, cb: f64) -> PoolMember {
        PoolMember::new(id, id, cb)
    }

    #[test]
    fn test_calculate_diff() {
        assert!((calculate_diff(110.0, 100.0) - 10.0).abs() < 1e-9);
        assert!((calculate_diff(90.0, 100.0) + 10.0).abs() < 1e-9);
        assert_eq!(calculate_diff(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_calculate_diff_zero_baseline() {
        assert_eq!(calculate_diff(91.0, 0.0), 0.0);
    }

    #[test]
    fn test_is_compliant_boundary() {
        assert!(is_compliant(TARGET_GHG));
        assert!(is_compliant(88.0));
        assert!(!is_compliant(89.3369));
        assert!(!is_compliant(91.0));
    }

    #[test]
    fn test_validate_pool() {
        let members = vec![member("A", 1200.0), member("B", -500.0), member("C", -300.0)];
        assert_eq!(pool_total(&members), 400.0);
        assert!(validate_pool(&members));

        let members = vec![member("A", 100.0), member("B", -100.0)];
        assert!(validate_pool(&members));

        let members = vec![member("A", -0.5)];
        assert!(!validate_pool(&members));

        assert!(validate_pool(&[]));
    }

    #[test]
    fn test_is_valid_total_boundary() {
        assert!(is_valid_total(0.0));
        assert!(is_valid_total(400.0));
        assert!(!is_valid_total(-0.001));
        assert!(!is_valid_total(f64::NAN));
    }
}
