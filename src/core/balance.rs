use crate::domain::model::Route;
use rust_decimal::{Decimal, RoundingStrategy};

/// Regulatory GHG intensity target in gCO2e/MJ.
pub const DEFAULT_TARGET_GHG: f64 = 89.3368;

/// 四捨五入到小數點後兩位（.5 遠離零）
///
/// Rounds the exact decimal value of the double, so `2.675` (stored as
/// 2.67499999...) becomes `2.67`.
pub fn round2(value: f64) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(exact) => exact
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
            .parse()
            .unwrap_or(value),
        // 超出 Decimal 範圍或非有限值
        None => (value * 100.0).round() / 100.0,
    }
}

/// 單一航線的合規餘額：正值為盈餘，負值為赤字
pub fn route_balance(route: &Route, target_ghg: f64) -> f64 {
    round2((target_ghg - route.ghg_intensity) * route.total_emissions)
}

/// Sum of rounded per-route balances, rounded again.
pub fn sum_balances<'a, I>(routes: I, target_ghg: f64) -> f64
where
    I: IntoIterator<Item = &'a Route>,
{
    round2(
        routes
            .into_iter()
            .map(|route| route_balance(route, target_ghg))
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(ghg: f64, emissions: f64) -> Route {
        Route {
            route_id: "R".to_string(),
            vessel_type: "Container".to_string(),
            fuel_type: "HFO".to_string(),
            year: 2024,
            ghg_intensity: ghg,
            fuel_consumption: 0.0,
            distance: 0.0,
            total_emissions: emissions,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-7484.4000000001), -7484.4);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(-2.5), -2.5);
    }

    #[test]
    fn test_round2_uses_exact_decimal_value() {
        // 二進位表示略小於 .xx5，必須往下
        assert_eq!(round2(1.115), 1.11);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(-1.115), -1.11);
        // 真正的中點遠離零
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_route_balance_sign() {
        // 低於目標值 => 盈餘
        assert_eq!(route_balance(&route(88.0, 4200.0), DEFAULT_TARGET_GHG), 5614.56);
        // 高於目標值 => 赤字
        assert_eq!(route_balance(&route(91.0, 4500.0), DEFAULT_TARGET_GHG), -7484.4);
        assert_eq!(route_balance(&route(DEFAULT_TARGET_GHG, 4500.0), DEFAULT_TARGET_GHG), 0.0);
    }

    #[test]
    fn test_route_balance_is_deterministic() {
        let r = route(93.5, 4700.0);
        let first = route_balance(&r, DEFAULT_TARGET_GHG);
        for _ in 0..10 {
            assert_eq!(route_balance(&r, DEFAULT_TARGET_GHG), first);
        }
    }

    #[test]
    fn test_sum_balances_of_empty_set_is_zero() {
        let routes: Vec<Route> = Vec::new();
        assert_eq!(sum_balances(&routes, DEFAULT_TARGET_GHG), 0.0);
    }
}
