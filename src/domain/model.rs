use serde::{Deserialize, Serialize};

/// 航線參考資料，建立後不可變更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: String,
    pub vessel_type: String,
    pub fuel_type: String,
    pub year: i32,
    /// gCO2e/MJ
    pub ghg_intensity: f64,
    pub fuel_consumption: f64,
    pub distance: f64,
    pub total_emissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
    pub baseline: Route,
    pub comparisons: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub route_id: String,
    pub ghg_intensity: f64,
    /// Percent above (+) or below (-) the baseline intensity.
    pub percent_diff: f64,
    pub compliant: bool,
}

impl ComparisonData {
    /// 相對基準航線的強度差異，供比較報表使用
    pub fn rows(&self, target_ghg: f64) -> Vec<ComparisonRow> {
        let base = self.baseline.ghg_intensity;
        self.comparisons
            .iter()
            .map(|route| {
                let percent_diff = if base == 0.0 {
                    0.0
                } else {
                    crate::core::balance::round2((route.ghg_intensity / base - 1.0) * 100.0)
                };
                ComparisonRow {
                    route_id: route.route_id.clone(),
                    ghg_intensity: route.ghg_intensity,
                    percent_diff,
                    compliant: route.ghg_intensity <= target_ghg,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceBalance {
    pub year: i32,
    pub raw_balance: f64,
    pub banked_surplus: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingResult {
    pub year: i32,
    pub surplus: f64,
    pub banked_surplus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub year: i32,
    pub raw_balance: f64,
    pub banked_surplus_applied: f64,
    pub remaining_banked_surplus: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedCbRoute {
    pub route_id: String,
    pub vessel_type: String,
    #[serde(rename = "adjustedCB")]
    pub adjusted_cb: f64,
}

/// Pool members keep snake_case balance fields on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMember {
    #[serde(rename = "routeId")]
    pub route_id: String,
    pub cb_before: f64,
    pub cb_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolResult {
    pub members: Vec<PoolMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    pub route_ids: Vec<String>,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, ghg: f64) -> Route {
        Route {
            route_id: id.to_string(),
            vessel_type: "Container".to_string(),
            fuel_type: "HFO".to_string(),
            year: 2024,
            ghg_intensity: ghg,
            fuel_consumption: 5000.0,
            distance: 12000.0,
            total_emissions: 4500.0,
        }
    }

    #[test]
    fn test_route_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(route("R001", 91.0)).unwrap();
        assert_eq!(json["routeId"], "R001");
        assert_eq!(json["ghgIntensity"], 91.0);
        assert_eq!(json["totalEmissions"], 4500.0);
    }

    #[test]
    fn test_pool_and_adjusted_cb_field_names() {
        let member = PoolMember {
            route_id: "R001".to_string(),
            cb_before: -10.0,
            cb_after: 5.0,
        };
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["routeId"], "R001");
        assert_eq!(json["cb_before"], -10.0);
        assert_eq!(json["cb_after"], 5.0);

        let adjusted = AdjustedCbRoute {
            route_id: "R002".to_string(),
            vessel_type: "Tanker".to_string(),
            adjusted_cb: 1.5,
        };
        let json = serde_json::to_value(&adjusted).unwrap();
        assert_eq!(json["adjustedCB"], 1.5);
        assert_eq!(json["vesselType"], "Tanker");
    }

    #[test]
    fn test_comparison_rows() {
        let data = ComparisonData {
            baseline: route("R001", 91.0),
            comparisons: vec![route("R002", 88.0), route("R003", 93.5)],
        };

        let rows = data.rows(89.3368);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].route_id, "R002");
        assert_eq!(rows[0].percent_diff, -3.3);
        assert!(rows[0].compliant);
        assert_eq!(rows[1].percent_diff, 2.75);
        assert!(!rows[1].compliant);
    }
}
