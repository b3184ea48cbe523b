use crate::core::balance::{round2, route_balance, sum_balances, DEFAULT_TARGET_GHG};
use crate::domain::model::{
    AdjustedCbRoute, ApplyResult, BankingResult, ComplianceBalance, PoolMember, PoolResult, Route,
};
use crate::domain::ports::RouteRepository;
use crate::utils::error::{FleetError, Result};
use std::sync::Arc;

/// 合規餘額計算、盈餘存入／抵用、以及航線共池
///
/// `banked_surplus` 由服務實例持有，只會被完整的 bank/apply 操作調整。
pub struct ComplianceService<R: RouteRepository + ?Sized> {
    repository: Arc<R>,
    target_ghg: f64,
    banked_surplus: f64,
}

impl<R: RouteRepository + ?Sized> ComplianceService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_target(repository, DEFAULT_TARGET_GHG)
    }

    pub fn with_target(repository: Arc<R>, target_ghg: f64) -> Self {
        Self {
            repository,
            target_ghg,
            banked_surplus: 0.0,
        }
    }

    pub fn target_ghg(&self) -> f64 {
        self.target_ghg
    }

    pub fn banked_surplus(&self) -> f64 {
        self.banked_surplus
    }

    fn routes_for_year(&self, year: i32) -> Result<Vec<Route>> {
        let routes = self.repository.get_by_year(year)?;
        if routes.is_empty() {
            return Err(FleetError::not_found(format!(
                "No routes found for year {}",
                year
            )));
        }
        Ok(routes)
    }

    fn raw_balance(&self, year: i32) -> Result<f64> {
        let routes = self.routes_for_year(year)?;
        let balance = sum_balances(&routes, self.target_ghg);
        tracing::debug!(year, routes = routes.len(), balance, "Computed raw balance");
        Ok(balance)
    }

    pub fn get_compliance_balance(&self, year: i32) -> Result<ComplianceBalance> {
        let raw_balance = self.raw_balance(year)?;

        Ok(ComplianceBalance {
            year,
            raw_balance,
            banked_surplus: round2(self.banked_surplus),
            total_balance: round2(raw_balance + self.banked_surplus),
        })
    }

    pub fn bank_surplus(&mut self, year: i32) -> Result<BankingResult> {
        let raw_balance = self.raw_balance(year)?;

        if raw_balance <= 0.0 {
            return Err(FleetError::business_rule(format!(
                "No surplus to bank for year {}. Current balance: {:.2}",
                year, raw_balance
            )));
        }

        self.banked_surplus += raw_balance;
        tracing::info!(
            year,
            surplus = raw_balance,
            banked_surplus = self.banked_surplus,
            "💰 Surplus banked"
        );

        Ok(BankingResult {
            year,
            surplus: raw_balance,
            banked_surplus: round2(self.banked_surplus),
        })
    }

    pub fn apply_banked_surplus(&mut self, year: i32) -> Result<ApplyResult> {
        let raw_balance = self.raw_balance(year)?;

        if self.banked_surplus <= 0.0 {
            return Err(FleetError::business_rule(
                "No banked surplus available to apply.",
            ));
        }

        // 只能抵用赤字年度
        if raw_balance >= 0.0 {
            return Err(FleetError::business_rule(format!(
                "No deficit to apply banked surplus to for year {}. Current balance is {:.2}.",
                year, raw_balance
            )));
        }

        let deficit = raw_balance.abs();
        let applied = self.banked_surplus.min(deficit);
        self.banked_surplus -= applied;
        // 浮點誤差不可讓存量變成負數
        if self.banked_surplus < 0.0 {
            self.banked_surplus = 0.0;
        }

        tracing::info!(
            year,
            applied,
            remaining = self.banked_surplus,
            "Banked surplus applied to deficit"
        );

        Ok(ApplyResult {
            year,
            raw_balance,
            banked_surplus_applied: round2(applied),
            remaining_banked_surplus: round2(self.banked_surplus),
            total_balance: round2(raw_balance + applied),
        })
    }

    pub fn get_adjusted_cbs(&self, year: i32) -> Result<Vec<AdjustedCbRoute>> {
        let routes = self.routes_for_year(year)?;

        Ok(routes
            .into_iter()
            .map(|route| AdjustedCbRoute {
                adjusted_cb: route_balance(&route, self.target_ghg),
                route_id: route.route_id,
                vessel_type: route.vessel_type,
            })
            .collect())
    }

    /// 共池：成員餘額平均分配
    ///
    /// 總和非負時，平均值也非負，因此每個成員池後皆 >= 0，赤字成員必定改善。
    pub fn create_pool(&self, route_ids: &[String], year: i32) -> Result<PoolResult> {
        if route_ids.len() < 2 {
            return Err(FleetError::validation(
                "A pool requires at least two members.",
            ));
        }

        let year_routes = self.repository.get_by_year(year)?;

        let mut missing = Vec::new();
        let mut cb_before = Vec::with_capacity(route_ids.len());
        for id in route_ids {
            match year_routes.iter().find(|route| &route.route_id == id) {
                Some(route) => cb_before.push(route_balance(route, self.target_ghg)),
                None => missing.push(id.as_str()),
            }
        }

        if !missing.is_empty() {
            tracing::debug!(year, ?missing, "Pool members did not resolve");
            return Err(FleetError::not_found(
                "One or more routeIds not found for the specified year.",
            ));
        }

        let total: f64 = cb_before.iter().sum();
        if total < 0.0 {
            return Err(FleetError::business_rule(format!(
                "Pool is not compliant. Total balance is {:.2} (must be >= 0).",
                total
            )));
        }

        let cb_after = round2(total / cb_before.len() as f64);
        tracing::info!(year, members = route_ids.len(), total, cb_after, "Pool created");

        Ok(PoolResult {
            members: route_ids
                .iter()
                .zip(cb_before)
                .map(|(route_id, cb_before)| PoolMember {
                    route_id: route_id.clone(),
                    cb_before,
                    cb_after,
                })
                .collect(),
        })
    }
}
