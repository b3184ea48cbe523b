use crate::domain::model::{ComparisonData, Route};
use crate::domain::ports::RouteRepository;
use crate::utils::error::{FleetError, Result};
use std::sync::Arc;

/// 航線查詢與「基準航線」選擇
pub struct RouteService<R: RouteRepository + ?Sized> {
    repository: Arc<R>,
    baseline_route_id: Option<String>,
}

impl<R: RouteRepository + ?Sized> RouteService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            baseline_route_id: None,
        }
    }

    pub fn find_all_routes(&self) -> Result<Vec<Route>> {
        self.repository.get_all()
    }

    pub fn baseline_route_id(&self) -> Option<&str> {
        self.baseline_route_id.as_deref()
    }

    pub fn set_baseline(&mut self, route_id: &str) -> Result<()> {
        let route = self
            .repository
            .get_by_id(route_id)?
            .ok_or_else(|| FleetError::not_found(format!("Route with ID {} not found", route_id)))?;

        tracing::info!(
            previous = ?self.baseline_route_id,
            baseline = %route.route_id,
            "Baseline route selected"
        );
        self.baseline_route_id = Some(route.route_id);
        Ok(())
    }

    pub fn get_comparison_data(&self) -> Result<ComparisonData> {
        let baseline_id = self.baseline_route_id.as_deref().ok_or_else(|| {
            FleetError::business_rule("Baseline not set. Please set a baseline first.")
        })?;

        // 航線不可變，正常情況下不會發生
        let baseline = self
            .repository
            .get_by_id(baseline_id)?
            .ok_or_else(|| FleetError::not_found("Baseline route not found in database."))?;

        let comparisons: Vec<Route> = self
            .repository
            .get_all()?
            .into_iter()
            .filter(|route| route.route_id != baseline_id)
            .collect();

        tracing::debug!(
            "Comparing {} routes against baseline {}",
            comparisons.len(),
            baseline_id
        );

        Ok(ComparisonData {
            baseline,
            comparisons,
        })
    }
}
