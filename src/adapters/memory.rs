use crate::domain::model::Route;
use crate::domain::ports::RouteRepository;
use crate::utils::error::{FleetError, Result};
use std::collections::HashMap;

/// 記憶體中的航線存儲，保留插入順序
#[derive(Debug, Clone, Default)]
pub struct InMemoryRouteRepository {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl InMemoryRouteRepository {
    pub fn from_routes(routes: Vec<Route>) -> Result<Self> {
        let mut index = HashMap::with_capacity(routes.len());
        for (position, route) in routes.iter().enumerate() {
            check_finite(route)?;
            if index.insert(route.route_id.clone(), position).is_some() {
                return Err(FleetError::validation(format!(
                    "Duplicate routeId {} in route data",
                    route.route_id
                )));
            }
        }

        tracing::debug!("Loaded {} routes into memory", routes.len());
        Ok(Self { routes, index })
    }

    /// 內建的參考航線資料
    pub fn seeded() -> Self {
        let routes = seed_routes();
        let index = routes
            .iter()
            .enumerate()
            .map(|(position, route)| (route.route_id.clone(), position))
            .collect();
        Self { routes, index }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteRepository for InMemoryRouteRepository {
    fn get_all(&self) -> Result<Vec<Route>> {
        Ok(self.routes.clone())
    }

    fn get_by_id(&self, route_id: &str) -> Result<Option<Route>> {
        Ok(self
            .index
            .get(route_id)
            .map(|&position| self.routes[position].clone()))
    }
}

/// NaN 或 ±inf 會讓餘額與池分配失去意義，載入時就拒絕
fn check_finite(route: &Route) -> Result<()> {
    let fields = [
        ("ghgIntensity", route.ghg_intensity),
        ("fuelConsumption", route.fuel_consumption),
        ("distance", route.distance),
        ("totalEmissions", route.total_emissions),
    ];
    match fields.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(FleetError::validation(format!(
            "Route {} has non-finite {} ({})",
            route.route_id, field, value
        ))),
        None => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_route(
    route_id: &str,
    vessel_type: &str,
    fuel_type: &str,
    year: i32,
    ghg_intensity: f64,
    fuel_consumption: f64,
    distance: f64,
    total_emissions: f64,
) -> Route {
    Route {
        route_id: route_id.to_string(),
        vessel_type: vessel_type.to_string(),
        fuel_type: fuel_type.to_string(),
        year,
        ghg_intensity,
        fuel_consumption,
        distance,
        total_emissions,
    }
}

pub fn seed_routes() -> Vec<Route> {
    vec![
        seed_route("R001", "Container", "HFO", 2024, 91.0, 5000.0, 12000.0, 4500.0),
        seed_route("R002", "BulkCarrier", "LNG", 2024, 88.0, 4800.0, 11500.0, 4200.0),
        seed_route("R003", "Tanker", "MGO", 2024, 93.5, 5100.0, 12500.0, 4700.0),
        seed_route("R004", "RoRo", "HFO", 2025, 89.2, 4900.0, 11800.0, 4300.0),
        seed_route("R005", "Container", "LNG", 2025, 90.5, 4950.0, 11900.0, 4400.0),
    ]
}
