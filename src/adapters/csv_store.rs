use crate::adapters::memory::InMemoryRouteRepository;
use crate::domain::model::Route;
use crate::utils::error::Result;
use std::io::Read;
use std::path::Path;

/// 從 CSV 載入航線資料
///
/// 欄位：routeId,vesselType,fuelType,year,ghgIntensity,fuelConsumption,distance,totalEmissions
pub struct CsvRouteLoader;

impl CsvRouteLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryRouteRepository> {
        let path = path.as_ref();
        tracing::info!("📁 Loading routes from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<T: Read>(reader: T) -> Result<InMemoryRouteRepository> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut routes = Vec::new();
        for record in csv_reader.deserialize::<Route>() {
            routes.push(record?);
        }

        InMemoryRouteRepository::from_routes(routes)
    }
}
