use crate::domain::model::Route;
use crate::utils::error::Result;

/// 航線資料來源。服務層只讀取，不會修改
///
/// `Err` 只代表存儲本身失敗；找不到航線是 `Ok(None)`，由呼叫端決定是否為錯誤。
pub trait RouteRepository: Send + Sync {
    /// All routes in insertion order.
    fn get_all(&self) -> Result<Vec<Route>>;

    fn get_by_id(&self, route_id: &str) -> Result<Option<Route>>;

    /// 特定年度的航線，保持存儲順序
    fn get_by_year(&self, year: i32) -> Result<Vec<Route>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|route| route.year == year)
            .collect())
    }
}
