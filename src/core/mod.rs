pub mod balance;
pub mod compliance_service;
pub mod route_service;

pub use crate::domain::model::{
    AdjustedCbRoute, ApplyResult, BankingResult, ComparisonData, ComplianceBalance, PoolMember,
    PoolResult, Route,
};
pub use crate::domain::ports::RouteRepository;
pub use crate::utils::error::Result;
