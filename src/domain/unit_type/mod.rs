pub mod model;
pub mod repository;

pub use model::{NewUnitType, UnitKind, UnitType};
pub use repository::UnitTypeCatalog;
