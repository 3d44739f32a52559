//! 인센티브 계산 엔진. 입출력 없이 순수 계산만 하며, 서버와 오프라인 대체 경로가 함께 쓴다.

pub mod coercion;
pub mod curve;
pub mod engine;
pub mod model;
pub mod rounding;
pub mod rules;
pub mod zone;

pub use coercion::{coerce, coerce_str, FieldValue};
pub use curve::{interpolate, CurvePoint};
pub use engine::{compute, Calculation, CalculationError};
pub use model::{ApplianceClass, Request, ResultRow, TechnicalRecord};
pub use zone::{ClimateZone, ZoneTable};
