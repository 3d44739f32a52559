//! 카탈로그/도시 데이터 공급자. 계산 엔진 바깥의 협력자로, JSON 파일을 읽기만 한다.

pub mod catalog;
pub mod cities;

pub use catalog::{CatalogError, CatalogModel, CatalogStore};
pub use cities::{City, CityIndex};
