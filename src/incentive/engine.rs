use std::collections::BTreeMap;

use super::model::{Request, ResultRow};
use super::rules::compute_class;

/// 식별자별 계산 결과.
pub type Calculation = BTreeMap<String, ResultRow>;

/// 계산 엔진이 돌려주는 유일한 실패.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("Nessuna tipologia di intervento selezionata")]
    NoApplianceClass,
}

/// 요청된 모든 기기에 대해 독립적으로 인센티브를 계산한다.
///
/// 지원하지 않는 기기도 경고가 달린 0원 결과로 포함되며, 결과에서 빠지는 기기는 없다.
/// 같은 식별자를 두 번 요청하면 한 번만 나타난다.
pub fn compute(request: &Request) -> Result<Calculation, CalculationError> {
    if request.appliance_classes.is_empty() {
        return Err(CalculationError::NoApplianceClass);
    }
    Ok(request
        .appliance_classes
        .iter()
        .map(|id| (id.clone(), compute_class(id, request)))
        .collect())
}
