//! 종목(통화쌍) 분류 및 가치 배수 테이블.
//!
//! - 핍 배율은 심볼 접미사로 결정됩니다 (JPY ×100, 금속 ×10, 그 외 ×10000).
//! - 가치 배수는 핍 1개당 계좌 통화 노출을 나타내는 고정 테이블입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 기본 금속 심볼.
pub const DEFAULT_METAL_SYMBOL: &str = "XAUUSD";

/// 심볼을 비교용 형태로 정규화합니다 (공백 제거, 대문자).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

/// 가격 차이를 핍으로 환산하는 배율 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipScale {
    /// 엔화 쌍 (×100)
    Jpy,
    /// 금속 쌍 (×10)
    Metal,
    /// 일반 쌍 (×10000)
    Standard,
}

impl PipScale {
    /// 심볼로부터 배율을 결정합니다.
    ///
    /// JPY 접미사가 금속 판정보다 우선합니다.
    pub fn for_symbol(symbol: &str, metal_symbol: &str) -> Self {
        let symbol = normalize_symbol(symbol);
        if symbol.ends_with("JPY") {
            PipScale::Jpy
        } else if symbol == normalize_symbol(metal_symbol) {
            PipScale::Metal
        } else {
            PipScale::Standard
        }
    }

    /// 가격 차이에 곱할 배율.
    pub fn factor(&self) -> Decimal {
        match self {
            PipScale::Jpy => dec!(100),
            PipScale::Metal => dec!(10),
            PipScale::Standard => dec!(10000),
        }
    }
}

/// 종목별 가치 배수 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTable {
    /// 금속 심볼 (×10 배율 적용 대상)
    #[serde(default = "default_metal_symbol")]
    pub metal_symbol: String,
    /// 심볼 → 핍당 가치 배수
    #[serde(default = "default_multipliers")]
    pub multipliers: BTreeMap<String, Decimal>,
}

fn default_metal_symbol() -> String {
    DEFAULT_METAL_SYMBOL.to_string()
}

fn default_multipliers() -> BTreeMap<String, Decimal> {
    [
        ("EURUSD", dec!(1)),
        ("GBPUSD", dec!(1)),
        ("AUDUSD", dec!(1)),
        ("NZDUSD", dec!(1)),
        ("USDJPY", dec!(0.67)),
        ("EURJPY", dec!(0.67)),
        ("GBPJPY", dec!(0.67)),
        ("AUDJPY", dec!(0.67)),
        ("CADJPY", dec!(0.67)),
        ("CHFJPY", dec!(0.67)),
        ("USDCHF", dec!(1.12)),
        ("EURCHF", dec!(1.12)),
        ("USDCAD", dec!(0.73)),
        ("EURCAD", dec!(0.73)),
        ("EURGBP", dec!(1.27)),
        ("EURAUD", dec!(0.65)),
        ("GBPAUD", dec!(0.65)),
        ("XAUUSD", dec!(1)),
    ]
    .into_iter()
    .map(|(symbol, multiplier)| (symbol.to_string(), multiplier))
    .collect()
}

impl Default for InstrumentTable {
    fn default() -> Self {
        Self {
            metal_symbol: default_metal_symbol(),
            multipliers: default_multipliers(),
        }
    }
}

impl InstrumentTable {
    /// 사용자 정의 테이블을 생성합니다.
    pub fn new(metal_symbol: impl Into<String>, multipliers: BTreeMap<String, Decimal>) -> Self {
        Self {
            metal_symbol: metal_symbol.into(),
            multipliers: multipliers
                .into_iter()
                .map(|(symbol, multiplier)| (normalize_symbol(&symbol), multiplier))
                .collect(),
        }
    }

    /// 심볼의 핍 배율.
    pub fn pip_scale(&self, symbol: &str) -> PipScale {
        PipScale::for_symbol(symbol, &self.metal_symbol)
    }

    /// 심볼의 가치 배수. 테이블에 없으면 `None`.
    ///
    /// 설정 소스에 따라 키의 대소문자가 바뀔 수 있으므로 대소문자를 무시하고 찾습니다.
    pub fn multiplier(&self, symbol: &str) -> Option<Decimal> {
        let symbol = normalize_symbol(symbol);
        self.multipliers.get(&symbol).copied().or_else(|| {
            self.multipliers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&symbol))
                .map(|(_, multiplier)| *multiplier)
        })
    }

    /// 테이블에 등록된 심볼인지 확인합니다.
    pub fn is_known(&self, symbol: &str) -> bool {
        self.multiplier(symbol).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pip_scale_by_suffix() {
        assert_eq!(PipScale::for_symbol("USDJPY", "XAUUSD"), PipScale::Jpy);
        assert_eq!(PipScale::for_symbol("gbpjpy ", "XAUUSD"), PipScale::Jpy);
        assert_eq!(PipScale::for_symbol("XAUUSD", "XAUUSD"), PipScale::Metal);
        assert_eq!(PipScale::for_symbol("EURUSD", "XAUUSD"), PipScale::Standard);
        assert_eq!(PipScale::Standard.factor(), dec!(10000));
    }

    #[test]
    fn test_multiplier_lookup_ignores_case() {
        let table = InstrumentTable::default();
        assert_eq!(table.multiplier("eurusd"), Some(dec!(1)));
        assert_eq!(table.multiplier("USDJPY"), Some(dec!(0.67)));
        assert_eq!(table.multiplier("BTCUSD"), None);

        let mut lowered = BTreeMap::new();
        lowered.insert("gbpusd".to_string(), dec!(1));
        let raw = InstrumentTable {
            metal_symbol: "xauusd".to_string(),
            multipliers: lowered,
        };
        assert!(raw.is_known("GBPUSD"));
        assert_eq!(raw.pip_scale("XAUUSD"), PipScale::Metal);
    }

    #[test]
    fn test_new_normalizes_keys() {
        let mut multipliers = BTreeMap::new();
        multipliers.insert(" eurgbp".to_string(), dec!(1.27));
        let table = InstrumentTable::new("XAGUSD", multipliers);

        assert!(table.multipliers.contains_key("EURGBP"));
        assert_eq!(table.pip_scale("XAGUSD"), PipScale::Metal);
        assert_eq!(table.pip_scale("XAUUSD"), PipScale::Standard);
    }
}
