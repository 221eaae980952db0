use ocr_relay::milk_log::DEFAULT_COW_RATE;
use ocr_relay::MilkType;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MilkLogParams {
    #[serde(default)]
    pub milk_type: MilkType,
    #[serde(default = "default_cow_rate")]
    pub cow_rate: f64,
}

fn default_cow_rate() -> f64 {
    DEFAULT_COW_RATE
}
