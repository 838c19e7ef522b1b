use serde::{Deserialize, Serialize};

/// Raw equity quote as returned by the NSE `quote-equity` endpoint.
///
/// Only the sections the simplified quote reads are modelled; everything else
/// in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    #[serde(default)]
    pub info: Option<RawInfo>,
    #[serde(default)]
    pub price_info: Option<RawPriceInfo>,
    #[serde(default, rename = "securityWiseDP")]
    pub security_wise_dp: Option<RawSecurityWiseDp>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default)]
    pub industry_info: Option<RawIndustryInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInfo {
    pub symbol: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceInfo {
    pub last_price: Option<f64>,
    pub change: Option<f64>,
    pub p_change: Option<f64>,
    #[serde(default)]
    pub intra_day_high_low: Option<RawHighLow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHighLow {
    pub max: Option<f64>,
    pub min: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSecurityWiseDp {
    pub traded_volume: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub last_update_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIndustryInfo {
    pub industry: Option<String>,
}

impl RawQuote {
    /// NSE answers unknown symbols with an empty object rather than an error.
    pub fn is_empty(&self) -> bool {
        self.info.is_none() && self.price_info.is_none() && self.metadata.is_none()
    }
}

/// Simplified quote served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub latest_price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<f64>,
    pub last_updated: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

impl Quote {
    /// Flattens a raw NSE record into a quote for `symbol`.
    pub fn from_raw(symbol: &str, raw: &RawQuote) -> Self {
        let price = raw.price_info.as_ref();
        let high_low = price.and_then(|p| p.intra_day_high_low.as_ref());

        Self {
            symbol: symbol.to_string(),
            latest_price: price.and_then(|p| p.last_price),
            change: price.and_then(|p| p.change),
            change_percent: price.and_then(|p| p.p_change),
            day_high: high_low.and_then(|h| h.max),
            day_low: high_low.and_then(|h| h.min),
            volume: raw.security_wise_dp.as_ref().and_then(|d| d.traded_volume),
            last_updated: raw.metadata.as_ref().and_then(|m| m.last_update_time.clone()),
            company_name: raw.info.as_ref().and_then(|i| i.company_name.clone()),
            industry: raw.industry_info.as_ref().and_then(|i| i.industry.clone()),
        }
    }
}
