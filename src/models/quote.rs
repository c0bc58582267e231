use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope for quote lookups, keyed by instrument (`"NSE:INFY"`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteResponse {
    pub status: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// One level of the order book
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DepthItem {
    pub price: f64,
    pub quantity: u32,
    pub orders: u32,
}

/// Top five bid and ask levels
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Depth {
    pub buy: [DepthItem; 5],
    pub sell: [DepthItem; 5],
}

/// Full market quote for a single instrument
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuoteData {
    pub instrument: String,
    pub mode: String,
    pub instrument_token: u32,
    pub is_tradable: bool,
    pub is_index: bool,
    pub timestamp: String,
    pub last_trade_time: String,
    pub last_price: f64,
    pub last_traded_quantity: u32,
    pub total_buy_quantity: u32,
    pub total_sell_quantity: u32,
    #[serde(rename = "volume")]
    pub volume_traded: u32,
    #[serde(rename = "average_price")]
    pub average_trade_price: f64,
    pub oi: u32,
    pub oi_day_high: u32,
    pub oi_day_low: u32,
    pub net_change: f64,
    pub ohlc: Ohlc,
    pub depth: Depth,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OhlcData {
    #[serde(skip)]
    pub instrument_token: u32,
    pub last_price: f64,
    #[serde(rename = "volume")]
    pub volume_traded: u32,
    #[serde(rename = "average_price")]
    pub average_trade_price: f64,
    pub timestamp: String,
    pub last_trade_time: String,
    pub ohlc: Ohlc,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Last traded price only
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LtpData {
    #[serde(skip)]
    pub instrument_token: u32,
    pub last_price: f64,
    pub timestamp: String,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}
