pub mod auth;
pub mod index;
pub mod quote;
pub mod response;

pub use auth::{AuthRecord, LoginRequest, LoginResponse, AUTH_TABLE_NAME};
pub use index::{IndexRecord, INDEX_TABLE_NAME};
pub use quote::{Depth, DepthItem, LtpData, Ohlc, OhlcData, QuoteData, QuoteResponse};
pub use response::ApiResponse;
