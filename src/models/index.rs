use serde::{Deserialize, Serialize};

pub const INDEX_TABLE_NAME: &str = "indices";

/// One constituent of an NSE index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IndexRecord {
    pub index: String,
    pub company_name: String,
    pub industry: String,
    pub tradingsymbol: String,
    pub series: String,
    pub isin_code: String,
}
