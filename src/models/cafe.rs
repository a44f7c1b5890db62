use serde::{Deserialize, Serialize};

use super::record::{price, string_or_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopStatus {
    Open,
    Closed,
}

impl ShopStatus {
    pub fn parse(raw: &str) -> Self {
        if raw == "open" {
            ShopStatus::Open
        } else {
            ShopStatus::Closed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShopStatus::Open => "Accepting Orders",
            ShopStatus::Closed => "Temporarily Unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub image: String,
}

impl Shop {
    pub fn status(&self) -> ShopStatus {
        ShopStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "price")]
    pub price: f64,
    #[serde(default)]
    pub image: String,
}
