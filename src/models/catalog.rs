use serde::{Deserialize, Serialize};

use super::record::{price, string_or_number};

/// A food item on the catalog screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "price")]
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

/// Body posted to the cart collection. The cart is write-only from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub donut_id: String,
    pub quantity: u32,
    pub name: String,
    pub price: f64,
    pub image: String,
}

impl CartLine {
    pub fn for_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            donut_id: item.id.clone(),
            quantity,
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cart_line_uses_camel_case() {
        let item = MenuItem {
            id: "3".to_string(),
            name: "Pink Donut".to_string(),
            price: 1.5,
            image: "https://img/pink.png".to_string(),
        };
        let body = serde_json::to_value(CartLine::for_item(&item, 2)).unwrap();
        assert_eq!(
            body,
            json!({
                "donutId": "3",
                "quantity": 2,
                "name": "Pink Donut",
                "price": 1.5,
                "image": "https://img/pink.png"
            })
        );
    }

    #[test]
    fn price_accepts_strings() {
        let item: MenuItem =
            serde_json::from_value(json!({ "id": 1, "name": "Tasty", "price": "10.00" })).unwrap();
        assert_eq!(item.price, 10.0);
        assert_eq!(item.image, "");
    }
}
