//! Physical retail store locations, as served by `GET /stores`.

use serde::{Deserialize, Serialize};

use super::id::StoreId;

/// A retail store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    pub hours: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_decodes() {
        let json = r#"{
            "id": "s-1",
            "name": "Golden Era T Nagar",
            "address": "12 Usman Road",
            "city": "Chennai",
            "pincode": "600017",
            "phone": "044-00000000",
            "hours": "10:00-21:00"
        }"#;
        let store: Store = serde_json::from_str(json).expect("decode");
        assert_eq!(store.city, "Chennai");
    }
}
