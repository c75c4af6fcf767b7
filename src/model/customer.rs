use serde::{Deserialize, Serialize};

pub type CustomerId = i64;

/// Customer that every request with an unknown customer id is counted against
pub const SINK_CUSTOMER_ID: CustomerId = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub active: bool,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            active: false,
            ..Self::new(id, name)
        }
    }

    pub fn sink() -> Self {
        Self::new(SINK_CUSTOMER_ID, "sink")
    }

    pub fn is_sink(&self) -> bool {
        self.id == SINK_CUSTOMER_ID
    }
}
