use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CustomerId, HourBucket, SINK_CUSTOMER_ID};

/// Tracking request as posted by the collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRequest {
    #[serde(rename = "customerID")]
    pub customer_id: CustomerId,
    #[serde(rename = "tagID")]
    pub tag_id: i64,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "remoteIP")]
    pub remote_ip: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("Customer id must be positive")]
    InvalidCustomerId,
    #[error("Timestamp must be positive [after 1970-01-01]")]
    InvalidTimestamp,
    #[error("Timestamp is out of range")]
    TimestampOutOfRange,
}

impl TrackingRequest {
    /// Check the field rules that JSON decoding alone cannot express.
    ///
    /// Customer ids at or below the sink id are reserved, so they are
    /// rejected here rather than being classified.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.customer_id <= SINK_CUSTOMER_ID {
            return Err(RequestValidationError::InvalidCustomerId);
        }
        if self.timestamp <= 0 {
            return Err(RequestValidationError::InvalidTimestamp);
        }
        Ok(())
    }

    /// Hour bucket the request is counted in
    pub fn bucket(&self) -> Result<HourBucket, RequestValidationError> {
        HourBucket::from_millis(self.timestamp).ok_or(RequestValidationError::TimestampOutOfRange)
    }
}
