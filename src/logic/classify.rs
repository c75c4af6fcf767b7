use anyhow::Result;

use crate::model::{CustomerId, TrackingRequest, SINK_CUSTOMER_ID};
use crate::store::traits::Store;

/// Why a request was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UnknownCustomer,
    InactiveCustomer,
    BlockedIp,
    BlockedUserAgent,
}

impl Rejection {
    pub fn status_code(&self) -> u16 {
        match self {
            Rejection::UnknownCustomer => 404,
            Rejection::InactiveCustomer => 401,
            Rejection::BlockedIp | Rejection::BlockedUserAgent => 403,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::UnknownCustomer => "Customer not found",
            Rejection::InactiveCustomer => "Not active customer",
            Rejection::BlockedIp => "Remote IP is blocked",
            Rejection::BlockedUserAgent => "User Agent is blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Outcome of classifying one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Customer whose counters the request is recorded against
    pub customer_id: CustomerId,
    pub verdict: Verdict,
}

pub struct RequestClassifier;

impl RequestClassifier {
    /// Apply the customer and blocklist rules in order; the first rule that
    /// matches decides the verdict.
    ///
    /// Unknown customers are attributed to the sink customer. An absent
    /// User-Agent never matches the blocklist.
    pub async fn classify<S: Store + ?Sized>(
        store: &S,
        request: &TrackingRequest,
        user_agent: Option<&str>,
    ) -> Result<Classification> {
        let Some(customer) = store.get_customer(request.customer_id).await? else {
            return Ok(Classification {
                customer_id: SINK_CUSTOMER_ID,
                verdict: Verdict::Rejected(Rejection::UnknownCustomer),
            });
        };

        let rejected = |rejection| Classification {
            customer_id: customer.id,
            verdict: Verdict::Rejected(rejection),
        };

        if !customer.active {
            return Ok(rejected(Rejection::InactiveCustomer));
        }

        if store.is_ip_blocked(&request.remote_ip).await? {
            return Ok(rejected(Rejection::BlockedIp));
        }

        if let Some(user_agent) = user_agent {
            if store.is_user_agent_blocked(user_agent).await? {
                return Ok(rejected(Rejection::BlockedUserAgent));
            }
        }

        Ok(Classification {
            customer_id: customer.id,
            verdict: Verdict::Accepted,
        })
    }
}
