use serde::{Deserialize, Serialize};

/// Pending transaction pool statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolStats {
    /// Number of unconfirmed transactions
    pub count: u64,
    /// Total virtual size in vbytes
    pub vsize: u64,
    /// Sum of pending fees in satoshis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fee: Option<u64>,
}
