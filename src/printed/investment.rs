use crate::codec::Document;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A one-off purchase (printer, tools) counted against the savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub description: String,
    pub cost: f64,
}

/// Contents of `investments.toml`. Read-only from the tool's point of view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentLedger(pub Vec<Investment>);

#[derive(Debug, Serialize, Deserialize)]
pub struct InvestmentLedgerRecord {
    #[serde(default)]
    pub investment: Vec<Investment>,
}

impl Document for InvestmentLedger {
    type Record = InvestmentLedgerRecord;

    fn decode(record: InvestmentLedgerRecord, _path: &Path) -> Result<Self, String> {
        Ok(InvestmentLedger(record.investment))
    }

    fn encode(&self) -> InvestmentLedgerRecord {
        InvestmentLedgerRecord {
            investment: self.0.clone(),
        }
    }
}
