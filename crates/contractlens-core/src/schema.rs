/// Column layout shared by the JSON and CSV outputs.
pub mod output {
    use crate::contract::ContractResult;

    /// Output columns, in CSV order. Matches the serde field names of
    /// [`ContractResult`].
    pub const COLUMNS: [&str; 5] = [
        "contract_id",
        "summary",
        "termination",
        "confidentiality",
        "liability",
    ];

    /// One output row, aligned with [`COLUMNS`].
    pub fn row(result: &ContractResult) -> [&str; 5] {
        [
            result.contract_id.as_str(),
            result.summary.as_str(),
            result.termination.as_str(),
            result.confidentiality.as_str(),
            result.liability.as_str(),
        ]
    }
}
