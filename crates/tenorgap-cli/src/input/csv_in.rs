use tenorgap_core::portfolio::LoanRecord;

/// Read a loan portfolio CSV into raw records.
///
/// Expected headers match `LoanRecord`'s field names; optional columns may
/// be missing or empty. Enum validation (installment, method) happens later,
/// per loan, so one bad row never aborts the read.
pub fn read_loans(path: &str) -> Result<Vec<LoanRecord>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;

    let mut loans = Vec::new();
    for (i, row) in reader.deserialize::<LoanRecord>().enumerate() {
        // +2: 1-based line numbers plus the header row
        let record = row.map_err(|e| format!("Row {} of '{}': {}", i + 2, path, e))?;
        loans.push(record);
    }

    Ok(loans)
}
