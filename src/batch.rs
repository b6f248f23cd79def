use std::path::Path;
use color_eyre::eyre::WrapErr;
use futures::StreamExt;
use log::{error, info};
use crate::input::{Change, CompletionRule, PostalCodeInput};
use crate::record::{Record, Status};
use crate::viacep::AddressLookup;

/// read one postal code per line, skipping blank lines
pub fn read_codes(input_path: impl AsRef<Path>) -> color_eyre::Result<Vec<String>> {
    let input_path = input_path.as_ref();
    let content = std::fs::read_to_string(input_path)
        .wrap_err_with(|| format!("cannot read postal codes from [{}]", input_path.display()))?;
    Ok(
        content.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    )
}

/// Look every code up, at most `concurrency` at a time, keeping input order.
pub async fn lookup_codes<L: AddressLookup>(lookup: &L, codes: Vec<String>, rule: CompletionRule, concurrency: usize) -> Vec<Record> {
    let total = codes.len();
    let mut records = futures::stream::iter(codes).enumerate().map(|(idx, code)| {
        async move {
            let mut input = PostalCodeInput::new(rule);
            let record = match input.on_change(&code) {
                Change::Committed(_) => {
                    info!("[{}/{total}] looking up [{}]", idx + 1, code);
                    match lookup.lookup(&code).await {
                        Ok(address) => Record::from_lookup(code, address),
                        Err(e) => {
                            error!("cannot look up [{}]: {:?}", code, e);
                            Record::failed(code, &e)
                        }
                    }
                }
                Change::Rejected => Record::invalid(code, "longer than 8 characters"),
                Change::Edited => {
                    let reason = input.validation_message().unwrap_or("incomplete postal code");
                    Record::invalid(code, reason)
                }
            };
            (idx, record)
        }
    })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    records.sort_by_key(|(idx, _)| *idx);
    let records = records.into_iter().map(|(_, record)| record).collect::<Vec<_>>();
    let found = records.iter().filter(|record| record.status == Status::Found).count();
    info!("finished looking up, [{}/{}] addresses found", found, total);
    records
}

/// write result to CSV file
pub fn save_records(records: &[Record], save_path: impl AsRef<Path>) -> color_eyre::Result<()> {
    if let Some(parent) = save_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(save_path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
