use std::io::Write;
use std::sync::Arc;
use color_eyre::eyre::bail;
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use crate::form::{self, AddressForm};
use crate::input::{Change, CompletionRule, PostalCodeInput};
use crate::render::{render_notice, render_panel, render_record};
use crate::session::{Notice, RequestState, Settle};
use crate::viacep::AddressLookup;

/// Interactive form: every line read replaces the contents of the postal code field.
///
/// Returns once the input is exhausted and no lookup is outstanding.
pub async fn run_form<L, R, W>(lookup: Arc<L>, rule: CompletionRule, reader: R, out: &mut W) -> color_eyre::Result<()>
where
    L: AddressLookup,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (mut form, mut completions) = AddressForm::new(lookup, rule);
    let mut lines = reader.lines();
    let mut input_open = true;

    writeln!(out, "Type a postal code (CEP) and press enter; each line replaces the field.")?;
    write!(out, "{}", render_panel(form.state()))?;
    out.flush()?;

    // after the input closes, stay around until the outstanding lookup settles
    while input_open || form.is_loading() {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(raw) => match form.on_change(&raw) {
                    Change::Rejected => {
                        debug!("ignoring [{}], longer than 8 characters", raw);
                        writeln!(out, "at most 8 characters, the field still holds [{}]", form.input().draft())?;
                    }
                    Change::Committed(code) => {
                        writeln!(out, "looking up [{}]...", code)?;
                        write!(out, "{}", render_panel(form.state()))?;
                    }
                    Change::Edited => {
                        debug!("draft is now [{}]", form.input().draft());
                        if let Some(message) = form.input().validation_message() {
                            writeln!(out, "{}", message)?;
                        }
                    }
                },
                None => input_open = false,
            },
            Some(completion) = completions.recv() => match form.apply(completion) {
                Settle::Stale => {}
                Settle::Applied(notice) => {
                    if let RequestState::Settled { code, .. } = form.state() {
                        debug!("showing result for [{}]", code);
                    }
                    if let Some(notice) = notice {
                        writeln!(out, "{}", render_notice(&notice))?;
                    }
                    write!(out, "{}", render_panel(form.state()))?;
                }
            },
            else => break,
        }
        out.flush()?;
    }
    Ok(())
}

/// Validate `cep`, look it up once and print the panel, or the record as JSON.
pub async fn run_lookup<L, W>(lookup: &L, rule: CompletionRule, cep: &str, json: bool, out: &mut W) -> color_eyre::Result<()>
where
    L: AddressLookup,
    W: Write,
{
    let mut input = PostalCodeInput::new(rule);
    if input.on_change(cep) == Change::Rejected {
        bail!("[{}] is longer than 8 characters", cep);
    }
    if let Some(message) = input.validation_message() {
        bail!("[{}]: {}", cep, message);
    }

    let Some(record) = form::resolve(lookup, input.committed()).await? else {
        bail!("[{}] is not a complete postal code", cep);
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    } else if record.is_not_found() {
        writeln!(out, "{}", render_notice(&Notice::NotFound { code: cep.to_string() }))?;
        write!(out, "{}", render_panel(&RequestState::Idle))?;
    } else {
        write!(out, "{}", render_record(&record))?;
    }
    Ok(())
}
