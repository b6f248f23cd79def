use log::{debug, info, warn};
use crate::viacep::model::AddressRecord;

/// Identity of one issued lookup.
///
/// Two commits of the same code get different tickets, so only the latest one settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    code: String,
}

impl Ticket {
    pub fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(AddressRecord),
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    /// no committed code, or the last lookup failed
    #[default]
    Idle,
    Loading(Ticket),
    Settled {
        code: String,
        resolution: Resolution,
    },
}

/// User-visible, non-blocking notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotFound { code: String },
    Failed { code: String, reason: String },
}

/// Result of handing a finished lookup to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settle {
    /// the lookup was superseded by a newer commit and was dropped
    Stale,
    Applied(Option<Notice>),
}

/// Tracks the single current lookup and its result slot.
#[derive(Debug, Default)]
pub struct LookupSession {
    state: RequestState,
    issued: u64,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// start loading `code`, abandoning whatever was current
    pub fn begin(&mut self, code: String) -> Ticket {
        self.issued += 1;
        let ticket = Ticket { seq: self.issued, code };
        if let RequestState::Loading(previous) = &self.state {
            debug!("[{}] superseded by [{}]", previous.code, ticket.code);
        }
        self.state = RequestState::Loading(ticket.clone());
        ticket
    }

    /// Settle the lookup identified by `ticket`, unless a newer commit replaced it.
    pub fn settle(&mut self, ticket: &Ticket, outcome: color_eyre::Result<AddressRecord>) -> Settle {
        match &self.state {
            RequestState::Loading(current) if current == ticket => {}
            _ => {
                debug!("discarding stale result for [{}]", ticket.code);
                return Settle::Stale;
            }
        }

        let code = ticket.code.clone();
        match outcome {
            Ok(record) if record.is_not_found() => {
                info!("no address for [{}]", code);
                self.state = RequestState::Settled {
                    code: code.clone(),
                    resolution: Resolution::NotFound,
                };
                Settle::Applied(Some(Notice::NotFound { code }))
            }
            Ok(record) => {
                info!("found address for [{}]", code);
                self.state = RequestState::Settled {
                    code,
                    resolution: Resolution::Found(record),
                };
                Settle::Applied(None)
            }
            Err(err) => {
                warn!("lookup for [{}] failed: {:?}", code, err);
                self.state = RequestState::Idle;
                Settle::Applied(Some(Notice::Failed {
                    code,
                    reason: format!("{:#}", err),
                }))
            }
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading(_))
    }
}
