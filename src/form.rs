use std::sync::Arc;
use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use crate::input::{Change, CompletionRule, PostalCodeInput};
use crate::session::{LookupSession, RequestState, Settle, Ticket};
use crate::viacep::model::AddressRecord;
use crate::viacep::AddressLookup;

/// A finished lookup, tagged with the ticket it was issued for
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: color_eyre::Result<AddressRecord>,
}

pub type Completions = UnboundedReceiver<Completion>;

/// The postal code form: the input field wired to background lookups.
///
/// Every commit spawns one lookup task. Tasks report back through [`Completions`]
/// and the caller hands each completion to [`AddressForm::apply`]; results for a
/// superseded commit are dropped there.
pub struct AddressForm<L> {
    input: PostalCodeInput,
    session: LookupSession,
    lookup: Arc<L>,
    tx: UnboundedSender<Completion>,
}

impl<L: AddressLookup> AddressForm<L> {
    pub fn new(lookup: Arc<L>, rule: CompletionRule) -> (Self, Completions) {
        let (tx, rx) = mpsc::unbounded_channel();
        let form = Self {
            input: PostalCodeInput::new(rule),
            session: LookupSession::new(),
            lookup,
            tx,
        };
        (form, rx)
    }

    /// apply the new field contents, starting a lookup if they form a complete code
    pub fn on_change(&mut self, raw: &str) -> Change {
        let change = self.input.on_change(raw);
        if let Change::Committed(code) = &change {
            let ticket = self.session.begin(code.clone());
            self.spawn_lookup(ticket);
        }
        change
    }

    fn spawn_lookup(&self, ticket: Ticket) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        debug!("spawning lookup for [{}]", ticket.code());
        tokio::spawn(async move {
            let outcome = lookup.lookup(ticket.code()).await;
            if let Err(unsent) = tx.send(Completion { ticket, outcome }) {
                debug!("form is gone, dropping result for [{}]", unsent.0.ticket.code());
            }
        });
    }

    pub fn apply(&mut self, completion: Completion) -> Settle {
        self.session.settle(&completion.ticket, completion.outcome)
    }

    pub fn input(&self) -> &PostalCodeInput {
        &self.input
    }

    pub fn state(&self) -> &RequestState {
        self.session.state()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }
}

/// One-shot resolve: no committed code means no request.
pub async fn resolve<L: AddressLookup>(lookup: &L, committed: Option<&str>) -> color_eyre::Result<Option<AddressRecord>> {
    match committed {
        Some(code) => Ok(Some(lookup.lookup(code).await?)),
        None => Ok(None),
    }
}
