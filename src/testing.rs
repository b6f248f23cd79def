use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use color_eyre::eyre::eyre;
use tokio::sync::oneshot;
use crate::viacep::model::AddressRecord;
use crate::viacep::AddressLookup;

pub type Answer = color_eyre::Result<AddressRecord>;

/// Lookup whose answers are released by the test, one gate per code
#[derive(Default)]
pub struct GatedLookup {
    gates: Mutex<HashMap<String, Vec<oneshot::Receiver<Answer>>>>,
    pub requested: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl GatedLookup {
    pub fn gate(&self, code: &str) -> oneshot::Sender<Answer> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().entry(code.to_string()).or_default().push(rx);
        tx
    }
}

impl AddressLookup for GatedLookup {
    async fn lookup(&self, code: &str) -> Answer {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(code.to_string());
        let gate = {
            let mut gates = self.gates.lock().unwrap();
            gates.get_mut(code).filter(|pending| !pending.is_empty()).map(|pending| pending.remove(0))
        };
        match gate {
            Some(rx) => rx.await.map_err(|_| eyre!("gate for [{}] dropped", code))?,
            None => Err(eyre!("no gate for [{}]", code)),
        }
    }
}

pub fn city(name: &str) -> Answer {
    Ok(AddressRecord {
        city: Some(name.to_string()),
        ..Default::default()
    })
}
