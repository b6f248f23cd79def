use serde::Serialize;
use crate::viacep::model::AddressRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Found,
    NotFound,
    Invalid,
    Failed,
}

/// One row of the batch CSV output
#[derive(Debug, Serialize)]
pub struct Record {
    input: String,
    pub status: Status,
    cep: Option<String>,
    street: Option<String>,
    complement: Option<String>,
    neighborhood: Option<String>,
    city: Option<String>,
    state: Option<String>,
    ibge: Option<String>,
    gia: Option<String>,
    ddd: Option<String>,
    siafi: Option<String>,
    error: Option<String>,
}

impl Record {
    pub fn from_lookup(input: String, record: AddressRecord) -> Self {
        if record.is_not_found() {
            return Self::empty(input, Status::NotFound, None);
        }
        Self {
            input,
            status: Status::Found,
            cep: record.cep,
            street: record.street,
            complement: record.complement,
            neighborhood: record.neighborhood,
            city: record.city,
            state: record.state,
            ibge: record.ibge,
            gia: record.gia,
            ddd: record.ddd,
            siafi: record.siafi,
            error: None,
        }
    }

    pub fn invalid(input: String, reason: &str) -> Self {
        Self::empty(input, Status::Invalid, Some(reason.to_string()))
    }

    pub fn failed(input: String, err: &color_eyre::Report) -> Self {
        Self::empty(input, Status::Failed, Some(format!("{:#}", err)))
    }

    fn empty(input: String, status: Status, error: Option<String>) -> Self {
        Self {
            input,
            status,
            cep: None,
            street: None,
            complement: None,
            neighborhood: None,
            city: None,
            state: None,
            ibge: None,
            gia: None,
            ddd: None,
            siafi: None,
            error,
        }
    }
}
