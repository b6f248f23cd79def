use crate::session::{Notice, RequestState, Resolution};
use crate::viacep::model::{AddressRecord, FieldKey};

/// shown in place of any absent or unresolved field
pub const PLACEHOLDER: &str = "-";
const SKELETON: &str = "░░░░░░░░";

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub label: &'static str,
    pub key: FieldKey,
}

pub const FIELDS: [FieldDescriptor; 10] = [
    FieldDescriptor { label: "CEP", key: FieldKey::Cep },
    FieldDescriptor { label: "Street", key: FieldKey::Street },
    FieldDescriptor { label: "Complement", key: FieldKey::Complement },
    FieldDescriptor { label: "Neighborhood", key: FieldKey::Neighborhood },
    FieldDescriptor { label: "City", key: FieldKey::City },
    FieldDescriptor { label: "State", key: FieldKey::State },
    FieldDescriptor { label: "IBGE", key: FieldKey::Ibge },
    FieldDescriptor { label: "GIA", key: FieldKey::Gia },
    FieldDescriptor { label: "DDD", key: FieldKey::Ddd },
    FieldDescriptor { label: "SIAFI", key: FieldKey::Siafi },
];

const LABEL_WIDTH: usize = 12;

/// Render the results panel, one labeled line per field.
pub fn render_panel(state: &RequestState) -> String {
    match state {
        RequestState::Loading(_) => render_lines(|_| SKELETON),
        RequestState::Settled { resolution: Resolution::Found(record), .. } => render_record(record),
        RequestState::Idle | RequestState::Settled { resolution: Resolution::NotFound, .. } => {
            render_lines(|_| PLACEHOLDER)
        }
    }
}

pub fn render_record(record: &AddressRecord) -> String {
    render_lines(|key| record.get(key).unwrap_or(PLACEHOLDER))
}

fn render_lines<'a>(value_of: impl Fn(FieldKey) -> &'a str) -> String {
    FIELDS.iter()
        .map(|field| format!("{:<width$} {}\n", format!("{}:", field.label), value_of(field.key), width = LABEL_WIDTH + 1))
        .collect()
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::NotFound { code } => format!("address not found: no address is registered for [{}]", code),
        Notice::Failed { code, reason } => format!("lookup failed for [{}]: {}", code, reason),
    }
}
