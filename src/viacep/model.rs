use serde::{Deserialize, Deserializer, Serialize};

/// Address returned by ViaCEP for a postal code.
///
/// Every field is optional: the service omits or blanks the ones it doesn't know,
/// and a not-found answer carries only the `erro` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub cep: Option<String>,
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(rename = "localidade")]
    pub city: Option<String>,
    /// state abbreviation, i.e. `SP`
    #[serde(rename = "uf")]
    pub state: Option<String>,
    pub ibge: Option<String>,
    pub gia: Option<String>,
    pub ddd: Option<String>,
    pub siafi: Option<String>,
    #[serde(
        rename = "erro",
        default,
        deserialize_with = "deserialize_marker",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub not_found: bool,
}

/// The ten address fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Cep,
    Street,
    Complement,
    Neighborhood,
    City,
    State,
    Ibge,
    Gia,
    Ddd,
    Siafi,
}

impl AddressRecord {
    /// get a field value, treating blank strings as absent
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        let value = match key {
            FieldKey::Cep => &self.cep,
            FieldKey::Street => &self.street,
            FieldKey::Complement => &self.complement,
            FieldKey::Neighborhood => &self.neighborhood,
            FieldKey::City => &self.city,
            FieldKey::State => &self.state,
            FieldKey::Ibge => &self.ibge,
            FieldKey::Gia => &self.gia,
            FieldKey::Ddd => &self.ddd,
            FieldKey::Siafi => &self.siafi,
        };
        value.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

/// ViaCEP has sent the marker both as `true` and as `"true"`
fn deserialize_marker<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Marker {
        Bool(bool),
        Text(String),
    }

    Ok(match Marker::deserialize(deserializer)? {
        Marker::Bool(flag) => flag,
        Marker::Text(text) => text.trim().eq_ignore_ascii_case("true"),
    })
}
