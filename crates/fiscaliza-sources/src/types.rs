//! Response types for the two legislature APIs.
//!
//! The lower chamber wraps every list in `{"dados": [...]}` with camelCase
//! fields; the upper chamber nests its member list three levels deep with
//! PascalCase fields. Numeric fields arrive as numbers or numeric strings
//! depending on the endpoint, so those are kept as raw [`Value`]s and
//! converted in [`crate::normalize`].

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Câmara dos Deputados
// ---------------------------------------------------------------------------

/// Envelope for every Câmara list endpoint.
#[derive(Debug, Deserialize)]
pub struct CamaraEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub dados: Vec<T>,
}

/// An entry from `GET /deputados`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deputado {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub sigla_partido: Option<String>,
    #[serde(default)]
    pub sigla_uf: Option<String>,
    #[serde(default)]
    pub url_foto: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// An entry from `GET /deputados/{id}/despesas`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Despesa {
    #[serde(default)]
    pub ano: Option<Value>,
    #[serde(default)]
    pub mes: Option<Value>,
    #[serde(default)]
    pub tipo_despesa: Option<String>,
    #[serde(default)]
    pub nome_fornecedor: Option<String>,
    #[serde(default)]
    pub valor_liquido: Option<Decimal>,
    /// ISO timestamp or date, e.g. `"2025-03-05T00:00:00"`.
    #[serde(default)]
    pub data_documento: Option<String>,
}

/// An entry from `GET /deputados/{id}/votacoes`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Votacao {
    #[serde(default)]
    pub id_proposicao: Option<Value>,
    #[serde(default)]
    pub proposicao_objeto: Option<ProposicaoObjeto>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub tipo_voto: Option<String>,
    #[serde(default)]
    pub data_hora_voto: Option<String>,
}

/// The proposition a vote was cast on, when the API embeds it.
#[derive(Debug, Deserialize)]
pub struct ProposicaoObjeto {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub ementa: Option<String>,
}

/// An entry from `GET /proposicoes`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposicao {
    pub id: Value,
    #[serde(default)]
    pub sigla_tipo: Option<String>,
    #[serde(default)]
    pub numero: Option<Value>,
    #[serde(default)]
    pub ano: Option<Value>,
    #[serde(default)]
    pub ementa: Option<String>,
}

// ---------------------------------------------------------------------------
// Senado Federal
// ---------------------------------------------------------------------------

/// Top level of `GET /senador/lista/atual.json`.
#[derive(Debug, Deserialize)]
pub struct SenadoListResponse {
    #[serde(rename = "ListaParlamentarEmExercicio")]
    pub lista: ListaParlamentarEmExercicio,
}

#[derive(Debug, Deserialize)]
pub struct ListaParlamentarEmExercicio {
    #[serde(rename = "Parlamentares")]
    pub parlamentares: Parlamentares,
}

#[derive(Debug, Deserialize)]
pub struct Parlamentares {
    /// Kept raw: each entry carries its identity either inline or nested
    /// under `IdentificacaoParlamentar`.
    #[serde(rename = "Parlamentar", default)]
    pub parlamentar: OneOrMany<Value>,
}

/// The Senado API collapses single-element arrays into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Identity fields of one senator.
#[derive(Debug, Deserialize)]
pub struct IdentificacaoParlamentar {
    #[serde(rename = "CodigoParlamentar")]
    pub codigo: Value,
    #[serde(rename = "NomeParlamentar")]
    pub nome: String,
    #[serde(rename = "SiglaPartidoParlamentar", default)]
    pub sigla_partido: Option<String>,
    #[serde(rename = "UfParlamentar", default)]
    pub uf: Option<String>,
    #[serde(rename = "UrlFotoParlamentar", default)]
    pub url_foto: Option<String>,
    #[serde(rename = "EmailParlamentar", default)]
    pub email: Option<String>,
}
