//! Per-source adapters from API payloads into the shared domain records.

use std::collections::HashSet;

use chrono::NaiveDate;
use fiscaliza_core::{Politician, Proposition, RawExpense, RawVote, Role};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::{Deputado, Despesa, IdentificacaoParlamentar, Proposicao, Votacao};

pub const UNKNOWN_PROPOSITION_ID: &str = "unknown";
pub const VOTE_NOT_RECORDED: &str = "Não registrado";
pub const DEFAULT_VOTE_TITLE: &str = "Votação";
pub const DEFAULT_PROPOSITION_SUMMARY: &str = "Sem descrição disponível";
pub const PROPOSITION_AUTHOR: &str = "Câmara dos Deputados";
pub const PROPOSITION_STATUS: &str = "Em tramitação";

/// Treats blank strings as absent.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Parses the leading `YYYY-MM-DD` of a date or timestamp string.
#[must_use]
pub fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Renders a JSON scalar as an identifier string; `null` and blanks are absent.
#[must_use]
pub fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_blank(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a JSON number or numeric string as an `i64`.
#[must_use]
pub fn value_to_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_i32(value: Option<&Value>) -> Option<i32> {
    value_to_i64(value).and_then(|v| i32::try_from(v).ok())
}

#[must_use]
pub fn normalize_deputy(deputado: &Deputado) -> Politician {
    Politician {
        id: deputado.id,
        name: deputado.nome.trim().to_string(),
        party: deputado.sigla_partido.clone().unwrap_or_default(),
        state: deputado.sigla_uf.clone().unwrap_or_default(),
        role: Role::Deputy,
        photo: non_blank(deputado.url_foto.as_deref()),
        email: non_blank(deputado.email.as_deref()),
    }
}

/// Normalizes one raw `Parlamentar` entry.
///
/// Identity fields are read from the nested `IdentificacaoParlamentar`
/// object when present, otherwise from the entry itself. Returns `None`
/// when the entry has no usable numeric code or name.
#[must_use]
pub fn normalize_senator(entry: &Value) -> Option<Politician> {
    let identity = entry.get("IdentificacaoParlamentar").unwrap_or(entry);
    let parsed: IdentificacaoParlamentar = match serde_json::from_value(identity.clone()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "senado: skipping malformed member entry");
            return None;
        }
    };

    let Some(id) = value_to_i64(Some(&parsed.codigo)) else {
        tracing::warn!(codigo = %parsed.codigo, "senado: skipping member with non-numeric code");
        return None;
    };

    Some(Politician {
        id,
        name: parsed.nome.trim().to_string(),
        party: parsed.sigla_partido.unwrap_or_default(),
        state: parsed.uf.unwrap_or_default(),
        role: Role::Senator,
        photo: non_blank(parsed.url_foto.as_deref()),
        email: non_blank(parsed.email.as_deref()),
    })
}

/// Normalizes one expense line.
///
/// `fallback_year` is the year that was requested, used when the line omits
/// `ano`. Lines with a missing or out-of-range month are dropped.
#[must_use]
pub fn normalize_expense(
    politician_id: i64,
    despesa: &Despesa,
    fallback_year: i32,
) -> Option<RawExpense> {
    let year = value_to_i32(despesa.ano.as_ref()).unwrap_or(fallback_year);
    let month = value_to_i32(despesa.mes.as_ref()).filter(|m| (1..=12).contains(m))?;

    let category = non_blank(despesa.tipo_despesa.as_deref()).unwrap_or_default();
    let description =
        non_blank(despesa.nome_fornecedor.as_deref()).or_else(|| non_blank(Some(&category)));

    #[allow(clippy::cast_sign_loss)]
    let date = despesa
        .data_documento
        .as_deref()
        .and_then(parse_date_prefix)
        .or_else(|| NaiveDate::from_ymd_opt(year, month as u32, 1))?;

    Some(RawExpense {
        politician_id,
        year,
        month,
        category,
        description,
        value: despesa.valor_liquido.unwrap_or(Decimal::ZERO),
        date,
    })
}

#[must_use]
pub fn normalize_vote(politician_id: i64, votacao: &Votacao, today: NaiveDate) -> RawVote {
    let objeto = votacao.proposicao_objeto.as_ref();

    let proposition_id = value_to_string(votacao.id_proposicao.as_ref())
        .or_else(|| value_to_string(objeto.and_then(|o| o.id.as_ref())))
        .unwrap_or_else(|| UNKNOWN_PROPOSITION_ID.to_string());

    let proposition_title = non_blank(objeto.and_then(|o| o.ementa.as_deref()))
        .or_else(|| non_blank(votacao.descricao.as_deref()))
        .unwrap_or_else(|| DEFAULT_VOTE_TITLE.to_string());

    let vote = non_blank(votacao.tipo_voto.as_deref())
        .unwrap_or_else(|| VOTE_NOT_RECORDED.to_string());

    let date = votacao
        .data_hora_voto
        .as_deref()
        .and_then(parse_date_prefix)
        .unwrap_or(today);

    RawVote {
        politician_id,
        proposition_id,
        proposition_title,
        vote,
        date,
    }
}

/// Normalizes one proposition. Returns `None` when the id is unusable.
#[must_use]
pub fn normalize_proposition(proposicao: &Proposicao, today: NaiveDate) -> Option<Proposition> {
    let id = value_to_string(Some(&proposicao.id))?;
    Some(Proposition {
        id,
        kind: non_blank(proposicao.sigla_tipo.as_deref()).unwrap_or_default(),
        number: value_to_string(proposicao.numero.as_ref()).unwrap_or_default(),
        year: value_to_i32(proposicao.ano.as_ref()).unwrap_or_default(),
        summary: non_blank(proposicao.ementa.as_deref())
            .unwrap_or_else(|| DEFAULT_PROPOSITION_SUMMARY.to_string()),
        author: PROPOSITION_AUTHOR.to_string(),
        status: PROPOSITION_STATUS.to_string(),
        date: today,
    })
}

/// Drops repeated identifiers, keeping the first occurrence.
///
/// Each chamber's list is expected to be unique already; a repeat would make
/// the batch upsert touch the same row twice, which Postgres rejects.
#[must_use]
pub fn dedupe_by_id(politicians: Vec<Politician>) -> Vec<Politician> {
    let mut seen = HashSet::with_capacity(politicians.len());
    politicians
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id);
            if !fresh {
                tracing::warn!(politician_id = p.id, "dropping duplicate member entry");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::ProposicaoObjeto;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn deputy_blank_optionals_become_absent() {
        let deputado = Deputado {
            id: 204_554,
            nome: "Ana Maria Silva".to_string(),
            sigla_partido: Some("PT".to_string()),
            sigla_uf: Some("SP".to_string()),
            url_foto: Some(String::new()),
            email: None,
        };
        let p = normalize_deputy(&deputado);
        assert_eq!(p.role, Role::Deputy);
        assert_eq!(p.party, "PT");
        assert!(p.photo.is_none());
        assert!(p.email.is_none());
    }

    #[test]
    fn senator_reads_flat_entry() {
        let entry = json!({
            "CodigoParlamentar": "5012",
            "NomeParlamentar": "Randolfe Rodrigues",
            "SiglaPartidoParlamentar": "PT",
            "UfParlamentar": "AP",
            "UrlFotoParlamentar": "http://www.senado.leg.br/senadores/img/fotos-oficiais/senador5012.jpg",
            "EmailParlamentar": "sen.randolferodrigues@senado.leg.br"
        });
        let p = normalize_senator(&entry).expect("senator");
        assert_eq!(p.id, 5012);
        assert_eq!(p.role, Role::Senator);
        assert_eq!(p.state, "AP");
        assert!(p.email.is_some());
    }

    #[test]
    fn senator_reads_nested_identity() {
        let entry = json!({
            "IdentificacaoParlamentar": {
                "CodigoParlamentar": "945",
                "NomeParlamentar": "Tereza Cristina",
                "SiglaPartidoParlamentar": "PP",
                "UfParlamentar": "MS"
            },
            "Mandato": {}
        });
        let p = normalize_senator(&entry).expect("senator");
        assert_eq!(p.id, 945);
        assert_eq!(p.name, "Tereza Cristina");
        assert!(p.photo.is_none());
    }

    #[test]
    fn senator_with_non_numeric_code_is_skipped() {
        let entry = json!({ "CodigoParlamentar": "abc", "NomeParlamentar": "X" });
        assert!(normalize_senator(&entry).is_none());
    }

    #[test]
    fn expense_accepts_string_year_and_month() {
        let despesa = Despesa {
            ano: Some(json!("2025")),
            mes: Some(json!("3")),
            tipo_despesa: Some("COMBUSTÍVEIS E LUBRIFICANTES.".to_string()),
            nome_fornecedor: Some("Posto Central".to_string()),
            valor_liquido: Some(Decimal::new(25_050, 2)),
            data_documento: Some("2025-03-05T00:00:00".to_string()),
        };
        let e = normalize_expense(1, &despesa, 2025).expect("expense");
        assert_eq!((e.year, e.month), (2025, 3));
        assert_eq!(e.date, day(2025, 3, 5));
        assert_eq!(e.description.as_deref(), Some("Posto Central"));
        assert_eq!(e.value, Decimal::new(25_050, 2));
    }

    #[test]
    fn expense_without_document_date_uses_first_of_month() {
        let despesa = Despesa {
            ano: Some(json!(2025)),
            mes: Some(json!(11)),
            tipo_despesa: Some("TELEFONIA".to_string()),
            nome_fornecedor: None,
            valor_liquido: None,
            data_documento: None,
        };
        let e = normalize_expense(1, &despesa, 2025).expect("expense");
        assert_eq!(e.date, day(2025, 11, 1));
        assert_eq!(e.value, Decimal::ZERO);
        assert_eq!(e.description.as_deref(), Some("TELEFONIA"));
    }

    #[test]
    fn expense_with_invalid_month_is_dropped() {
        let despesa = Despesa {
            ano: Some(json!(2025)),
            mes: Some(json!(13)),
            tipo_despesa: None,
            nome_fornecedor: None,
            valor_liquido: None,
            data_documento: None,
        };
        assert!(normalize_expense(1, &despesa, 2025).is_none());
    }

    #[test]
    fn vote_defaults_when_source_omits_fields() {
        let votacao = Votacao {
            id_proposicao: None,
            proposicao_objeto: None,
            descricao: None,
            tipo_voto: None,
            data_hora_voto: None,
        };
        let today = day(2025, 6, 10);
        let v = normalize_vote(7, &votacao, today);
        assert_eq!(v.proposition_id, UNKNOWN_PROPOSITION_ID);
        assert_eq!(v.proposition_title, DEFAULT_VOTE_TITLE);
        assert_eq!(v.vote, VOTE_NOT_RECORDED);
        assert_eq!(v.date, today);
    }

    #[test]
    fn vote_falls_back_to_embedded_proposition() {
        let votacao = Votacao {
            id_proposicao: None,
            proposicao_objeto: Some(ProposicaoObjeto {
                id: Some(json!(2_270_800)),
                ementa: Some("Dispõe sobre o orçamento".to_string()),
            }),
            descricao: Some("Votação nominal".to_string()),
            tipo_voto: Some("Sim".to_string()),
            data_hora_voto: Some("2025-05-20T18:32:10".to_string()),
        };
        let v = normalize_vote(7, &votacao, day(2025, 6, 10));
        assert_eq!(v.proposition_id, "2270800");
        assert_eq!(v.proposition_title, "Dispõe sobre o orçamento");
        assert_eq!(v.vote, "Sim");
        assert_eq!(v.date, day(2025, 5, 20));
    }

    #[test]
    fn proposition_fills_fixed_fields() {
        let proposicao = Proposicao {
            id: json!(2_501_234),
            sigla_tipo: Some("PL".to_string()),
            numero: Some(json!(1087)),
            ano: Some(json!(2025)),
            ementa: None,
        };
        let today = day(2025, 6, 10);
        let p = normalize_proposition(&proposicao, today).expect("proposition");
        assert_eq!(p.id, "2501234");
        assert_eq!(p.number, "1087");
        assert_eq!(p.year, 2025);
        assert_eq!(p.summary, DEFAULT_PROPOSITION_SUMMARY);
        assert_eq!(p.author, PROPOSITION_AUTHOR);
        assert_eq!(p.status, PROPOSITION_STATUS);
        assert_eq!(p.date, today);
    }

    #[test]
    fn parse_date_prefix_handles_short_input() {
        assert_eq!(parse_date_prefix("2025-01"), None);
        assert_eq!(parse_date_prefix("2025-01-31"), Some(day(2025, 1, 31)));
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let make = |id, name: &str| Politician {
            id,
            name: name.to_string(),
            party: "X".to_string(),
            state: "SP".to_string(),
            role: Role::Deputy,
            photo: None,
            email: None,
        };
        let out = dedupe_by_id(vec![make(1, "A"), make(2, "B"), make(1, "C")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "A");
    }
}
