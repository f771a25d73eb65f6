//! Integration tests for `CamaraClient` using wiremock HTTP mocks.

use chrono::NaiveDate;
use fiscaliza_core::Role;
use fiscaliza_sources::normalize::{UNKNOWN_PROPOSITION_ID, VOTE_NOT_RECORDED};
use fiscaliza_sources::{CamaraClient, SourceConfig, SourceError};
use rust_decimal::Decimal;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> CamaraClient {
    let config = SourceConfig {
        max_retries: 0,
        retry_backoff_ms: 0,
        ..SourceConfig::default()
    };
    CamaraClient::new(&config, base_url).expect("client construction should not fail")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

#[tokio::test]
async fn fetch_deputies_sends_ordering_and_parses_list() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "dados": [
            {
                "id": 204554,
                "nome": "Abílio Brunini",
                "siglaPartido": "PL",
                "siglaUf": "MT",
                "urlFoto": "https://www.camara.leg.br/internet/deputado/bandep/204554.jpg",
                "email": "dep.abiliobrunini@camara.leg.br"
            },
            {
                "id": 220593,
                "nome": "Adriana Ventura",
                "siglaPartido": "NOVO",
                "siglaUf": "SP",
                "urlFoto": "",
                "email": null
            }
        ],
        "links": []
    });

    Mock::given(method("GET"))
        .and(path("/deputados"))
        .and(query_param("ordem", "ASC"))
        .and(query_param("ordenarPor", "nome"))
        .and(query_param("itens", "513"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let deputies = test_client(&server.uri())
        .fetch_deputies()
        .await
        .expect("should parse deputies");

    assert_eq!(deputies.len(), 2);
    assert_eq!(deputies[0].id, 204_554);
    assert_eq!(deputies[0].role, Role::Deputy);
    assert_eq!(deputies[1].state, "SP");
    assert!(deputies[1].photo.is_none());
    assert!(deputies[1].email.is_none());
}

#[tokio::test]
async fn fetch_expenses_requests_year_and_normalizes_lines() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "dados": [
            {
                "ano": 2025,
                "mes": 2,
                "tipoDespesa": "PASSAGEM AÉREA - SIGEPA",
                "nomeFornecedor": "Cia Aérea",
                "valorLiquido": 1234.56,
                "dataDocumento": "2025-02-14T00:00:00"
            },
            {
                "ano": 2025,
                "mes": 2,
                "tipoDespesa": "TELEFONIA",
                "nomeFornecedor": null,
                "valorLiquido": 80,
                "dataDocumento": null
            },
            {
                "ano": 2025,
                "mes": null,
                "tipoDespesa": "TELEFONIA",
                "valorLiquido": 10
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/deputados/204554/despesas"))
        .and(query_param("ano", "2025"))
        .and(query_param("itens", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let expenses = test_client(&server.uri())
        .fetch_expenses(204_554, 2025)
        .await
        .expect("should parse expenses");

    assert_eq!(expenses.len(), 2, "line without a month is dropped");
    assert_eq!(expenses[0].value, Decimal::new(123_456, 2));
    assert_eq!(
        expenses[0].date,
        NaiveDate::from_ymd_opt(2025, 2, 14).expect("valid date")
    );
    assert_eq!(expenses[1].description.as_deref(), Some("TELEFONIA"));
    assert_eq!(
        expenses[1].date,
        NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date")
    );
}

#[tokio::test]
async fn fetch_votes_fills_defaults() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "dados": [
            {
                "idProposicao": 2_270_800,
                "proposicaoObjeto": { "ementa": "Estabelece diretrizes orçamentárias" },
                "tipoVoto": "Sim",
                "dataHoraVoto": "2025-05-20T18:32:10"
            },
            {}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/deputados/204554/votacoes"))
        .and(query_param("ordem", "DESC"))
        .and(query_param("ordenarPor", "dataHoraVoto"))
        .and(query_param("itens", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let votes = test_client(&server.uri())
        .fetch_votes(204_554, today())
        .await
        .expect("should parse votes");

    assert_eq!(votes.len(), 2);
    assert_eq!(votes[0].proposition_id, "2270800");
    assert_eq!(votes[0].vote, "Sim");
    assert_eq!(votes[1].proposition_id, UNKNOWN_PROPOSITION_ID);
    assert_eq!(votes[1].vote, VOTE_NOT_RECORDED);
    assert_eq!(votes[1].date, today());
}

#[tokio::test]
async fn fetch_recent_propositions_passes_limit() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "dados": [
            { "id": 2_501_234, "siglaTipo": "PL", "numero": 1087, "ano": 2025, "ementa": "Institui o programa" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/proposicoes"))
        .and(query_param("ordenarPor", "id"))
        .and(query_param("itens", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let props = test_client(&server.uri())
        .fetch_recent_propositions(50, today())
        .await
        .expect("should parse propositions");

    assert_eq!(props.len(), 1);
    assert_eq!(props[0].kind, "PL");
    assert_eq!(props[0].status, "Em tramitação");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deputados"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_deputies()
        .await
        .expect_err("503 should fail");

    assert!(
        matches!(err, SourceError::Status { status: 503, .. }),
        "expected Status 503, got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deputados"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>manutenção</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_deputies()
        .await
        .expect_err("html body should fail");

    assert!(
        matches!(err, SourceError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deputados"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/deputados"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "dados": [] })))
        .mount(&server)
        .await;

    let config = SourceConfig {
        max_retries: 1,
        retry_backoff_ms: 0,
        ..SourceConfig::default()
    };
    let client = CamaraClient::new(&config, &server.uri()).expect("client");
    let deputies = client.fetch_deputies().await.expect("retry should succeed");
    assert!(deputies.is_empty());
}
