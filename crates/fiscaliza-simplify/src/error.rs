use thiserror::Error;

/// Failures of a simplification request.
///
/// The `Display` text is user-facing and returned verbatim in error payloads.
#[derive(Debug, Error)]
pub enum SimplifyError {
    #[error("Campo text_to_simplify é obrigatório")]
    MissingInput,

    #[error("Chave da API de IA não configurada")]
    MissingApiKey,

    #[error("Limite de requisições excedido. Tente novamente mais tarde.")]
    RateLimited,

    #[error("Créditos insuficientes no provedor de IA.")]
    QuotaExhausted,

    #[error("Erro ao processar com IA (status {status})")]
    Upstream { status: u16 },

    #[error("Erro ao processar com IA: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Resposta da IA vazia")]
    EmptyResponse,
}
