use serde::Serialize;

/// What a gated form handler actually received.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub sub: Option<String>,
    pub fields: Vec<(String, String)>,
}
