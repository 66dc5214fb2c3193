//! Bearer トークンの抽出 (ヘッダ → クエリ → フォーム本文)
//!
//! - キー名はどこでも `Authorization`
//! - ヘッダ値はそのまま使う。`Bearer ` プレフィックスは剥がさない
//!   (`Authorization: Bearer <jwt>` を送ると署名検証で 403 になる)
//! - フォーム本文から見つけた場合、下流の handler にはトークンを渡さない

use axum::{
    body::{Body, Bytes},
    http::{Method, Request, header},
};
use url::form_urlencoded;

pub const JWT_AUTH_KEY: &str = "Authorization";

/// Default cap for buffering a form body while looking for the token.
pub const DEFAULT_FORM_LIMIT: usize = 1024 * 1024;

/// Where the token was found. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Query,
    Form,
}

/// Locate the token by fixed precedence; first non-empty match wins.
///
/// A form-body lookup buffers the body (up to `form_limit` bytes) and puts it
/// back, minus every `Authorization` pair if the token came from there. Read
/// or decode failures of the body count as "not found".
pub async fn locate(req: &mut Request<Body>, form_limit: usize) -> Option<(String, TokenSource)> {
    if let Some(token) = from_header(req) {
        return Some((token, TokenSource::Header));
    }

    if let Some(token) = req.uri().query().and_then(from_query) {
        return Some((token, TokenSource::Query));
    }

    from_form(req, form_limit)
        .await
        .map(|token| (token, TokenSource::Form))
}

// Any non-empty value counts. Non-ASCII bytes are decoded lossily and left
// for the verifier to reject.
fn from_header(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.is_empty())
}

fn from_query(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| k == JWT_AUTH_KEY)
        .map(|(_, v)| v.into_owned())
        .find(|v| !v.is_empty())
}

fn has_form_body(req: &Request<Body>) -> bool {
    let method = req.method();
    if method != Method::POST && method != Method::PUT && method != Method::PATCH {
        return false;
    }

    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

async fn from_form(req: &mut Request<Body>, form_limit: usize) -> Option<String> {
    if !has_form_body(req) {
        return None;
    }

    let body = std::mem::take(req.body_mut());
    let bytes = match axum::body::to_bytes(body, form_limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            // body is gone; the request is answered with 401 anyway
            tracing::debug!(error = %err, "cannot read form body");
            return None;
        }
    };

    match split_form(&bytes) {
        Some((token, rest)) => {
            let len = rest.len();
            *req.body_mut() = Body::from(rest);
            req.headers_mut()
                .insert(header::CONTENT_LENGTH, header::HeaderValue::from(len));
            Some(token)
        }
        None => {
            *req.body_mut() = Body::from(bytes);
            None
        }
    }
}

/// Pull the first non-empty `Authorization` value out of a urlencoded body and
/// re-encode everything else. `None` if absent, empty, or malformed.
fn split_form(bytes: &Bytes) -> Option<(String, String)> {
    let text = std::str::from_utf8(bytes).ok()?;
    if !valid_percent_escapes(text) {
        return None;
    }

    let mut token = None;
    let mut rest = form_urlencoded::Serializer::new(String::new());
    for (k, v) in form_urlencoded::parse(text.as_bytes()) {
        if k == JWT_AUTH_KEY {
            if token.is_none() && !v.is_empty() {
                token = Some(v.into_owned());
            }
        } else {
            rest.append_pair(&k, &v);
        }
    }

    token.map(|token| (token, rest.finish()))
}

// form_urlencoded is lenient about `%zz`; treat it as a malformed body instead.
fn valid_percent_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let ok = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !ok {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
