/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: JWT ゲート, http: 横断的な transport 層
 */
pub mod auth;
pub mod http;
pub mod security_headers;
