/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (session / bearer token gate), http (trace / limits), vary
 */
pub mod auth;
pub mod http;
pub mod vary;
