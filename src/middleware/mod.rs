/*
 * Responsibility
 * - Router-level middleware
 *   - auth: request authentication gate
 *   - http: request id, access log, body limit, timeout
 */
pub mod auth;
pub mod http;
