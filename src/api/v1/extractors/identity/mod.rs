/*!
 * Identity extractor
 *
 * Responsibility:
 * - request の identity slot（Identity / ResolvedIdentity）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - Identity, Principal, AuthMethod, ResolvedIdentity
 * - CurrentIdentity, RequireUser
 * - attach_resolved
 */

mod core;
mod types;

pub use self::core::{CurrentIdentity, RequireUser, attach_resolved};
pub use self::types::{AuthMethod, Identity, Principal, ResolvedIdentity};
