/*!
 * Claims context accessor
 *
 * Responsibility:
 * - ゲートが検証した claims を handler に提供する
 * - extensions のキーは crate 内部の型なので、ゲート以外は書き込めない
 *
 * Public API:
 * - claims / claims_from_extensions
 * - Authenticated
 */

mod core;
mod types;

pub use self::core::Authenticated;
pub(crate) use self::types::attach;
pub use self::types::{claims, claims_from_extensions};
