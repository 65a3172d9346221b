/*!
 * Current-user extractors
 *
 * Responsibility:
 * - Hand the principal attached by the authentication gate to handlers
 * - `CurrentUser` rejects anonymous requests (401), `MaybeCurrentUser` never rejects
 */

mod core;

pub use core::{CurrentUser, MaybeCurrentUser};
