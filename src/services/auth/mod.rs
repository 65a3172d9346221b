pub mod context;
pub mod factory;
pub mod identity;
pub mod public_paths;
pub mod token;

#[cfg(test)]
pub mod testing;

pub use context::{Principal, RequestDetails};
pub use identity::{IdentityLookup, IdentityRecord, LookupError, UserDirectory};
pub use public_paths::PublicPaths;
pub use token::{JwtTokenService, TokenError, TokenService};
