// Internal types - not exposed over the API
pub mod auth;
pub mod directory;
pub mod summary;
pub mod sync;
pub mod user;

pub use auth::{Claims, Identity};
pub use directory::{
    DirectoryAccessToken, DirectoryAssertion, DirectoryCredentials, DirectoryGroup,
    DirectoryIdentity,
};
pub use summary::{ApiLogEntry, ResponseSummary, SummarySlot};
pub use sync::{MatchKey, Resolution, SyncResult};
pub use user::{NewUser, Origin, UserFilter, UserUpdate};
