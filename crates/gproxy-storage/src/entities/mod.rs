pub mod api_keys;
pub mod credential_disallow;
pub mod credentials;
pub mod downstream_requests;
pub mod global_config;
pub mod internal_events;
pub mod providers;
pub mod upstream_requests;
pub mod upstream_usages;
pub mod user_keys;
pub mod users;

pub use api_keys::Entity as ApiKeys;
pub use credential_disallow::Entity as CredentialDisallow;
pub use credentials::Entity as Credentials;
pub use downstream_requests::Entity as DownstreamRequests;
pub use global_config::Entity as GlobalConfig;
pub use internal_events::Entity as InternalEvents;
pub use providers::Entity as Providers;
pub use upstream_requests::Entity as UpstreamRequests;
pub use upstream_usages::Entity as UpstreamUsages;
pub use user_keys::Entity as UserKeys;
pub use users::Entity as Users;
