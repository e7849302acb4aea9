pub mod event;

/// Opaque bearer credential; resolved to a user through the
/// key-value store.
pub struct AccessToken(pub String);
