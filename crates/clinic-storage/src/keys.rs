//! Storage key constants.

/// Keys used for persisted client state.
pub struct StoreKeys;

impl StoreKeys {
    /// Access token (short-lived bearer credential)
    pub const ACCESS_TOKEN: &'static str = "token";

    /// Refresh token
    pub const REFRESH_TOKEN: &'static str = "refreshToken";
}
