pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const MAX_REDIRECTS: usize = 10;
}

pub mod pagination {
    pub const MAX_LIMIT: i64 = 500;
    pub const DEFAULT_LIMIT: i64 = 50;
}

pub mod limits {
    pub const MAX_MEMO_LENGTH: usize = 256;
    pub const MAX_BODY_DETAIL_BYTES: usize = 4 * 1024;
}

pub mod upstream {
    pub const DEFAULT_BASE_URL: &str = "https://api.mercury.com/api/v1";
}

pub mod env_vars {
    /// Deployment-injected token. Always consulted first.
    pub const API_TOKEN: &str = "BANKGATE_API_TOKEN";
    /// Local-development token, used only when the deployment token is absent.
    pub const API_TOKEN_DEV: &str = "BANKGATE_API_TOKEN_DEV";
    pub const API_BASE_URL: &str = "BANKGATE_API_BASE_URL";
}
