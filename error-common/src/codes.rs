// Error codes implementation
// Standardized codes carried in API error bodies and logs

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_2001";
    pub const VERSION_CONFLICT: &str = "RESOURCE_2002";
    pub const DUPLICATE_KEY: &str = "RESOURCE_2003";
}

pub mod store {
    pub const CONNECTION_FAILED: &str = "STORE_4001";
    pub const QUERY_FAILED: &str = "STORE_4002";
}

pub mod config {
    pub const INVALID_CONFIG: &str = "CONFIG_6001";
}

pub mod server {
    pub const LISTENER_FAILED: &str = "SERVER_7001";
}
