//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Backend endpoints
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:8000/api";
pub const PRODUCTION_BASE_URL: &str = "https://api.mentiq.app/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const TOKEN_REFRESH_ENDPOINT: &str = "/v1/auth/token/refresh/";

// Durable storage
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "mentiq";

// Live classes
pub const DEFAULT_CONFERENCE_DOMAIN: &str = "meet.jit.si";
pub const LIVE_CLASS_ROOM_PREFIX: &str = "mentiq_live_class_";

// Media uploads
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
pub const DEFAULT_BINARY_MIME: &str = "application/octet-stream";
