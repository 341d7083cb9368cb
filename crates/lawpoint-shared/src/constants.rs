/// Base URL of the HTTP gateway used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default HTTP port of the gateway
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Request timeout of the gateway client, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Case type used when a client sends a request without a drafted case
pub const GENERAL_INQUIRY_CASE_TYPE: &str = "General Inquiry";
pub const GENERAL_INQUIRY_DESCRIPTION: &str = "Client is interested in your services.";

/// Description given to cases opened directly by a lawyer
pub const MANUAL_CASE_DESCRIPTION: &str = "Manually created case file.";

/// Text shown in place of a message deleted for everyone
pub const DELETED_MESSAGE_PLACEHOLDER: &str = "This message was deleted";

/// Id prefixes, one per generated record kind
pub const REQUEST_ID_PREFIX: &str = "req";
pub const CASE_ID_PREFIX: &str = "case";
pub const CHAT_ID_PREFIX: &str = "chat";
pub const MESSAGE_ID_PREFIX: &str = "msg";
pub const DRAFT_ID_PREFIX: &str = "draft";
pub const COMMENT_ID_PREFIX: &str = "c";
pub const POST_ID_PREFIX: &str = "post";
pub const NOTIFICATION_ID_PREFIX: &str = "notif";
