//! Connection state types for NNTP client

/// NNTP connection state tracking authentication progress (RFC 4643)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ConnectionState {
    /// Connected and ready for commands (not authenticated)
    Ready,
    /// Successfully authenticated
    Authenticated,
    /// QUIT acknowledged; no further exchanges
    Closed,
}
