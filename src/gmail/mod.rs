//! Gmail API adapter
//!
//! The tool registry, request construction, MIME helpers, transport, and
//! response shaping for the Gmail REST API.

pub mod mime;
pub mod registry;
pub mod request;
pub mod response;
pub mod transport;
