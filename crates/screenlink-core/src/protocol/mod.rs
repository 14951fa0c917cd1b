//! Wire protocol for the ScreenLink channel.
//!
//! The channel exchanges self-describing JSON frames. One frame is one JSON
//! object with a `"type"` discriminant and a type-specific `"payload"`:
//!
//! ```json
//! {"type":"click_at","payload":{"x":200,"y":100}}
//! {"type":"screenshot","payload":"<base64 image>"}
//! ```
//!
//! `messages` defines the tagged unions for both directions; `codec` turns
//! them into and out of text frames.

pub mod codec;
pub mod messages;
