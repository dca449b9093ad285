//! Typed entities for the [Discord](https://discord.com) RPC protocol.
//!
//! A local Discord client answers RPC commands and pushes subscribed events
//! as JSON envelopes. Once the envelope is parsed, the payload is a loosely
//! typed tree: identifiers arrive as decimal strings, colours as `#RRGGBB`,
//! timestamps as ISO-8601 strings, and many fields may be missing or `null`.
//! This crate turns such payloads into immutable, strongly typed entities.
//!
//! Decode a whole event with `Event::decode`, or a single entity with the
//! [`Decode`] trait:
//!
//! ```
//! use discord_rpc_model::model::{HasUserAttributes, User};
//! use discord_rpc_model::Decode;
//!
//! let user = User::decode(serde_json::json!({
//!     "id": "190320984123768832",
//!     "username": "test 2",
//!     "discriminator": "7479",
//!     "avatar": null,
//! }))?;
//! assert_eq!(user.tag(), "test 2#7479");
//! assert!(!user.is_bot());
//! # Ok::<(), discord_rpc_model::Error>(())
//! ```
//!
//! Decoding is pure: it performs no I/O, shares no state and never retries,
//! so payloads may be decoded from any number of threads at once. The first
//! problem found aborts the decode and is reported as an [`Error`] naming the
//! offending field. Optional fields that are absent decode to `None`.

#![warn(missing_docs)]
#![cfg_attr(test, deny(missing_docs))]

/// A JSON mapping, as found in every RPC payload.
pub type Object = serde_json::Map<String, serde_json::Value>;

mod error;

macro_rules! cdn_concat {
    ($e:expr) => {
        // Out of everything, only the CDN still uses the old domain.
        concat!("https://cdn.discordapp.com", $e)
    };
}

/// Struct and enum definitions of values in the Discord RPC model.
#[allow(missing_docs)]
pub mod model {
    mod capability;
    pub use self::capability::*;

    mod colour;
    pub use self::colour::*;

    mod event;
    pub use self::event::*;

    mod frozen;
    pub use self::frozen::*;

    mod live;
    pub use self::live::*;
}

pub mod serial;

pub use error::{Error, Result};
pub use serial::Decode;
