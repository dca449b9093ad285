//! Accessor sets shared between entities.
//!
//! Entities that wrap another entity (a [`Member`](super::Member) wraps a
//! [`User`], a [`Server`](super::Server) wraps a [`LightServer`]) implement
//! the `as_*` method of the corresponding trait and get every other accessor
//! forwarded for free.

use std::fmt;

use super::{LightServer, User, VoiceState};

/// An entity carrying a snowflake identifier.
///
/// Two entities describe the same remote object iff their identifiers are
/// equal; entities carry no other equality contract.
pub trait HasIdentity {
    /// The identifier type, e.g. [`UserId`](super::UserId).
    type Id: Copy + Eq + fmt::Debug;

    fn id(&self) -> Self::Id;

    /// Whether `other` describes the same remote object as `self`.
    fn is_same<T>(&self, other: &T) -> bool
    where
        T: HasIdentity<Id = Self::Id> + ?Sized,
    {
        self.id() == other.id()
    }
}

/// An entity describing a user account.
pub trait HasUserAttributes {
    /// The user this entity describes.
    fn as_user(&self) -> &User;

    /// The user's username, not unique across the platform.
    fn username(&self) -> &str {
        &self.as_user().username
    }

    /// The user's Discord-tag.
    fn discriminator(&self) -> &str {
        &self.as_user().discriminator
    }

    /// The user's avatar hash.
    fn avatar(&self) -> Option<&str> {
        self.as_user().avatar.as_deref()
    }

    /// Whether the user belongs to an OAuth2 application.
    fn is_bot(&self) -> bool {
        self.as_user().bot
    }
}

/// An entity describing a server.
pub trait HasServerAttributes {
    fn as_server(&self) -> &LightServer;

    fn name(&self) -> &str {
        &self.as_server().name
    }

    /// The icon hash, extracted from [`icon_url`](Self::icon_url).
    fn icon_id(&self) -> Option<&str> {
        self.as_server().icon_id.as_deref()
    }

    fn icon_url(&self) -> Option<&str> {
        self.as_server().icon_url.as_deref()
    }
}

/// An entity describing someone's state within a voice channel.
pub trait HasVoiceAttributes {
    fn as_voice_state(&self) -> &VoiceState;

    /// If the user has been muted by an administrator
    fn mute(&self) -> bool {
        self.as_voice_state().mute
    }

    /// If the user has been deafened by an administrator
    fn deaf(&self) -> bool {
        self.as_voice_state().deaf
    }

    /// If the user has muted themselves
    fn self_mute(&self) -> bool {
        self.as_voice_state().self_mute
    }

    /// If the user has deafened themselves
    fn self_deaf(&self) -> bool {
        self.as_voice_state().self_deaf
    }
}
