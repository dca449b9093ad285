//! Data models for resources that rarely change while an RPC session is open.
//!
//! Identifiers, users and servers live here. Entities describing someone's
//! current activity (presence, messages, voice) are defined in the sister
//! module `live`.

use std::fmt;

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::Serialize;
use serde_json::Value;

use super::{HasIdentity, HasServerAttributes, HasUserAttributes, Member};
use crate::serial::{self, decode_identifier, extract_icon_token, Decode};
use crate::{Error, Object, Result};

// IDs

/// Milliseconds between the Unix epoch and the first second of 2015.
const DISCORD_EPOCH: u64 = 1420070400000;

macro_rules! snowflake {
    ($(#[$attr:meta] $name:ident;)*) => {
        $(
            #[$attr]
            ///
            /// Identifiers can be debug-printed using the `{:?}` specifier, or their
            /// raw number value printed using the `{}` specifier.
            #[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Ord, PartialOrd)]
            #[cfg_attr(feature = "serde", derive(Serialize))]
            pub struct $name(pub u64);

            impl $name {
                /// Get the creation date of the object referred to by this ID.
                ///
                /// Discord generates identifiers using a scheme based on [Twitter Snowflake]
                /// (https://github.com/twitter/snowflake/tree/b3f6a3c6ca8e1b6847baa6ff42bf72201e2c2231#snowflake).
                pub fn creation_date(&self) -> DateTime<Utc> {
                    let millis = (self.0 >> 22) + DISCORD_EPOCH;
                    DateTime::from_timestamp_millis(millis as i64).unwrap_or_default()
                }

                /// Decode the identifier held by the wire field `field`.
                pub fn decode(field: &'static str, value: &Value) -> Result<Self> {
                    decode_identifier(field, value).map($name)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<$name> for u64 {
                fn from(id: $name) -> u64 {
                    id.0
                }
            }
        )*
    }
}

snowflake! {
    /// An identifier for a User
    UserId;
    /// An identifier for a Server
    ServerId;
    /// An identifier for a Channel
    ChannelId;
    /// An identifier for a Message
    MessageId;
    /// An identifier for a Role
    RoleId;
    /// An identifier for an Attachment
    AttachmentId;
}

/// Take the identifier under `key` out of a mapping.
pub(crate) fn id_field<T>(
    map: &mut Object,
    key: &'static str,
    wrap: fn(&'static str, &Value) -> Result<T>,
) -> Result<T> {
    serial::remove(map, key).and_then(|v| wrap(key, &v))
}

/// Decode an array of identifiers under `key`, failing on the first bad one.
pub(crate) fn id_list<T>(
    map: &mut Object,
    key: &'static str,
    wrap: fn(&'static str, &Value) -> Result<T>,
) -> Result<Vec<T>> {
    serial::remove(map, key).and_then(|v| serial::decode_array(key, v, |item| wrap(key, &item)))
}

// Users

/// A Discord user, as seen from the RPC connection.
///
/// Members and voice participants wrap a `User` rather than repeating its
/// fields; the user accessors are available through [`HasUserAttributes`].
///
/// https://discord.com/developers/docs/resources/user#user-object
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct User {
    pub(crate) id: UserId,
    pub(crate) username: String,
    pub(crate) discriminator: String,
    pub(crate) avatar: Option<String>,
    pub(crate) bot: bool,
}

impl User {
    /// Returns the formatted URL of the user's avatar.
    ///
    /// Returns None if the user does not have an avatar.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|avatar_hash| format!(cdn_concat!("/avatars/{}/{}.jpg"), self.id, avatar_hash))
    }

    /// The user's name and discriminator, e.g. `Nelly#1337`.
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }
}

impl Decode for User {
    const KIND: &'static str = "user";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(User {
            id: id_field(&mut map, "id", UserId::decode)?,
            username: serial::string(&mut map, "username")?,
            discriminator: serial::string(&mut map, "discriminator")?,
            avatar: serial::string_opt(&mut map, "avatar")?,
            bot: serial::boolean_or_default(&mut map, "bot")?,
        })
    }
}

impl HasIdentity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl HasUserAttributes for User {
    fn as_user(&self) -> &User {
        self
    }
}

// Servers

/// Summary information about a server, as listed by `GET_GUILDS`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LightServer {
    pub(crate) id: ServerId,
    pub(crate) name: String,
    pub(crate) icon_id: Option<String>,
    pub(crate) icon_url: Option<String>,
}

impl Decode for LightServer {
    const KIND: &'static str = "guild";

    fn decode_object(mut map: Object) -> Result<Self> {
        let id = id_field(&mut map, "id", ServerId::decode)?;
        let name = serial::string(&mut map, "name")?;
        let icon_url = serial::string_opt(&mut map, "icon_url")?;
        let icon_id = icon_url
            .as_deref()
            .and_then(extract_icon_token)
            .map(str::to_owned);

        Ok(LightServer {
            id,
            name,
            icon_id,
            icon_url,
        })
    }
}

impl HasIdentity for LightServer {
    type Id = ServerId;

    fn id(&self) -> ServerId {
        self.id
    }
}

impl HasServerAttributes for LightServer {
    fn as_server(&self) -> &LightServer {
        self
    }
}

/// A server together with its member list, as returned by `GET_GUILD`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Server {
    #[cfg_attr(feature = "serde", serde(flatten))]
    base: LightServer,
    members: Vec<Member>,
}

impl Server {
    /// The server's members, in the order they were sent. May be empty.
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

impl Decode for Server {
    const KIND: &'static str = "guild";

    fn decode_object(mut map: Object) -> Result<Self> {
        let members = map.remove("members");
        let base = LightServer::decode_object(map)?;

        let members = match members {
            None | Some(Value::Null) => return Err(Error::MissingField("members")),
            Some(members) => serial::decode_array("members", members, |member| {
                serial::into_map("members", member).and_then(Member::decode_object)
            })?,
        };

        Ok(Server { base, members })
    }
}

impl HasIdentity for Server {
    type Id = ServerId;

    fn id(&self) -> ServerId {
        self.base.id
    }
}

impl HasServerAttributes for Server {
    fn as_server(&self) -> &LightServer {
        &self.base
    }
}

// Channels

/// Reserved for RPC channel payloads.
///
/// No channel fields are modelled yet, so no value of this type can exist and
/// decoding one always fails with [`Error::NotImplemented`].
#[derive(Debug, Clone, Copy)]
pub enum Channel {}

impl Decode for Channel {
    const KIND: &'static str = "channel";

    fn decode_object(_: Object) -> Result<Self> {
        Err(Error::NotImplemented(Self::KIND))
    }

    fn decode(_: Value) -> Result<Self> {
        Err(Error::NotImplemented(Self::KIND))
    }
}
