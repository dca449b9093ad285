//! Data models for `live` resources, i.e. those describing what someone is
//! doing right now: presence, messages and voice.

use std::fmt;

use chrono::{DateTime, FixedOffset};
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use super::frozen::{id_field, id_list};
use super::{
    AttachmentId, Colour, HasIdentity, HasUserAttributes, HasVoiceAttributes, MessageId, RoleId,
    User, UserId,
};
use crate::serial::{self, decode_colour, decode_enum_symbol, decode_timestamp, Decode};
use crate::{Object, Result};

// Presence

/// A member's online status.
/// This enum is decoded from a string field.
///
/// https://discord.com/developers/docs/topics/gateway-events#update-presence-status-types
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OnlineStatus {
    /// The user is online and active within discord.
    #[cfg_attr(feature = "serde", serde(rename = "online"))]
    Online,
    /// The user is away from their device.
    #[cfg_attr(feature = "serde", serde(rename = "idle"))]
    Idle,
    /// The user will not receive notifications.
    #[cfg_attr(feature = "serde", serde(rename = "dnd"))]
    DoNotDisturb,
}

impl OnlineStatus {
    const SYMBOLS: &'static [(&'static str, OnlineStatus)] = &[
        ("online", OnlineStatus::Online),
        ("idle", OnlineStatus::Idle),
        ("dnd", OnlineStatus::DoNotDisturb),
    ];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match *self {
            OnlineStatus::Online => "online",
            OnlineStatus::Idle => "idle",
            OnlineStatus::DoNotDisturb => "dnd",
        }
    }
}

impl fmt::Display for OnlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type of activity.
///
/// Kinds this library does not know about are kept as their raw number.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub enum ActivityKind {
    /// The user is playing a game
    Playing,
    /// The user is streaming somewhere.
    Streaming,
    /// Any other activity type, with its wire value
    Other(u64),
}

impl ActivityKind {
    /// The wire value of this kind.
    pub fn value(&self) -> u64 {
        match *self {
            ActivityKind::Playing => 0,
            ActivityKind::Streaming => 1,
            ActivityKind::Other(n) => n,
        }
    }
}

impl From<u64> for ActivityKind {
    fn from(n: u64) -> Self {
        match n {
            0 => ActivityKind::Playing,
            1 => ActivityKind::Streaming,
            n => ActivityKind::Other(n),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for ActivityKind {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_u64(self.value())
    }
}

/// User's activity
/// https://discord.com/developers/docs/topics/gateway#activity-object
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Activity {
    name: String,
    kind: ActivityKind,
    url: Option<String>,
}

impl Activity {
    /// The activity's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Stream url, only expected when the kind is [`ActivityKind::Streaming`].
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl Decode for Activity {
    const KIND: &'static str = "activity";

    fn decode_object(mut map: Object) -> Result<Self> {
        let name = serial::string(&mut map, "name")?;
        let kind = serial::remove(&mut map, "type")
            .and_then(|v| serial::decode_unsigned("type", &v))
            .map(ActivityKind::from)?;
        if let ActivityKind::Other(n) = kind {
            debug!("Keeping unknown activity type {} for {:?}", n, name);
        }

        Ok(Activity {
            name,
            kind,
            url: serial::string_opt(&mut map, "url")?,
        })
    }
}

// Member

/// A user in the context of a server, with their nickname and presence.
///
/// User accessors are forwarded to the wrapped [`User`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Member {
    user: User,
    nick: Option<String>,
    status: OnlineStatus,
    activity: Option<Activity>,
}

impl Member {
    /// The user's server nickname.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    pub fn status(&self) -> OnlineStatus {
        self.status
    }

    /// What the user is currently doing, if anything.
    pub fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    /// Get this member's nickname if present or their username otherwise.
    pub fn display_name(&self) -> &str {
        self.nick().unwrap_or_else(|| self.username())
    }
}

impl Decode for Member {
    const KIND: &'static str = "member";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(Member {
            user: serial::entity(&mut map, "user")?,
            nick: serial::string_opt(&mut map, "nick")?,
            status: serial::remove(&mut map, "status")
                .and_then(|v| decode_enum_symbol("status", &v, OnlineStatus::SYMBOLS))?,
            activity: serial::entity_opt(&mut map, "activity")?,
        })
    }
}

impl HasIdentity for Member {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.user.id()
    }
}

impl HasUserAttributes for Member {
    fn as_user(&self) -> &User {
        &self.user
    }
}

// Messages

/// Message transmitted over a text channel
///
/// https://discord.com/developers/docs/resources/channel#message-object
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Message {
    id: MessageId,
    blocked: bool,
    content: String,
    author_colour: Colour,
    timestamp: DateTime<FixedOffset>,
    edited_timestamp: Option<DateTime<FixedOffset>>,
    tts: bool,
    author: User,
    mention_everyone: bool,
    mentions: Vec<UserId>,
    mention_roles: Vec<RoleId>,
    embeds: Vec<Embed>,
    attachments: Vec<Attachment>,
    nick: Option<String>,
    pinned: bool,
    kind: u64,
}

impl Message {
    /// Whether the author is blocked by the current user.
    pub fn blocked(&self) -> bool {
        self.blocked
    }

    /// The content of the message
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The colour of the author's highest coloured role.
    pub fn author_colour(&self) -> Colour {
        self.author_colour
    }

    /// When the message was sent.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// The last time the message was edited, if it was ever.
    pub fn edited_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.edited_timestamp
    }

    /// Whether the message should be read out loud.
    pub fn tts(&self) -> bool {
        self.tts
    }

    /// The user that created the message.
    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn mention_everyone(&self) -> bool {
        self.mention_everyone
    }

    /// The users this message mentions, in order.
    pub fn mentions(&self) -> &[UserId] {
        &self.mentions
    }

    /// The roles this message mentions, in order.
    pub fn mention_roles(&self) -> &[RoleId] {
        &self.mention_roles
    }

    pub fn embeds(&self) -> &[Embed] {
        &self.embeds
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// The author's nickname in the server the message was sent in.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    /// Whether this message is pinned for all to see.
    pub fn pinned(&self) -> bool {
        self.pinned
    }

    /// The raw message type; `0` is a regular message.
    pub fn kind(&self) -> u64 {
        self.kind
    }
}

impl Decode for Message {
    const KIND: &'static str = "message";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(Message {
            id: id_field(&mut map, "id", MessageId::decode)?,
            blocked: serial::boolean(&mut map, "blocked")?,
            content: serial::string(&mut map, "content")?,
            author_colour: serial::remove(&mut map, "author_color")
                .and_then(|v| decode_colour("author_color", &v))?,
            timestamp: serial::remove(&mut map, "timestamp")
                .and_then(|v| decode_timestamp("timestamp", &v))?,
            edited_timestamp: serial::remove_opt(&mut map, "edited_timestamp")
                .map(|v| decode_timestamp("edited_timestamp", &v))
                .transpose()?,
            tts: serial::boolean_or_default(&mut map, "tts")?,
            author: serial::entity(&mut map, "author")?,
            mention_everyone: serial::boolean_or_default(&mut map, "mention_everyone")?,
            mentions: id_list(&mut map, "mentions", UserId::decode)?,
            mention_roles: id_list(&mut map, "mention_roles", RoleId::decode)?,
            embeds: serial::entity_list(&mut map, "embeds")?,
            attachments: serial::entity_list(&mut map, "attachments")?,
            nick: serial::string_opt(&mut map, "nick")?,
            pinned: serial::boolean(&mut map, "pinned")?,
            kind: serial::remove(&mut map, "type")
                .and_then(|v| serial::decode_unsigned("type", &v))?,
        })
    }
}

impl HasIdentity for Message {
    type Id = MessageId;

    fn id(&self) -> MessageId {
        self.id
    }
}

/// File upload attached to a message
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Attachment {
    id: AttachmentId,
    filename: String,
    url: String,
    proxy_url: Option<String>,
    size: u64,
    width: Option<u64>,
    height: Option<u64>,
}

impl Attachment {
    /// Short filename for the attachment
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Shorter URL with message and attachment id
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Longer URL with large hash
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    /// Size of the file in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the dimensions of the attachment if it is an image.
    pub fn dimensions(&self) -> Option<(u64, u64)> {
        self.width.zip(self.height)
    }
}

impl Decode for Attachment {
    const KIND: &'static str = "attachment";

    fn decode_object(mut map: Object) -> Result<Self> {
        let mut dimension = |key| {
            serial::remove_opt(&mut map, key)
                .map(|v| serial::decode_unsigned(key, &v))
                .transpose()
        };
        let width = dimension("width")?;
        let height = dimension("height")?;

        Ok(Attachment {
            id: id_field(&mut map, "id", AttachmentId::decode)?,
            filename: serial::string(&mut map, "filename")?,
            url: serial::string(&mut map, "url")?,
            proxy_url: serial::string_opt(&mut map, "proxy_url")?,
            size: serial::remove(&mut map, "size")
                .and_then(|v| serial::decode_unsigned("size", &v))?,
            width,
            height,
        })
    }
}

impl HasIdentity for Attachment {
    type Id = AttachmentId;

    fn id(&self) -> AttachmentId {
        self.id
    }
}

/// An embed attached to a message.
///
/// Only the headline fields are decoded; everything else is ignored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Embed {
    kind: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    colour: Option<Colour>,
    timestamp: Option<DateTime<FixedOffset>>,
}

impl Embed {
    /// The embed type, e.g. `rich`, `image` or `link`.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The colour displayed on a sidebar of the embed.
    pub fn colour(&self) -> Option<Colour> {
        self.colour
    }

    /// Timestamp of the embed content.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
    }
}

impl Decode for Embed {
    const KIND: &'static str = "embed";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(Embed {
            kind: serial::string_opt(&mut map, "type")?,
            title: serial::string_opt(&mut map, "title")?,
            description: serial::string_opt(&mut map, "description")?,
            url: serial::string_opt(&mut map, "url")?,
            colour: serial::remove_opt(&mut map, "color")
                .map(|v| decode_rgb("color", &v))
                .transpose()?,
            timestamp: serial::remove_opt(&mut map, "timestamp")
                .map(|v| decode_timestamp("timestamp", &v))
                .transpose()?,
        })
    }
}

/// An embed colour is a `0xRRGGBB` integer; anything wider is rejected
/// rather than truncated.
fn decode_rgb(field: &'static str, value: &Value) -> Result<Colour> {
    serial::decode_unsigned(field, value)
        .ok()
        .and_then(|rgb| u32::try_from(rgb).ok())
        .filter(|&rgb| rgb <= 0xFF_FFFF)
        .map(Colour::from_u32)
        .ok_or_else(|| serial::malformed(field, "an RGB integer"))
}

// Voice

/// A user's state within a voice channel
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VoiceState {
    pub(crate) mute: bool,
    pub(crate) deaf: bool,
    pub(crate) self_mute: bool,
    pub(crate) self_deaf: bool,
    suppress: bool,
}

impl VoiceState {
    /// Whether this user's permission to speak has been suppressed
    pub fn suppress(&self) -> bool {
        self.suppress
    }
}

impl Decode for VoiceState {
    const KIND: &'static str = "voice_state";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(VoiceState {
            mute: serial::boolean(&mut map, "mute")?,
            deaf: serial::boolean(&mut map, "deaf")?,
            self_mute: serial::boolean(&mut map, "self_mute")?,
            self_deaf: serial::boolean(&mut map, "self_deaf")?,
            suppress: serial::boolean(&mut map, "suppress")?,
        })
    }
}

impl HasVoiceAttributes for VoiceState {
    fn as_voice_state(&self) -> &VoiceState {
        self
    }
}

/// Stereo panning of a voice participant, `0.0` to `1.0` per side by
/// convention. The range is not enforced, so a side may even be infinite;
/// only `NaN` fails to decode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pan {
    pub left: f64,
    pub right: f64,
}

impl Decode for Pan {
    const KIND: &'static str = "pan";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(Pan {
            left: serial::remove(&mut map, "left")
                .and_then(|v| serial::decode_float("left", &v))?,
            right: serial::remove(&mut map, "right")
                .and_then(|v| serial::decode_float("right", &v))?,
        })
    }
}

/// A participant in the voice channel the client is connected to.
///
/// User accessors are forwarded to the wrapped [`User`], voice accessors to
/// the wrapped [`VoiceState`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VoiceUser {
    user: User,
    nick: Option<String>,
    local_mute: bool,
    volume: i64,
    pan: Pan,
    voice_state: VoiceState,
}

impl VoiceUser {
    /// The user's server nickname.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    /// Whether the local client has muted this user.
    pub fn local_mute(&self) -> bool {
        self.local_mute
    }

    /// Local playback volume, `0` to `200` by convention with `100` as unity.
    pub fn volume(&self) -> i64 {
        self.volume
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn voice_state(&self) -> &VoiceState {
        &self.voice_state
    }
}

impl Decode for VoiceUser {
    const KIND: &'static str = "voice_user";

    fn decode_object(mut map: Object) -> Result<Self> {
        Ok(VoiceUser {
            user: serial::entity(&mut map, "user")?,
            nick: serial::string_opt(&mut map, "nick")?,
            local_mute: serial::boolean(&mut map, "mute")?,
            volume: serial::remove(&mut map, "volume")
                .and_then(|v| serial::decode_integer("volume", &v))?,
            pan: serial::entity(&mut map, "pan")?,
            voice_state: serial::entity(&mut map, "voice_state")?,
        })
    }
}

impl HasIdentity for VoiceUser {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.user.id()
    }
}

impl HasUserAttributes for VoiceUser {
    fn as_user(&self) -> &User {
        &self.user
    }
}

impl HasVoiceAttributes for VoiceUser {
    fn as_voice_state(&self) -> &VoiceState {
        &self.voice_state
    }
}
