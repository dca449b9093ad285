//! Events and command responses received over the RPC connection.

use serde_json::Value;
use tracing::{debug, trace};

use super::frozen::id_field;
use super::{Channel, ChannelId, LightServer, Message, MessageId, Server, UserId, VoiceUser};
use crate::serial::{self, Decode};
use crate::{Object, Result};

/// Event or command response received over an RPC connection
#[derive(Debug, Clone)]
pub enum Event {
    /// Response to `GET_GUILD`: a server and its members
    GetServer(Server),
    /// Response to `GET_GUILDS`: every server the user is in
    GetServers(Vec<LightServer>),
    /// The user joined a new server
    ServerCreate(LightServer),
    /// Periodic status of a subscribed server
    ServerStatus {
        server: LightServer,
        /// Number of online members, when sent
        online: Option<u64>,
    },

    /// A message was sent in a subscribed channel
    MessageCreate {
        channel_id: ChannelId,
        message: Message,
    },
    /// A message in a subscribed channel was edited
    MessageUpdate {
        channel_id: ChannelId,
        message: Message,
    },
    MessageDelete {
        channel_id: ChannelId,
        message_id: MessageId,
    },

    /// Someone joined the subscribed voice channel
    VoiceStateCreate(VoiceUser),
    /// Someone's voice settings changed in the subscribed voice channel
    VoiceStateUpdate(VoiceUser),
    /// Someone left the subscribed voice channel
    VoiceStateDelete(VoiceUser),
    SpeakingStart(UserId),
    SpeakingStop(UserId),

    /// An event type not covered by the above
    Unknown(String, Object),
}

impl Event {
    /// Decode the payload (`data`) of an RPC event or command response.
    ///
    /// `kind` is the `evt` name of an event, or the `cmd` name of a command
    /// response. Channel payloads are reserved and always fail with
    /// [`Error::NotImplemented`](crate::Error::NotImplemented).
    pub fn decode(kind: &str, payload: Value) -> Result<Event> {
        trace!("Decoding RPC event {}", kind);
        let result = Event::decode_payload(kind, payload);
        if let Err(ref err) = result {
            debug!("Failed to decode RPC event {}: {}", kind, err);
        }
        result
    }

    fn decode_payload(kind: &str, payload: Value) -> Result<Event> {
        match kind {
            "GET_GUILD" => Server::decode(payload).map(Event::GetServer),
            "GET_GUILDS" => {
                let mut map = serial::into_map("payload", payload)?;
                serial::entity_list(&mut map, "guilds").map(Event::GetServers)
            }
            "GUILD_CREATE" => LightServer::decode(payload).map(Event::ServerCreate),
            "GUILD_STATUS" => {
                let mut map = serial::into_map("payload", payload)?;
                Ok(Event::ServerStatus {
                    server: serial::entity(&mut map, "guild")?,
                    online: serial::remove_opt(&mut map, "online")
                        .map(|v| serial::decode_unsigned("online", &v))
                        .transpose()?,
                })
            }

            "MESSAGE_CREATE" => {
                let (channel_id, message) = channel_message(payload)?;
                Ok(Event::MessageCreate {
                    channel_id,
                    message,
                })
            }
            "MESSAGE_UPDATE" => {
                let (channel_id, message) = channel_message(payload)?;
                Ok(Event::MessageUpdate {
                    channel_id,
                    message,
                })
            }
            "MESSAGE_DELETE" => {
                let mut map = serial::into_map("payload", payload)?;
                let mut message = serial::remove(&mut map, "message")
                    .and_then(|v| serial::into_map("message", v))?;
                Ok(Event::MessageDelete {
                    channel_id: id_field(&mut map, "channel_id", ChannelId::decode)?,
                    message_id: id_field(&mut message, "id", MessageId::decode)?,
                })
            }

            "VOICE_STATE_CREATE" => VoiceUser::decode(payload).map(Event::VoiceStateCreate),
            "VOICE_STATE_UPDATE" => VoiceUser::decode(payload).map(Event::VoiceStateUpdate),
            "VOICE_STATE_DELETE" => VoiceUser::decode(payload).map(Event::VoiceStateDelete),
            "SPEAKING_START" => speaking_user(payload).map(Event::SpeakingStart),
            "SPEAKING_STOP" => speaking_user(payload).map(Event::SpeakingStop),

            "GET_CHANNEL"
            | "GET_CHANNELS"
            | "CHANNEL_CREATE"
            | "GET_SELECTED_VOICE_CHANNEL"
            | "VOICE_CHANNEL_SELECT" => {
                Channel::decode(payload).map(|channel| -> Event { match channel {} })
            }

            _ => {
                debug!("Unknown RPC event: {}", kind);
                let map = serial::into_map("payload", payload)?;
                Ok(Event::Unknown(kind.to_owned(), map))
            }
        }
    }
}

fn channel_message(payload: Value) -> Result<(ChannelId, Message)> {
    let mut map = serial::into_map("payload", payload)?;
    Ok((
        id_field(&mut map, "channel_id", ChannelId::decode)?,
        serial::entity(&mut map, "message")?,
    ))
}

fn speaking_user(payload: Value) -> Result<UserId> {
    let mut map = serial::into_map("payload", payload)?;
    id_field(&mut map, "user_id", UserId::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HasServerAttributes, HasUserAttributes};
    use crate::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn voice_user() -> Value {
        json!({
            "user": {
                "id": "190320984123768832",
                "username": "test 2",
                "discriminator": "7479",
                "avatar": null
            },
            "nick": null,
            "mute": false,
            "volume": 100,
            "pan": { "left": 1, "right": 1 },
            "voice_state": {
                "mute": false,
                "deaf": false,
                "self_mute": true,
                "self_deaf": false,
                "suppress": false
            }
        })
    }

    #[test]
    fn get_guilds() {
        let payload = json!({
            "guilds": [
                { "id": "199737254929760256", "name": "test", "icon_url": null },
                { "id": "81384788765712384", "name": "Discord API", "icon_url": null }
            ]
        });
        match Event::decode("GET_GUILDS", payload).unwrap() {
            Event::GetServers(servers) => {
                let names: Vec<_> = servers.iter().map(|s| s.name()).collect();
                assert_eq!(names, ["test", "Discord API"]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn get_guild_with_members() {
        let payload = json!({
            "id": "199737254929760256",
            "name": "test",
            "icon_url": null,
            "members": [{
                "user": {
                    "id": "190320984123768832",
                    "username": "test 2",
                    "discriminator": "7479",
                    "avatar": null,
                    "bot": true
                },
                "status": "dnd"
            }]
        });
        match Event::decode("GET_GUILD", payload).unwrap() {
            Event::GetServer(server) => {
                assert_eq!(server.members().len(), 1);
                assert!(server.members()[0].is_bot());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn guild_status() {
        let payload = json!({
            "guild": { "id": "199737254929760256", "name": "test", "icon_url": null },
            "online": 4
        });
        match Event::decode("GUILD_STATUS", payload).unwrap() {
            Event::ServerStatus { server, online } => {
                assert_eq!(server.name(), "test");
                assert_eq!(online, Some(4));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn message_delete() {
        let payload = json!({
            "channel_id": "199737254929760257",
            "message": { "id": "199743874640379904" }
        });
        match Event::decode("MESSAGE_DELETE", payload).unwrap() {
            Event::MessageDelete {
                channel_id,
                message_id,
            } => {
                assert_eq!(channel_id, ChannelId(199737254929760257));
                assert_eq!(message_id, MessageId(199743874640379904));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn guild_create() {
        let payload = json!({
            "id": "199737254929760256",
            "name": "test",
            "icon_url": "https://cdn.discordapp.com/icons/199737254929760256/a8b5c7f1e9d2c3b4a5f6e7d8c9b0a1f2.jpg"
        });
        match Event::decode("GUILD_CREATE", payload).unwrap() {
            Event::ServerCreate(server) => {
                assert_eq!(server.name(), "test");
                assert_eq!(server.icon_id(), Some("a8b5c7f1e9d2c3b4a5f6e7d8c9b0a1f2"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn message_update() {
        let payload = json!({
            "channel_id": "199737254929760257",
            "message": {
                "id": "199743874640379904",
                "blocked": false,
                "content": "edited",
                "author_color": "#1abc9c",
                "timestamp": "2016-07-05T04:30:50.776Z",
                "edited_timestamp": "2016-07-05T04:31:02.000Z",
                "mentions": [],
                "mention_roles": [],
                "embeds": [],
                "attachments": [],
                "author": {
                    "id": "190320984123768832",
                    "username": "test 2",
                    "discriminator": "7479",
                    "avatar": null
                },
                "nick": null,
                "pinned": false,
                "type": 0
            }
        });
        match Event::decode("MESSAGE_UPDATE", payload).unwrap() {
            Event::MessageUpdate {
                channel_id,
                message,
            } => {
                assert_eq!(channel_id, ChannelId(199737254929760257));
                assert_eq!(message.content(), "edited");
                assert!(message.edited_timestamp().is_some());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn message_create_requires_channel() {
        let payload = json!({ "message": {} });
        assert_eq!(
            Event::decode("MESSAGE_CREATE", payload).unwrap_err(),
            Error::MissingField("channel_id")
        );
    }

    #[test]
    fn voice_states() {
        for kind in ["VOICE_STATE_CREATE", "VOICE_STATE_UPDATE", "VOICE_STATE_DELETE"] {
            let event = Event::decode(kind, voice_user()).unwrap();
            let voice = match event {
                Event::VoiceStateCreate(v)
                | Event::VoiceStateUpdate(v)
                | Event::VoiceStateDelete(v) => v,
                other => panic!("unexpected event {:?}", other),
            };
            assert_eq!(voice.username(), "test 2");
        }
    }

    #[test]
    fn speaking() {
        for kind in ["SPEAKING_START", "SPEAKING_STOP"] {
            let payload = json!({ "user_id": "190320984123768832" });
            match (kind, Event::decode(kind, payload).unwrap()) {
                ("SPEAKING_START", Event::SpeakingStart(user))
                | ("SPEAKING_STOP", Event::SpeakingStop(user)) => {
                    assert_eq!(user, UserId(190320984123768832))
                }
                (kind, other) => panic!("unexpected event for {}: {:?}", kind, other),
            }
        }
    }

    #[test]
    fn channels_are_not_implemented() {
        for kind in [
            "GET_CHANNEL",
            "GET_CHANNELS",
            "CHANNEL_CREATE",
            "GET_SELECTED_VOICE_CHANNEL",
            "VOICE_CHANNEL_SELECT",
        ] {
            assert_eq!(
                Event::decode(kind, json!({ "id": "1", "name": "general" })).unwrap_err(),
                Error::NotImplemented("channel")
            );
            assert_eq!(
                Event::decode(kind, Value::Null).unwrap_err(),
                Error::NotImplemented("channel")
            );
        }
    }

    #[test]
    fn unknown_events_are_kept() {
        match Event::decode("ACTIVITY_JOIN", json!({ "secret": "abc" })).unwrap() {
            Event::Unknown(kind, map) => {
                assert_eq!(kind, "ACTIVITY_JOIN");
                assert_eq!(map.get("secret"), Some(&json!("abc")));
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert_eq!(
            Event::decode("ACTIVITY_JOIN", json!("abc")).unwrap_err(),
            Error::MalformedField {
                field: "payload",
                expected: "an object"
            }
        );
    }
}
