use std::thread;

use discord_rpc_model::model::{
    Event, HasIdentity, HasUserAttributes, HasVoiceAttributes, Member, OnlineStatus, Server,
    UserId, VoiceUser,
};
use discord_rpc_model::{Decode, Error};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn shared_user() -> Value {
    json!({
        "id": "53908232506183680",
        "username": "Mason",
        "discriminator": "1337",
        "avatar": "a_bab14f271d565501444b2ca3be944b25",
        "bot": false
    })
}

fn member() -> Member {
    Member::decode(json!({
        "user": shared_user(),
        "nick": "Mace",
        "status": "online",
        "activity": null
    }))
    .unwrap()
}

fn voice_user() -> VoiceUser {
    VoiceUser::decode(json!({
        "user": shared_user(),
        "nick": null,
        "mute": true,
        "volume": 100,
        "pan": { "left": 0.5, "right": 0.5 },
        "voice_state": {
            "mute": false,
            "deaf": false,
            "self_mute": false,
            "self_deaf": false,
            "suppress": true
        }
    }))
    .unwrap()
}

#[test]
fn member_and_voice_user_share_user_attributes() {
    let member = member();
    let voice = voice_user();

    assert_eq!(member.id(), voice.id());
    assert_eq!(member.username(), voice.username());
    assert_eq!(member.discriminator(), voice.discriminator());
    assert_eq!(member.avatar(), voice.avatar());
    assert_eq!(member.is_bot(), voice.is_bot());
    assert!(member.is_same(&voice));
    assert!(member.is_same(member.as_user()));
}

#[test]
fn per_context_attributes_stay_separate() {
    let member = member();
    let voice = voice_user();

    assert_eq!(member.nick(), Some("Mace"));
    assert_eq!(voice.nick(), None);
    assert_eq!(member.status(), OnlineStatus::Online);

    // the wire `mute` of a voice user is the local mute, not the voice state's
    assert!(voice.local_mute());
    assert!(!voice.mute());
    assert!(voice.voice_state().suppress());
}

#[test]
fn each_decode_is_independent() {
    let first = member();
    let second = member();
    assert!(first.is_same(&second));
    assert_eq!(first.as_user().tag(), second.as_user().tag());
}

#[test]
fn server_member_failure_aborts_the_server() {
    let payload = json!({
        "id": "199737254929760256",
        "name": "test",
        "icon_url": null,
        "members": [
            { "user": shared_user(), "status": "idle" },
            { "user": shared_user(), "status": "invisible" },
            { "user": shared_user(), "status": "bogus" }
        ]
    });
    assert_eq!(
        Server::decode(payload).unwrap_err(),
        Error::UnknownEnumValue {
            field: "status",
            value: "invisible".into()
        }
    );
}

#[test]
fn message_event() {
    let payload = json!({
        "channel_id": "199737254929760257",
        "message": {
            "id": "199743874640379904",
            "blocked": false,
            "content": "hello <@53908232506183680>",
            "author_color": "#1abc9c",
            "timestamp": "2016-07-05T04:30:50.776000+00:00",
            "tts": false,
            "mentions": ["53908232506183680"],
            "mention_roles": ["199737254929760258"],
            "embeds": [],
            "attachments": [],
            "author": shared_user(),
            "nick": null,
            "pinned": true,
            "type": 0
        }
    });

    let (channel_id, message) = match Event::decode("MESSAGE_CREATE", payload).unwrap() {
        Event::MessageCreate {
            channel_id,
            message,
        } => (channel_id, message),
        other => panic!("unexpected event {:?}", other),
    };
    assert_eq!(channel_id.0, 199737254929760257);
    assert_eq!(message.author_colour().to_hex(), "#1abc9c");
    assert_eq!(message.mentions(), &[UserId(53908232506183680)]);
    assert_eq!(message.mention_roles()[0].0, 199737254929760258);
    assert!(message.pinned());
    assert!(message.author().is_same(&member()));
}

#[test]
fn decoding_from_many_threads() {
    let handles: Vec<_> = (0..8u64)
        .map(|n| {
            thread::spawn(move || {
                let payload = json!({
                    "id": (1000 + n).to_string(),
                    "username": format!("user{}", n),
                    "discriminator": "0001",
                });
                discord_rpc_model::model::User::decode(payload).map(|user| user.id())
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Ok(UserId(1000 + n as u64)));
    }
}
