//! Destination chat resolution
//!
//! Bots cannot walk their dialogs, so the destination is addressed
//! directly from its Bot API style ("marked") id.

use grammers_session::defs::{PeerAuth, PeerId, PeerRef};

use crate::error::{Error, Result};

/// Offset the Bot API adds to channel and supergroup ids (`-100…`).
const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

/// Kind and bare id of the destination peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTarget {
    /// Private chat with a user
    User(i64),
    /// Basic group
    Group(i64),
    /// Channel or supergroup
    Channel(i64),
}

impl ChatTarget {
    /// Decode a marked id: positive ids are users, `-100XXXXXXXXXX` is
    /// channel `XXXXXXXXXX`, any other negative id is basic group `-id`.
    pub fn from_marked_id(marked: i64) -> Result<Self> {
        if marked > 0 {
            return Ok(ChatTarget::User(marked));
        }

        let bare = marked
            .checked_neg()
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::InvalidChatId(marked.to_string()))?;

        if bare > CHANNEL_ID_OFFSET {
            Ok(ChatTarget::Channel(bare - CHANNEL_ID_OFFSET))
        } else {
            Ok(ChatTarget::Group(bare))
        }
    }

    /// The id in Bot API form, as it was configured.
    pub fn marked_id(&self) -> i64 {
        match *self {
            ChatTarget::User(id) => id,
            ChatTarget::Group(id) => -id,
            ChatTarget::Channel(id) => -(id + CHANNEL_ID_OFFSET),
        }
    }

    /// Peer reference with an empty access hash, which is how bot
    /// accounts address chats they have not seen in this session.
    pub fn peer_ref(&self) -> PeerRef {
        let id = match *self {
            ChatTarget::User(id) => PeerId::user(id),
            ChatTarget::Group(id) => PeerId::chat(id),
            ChatTarget::Channel(id) => PeerId::channel(id),
        };
        PeerRef {
            id,
            auth: PeerAuth::default(),
        }
    }
}
