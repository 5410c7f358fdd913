//! Codec for Telegram inline message ids.
//!
//! An inline message id is URL-safe base64 text (without padding) over one of
//! two little-endian layouts. The layout is chosen by the token's character
//! length, never by its content:
//!
//! | layout | token length | raw fields (in byte order) | bytes |
//! |--------|--------------|----------------------------|-------|
//! | `Id32` | 27           | `i32 dc, i32 msg, i32 peer, i64 hash` | 20 |
//! | `Id64` | anything else | `i32 dc, i64 peer, i32 msg, i64 hash` | 24 |
//!
//! Whatever the layout, [`InlineMessageId`] exposes the fields as
//! `(dc_id, message_id, peer_id, access_hash)`.

use base64::{
    alphabet,
    engine::{
        general_purpose::URL_SAFE_NO_PAD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig,
    },
    Engine as _,
};

/// Token length (in characters) of the 32-bit peer layout.
pub const ID32_FORMAT_SIZE: usize = 27;

const ID32_BYTES: usize = 20;
const ID64_BYTES: usize = 24;

// Ignores non-zero trailing bits in the last symbol and any amount of padding.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineIdLayout {
    Id32,
    Id64,
}

impl InlineIdLayout {
    /// Layout used for a token of `len` characters (before padding).
    pub fn for_token_len(len: usize) -> Self {
        if len == ID32_FORMAT_SIZE {
            InlineIdLayout::Id32
        } else {
            InlineIdLayout::Id64
        }
    }

    /// Size of the binary payload this layout unpacks.
    pub fn byte_len(self) -> usize {
        match self {
            InlineIdLayout::Id32 => ID32_BYTES,
            InlineIdLayout::Id64 => ID64_BYTES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InlineIdLayout::Id32 => "id32",
            InlineIdLayout::Id64 => "id64",
        }
    }
}

impl std::fmt::Display for InlineIdLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("{layout} layout needs {expected} bytes, got {actual}")]
    LengthMismatch {
        layout: InlineIdLayout,
        expected: usize,
        actual: usize,
    },
}

/// Decoded inline message id.
///
/// `peer_id` is the raw chat-or-user id: negative values are chats/channels
/// (see [`classify`]). In the `Id32` layout it is widened from `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InlineMessageId {
    pub dc_id: i32,
    pub message_id: i32,
    pub peer_id: i64,
    pub access_hash: i64,
}

impl InlineMessageId {
    /// Decode a token as issued by Telegram in `inline_message_id`.
    pub fn decode(token: &str) -> Result<Self, DecodeError> {
        let layout = InlineIdLayout::for_token_len(token.len());
        let raw = decode_telegram_base64(token)?;

        if raw.len() != layout.byte_len() {
            return Err(DecodeError::LengthMismatch {
                layout,
                expected: layout.byte_len(),
                actual: raw.len(),
            });
        }

        let id = match layout {
            InlineIdLayout::Id32 => Self {
                dc_id: read_i32(&raw, 0),
                message_id: read_i32(&raw, 4),
                peer_id: i64::from(read_i32(&raw, 8)),
                access_hash: read_i64(&raw, 12),
            },
            InlineIdLayout::Id64 => Self {
                dc_id: read_i32(&raw, 0),
                peer_id: read_i64(&raw, 4),
                message_id: read_i32(&raw, 12),
                access_hash: read_i64(&raw, 16),
            },
        };
        Ok(id)
    }

    /// Encode into unpadded URL-safe text using `layout`.
    ///
    /// For `Id32` the peer id is truncated to its low 32 bits; callers that
    /// need a lossless round trip must pick `Id64` for peers outside `i32`.
    pub fn encode(&self, layout: InlineIdLayout) -> String {
        let mut raw = Vec::with_capacity(layout.byte_len());
        raw.extend_from_slice(&self.dc_id.to_le_bytes());
        match layout {
            InlineIdLayout::Id32 => {
                raw.extend_from_slice(&self.message_id.to_le_bytes());
                raw.extend_from_slice(&(self.peer_id as i32).to_le_bytes());
            }
            InlineIdLayout::Id64 => {
                raw.extend_from_slice(&self.peer_id.to_le_bytes());
                raw.extend_from_slice(&self.message_id.to_le_bytes());
            }
        }
        raw.extend_from_slice(&self.access_hash.to_le_bytes());
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn peer(&self) -> PeerRef {
        classify(self.peer_id)
    }
}

/// A chat-or-user id split into its kind and absolute value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerRef {
    pub is_chat: bool,
    pub id: u64,
}

/// Negative ids are chats/channels, everything else is a user.
///
/// `i64::MIN` maps to `2^63` (no overflow).
pub fn classify(raw: i64) -> PeerRef {
    PeerRef {
        is_chat: raw < 0,
        id: raw.unsigned_abs(),
    }
}

/// Append `len % 4` padding characters.
///
/// Not the textbook `(4 - len % 4) % 4`: a 27-character token gets three `=`,
/// not one. The decoder is lenient about that surplus.
pub fn pad_token(token: &str) -> String {
    let mut padded = String::with_capacity(token.len() + 3);
    padded.push_str(token);
    padded.extend(std::iter::repeat('=').take(token.len() % 4));
    padded
}

fn decode_telegram_base64(token: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let padded = pad_token(token);
    // Decoding stops at the first pad character, like the lenient decoders
    // these tokens were designed around.
    LENIENT_URL_SAFE.decode(padded.trim_end_matches('='))
}

fn read_i32(raw: &[u8], at: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&raw[at..at + 4]);
    i32::from_le_bytes(b)
}

fn read_i64(raw: &[u8], at: usize) -> i64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&raw[at..at + 8]);
    i64::from_le_bytes(b)
}
