use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use wildgrove_core::{Facing, ItemKind, TileCoord};

const SNAPSHOT_DOMAIN: &str = "wild";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "wild:v1";
/// Delimiter used to separate the prefix, grid length and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of the grid configuration and the items placed on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapLayoutSnapshot {
    /// Side length of the square grid in tiles.
    pub length: u32,
    /// Length of a single tile edge expressed in world units.
    pub tile_length: f32,
    /// Whether fog of war is active for the session.
    pub fog: bool,
    /// Items composing the layout captured by the snapshot.
    pub items: Vec<LayoutItem>,
}

impl MapLayoutSnapshot {
    /// Encodes the snapshot into a single-line string suitable for
    /// clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            tile_length: self.tile_length,
            fog: self.fog,
            items: self.items.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("layout snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}:{encoded}", self.length)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let length = parts.next().ok_or(LayoutTransferError::MissingLength)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let length = parse_length(length)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            length,
            tile_length: decoded.tile_length,
            fog: decoded.fog,
            items: decoded.items,
        })
    }
}

/// Item description captured within a layout snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct LayoutItem {
    /// Kind of item represented by the snapshot.
    pub kind: ItemKind,
    /// Tile the item occupies.
    pub cell: TileCoord,
    /// Facing the item assumes.
    pub facing: Facing,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    tile_length: f32,
    fog: bool,
    items: Vec<LayoutItem>,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include the grid length.
    MissingLength,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid length could not be parsed from the encoded snapshot.
    InvalidLength(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "clipboard payload was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingLength => write!(f, "layout string is missing the grid length"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidLength(length) => {
                write!(f, "could not parse grid length '{length}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse layout payload: {error}")
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_length(length: &str) -> Result<u32, LayoutTransferError> {
    let parsed = length
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidLength(length.to_owned()))?;

    if parsed == 0 {
        return Err(LayoutTransferError::InvalidLength(length.to_owned()));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_empty_layout() {
        let snapshot = MapLayoutSnapshot {
            length: 9,
            tile_length: 32.0,
            fog: true,
            items: Vec::new(),
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:9:")));

        let decoded = MapLayoutSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_populated_layout() {
        let items = vec![
            LayoutItem {
                kind: ItemKind::Scanner,
                cell: TileCoord::new(4, 4),
                facing: Facing::East,
            },
            LayoutItem {
                kind: ItemKind::Candy,
                cell: TileCoord::new(2, 6),
                facing: Facing::South,
            },
        ];
        let snapshot = MapLayoutSnapshot {
            length: 12,
            tile_length: 48.0,
            fog: false,
            items,
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:12:")));

        let decoded = MapLayoutSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn rejects_foreign_prefixes() {
        assert!(matches!(
            MapLayoutSnapshot::decode("grove:v1:9:AAAA"),
            Err(LayoutTransferError::InvalidPrefix(_))
        ));
        assert!(matches!(
            MapLayoutSnapshot::decode("wild:v2:9:AAAA"),
            Err(LayoutTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            MapLayoutSnapshot::decode("wild:v1:zero:AAAA"),
            Err(LayoutTransferError::InvalidLength(_))
        ));
        assert!(matches!(
            MapLayoutSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
    }
}
