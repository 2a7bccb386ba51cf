//! Channel view object.

use super::sanitize::sanitize;
use super::types::ChannelPayload;

/// A TV channel from the provider's channel list.
///
/// Immutable after construction; identity is the channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Stable channel id.
    pub id: u64,
    /// Sanitized display name.
    pub name: String,
    /// Logo URL, derived from the id.
    pub logo_url: String,
    /// Whether recordings may be scheduled on this channel.
    pub recordable: bool,
    /// Ordering hint for channel lists.
    pub position: i64,
    /// High-definition flag.
    pub hd: bool,
}

impl Channel {
    pub(crate) fn from_payload(payload: ChannelPayload, host: &str) -> Self {
        Self {
            id: payload.id,
            name: sanitize(payload.name.as_deref().unwrap_or_default()),
            logo_url: channel_logo_url(host, payload.id),
            recordable: payload.recordable,
            position: payload.position,
            hd: payload.hd,
        }
    }

    /// Whether the channel airs in high definition.
    #[must_use]
    pub const fn is_hd(&self) -> bool {
        self.hd
    }
}

/// Channel logos live under a fixed path on the provider host.
pub(crate) fn channel_logo_url(host: &str, channel_id: u64) -> String {
    format!("http://{host}/images/channel/b/{channel_id}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_payload_sanitizes_name_and_derives_logo() {
        // Arrange
        let payload = ChannelPayload {
            id: 49,
            name: Some(String::from(" M&uuml;nchen TV ")),
            recordable: true,
            position: 12,
            hd: true,
        };

        // Act
        let channel = Channel::from_payload(payload, "bong.tv");

        // Assert
        assert_eq!(channel.name, "München TV");
        assert_eq!(channel.logo_url, "http://bong.tv/images/channel/b/49.png");
        assert!(channel.is_hd());
        assert!(channel.recordable);
    }

    #[test]
    fn test_missing_name_becomes_empty() {
        // Arrange
        let payload = ChannelPayload {
            id: 1,
            ..ChannelPayload::default()
        };

        // Act
        let channel = Channel::from_payload(payload, "bong.tv");

        // Assert
        assert_eq!(channel.name, "");
    }
}
