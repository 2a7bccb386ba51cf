//! Recording view object and playable-URL resolution.

use std::collections::HashMap;

use regex::Regex;

use super::broadcast::Broadcast;
use super::error::{Error, Result};
use super::types::RecordingPayload;

/// Recording quality tiers offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Normal quality.
    Nq,
    /// High quality.
    Hq,
    /// High definition.
    Hd,
}

impl Quality {
    /// Upper-case label keying the provider's file list.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nq => "NQ",
            Self::Hq => "HQ",
            Self::Hd => "HD",
        }
    }
}

/// Default preference order when resolving combination tiers.
pub const DEFAULT_QUALITY_PREFERENCE: [Quality; 3] = [Quality::Nq, Quality::Hq, Quality::Hd];

/// A user-initiated capture of a broadcast.
///
/// Holds the underlying [`Broadcast`] by composition plus the recording
/// lifecycle fields. Once the provider reports the recording as finished,
/// the file list maps quality labels to playable URLs.
#[derive(Debug)]
pub struct Recording {
    /// Recording id.
    pub id: u64,
    /// Raw lifecycle status (`queued`, `recorded`, others opaque).
    pub status: String,
    /// Quality tier bitmask: 1=NQ, 2=HQ, 3=NQ+HQ, 6=HQ+HD, 7=NQ+HQ+HD.
    pub quality: u8,
    /// Playable URLs keyed by upper-case quality label.
    urls: HashMap<String, String>,
    /// The recorded broadcast.
    broadcast: Broadcast,
}

impl Recording {
    /// Builds a recording from its wire payload.
    ///
    /// # Errors
    ///
    /// Propagates broadcast construction failures.
    pub(crate) fn from_payload(
        payload: RecordingPayload,
        host: &str,
        tvshow_pattern: Option<&Regex>,
    ) -> Result<Self> {
        let broadcast = Broadcast::from_payload(payload.broadcast, host, tvshow_pattern)?;
        let urls = payload
            .files
            .into_iter()
            .filter_map(|file| {
                let quality = file.quality?;
                let href = file.href?;
                Some((quality.to_uppercase(), href))
            })
            .collect();
        Ok(Self {
            id: payload.id,
            status: payload.status.unwrap_or_default(),
            quality: payload.quality.unwrap_or(0),
            urls,
            broadcast,
        })
    }

    /// The recorded broadcast.
    #[must_use]
    pub const fn broadcast(&self) -> &Broadcast {
        &self.broadcast
    }

    /// Whether the capture is finished and downloadable.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.status.eq_ignore_ascii_case("recorded")
    }

    /// Whether the capture is still pending.
    ///
    /// The provider has reported this state as `queued` and as `scheduled`
    /// across API revisions; both count.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.status.eq_ignore_ascii_case("queued") || self.status.eq_ignore_ascii_case("scheduled")
    }

    /// Resolves a playable URL using the default preference order.
    ///
    /// # Errors
    ///
    /// See [`Self::get_url`].
    pub fn url(&self) -> Result<Option<&str>> {
        self.get_url(&DEFAULT_QUALITY_PREFERENCE)
    }

    /// Resolves a playable URL for this recording.
    ///
    /// Fixed tiers resolve directly (1 to NQ, 2 to HQ); combination tiers
    /// (3, 6, 7) walk `preferred` and take the first quality present in the
    /// file list.
    ///
    /// # Errors
    ///
    /// `Error::MissingRecordingUrl` when the recording is already recorded
    /// but none of the requested qualities has a URL. A recording that is
    /// not yet finalized resolves to `Ok(None)`.
    pub fn get_url(&self, preferred: &[Quality]) -> Result<Option<&str>> {
        let url = match self.quality {
            1 => self.urls.get(Quality::Nq.label()),
            2 => self.urls.get(Quality::Hq.label()),
            3 | 6 | 7 => preferred
                .iter()
                .find_map(|quality| self.urls.get(quality.label())),
            _ => None,
        };
        match url {
            Some(url) => Ok(Some(url.as_str())),
            None if self.is_recorded() => Err(Error::MissingRecordingUrl {
                recording_id: self.id,
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::bong::types::{BroadcastPayload, FilePayload};

    fn make_recording(status: &str, quality: u8, files: Vec<FilePayload>) -> Recording {
        let payload = RecordingPayload {
            id: 9001,
            status: Some(status.to_owned()),
            quality: Some(quality),
            files,
            broadcast: BroadcastPayload {
                id: 100_501,
                starts_at_ms: 1_400_000_000_000,
                ends_at_ms: 1_400_000_900_000,
                channel_id: 7,
                ..BroadcastPayload::default()
            },
        };
        Recording::from_payload(payload, "bong.tv", None).unwrap()
    }

    fn file(quality: &str, href: &str) -> FilePayload {
        FilePayload {
            quality: Some(quality.to_owned()),
            href: Some(href.to_owned()),
        }
    }

    #[test]
    fn test_status_predicates() {
        // Arrange
        let recorded = make_recording("recorded", 1, vec![]);
        let queued = make_recording("queued", 1, vec![]);
        let scheduled = make_recording("scheduled", 1, vec![]);

        // Act & Assert
        assert!(recorded.is_recorded());
        assert!(!recorded.is_scheduled());
        assert!(queued.is_scheduled());
        assert!(scheduled.is_scheduled());
        assert!(!queued.is_recorded());
    }

    #[test]
    fn test_file_labels_are_upper_cased() {
        // Arrange
        let recording = make_recording("recorded", 1, vec![file("nq", "http://u/nq.mp4")]);

        // Act & Assert
        assert_eq!(
            recording.get_url(&DEFAULT_QUALITY_PREFERENCE).unwrap(),
            Some("http://u/nq.mp4")
        );
    }

    #[test]
    fn test_combination_tier_walks_preference_order() {
        // Arrange: tier NQ+HQ, only the HQ file exists
        let recording = make_recording("recorded", 3, vec![file("HQ", "http://u/hq.mp4")]);

        // Act
        let url = recording.get_url(&[Quality::Nq, Quality::Hq]).unwrap();

        // Assert: first preferred quality present in the map wins
        assert_eq!(url, Some("http://u/hq.mp4"));
    }

    #[test]
    fn test_recorded_without_matching_url_raises() {
        // Arrange
        let recording = make_recording("recorded", 3, vec![file("HD", "http://u/hd.mp4")]);

        // Act
        let result = recording.get_url(&[Quality::Nq, Quality::Hq]);

        // Assert
        assert!(matches!(
            result,
            Err(Error::MissingRecordingUrl { recording_id: 9001 })
        ));
    }

    #[test]
    fn test_pending_recording_resolves_to_none() {
        // Arrange
        let recording = make_recording("queued", 3, vec![]);

        // Act & Assert
        assert_eq!(recording.get_url(&DEFAULT_QUALITY_PREFERENCE).unwrap(), None);
    }

    #[test]
    fn test_fixed_tier_ignores_other_files() {
        // Arrange: tier 2 (HQ) with only an NQ file
        let recording = make_recording("recorded", 2, vec![file("NQ", "http://u/nq.mp4")]);

        // Act
        let result = recording.get_url(&DEFAULT_QUALITY_PREFERENCE);

        // Assert
        assert!(matches!(result, Err(Error::MissingRecordingUrl { .. })));
    }

    #[test]
    fn test_broadcast_fields_reachable_through_composition() {
        // Arrange
        let recording = make_recording("recorded", 1, vec![]);

        // Act & Assert
        assert_eq!(recording.broadcast().id, 100_501);
        assert_eq!(recording.broadcast().channel_id, 7);
    }
}
