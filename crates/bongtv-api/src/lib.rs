//! API client library for the bong.tv TV/PVR web service.
//!
//! Provides the authenticated HTTP client plus the two public facades:
//! `BongGuide` (electronic program guide) and `BongSpace` (personal
//! recording space).

/// bong.tv API client.
pub mod bong;
