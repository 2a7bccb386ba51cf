//! bong.tv API client module.
//!
//! Handles authenticated HTTP requests against the provider's JSON API and
//! exposes channel, broadcast and recording data through the `BongGuide`
//! (EPG) and `BongSpace` (PVR) facades.

mod api;
mod broadcast;
mod channel;
mod client;
mod error;
mod guide;
mod rate_limiter;
mod recording;
mod sanitize;
mod session;
mod space;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{BongApi, LocalBongApi};
pub use broadcast::{Actor, Broadcast, BroadcastDetails};
pub use channel::Channel;
#[allow(clippy::module_name_repetitions)]
pub use client::{BongClient, BongClientBuilder};
pub use error::{Error, Result};
#[allow(clippy::module_name_repetitions)]
pub use guide::BongGuide;
pub use recording::{DEFAULT_QUALITY_PREFERENCE, Quality, Recording};
pub use sanitize::sanitize;
pub use session::Auth;
#[allow(clippy::module_name_repetitions)]
pub use space::BongSpace;
pub use space::Subscription;
pub use types::{
    AccountPayload, BroadcastDetailsPayload, BroadcastPayload, CategoryPayload, ChannelPayload,
    FilePayload, ImagePayload, PersonPayload, RecordingPayload, RolePayload, SeriePayload,
    SubscriptionPayload,
};
