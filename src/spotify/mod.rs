pub mod client;
pub mod models;
pub mod session;

pub use client::SpotifyClient;
pub use models::{CatalogTrack, RemotePlaylist, UserProfile, UserToken};
pub use session::{AccessToken, CatalogSession};
