//! Republishes subreddit listings as Atom feeds, and a video subreddit as an
//! RSS feed of direct YouTube links.

pub mod config;
pub mod feed;
pub mod reddit;
pub mod server;
pub mod util;
