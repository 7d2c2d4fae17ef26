//! Core traversal commands: circle, albums, songs

pub mod albums;
pub mod circle;
pub mod songs;

pub use albums::AlbumsArgs;
pub use circle::CircleArgs;
pub use songs::SongsArgs;
