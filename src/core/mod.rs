// ─── jarfetch core ───
// Resolves Maven-style jar coordinates to files in a local repository,
// downloading from remote repositories on a cache miss.
//
// Architecture:
//   core/
//     maven/      — Coordinates, settings.xml loading, artifact resolution
//     downloader/ — Streaming HTTP downloads onto disk
//     error.rs    — Crate-wide error type

pub mod downloader;
pub mod error;
pub mod maven;
