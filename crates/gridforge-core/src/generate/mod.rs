//! Artifact generation.
//!
//! Documents compile into two artifact families consumed by the game
//! engine:
//! - `csharp`: source files (enums, class layouts, record-id enums, matrix
//!   headers, state-machine skeletons)
//! - `binary`: little-endian table payloads loaded at runtime
//!
//! Generators are pure: they take documents (and catalogs where reference
//! resolution matters) and return text or bytes. Callers decide placement.

pub mod binary;
pub mod csharp;
