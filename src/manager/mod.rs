//! Connection manager and its configuration.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | [`ConnectionManagerBuilder`] |
//! | `core` | [`ConnectionManager`] and transport event handling |
//! | `state` | [`ConnectionState`] and shared mutable state |

// ============================================================================
// Submodules
// ============================================================================

/// Builder pattern for manager configuration.
pub mod builder;

/// Connection manager.
pub mod core;

/// Connection state.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ConnectionManagerBuilder;
pub use self::core::{ConnectionManager, DEFAULT_BRIDGE_URL, DisplayHook};
pub use state::ConnectionState;
