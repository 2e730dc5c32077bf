//! # devroute
//!
//! Redirects package loads to local development checkouts.
//!
//! A small line-oriented configuration file (by default `~/.devroute`)
//! declares named directories, groups of packages, where packages live, and
//! which of them are enabled. When a host asks to load a package,
//! [`resolver::require`] decides whether an enabled local checkout exists and,
//! if so, hands its entry source file to the host's loader instead of the
//! installed copy.
//!
//! ## Quick Example
//!
//! ```
//! use devroute::filesystem::MemoryFS;
//! use devroute::resolver::Resolution;
//! use devroute::session::Session;
//!
//! let mut fs = MemoryFS::new();
//! fs.touch("/home/dev/Projects/rack/lib/rack.rb").unwrap();
//!
//! let mut session = Session::with_fs(fs);
//! let config = [
//!     "+code ~/Projects",
//!     "=web rack,",
//!     "     sinatra",
//!     "@code web",
//!     "!enable web",
//! ]
//! .join("\n");
//! session.load_config_str(&config).unwrap();
//!
//! assert!(session.try_resolve("rack").is_resolved());
//! assert_eq!(session.try_resolve("sinatra"), Resolution::NotFound);
//! assert_eq!(session.try_resolve("rails"), Resolution::NotEnabled);
//! ```
//!
//! ## Core Concepts
//!
//! - **Registry (`registry`)**: the context object holding directories,
//!   groups, packages, location bindings, search paths and enable state.
//!   It also exposes the direct configuration API.
//! - **Configuration (`config`, `expression`)**: line joining, expression
//!   parsing, and application of expressions to a registry.
//! - **Resolution (`resolver`)**: the per-request decision of where, if
//!   anywhere, a package should be loaded from.
//! - **Filesystem (`filesystem`)**: the capability the parser and resolver use
//!   to expand paths and check for files, with an in-memory test double.
//! - **Session (`session`)**: bundles a registry, a filesystem and a source
//!   layout for an embedding host.

pub mod config;
pub mod defaults;
pub mod directory;
pub mod enable;
pub mod error;
pub mod expression;
pub mod filesystem;
pub mod group;
pub mod name;
pub mod output;
pub mod package;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod suggestions;

#[cfg(test)]
mod name_proptest;
