//! authsetup - Generate auth signing keys and secrets for local development.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── setup         # Generate, write and sync flow
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # Run configuration
//!     ├── env           # .env line parser and upserter
//!     ├── keys          # RS256 keypair, JWKS and secrets
//!     ├── probe         # TCP reachability probe
//!     ├── runner        # External command execution
//!     └── sync          # Convex env sync
//! ```
//!
//! # Features
//!
//! - RS256 signing key as PKCS#8 PEM plus a matching JWKS
//! - Random base64 and hex secrets
//! - In-place upsert that leaves unrelated lines untouched
//! - Dry-run by default when pushing to Convex

pub mod cli;
pub mod core;
pub mod error;
