//! Constants used throughout authsetup.
//!
//! Centralizes variable names and defaults.

/// Default env file written and read by the tool.
pub const ENV_FILE: &str = ".env.local";

/// RS256 private key, PKCS#8 PEM.
pub const JWT_PRIVATE_KEY: &str = "JWT_PRIVATE_KEY";

/// Public signing key as a JSON Web Key Set.
pub const JWKS: &str = "JWKS";

/// Base64 session secret.
pub const AUTH_SECRET: &str = "AUTH_SECRET";

/// Hex secret shared between the auth adapter and the backend.
pub const ADAPTER_SECRET: &str = "CONVEX_AUTH_ADAPTER_SECRET";

/// Deployment URL of the Convex backend.
pub const CONVEX_URL: &str = "NEXT_PUBLIC_CONVEX_URL";

/// HTTP actions URL, derived from [`CONVEX_URL`].
pub const CONVEX_SITE_URL: &str = "CONVEX_SITE_URL";

/// Variables pushed to the Convex deployment, in sync order.
pub const SYNC_KEYS: &[&str] = &[
    JWT_PRIVATE_KEY,
    JWKS,
    AUTH_SECRET,
    ADAPTER_SECRET,
    "SITE_URL",
    "AUTH_GITHUB_ID",
    "AUTH_GITHUB_SECRET",
    "AUTH_RESEND_KEY",
];

/// Size of the RSA signing key in bits.
pub const RSA_BITS: usize = 2048;

/// Random bytes behind each generated secret.
pub const SECRET_BYTES: usize = 32;

/// Reachability probe timeout.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;

/// Project-local convex binary installed by npm.
pub const LOCAL_CONVEX_BIN: &str = "node_modules/.bin/convex";
