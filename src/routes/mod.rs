/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// ensuring access control is applied explicitly at the module level (via Axum
/// layers) rather than per-handler annotations, which prevents accidental
/// exposure of protected endpoints.

/// Routes accessible to all clients: liveness probe and the login gateway.
pub mod public;

/// Article resource routes, protected by the `AuthUser` extractor middleware.
/// Requires a validated bearer token on every request.
pub mod articles;
