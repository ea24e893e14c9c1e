/// Service name used when a method path has no service part.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Split `/pkg.Service/Method` into `("pkg.Service", "Method")`.
///
/// Paths without a service part yield `"unknown"` as the service.
pub fn split_method(full_method: &str) -> (&str, &str) {
    let trimmed = full_method.strip_prefix('/').unwrap_or(full_method);
    match trimmed.rsplit_once('/') {
        Some((service, method)) if !service.is_empty() => (service, method),
        Some((_, method)) => (UNKNOWN_SERVICE, method),
        None => (UNKNOWN_SERVICE, trimmed),
    }
}
