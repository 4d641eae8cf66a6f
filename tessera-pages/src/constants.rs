/// Element capacity of a freshly reserved head page when the caller does not
/// ask for a specific size.
pub const DEFAULT_ELEMENTS_PER_PAGE: u64 = 10_000;
