//! Custom Test Assertions
//!
//! Assertion helpers that print the whole offending value on failure.

use core_kernel::{ErrorKind, Page};
use domain_claims::{ClaimStatus, FoundItemClaim};

/// Asserts page metadata
///
/// # Panics
///
/// Panics if the total or the number of returned items differ
pub fn assert_page<T: std::fmt::Debug>(page: &Page<T>, total: u64, len: usize) {
    assert_eq!(
        page.total, total,
        "Expected total {}, got {} in {:?}",
        total, page.total, page
    );
    assert_eq!(
        page.items.len(),
        len,
        "Expected {} items on the page, got {}",
        len,
        page.items.len()
    );
}

/// Asserts a claim's status
pub fn assert_claim_status(claim: &FoundItemClaim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} has status {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts that a result failed with an error of `kind`
///
/// Works for every domain error through its `kind()` accessor.
pub fn assert_error_kind<T, E>(result: &Result<T, E>, kind: ErrorKind, error_kind: impl Fn(&E) -> ErrorKind)
where
    T: std::fmt::Debug,
    E: std::fmt::Display,
{
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok({:?})", kind, value),
        Err(e) => assert_eq!(error_kind(e), kind, "Unexpected error: {}", e),
    }
}
