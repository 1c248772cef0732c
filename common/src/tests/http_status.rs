use crate::HttpStatusCode;

/// **VALUE**: Verifies the status ranges used to reject a download before streaming.
///
/// **WHY THIS MATTERS**: The artifact manager only writes a file for 2xx responses. A
/// range that is off by one would either stream an error page into the JAR path or
/// reject a valid download.
///
/// **BUG THIS CATCHES**: Would catch inclusive/exclusive range mistakes at 199/200/299/300.
#[test]
fn given_boundary_codes_when_is_success_checked_then_only_2xx_accepted() {
    // GIVEN: Codes around the 2xx boundaries
    let cases = [(199, false), (200, true), (204, true), (299, true), (300, false)];

    // WHEN / THEN: Only 2xx codes are successes
    for (code, expected) in cases {
        assert_eq!(
            HttpStatusCode(code).is_success(),
            expected,
            "Unexpected is_success for {code}"
        );
    }
}

/// **VALUE**: Verifies client/server error categorization.
///
/// **WHY THIS MATTERS**: Download failures are logged differently for 4xx (artifact moved)
/// and 5xx (endpoint down).
///
/// **BUG THIS CATCHES**: Would catch overlapping or swapped ranges.
#[test]
fn given_error_codes_when_categorized_then_client_and_server_are_disjoint() {
    // GIVEN: A 404 and a 500
    let not_found = HttpStatusCode::from(404);
    let internal = HttpStatusCode::from(500);

    // THEN: Each lands in exactly one category
    assert!(not_found.is_client_error() && !not_found.is_server_error());
    assert!(internal.is_server_error() && !internal.is_client_error());
    assert_eq!(internal.to_string(), "500");
}
