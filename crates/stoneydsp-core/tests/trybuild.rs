//! Trybuild checks that a downstream crate can use the build-time facade.
//!
//! These cases must compile and run:
//! - semantic aliases declared through `semantic_types!`
//! - a public function declared through `public_function!`
//! - an export mode pinned with `require_single_export_mode`
//!
//! The failing side (mis-sized or mis-signed aliases, zero or several export
//! modes) lives in the `compile_fail` examples on those items.

#[cfg(feature = "local")]
#[test]
fn downstream_declarations_pass_tests() {
    let t = trybuild::TestCases::new();

    t.pass("tests/pass/downstream_semantic_types.rs");
    t.pass("tests/pass/downstream_public_function.rs");
}
