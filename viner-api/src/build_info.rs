//! Build metadata reported by the stat methods.

/// Version string of this build, as reported in field 0 of
/// `viner_getstat1` and in `version` of `viner_getstathr`.
pub fn project_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
