// src/project/js/mod.rs

//! Nodes of a JS frontend project.

pub mod build;
pub mod lint;
pub mod protobuf;
pub mod templates;
pub mod toolchain;
pub mod unit_tests;

pub use build::Build;
pub use lint::Lint;
pub use protobuf::Protobuf;
pub use toolchain::Toolchain;
pub use unit_tests::UnitTests;

/// Join two relative build-context paths with `/`.
pub(crate) fn join_path(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}
