// tests/config_loading.rs

mod common;

use common::write_project;
use pipegen::config::{load_and_validate, load_from_path};

#[test]
fn minimal_project_gets_defaults() {
    let file = write_project("[project]\nname = \"demo\"\n");
    let project = load_and_validate(file.path()).unwrap();

    assert_eq!(project.project.name, "demo");
    assert_eq!(project.project.artifacts, "_out");
    assert!(project.project.license_header.is_none());
    assert!(project.docker.build_args.is_empty());
    assert_eq!(project.ci.image, "docker:20.10-dind");
    assert_eq!(project.js.source_dir, "frontend");
    assert_eq!(project.js.version, "15.14.0-alpine3.13");
    assert_eq!(project.js.npm_cache_path, "/src/node_modules");
    assert!(project.js.lint);
    assert!(project.js.unit_tests);
    assert!(project.protobuf.is_none());
    assert!(project.build.is_empty());
    assert!(project.image.is_none());
}

#[test]
fn full_project_is_read_in_file_order() {
    let file = write_project(
        r#"
[project]
name = "dashboard"
artifacts = "dist"
license_header = "Copyright Example."

[docker]
build_args = ["VERSION", "TAG"]

[ci]
image = "alpine:3.19"

[js]
source_dir = "web"
image = "registry.example.com/node:20"
directories = ["web/src"]
source_files = ["web/index.html"]
lint = false

[protobuf]
specs = ["api/v1/service.proto"]
out_dir = "src/gen"

[[build]]
name = "web-app"

[[build]]
name = "admin"
after = ["web-app"]

[image]
name = "dashboard-image"
"#,
    );

    let raw = load_from_path(file.path()).unwrap();
    assert_eq!(raw.build.len(), 2);

    let project = load_and_validate(file.path()).unwrap();
    assert_eq!(project.project.artifacts, "dist");
    assert_eq!(project.docker.build_args, vec!["VERSION", "TAG"]);
    assert_eq!(project.ci.image, "alpine:3.19");
    assert_eq!(project.js.source_dir, "web");
    assert_eq!(project.js.image.as_deref(), Some("registry.example.com/node:20"));
    assert!(!project.js.lint);
    assert!(project.js.unit_tests);

    let protobuf = project.protobuf.as_ref().unwrap();
    assert_eq!(protobuf.specs, vec!["api/v1/service.proto"]);
    assert_eq!(protobuf.out_dir, "src/gen");

    let names: Vec<&str> = project.build.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["web-app", "admin"]);
    assert_eq!(project.build[1].after, vec!["web-app"]);
    assert_eq!(project.image.as_ref().unwrap().name, "dashboard-image");
}

#[test]
fn full_project_assembles_and_generates() {
    let file = write_project(
        r#"
[project]
name = "dashboard"

[js]
source_dir = "web"
directories = ["web/src", "shared"]
source_files = ["web/index.html"]

[[build]]
name = "web-app"
"#,
    );
    let project = load_and_validate(file.path()).unwrap();
    let artifacts = pipegen::engine::Generator::new(project).generate().unwrap();

    let docker = &artifacts.get("Dockerfile").unwrap().contents;
    assert!(docker.contains("COPY web/package.json ./\n"));
    assert!(docker.contains("COPY ./web/src ./src\n"));
    assert!(docker.contains("COPY ./shared ./shared\n"));
    assert!(docker.contains("COPY web/index.html ./index.html\n"));
}
