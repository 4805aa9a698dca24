// tests/generate_js_project.rs

mod common;

use pipegen::config::JsSection;
use pipegen::dag::{Graph, dispatch};
use pipegen::engine::{Artifacts, Generator, GeneratorState};
use pipegen::output::dockerfile::step::Step;
use pipegen::output::{ci, dockerfile, makefile};
use pipegen::project::js::{Build, Toolchain};
use pipegen::project::{Meta, assemble};
use pipegen_test_utils::builders::{BuildSectionBuilder, ProjectFileBuilder};
use pretty_assertions::assert_eq;

fn toolchain_and_build() -> Graph {
    let mut meta = Meta::new();
    let toolchain = Toolchain::new(&mut meta, &JsSection::default());
    let build = Build::new(&mut meta, "app-build");

    let mut graph = Graph::new();
    let js = graph.add(toolchain).unwrap();
    let app = graph.add(build).unwrap();
    graph.add_input(app, &[js]).unwrap();
    graph
}

fn generate(builder: ProjectFileBuilder) -> Artifacts {
    let mut generator = Generator::new(builder.build());
    let artifacts = generator.generate().unwrap();
    assert_eq!(generator.state(), GeneratorState::Done);
    artifacts
}

fn demo_project() -> ProjectFileBuilder {
    ProjectFileBuilder::new("demo")
        .with_build(BuildSectionBuilder::new("app-build").build())
        .with_image("app-image")
        .with_license("Copyright 2026 Example Authors.")
}

#[test]
fn toolchain_and_build_yield_two_make_targets() {
    common::init_tracing();
    let graph = toolchain_and_build();

    let output = dispatch::<makefile::Output>(&graph).unwrap();
    let targets: Vec<&str> = output.targets().iter().map(|t| t.name()).collect();
    assert_eq!(targets, vec!["js", "app-build"]);

    let build = output.find_target("app-build").unwrap();
    assert_eq!(build.dependencies(), ["js"]);
    assert_eq!(build.script_lines(), ["@$(MAKE) local-$@ DEST=$(ARTIFACTS)"]);
    assert!(build.is_phony());

    let js = output.find_target("js").unwrap();
    assert!(js.dependencies().is_empty());
    assert_eq!(js.script_lines(), ["@$(MAKE) target-$@"]);
}

#[test]
fn toolchain_and_build_makefile_text() {
    let graph = toolchain_and_build();
    let output = dispatch::<makefile::Output>(&graph).unwrap();

    let expected = "\
# Code generated by pipegen. DO NOT EDIT.

# docker build settings

JS_TOOLCHAIN ?= docker.io/node:15.14.0-alpine3.13
VERSION ?= 0.0.0-dev

# targets

.PHONY: js
js:  ## Prepare js base toolchain.
\t@$(MAKE) target-$@

.PHONY: app-build
app-build: js  ## Builds js release for app-build.
\t@$(MAKE) local-$@ DEST=$(ARTIFACTS)
";
    assert_eq!(makefile::render(&output), expected);
}

#[test]
fn full_project_produces_every_file_in_order() {
    let artifacts = generate(demo_project());

    let paths: Vec<String> = artifacts
        .paths()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "Makefile",
            "Dockerfile",
            ".drone.yml",
            ".dockerignore",
            ".babelrc",
            ".tsconfig",
            ".eslintrc.yaml",
            ".jestrc",
            "internal/app-build/app-build.go",
            "internal/app-build/dist/.gitkeep",
        ]
    );
}

#[test]
fn generation_is_deterministic() {
    let first = generate(demo_project());
    let second = generate(demo_project());
    assert_eq!(first, second);
}

#[test]
fn assembled_graph_layout() {
    let graph = assemble(&demo_project().build()).unwrap();

    assert_eq!(
        graph.topological_order().unwrap(),
        vec![
            "docker",
            "js",
            "lint-eslint",
            "unit-tests-frontend",
            "app-build",
            "app-image",
        ]
    );

    let output = dispatch::<makefile::Output>(&graph).unwrap();
    let targets: Vec<&str> = output.targets().iter().map(|t| t.name()).collect();
    assert_eq!(
        targets,
        vec![
            "target-%",
            "local-%",
            "js",
            "lint-eslint",
            "unit-tests-frontend",
            "app-build",
            "app-image",
        ]
    );
    assert_eq!(output.find_target("app-image").unwrap().dependencies(), ["app-build"]);
    assert_eq!(output.find_target("lint-eslint").unwrap().dependencies(), ["js"]);
}

#[test]
fn dockerfile_stages_build_on_each_other() {
    let graph = assemble(&demo_project().build()).unwrap();
    let output = dispatch::<dockerfile::Output>(&graph).unwrap();

    let stages: Vec<(&str, &str)> = output
        .stages()
        .iter()
        .map(|s| (s.name(), s.base()))
        .collect();
    assert_eq!(
        stages,
        vec![
            ("js-toolchain", "${JS_TOOLCHAIN}"),
            ("js", "js-toolchain"),
            ("lint-eslint", "js"),
            ("unit-tests-frontend", "js"),
            ("app-build", "js"),
            ("app-image", "scratch"),
        ]
    );
    assert_eq!(output.args(), ["JS_TOOLCHAIN", "VERSION"]);

    let text = dockerfile::render(&output).unwrap();
    assert!(text.starts_with("# syntax = docker/dockerfile-upstream:1.2.0-labs\n"));
    assert!(text.contains("\nARG JS_TOOLCHAIN\n"));
    assert!(text.contains("\n# builds app-build\nFROM js AS app-build\n"));
    assert!(text.contains("RUN --mount=type=cache,target=/src/node_modules npm run build\n"));
    assert!(text.contains("COPY frontend/package.json ./\n"));
    assert!(text.contains("COPY --from=app-build /internal/app-build/dist /internal/app-build/dist\n"));
}

#[test]
fn protobuf_contributes_to_the_base_stage() {
    let project = ProjectFileBuilder::new("demo")
        .with_protobuf(&["api/service.proto"])
        .with_build(BuildSectionBuilder::new("app-build").build())
        .build();
    let graph = assemble(&project).unwrap();
    let output = dispatch::<dockerfile::Output>(&graph).unwrap();

    let base = output.find_stage("js").unwrap();
    let rendered: Vec<String> = base
        .steps()
        .iter()
        .map(|step| format!("{step:?}"))
        .collect();
    let copy_spec = rendered
        .iter()
        .position(|s| s.contains("api/service.proto"))
        .expect("spec copied into base stage");
    let npm_install = rendered
        .iter()
        .position(|s| s.contains("npm install"))
        .expect("npm install step");
    assert!(copy_spec < npm_install);

    // Protobuf is not a make target, and nobody depends on it by name.
    let make = dispatch::<makefile::Output>(&graph).unwrap();
    assert!(make.find_target("protobuf").is_none());
}

#[test]
fn ci_pipeline_text() {
    let artifacts = generate(demo_project());
    let pipeline = &artifacts.get(".drone.yml").unwrap().contents;

    let expected = "\
# Code generated by pipegen. DO NOT EDIT.
---
kind: pipeline
type: docker
name: demo

steps:
  - name: js
    image: docker:20.10-dind
    commands:
      - make js
  - name: lint-eslint
    image: docker:20.10-dind
    commands:
      - make lint-eslint
    depends_on:
      - js
  - name: unit-tests-frontend
    image: docker:20.10-dind
    commands:
      - make unit-tests-frontend
    depends_on:
      - js
  - name: app-build
    image: docker:20.10-dind
    commands:
      - make app-build
    depends_on:
      - js
  - name: app-image
    image: docker:20.10-dind
    commands:
      - make app-image
    depends_on:
      - app-build
      - js
";
    assert_eq!(pipeline, expected);
}

#[test]
fn scaffolded_files_carry_the_right_preamble() {
    let artifacts = generate(demo_project());

    let embed = &artifacts.get("internal/app-build/app-build.go").unwrap().contents;
    assert!(embed.starts_with(
        "// Copyright 2026 Example Authors.\n\n// Code generated by pipegen. DO NOT EDIT.\n\n"
    ));
    assert!(embed.contains("package appbuild\n"));
    assert!(embed.contains("embeds the app-build frontend build"));

    assert_eq!(artifacts.get("internal/app-build/dist/.gitkeep").unwrap().contents, "");

    let tsconfig = &artifacts.get(".tsconfig").unwrap().contents;
    assert!(tsconfig.starts_with("{\n"));

    let babel = &artifacts.get(".babelrc").unwrap().contents;
    assert!(babel.starts_with("// Code generated by pipegen. DO NOT EDIT.\n\nmodule.exports"));

    let eslint = &artifacts.get(".eslintrc.yaml").unwrap().contents;
    assert!(eslint.starts_with("# Code generated by pipegen. DO NOT EDIT.\n\nroot: true\n"));

    let dockerignore = &artifacts.get(".dockerignore").unwrap().contents;
    assert_eq!(
        dockerignore,
        "# Code generated by pipegen. DO NOT EDIT.\n\n*\n!.babelrc\n!.tsconfig\n!go.mod\n!go.sum\n!frontend\n!.eslintrc.yaml\n!.jestrc\n!internal/app-build/app-build.go\n"
    );
}

#[test]
fn build_args_reach_makefile_and_dockerfile() {
    let artifacts = generate(demo_project().with_build_arg("VERSION"));

    let make = &artifacts.get("Makefile").unwrap().contents;
    assert!(make.contains("COMMON_ARGS = --file=Dockerfile\n"));
    assert!(make.contains("COMMON_ARGS += --build-arg=VERSION=$(VERSION)\n"));
    assert!(make.contains("COMMON_ARGS += --build-arg=JS_TOOLCHAIN=$(JS_TOOLCHAIN)\n"));
    assert!(make.contains("ARTIFACTS := _out\n"));

    let docker = &artifacts.get("Dockerfile").unwrap().contents;
    assert!(docker.contains("ARG VERSION\nARG JS_TOOLCHAIN\n"));
}

#[test]
fn disabled_lint_and_tests_drop_their_nodes() {
    let project = ProjectFileBuilder::new("demo")
        .without_lint()
        .without_unit_tests()
        .with_build(BuildSectionBuilder::new("web").build())
        .build();
    let graph = assemble(&project).unwrap();

    assert!(graph.find("lint-eslint").is_none());
    assert!(graph.find("unit-tests-frontend").is_none());

    let output = dispatch::<dockerfile::Output>(&graph).unwrap();
    let text = dockerfile::render(&output).unwrap();
    assert!(!text.contains(".eslintrc.yaml"));
    assert!(!text.contains(".jestrc"));
}

#[test]
fn build_ordering_edges_are_honoured() {
    let project = ProjectFileBuilder::new("demo")
        .with_build(BuildSectionBuilder::new("admin").after("web").build())
        .with_build(BuildSectionBuilder::new("web").build())
        .build();
    let graph = assemble(&project).unwrap();

    let order = graph.topological_order().unwrap();
    let web = order.iter().position(|n| n == "web").unwrap();
    let admin = order.iter().position(|n| n == "admin").unwrap();
    assert!(web < admin);

    let make = dispatch::<makefile::Output>(&graph).unwrap();
    assert_eq!(make.find_target("admin").unwrap().dependencies(), ["js", "web"]);
}

#[test]
fn custom_toolchain_image_and_sources() {
    let project = ProjectFileBuilder::new("demo")
        .source_dir("web")
        .js_image("registry.example.com/node:20")
        .js_directory("web/components")
        .js_source_file("web/index.html")
        .with_build(BuildSectionBuilder::new("site").build())
        .build();
    let graph = assemble(&project).unwrap();

    let make = makefile::render(&dispatch::<makefile::Output>(&graph).unwrap());
    assert!(make.contains("JS_TOOLCHAIN ?= registry.example.com/node:20\n"));
    assert!(!make.contains("docker.io/node"));

    let docker = dockerfile::render(&dispatch::<dockerfile::Output>(&graph).unwrap()).unwrap();
    assert!(docker.contains("COPY ./web/components ./components\n"));
    assert!(docker.contains("COPY web/index.html ./index.html\n"));

    let pipeline = dispatch::<ci::Output>(&graph).unwrap();
    let site = pipeline.find_step("site").unwrap();
    assert_eq!(site.make_target(), "site");
    assert_eq!(site.dependencies(), ["js"]);
}

#[test]
fn ci_step_can_run_a_differently_named_target() {
    let mut output = ci::Output::default();
    output
        .step(ci::make_step("release").target("release-all"))
        .unwrap();
    let text = ci::render(
        &output,
        &ci::Pipeline {
            name: "demo",
            image: "docker:20.10-dind",
        },
    )
    .unwrap();

    assert!(text.contains("  - name: release\n"));
    assert!(text.contains("      - make release-all\n"));
}

#[test]
fn base_stage_declares_the_version_arg_before_using_it() {
    let graph = toolchain_and_build();
    let output = dispatch::<dockerfile::Output>(&graph).unwrap();
    let steps = output.find_stage("js").unwrap().steps();

    let npm_version = steps
        .iter()
        .position(|step| {
            matches!(step, Step::Script(script) if script.command() == "npm version ${VERSION}")
        })
        .expect("npm version step");
    assert_eq!(steps[npm_version - 1], Step::Arg("VERSION".to_string()));

    let Step::Script(script) = &steps[npm_version] else {
        unreachable!();
    };
    assert_eq!(script.cache_mounts(), ["/src/node_modules"]);

    let text = dockerfile::render(&output).unwrap();
    assert!(text.contains(
        "ARG VERSION\nRUN --mount=type=cache,target=/src/node_modules npm version ${VERSION}\n"
    ));
}

#[test]
fn version_is_forwarded_from_make() {
    let artifacts = generate(demo_project());
    let make = &artifacts.get("Makefile").unwrap().contents;
    assert!(make.contains("VERSION ?= 0.0.0-dev\n"));
    assert!(make.contains("COMMON_ARGS += --build-arg=VERSION=$(VERSION)\n"));
}

#[test]
fn empty_pipeline_has_an_explicit_empty_step_list() {
    let text = ci::render(
        &ci::Output::default(),
        &ci::Pipeline {
            name: "demo",
            image: "docker:20.10-dind",
        },
    )
    .unwrap();

    assert!(text.ends_with("name: demo\n\nsteps: []\n"));
}
