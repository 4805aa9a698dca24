// src/config/model.rs

use serde::Deserialize;

/// Project description as read from a TOML file.
///
/// ```toml
/// [project]
/// name = "dashboard"
/// license_header = "Copyright (c) Example Corp."
///
/// [docker]
/// build_args = ["VERSION"]
///
/// [js]
/// source_dir = "frontend"
///
/// [[build]]
/// name = "app-build"
///
/// [image]
/// name = "app-image"
/// ```
///
/// Only `[project].name` is mandatory. This is the unvalidated form; convert
/// it with `ProjectFile::try_from` before use.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawProjectFile {
    pub project: ProjectSection,

    #[serde(default)]
    pub docker: DockerSection,

    #[serde(default)]
    pub ci: CiSection,

    #[serde(default)]
    pub js: JsSection,

    #[serde(default)]
    pub protobuf: Option<ProtobufSection>,

    /// `[[build]]` entries, in file order.
    #[serde(default)]
    pub build: Vec<BuildSection>,

    #[serde(default)]
    pub image: Option<ImageSection>,
}

/// Validated project description.
///
/// Only constructible through `TryFrom<RawProjectFile>` (or the builders in
/// the test utilities, which go through the same conversion).
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub project: ProjectSection,
    pub docker: DockerSection,
    pub ci: CiSection,
    pub js: JsSection,
    pub protobuf: Option<ProtobufSection>,
    pub build: Vec<BuildSection>,
    pub image: Option<ImageSection>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(raw: RawProjectFile) -> Self {
        Self {
            project: raw.project,
            docker: raw.docker,
            ci: raw.ci,
            js: raw.js,
            protobuf: raw.protobuf,
            build: raw.build,
            image: raw.image,
        }
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,

    /// Directory `local-%` targets export build output into.
    #[serde(default = "default_artifacts")]
    pub artifacts: String,

    /// License text placed above the generated notice of scaffolded files
    /// that ask for it.
    #[serde(default)]
    pub license_header: Option<String>,
}

fn default_artifacts() -> String {
    "_out".to_string()
}

/// `[docker]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockerSection {
    /// Extra build arguments forwarded from `make` to `docker buildx build`.
    #[serde(default)]
    pub build_args: Vec<String>,
}

/// `[ci]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CiSection {
    /// Container image every pipeline step runs in.
    #[serde(default = "default_ci_image")]
    pub image: String,
}

fn default_ci_image() -> String {
    "docker:20.10-dind".to_string()
}

impl Default for CiSection {
    fn default() -> Self {
        Self {
            image: default_ci_image(),
        }
    }
}

/// `[js]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsSection {
    /// Directory holding `package.json`, relative to the project root.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Node.js image tag used when `image` is not set.
    #[serde(default = "default_js_version")]
    pub version: String,

    /// Full toolchain image reference; overrides `version`.
    #[serde(default)]
    pub image: Option<String>,

    /// Mount point of the npm cache inside build stages.
    #[serde(default = "default_npm_cache_path")]
    pub npm_cache_path: String,

    /// Extra directories copied into the toolchain stage.
    #[serde(default)]
    pub directories: Vec<String>,

    /// Extra files copied into the toolchain stage.
    #[serde(default)]
    pub source_files: Vec<String>,

    #[serde(default = "default_true")]
    pub lint: bool,

    #[serde(default = "default_true")]
    pub unit_tests: bool,
}

fn default_source_dir() -> String {
    "frontend".to_string()
}

fn default_js_version() -> String {
    "15.14.0-alpine3.13".to_string()
}

fn default_npm_cache_path() -> String {
    "/src/node_modules".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for JsSection {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            version: default_js_version(),
            image: None,
            npm_cache_path: default_npm_cache_path(),
            directories: Vec::new(),
            source_files: Vec::new(),
            lint: true,
            unit_tests: true,
        }
    }
}

/// `[protobuf]` section. Its presence adds the protobuf node.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtobufSection {
    /// `.proto` files copied into the toolchain stage.
    pub specs: Vec<String>,

    /// Where generated JS stubs go, relative to the JS source dir.
    #[serde(default = "default_protobuf_out_dir")]
    pub out_dir: String,
}

fn default_protobuf_out_dir() -> String {
    "src/api".to_string()
}

/// `[[build]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    pub name: String,

    /// Other builds this one depends on.
    #[serde(default)]
    pub after: Vec<String>,
}

/// `[image]` section: a final image collecting every build's output.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSection {
    pub name: String,
}
