#![allow(dead_code)]

use pipegen::config::{
    BuildSection, CiSection, DockerSection, ImageSection, JsSection, ProjectFile, ProjectSection,
    ProtobufSection, RawProjectFile,
};

/// Builder for `ProjectFile` to simplify test setup.
///
/// Starts from the same defaults as an otherwise empty TOML file with just
/// `[project].name` set.
pub struct ProjectFileBuilder {
    project: RawProjectFile,
}

impl ProjectFileBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            project: RawProjectFile {
                project: ProjectSection {
                    name: name.to_string(),
                    artifacts: "_out".to_string(),
                    license_header: None,
                },
                docker: DockerSection::default(),
                ci: CiSection::default(),
                js: JsSection::default(),
                protobuf: None,
                build: Vec::new(),
                image: None,
            },
        }
    }

    pub fn with_build(mut self, build: BuildSection) -> Self {
        self.project.build.push(build);
        self
    }

    pub fn with_image(mut self, name: &str) -> Self {
        self.project.image = Some(ImageSection {
            name: name.to_string(),
        });
        self
    }

    pub fn with_build_arg(mut self, arg: &str) -> Self {
        self.project.docker.build_args.push(arg.to_string());
        self
    }

    pub fn with_license(mut self, text: &str) -> Self {
        self.project.project.license_header = Some(text.to_string());
        self
    }

    pub fn with_protobuf(mut self, specs: &[&str]) -> Self {
        self.project.protobuf = Some(ProtobufSection {
            specs: specs.iter().map(|s| s.to_string()).collect(),
            out_dir: "src/api".to_string(),
        });
        self
    }

    pub fn source_dir(mut self, dir: &str) -> Self {
        self.project.js.source_dir = dir.to_string();
        self
    }

    pub fn js_image(mut self, image: &str) -> Self {
        self.project.js.image = Some(image.to_string());
        self
    }

    pub fn js_directory(mut self, dir: &str) -> Self {
        self.project.js.directories.push(dir.to_string());
        self
    }

    pub fn js_source_file(mut self, file: &str) -> Self {
        self.project.js.source_files.push(file.to_string());
        self
    }

    pub fn without_lint(mut self) -> Self {
        self.project.js.lint = false;
        self
    }

    pub fn without_unit_tests(mut self) -> Self {
        self.project.js.unit_tests = false;
        self
    }

    /// The unvalidated form, for tests exercising validation itself.
    pub fn raw(self) -> RawProjectFile {
        self.project
    }

    pub fn build(self) -> ProjectFile {
        ProjectFile::try_from(self.project).expect("Failed to build valid project from builder")
    }
}

/// Builder for `BuildSection`.
pub struct BuildSectionBuilder {
    build: BuildSection,
}

impl BuildSectionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            build: BuildSection {
                name: name.to_string(),
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.build.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> BuildSection {
        self.build
    }
}
