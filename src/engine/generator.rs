// src/engine/generator.rs

use std::fmt;

use tracing::{debug, error, info};

use crate::config::ProjectFile;
use crate::dag::{Graph, dispatch};
use crate::engine::artifacts::{Artifacts, GeneratedFile};
use crate::errors::{PipegenError, Result};
use crate::output::{ci, dockerfile, makefile, template};
use crate::project;

/// Output formats, in the order every run renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Makefile,
    Dockerfile,
    Ci,
    Templates,
}

impl Format {
    pub const ORDER: [Format; 4] = [
        Format::Makefile,
        Format::Dockerfile,
        Format::Ci,
        Format::Templates,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Makefile => "makefile",
            Format::Dockerfile => "dockerfile",
            Format::Ci => "ci",
            Format::Templates => "templates",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where one run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Configured,
    GraphBuilt,
    Rendering(Format),
    Done,
    Failed,
}

/// Run-wide values the serializers need beyond the accumulators.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub pipeline_name: String,
    pub ci_image: String,
    pub license_header: Option<String>,
}

impl RenderSettings {
    pub fn from_project(cfg: &ProjectFile) -> Self {
        Self {
            pipeline_name: cfg.project.name.clone(),
            ci_image: cfg.ci.image.clone(),
            license_header: cfg.project.license_header.clone(),
        }
    }
}

/// One generation pass: build the graph, then render every format in
/// [`Format::ORDER`].
///
/// Any failure moves the generator to [`GeneratorState::Failed`] and no
/// artifacts are handed out.
#[derive(Debug)]
pub struct Generator {
    project: Option<ProjectFile>,
    settings: RenderSettings,
    graph: Option<Graph>,
    state: GeneratorState,
}

impl Generator {
    pub fn new(project: ProjectFile) -> Self {
        Self {
            settings: RenderSettings::from_project(&project),
            project: Some(project),
            graph: None,
            state: GeneratorState::Configured,
        }
    }

    /// Start from an already assembled graph.
    pub fn from_graph(graph: Graph, settings: RenderSettings) -> Self {
        Self {
            project: None,
            settings,
            graph: Some(graph),
            state: GeneratorState::GraphBuilt,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// Assemble the project graph (no-op once built).
    pub fn build_graph(&mut self) -> Result<&Graph> {
        if self.graph.is_none() {
            let Some(project) = &self.project else {
                return Err(PipegenError::ConfigError(
                    "generator has neither a project nor a graph".to_string(),
                ));
            };

            match project::assemble(project) {
                Ok(graph) => {
                    self.transition(GeneratorState::GraphBuilt);
                    self.graph = Some(graph);
                }
                Err(err) => {
                    self.fail(&err);
                    return Err(err);
                }
            }
        }

        self.graph
            .as_ref()
            .ok_or_else(|| PipegenError::ConfigError("graph was not built".to_string()))
    }

    /// Render every format and collect the output files.
    pub fn generate(&mut self) -> Result<Artifacts> {
        if matches!(self.state, GeneratorState::Failed | GeneratorState::Done) {
            return Err(PipegenError::ConfigError(format!(
                "generator cannot run again from state {:?}",
                self.state
            )));
        }
        self.build_graph()?;

        let mut artifacts = Artifacts::new();
        for format in Format::ORDER {
            self.transition(GeneratorState::Rendering(format));
            if let Err(err) = self.render_format(format, &mut artifacts) {
                self.fail(&err);
                return Err(err);
            }
        }

        self.transition(GeneratorState::Done);
        info!(files = artifacts.len(), "generation complete");
        Ok(artifacts)
    }

    fn render_format(&self, format: Format, artifacts: &mut Artifacts) -> Result<()> {
        let graph = self
            .graph
            .as_ref()
            .ok_or_else(|| PipegenError::ConfigError("graph was not built".to_string()))?;

        match format {
            Format::Makefile => {
                let output = dispatch::<makefile::Output>(graph)?;
                artifacts.push(
                    format.name(),
                    GeneratedFile::new("Makefile", makefile::render(&output)),
                )?;
            }
            Format::Dockerfile => {
                let output = dispatch::<dockerfile::Output>(graph)?;
                let text = dockerfile::render(&output).map_err(|source| {
                    PipegenError::External {
                        format: format.name(),
                        path: "Dockerfile".into(),
                        source,
                    }
                })?;
                artifacts.push(format.name(), GeneratedFile::new("Dockerfile", text))?;
            }
            Format::Ci => {
                let output = dispatch::<ci::Output>(graph)?;
                let pipeline = ci::Pipeline {
                    name: &self.settings.pipeline_name,
                    image: &self.settings.ci_image,
                };
                let text = ci::render(&output, &pipeline).map_err(|source| {
                    PipegenError::External {
                        format: format.name(),
                        path: ".drone.yml".into(),
                        source,
                    }
                })?;
                artifacts.push(format.name(), GeneratedFile::new(".drone.yml", text))?;
            }
            Format::Templates => {
                let output = dispatch::<template::Output>(graph)?;
                let license = self.settings.license_header.as_deref();
                for def in output.files() {
                    let text = template::render_file(def, license).map_err(|source| {
                        match def.origin() {
                            Some(node) => PipegenError::Template {
                                node: node.to_string(),
                                path: def.path().into(),
                                source,
                            },
                            None => PipegenError::External {
                                format: format.name(),
                                path: def.path().into(),
                                source,
                            },
                        }
                    })?;
                    artifacts.push(format.name(), GeneratedFile::new(def.path(), text))?;
                }
            }
        }

        Ok(())
    }

    fn transition(&mut self, next: GeneratorState) {
        debug!(from = ?self.state, to = ?next, "generator state change");
        self.state = next;
    }

    fn fail(&mut self, err: &PipegenError) {
        error!(state = ?self.state, error = %err, "generation failed");
        self.state = GeneratorState::Failed;
    }
}
