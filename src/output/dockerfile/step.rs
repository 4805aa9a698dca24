// src/output/dockerfile/step.rs

//! Dockerfile build steps.

/// One instruction inside a build stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `RUN program args...`
    Run(Vec<String>),
    /// `RUN [--mount=...] command`
    Script(Script),
    /// `COPY [--from=stage] src dst`
    Copy(CopyStep),
    /// `WORKDIR dir`
    WorkDir(String),
    /// `ENV key=value`
    Env { key: String, value: String },
    /// `ARG name`
    Arg(String),
}

impl Step {
    pub(crate) fn render(&self) -> String {
        match self {
            Step::Run(args) => format!("RUN {}", args.join(" ")),
            Step::Script(script) => script.render(),
            Step::Copy(copy) => copy.render(),
            Step::WorkDir(dir) => format!("WORKDIR {dir}"),
            Step::Env { key, value } => format!("ENV {key}={value}"),
            Step::Arg(name) => format!("ARG {name}"),
        }
    }
}

/// Shell script step, optionally with build cache mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    command: String,
    cache_mounts: Vec<String>,
}

impl Script {
    pub fn mount_cache(mut self, target: impl Into<String>) -> Self {
        self.cache_mounts.push(target.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn cache_mounts(&self) -> &[String] {
        &self.cache_mounts
    }

    fn render(&self) -> String {
        let mut line = String::from("RUN");
        for target in &self.cache_mounts {
            line.push_str(&format!(" --mount=type=cache,target={target}"));
        }
        line.push(' ');
        line.push_str(&self.command);
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    src: String,
    dst: String,
    from: Option<String>,
}

impl CopyStep {
    /// Copy out of another stage (or image) instead of the build context.
    pub fn from_stage(mut self, stage: impl Into<String>) -> Self {
        self.from = Some(stage.into());
        self
    }

    pub fn source_stage(&self) -> Option<&str> {
        self.from.as_deref()
    }

    fn render(&self) -> String {
        match &self.from {
            Some(stage) => format!("COPY --from={stage} {} {}", self.src, self.dst),
            None => format!("COPY {} {}", self.src, self.dst),
        }
    }
}

pub fn run<I, S>(args: I) -> Step
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Step::Run(args.into_iter().map(Into::into).collect())
}

pub fn script(command: impl Into<String>) -> Script {
    Script {
        command: command.into(),
        cache_mounts: Vec::new(),
    }
}

pub fn copy(src: impl Into<String>, dst: impl Into<String>) -> CopyStep {
    CopyStep {
        src: src.into(),
        dst: dst.into(),
        from: None,
    }
}

pub fn workdir(dir: impl Into<String>) -> Step {
    Step::WorkDir(dir.into())
}

pub fn env(key: impl Into<String>, value: impl Into<String>) -> Step {
    Step::Env {
        key: key.into(),
        value: value.into(),
    }
}

pub fn arg(name: impl Into<String>) -> Step {
    Step::Arg(name.into())
}

impl From<Script> for Step {
    fn from(script: Script) -> Self {
        Step::Script(script)
    }
}

impl From<CopyStep> for Step {
    fn from(copy: CopyStep) -> Self {
        Step::Copy(copy)
    }
}
