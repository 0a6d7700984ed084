#[macro_use]
extern crate tracing;

use self::{
    compile::{CompiledStylesheet, Compiler},
    prefix::Prefixer,
};
use chime_blocking::CpuPool;
use chime_config::{
    compiler::{OutputStyle, SourceMap},
    Configuration,
};
use chime_error::{Error, ErrorType, Result, ResultExt};
use futures_util::{stream::FuturesUnordered, StreamExt};
use std::{path::PathBuf, sync::Arc};

pub use self::{
    discover::find_stylesheets,
    job::{output_path_for, JobState, StylesheetJob},
};

pub mod compile;
pub mod discover;
pub mod importer;
pub mod job;
pub mod output;
pub mod prefix;
pub mod source_map;

#[derive(Debug)]
pub struct JobFailure {
    pub source_path: PathBuf,
    pub error: Error,
}

/// Outcome of every job of a run
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output paths of the stylesheets that were written
    pub built: Vec<PathBuf>,
    pub failed: Vec<JobFailure>,
}

impl BuildReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compile → prefix → write, for any number of stylesheets
///
/// Cheap to clone
#[derive(Clone)]
pub struct Pipeline {
    compiler: Arc<Compiler>,
    prefixer: Arc<Prefixer>,
    pool: CpuPool,
    style: OutputStyle,
    indent_width: usize,
    source_map: SourceMap,
}

impl Pipeline {
    pub fn new(config: &Configuration) -> Result<Self> {
        let compiler = Compiler::new(&config.compiler);
        let prefixer = Prefixer::new(&config.prefixer, config.compiler.style)?;
        let pool = CpuPool::new(config.compile_threads)?;

        Ok(Self {
            compiler: Arc::new(compiler),
            prefixer: Arc::new(prefixer),
            pool,
            style: config.compiler.style,
            indent_width: config.compiler.indent_width,
            source_map: config.compiler.source_map,
        })
    }

    /// Run every stage of a single job
    ///
    /// On error the job is left in the [`JobState::Failed`] state
    #[instrument(skip_all, fields(source = %job.source_path().display()))]
    pub async fn run(&self, job: &mut StylesheetJob) -> Result<()> {
        let result = self.run_stages(job).await;
        if result.is_err() {
            job.transition(JobState::Failed);
        }

        result
    }

    async fn run_stages(&self, job: &mut StylesheetJob) -> Result<()> {
        if output::remove_stale(job.output_path()).await? {
            debug!(output = %job.output_path().display(), "removed stale output");
        }
        job.transition(JobState::CleanedOutput);

        job.transition(JobState::Compiling);
        let compiler = Arc::clone(&self.compiler);
        let source_path = job.source_path().to_path_buf();
        let CompiledStylesheet { css, source } = self
            .pool
            .spawn(move || compiler.compile(&source_path))
            .await
            .with_error_type(ErrorType::Compile)??;
        job.transition(JobState::Compiled);

        job.transition(JobState::PostProcessing);
        let prefixer = Arc::clone(&self.prefixer);
        // Warning positions point into the compiled CSS
        let filename = job.output_path().display().to_string();
        let prefixed = self
            .pool
            .spawn(move || prefixer.process(&filename, &css))
            .await
            .with_error_type(ErrorType::PostProcess)??;

        for warning in &prefixed.warnings {
            warn!("{warning}");
        }

        let mut css = match self.style {
            OutputStyle::Expanded => prefix::reindent(&prefixed.css, self.indent_width),
            OutputStyle::Compressed => prefixed.css,
        };
        if self.source_map == SourceMap::Embed {
            source_map::embed(&mut css, job.output_path(), job.source_path(), &source)?;
        }

        job.transition(JobState::Writing);
        output::write(job.output_path(), &css).await?;
        job.transition(JobState::Written);

        info!("build: {}", job.output_path().display());

        Ok(())
    }

    async fn build_one(&self, source_path: PathBuf) -> Result<PathBuf> {
        let mut job = StylesheetJob::new(source_path)?;
        self.run(&mut job).await?;

        Ok(job.output_path().to_path_buf())
    }

    /// Build all stylesheets concurrently and wait for every one of them
    ///
    /// A failing job never affects the others. Its error is logged and recorded in the report.
    pub async fn build_all<I>(&self, sources: I) -> BuildReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut jobs: FuturesUnordered<_> = sources
            .into_iter()
            .map(|source_path| async move {
                let result = self.build_one(source_path.clone()).await;
                (source_path, result)
            })
            .collect();

        let mut report = BuildReport::default();
        while let Some((source_path, result)) = jobs.next().await {
            match result {
                Ok(output_path) => report.built.push(output_path),
                Err(error) => {
                    error!(
                        source = %source_path.display(),
                        stage = %error.error_type(),
                        "{error}"
                    );
                    report.failed.push(JobFailure { source_path, error });
                }
            }
        }

        report
    }
}

/// Discover the stylesheets below the configured source directory, add the extra files and build
/// all of them
///
/// Only a failure to set up the pipeline or to walk the source tree is returned as an error, job
/// failures end up in the report
pub async fn build(config: &Configuration) -> Result<BuildReport> {
    let pipeline = Pipeline::new(config)?;

    let mut sources = find_stylesheets(&config.source_dir).await?;
    info!(
        count = sources.len(),
        dir = %config.source_dir.display(),
        "discovered stylesheets"
    );
    sources.extend(config.extra_files.iter().cloned());

    Ok(pipeline.build_all(sources).await)
}
