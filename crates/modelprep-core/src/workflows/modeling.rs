use crate::core::alignment::region::RegionPreference;
use crate::core::alignment::set::AlignmentSet;
use crate::engine::disulfide::{BondSet, ResiduePair};
use crate::engine::error::{EngineError, ExternalError};
use crate::engine::progress::{Progress, ProgressReporter};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// A region preference located in the alignment and mapped to model numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionHint {
    pub preference: RegionPreference,
    /// First and last residue in the engine's 1-based model numbering.
    pub model_range: (isize, isize),
    /// Position of the preferred template among the alignment entries, if found.
    pub template_index: Option<usize>,
}

/// A disulfide the engine should patch into every model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisulfidePatch {
    pub pair: ResiduePair,
}

impl DisulfidePatch {
    pub fn engine_argument(&self) -> String {
        self.pair.engine_argument()
    }
}

/// Extension point handed to a [`ModelingEngine`]: the engine asks it for the
/// extra restraints and patches to apply while building models.
pub trait RestraintStrategy {
    fn disulfide_patches(&self) -> Vec<DisulfidePatch>;
    fn region_hints(&self) -> Vec<RegionHint>;
}

/// Restraints derived from resolved bonds and region preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedRestraints {
    patches: Vec<DisulfidePatch>,
    hints: Vec<RegionHint>,
    unknown_templates: Vec<String>,
}

impl PreparedRestraints {
    /// `offset` is subtracted from global residue numbers to obtain model
    /// numbering (a target starting at residue 384 has offset 383).
    pub fn new(
        bonds: &BondSet,
        regions: &[RegionPreference],
        alignment: &AlignmentSet,
        offset: isize,
    ) -> Self {
        let patches = bonds
            .iter()
            .map(|bond| DisulfidePatch { pair: bond.pair })
            .collect();

        let mut unknown_templates = Vec::new();
        let hints = regions
            .iter()
            .map(|preference| {
                let template_index = alignment.entries().iter().position(|entry| {
                    !entry.is_target() && entry.code.contains(&preference.preferred_template)
                });
                if template_index.is_none() {
                    warn!(
                        "Region {} prefers template '{}', which is not in the alignment",
                        preference, preference.preferred_template
                    );
                    if !unknown_templates.contains(&preference.preferred_template) {
                        unknown_templates.push(preference.preferred_template.clone());
                    }
                }
                RegionHint {
                    preference: preference.clone(),
                    model_range: preference.model_range(offset),
                    template_index,
                }
            })
            .collect();

        Self {
            patches,
            hints,
            unknown_templates,
        }
    }

    /// Preferred templates that no alignment entry matched.
    pub fn unknown_templates(&self) -> &[String] {
        &self.unknown_templates
    }
}

impl RestraintStrategy for PreparedRestraints {
    fn disulfide_patches(&self) -> Vec<DisulfidePatch> {
        self.patches.clone()
    }

    fn region_hints(&self) -> Vec<RegionHint> {
        self.hints.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelingJob {
    pub alignment_path: PathBuf,
    pub target_code: String,
    pub template_codes: Vec<String>,
    pub num_models: usize,
    pub output_dir: PathBuf,
}

impl ModelingJob {
    /// Builds a job for every template of `alignment`.
    pub fn from_alignment(
        alignment_path: &Path,
        alignment: &AlignmentSet,
        num_models: usize,
        output_dir: &Path,
    ) -> Self {
        Self {
            alignment_path: alignment_path.to_path_buf(),
            target_code: alignment.target().code.clone(),
            template_codes: alignment
                .template_codes()
                .into_iter()
                .map(str::to_string)
                .collect(),
            num_models,
            output_dir: output_dir.to_path_buf(),
        }
    }
}

/// Files produced for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOutput {
    pub coordinates: PathBuf,
    /// Sidecar holding the model's assessment score, if the engine wrote one.
    pub score_file: Option<PathBuf>,
}

/// An external comparative-modeling engine. Calls block until the engine
/// finishes.
pub trait ModelingEngine {
    fn name(&self) -> &str;

    fn build_models(
        &self,
        job: &ModelingJob,
        restraints: &dyn RestraintStrategy,
    ) -> Result<Vec<ModelOutput>, ExternalError>;
}

/// Which line of a score sidecar holds the score. The score is the last
/// whitespace-separated token of that line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScoreLine {
    #[default]
    Last,
    /// 1-based line number.
    Line(usize),
    /// First line containing the given text, e.g. `DOPE score`.
    Containing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredModel {
    pub output: ModelOutput,
    /// Lower is better; `None` when no score could be read.
    pub score: Option<f64>,
}

/// Reads a score from a sidecar file. Returns `Ok(None)` when the selected
/// line does not exist.
pub fn read_score(path: &Path, selector: &ScoreLine) -> Result<Option<f64>, EngineError> {
    let text = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = text.lines().collect();

    let selected = match selector {
        ScoreLine::Last => lines
            .iter()
            .enumerate()
            .rev()
            .find(|(_, line)| !line.trim().is_empty()),
        ScoreLine::Line(number) => number
            .checked_sub(1)
            .and_then(|index| lines.get(index).map(|line| (index, line))),
        ScoreLine::Containing(needle) => lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.contains(needle.as_str())),
    };
    let Some((index, line)) = selected else {
        return Ok(None);
    };

    let token = line.split_whitespace().last().unwrap_or("");
    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| EngineError::Parse {
            context: "score file",
            line: index + 1,
            message: format!("'{}' is not a number", token),
        })
}

/// Orders models by ascending score; unscored models go last, in their
/// original order.
pub fn rank_models(mut models: Vec<ScoredModel>) -> Vec<ScoredModel> {
    models.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    models
}

/// The best-scoring model, or the first model when none is scored.
pub fn best_model(models: &[ScoredModel]) -> Option<&ScoredModel> {
    models
        .iter()
        .filter(|model| model.score.is_some())
        .min_by(|a, b| a.score.unwrap_or(f64::INFINITY).total_cmp(&b.score.unwrap_or(f64::INFINITY)))
        .or_else(|| models.first())
}

/// Runs the engine and returns its models ranked by score.
#[instrument(skip_all, name = "modeling_workflow")]
pub fn run(
    engine: &dyn ModelingEngine,
    job: &ModelingJob,
    restraints: &dyn RestraintStrategy,
    score_line: &ScoreLine,
    reporter: &ProgressReporter,
) -> Result<Vec<ScoredModel>, EngineError> {
    if job.num_models == 0 {
        return Err(EngineError::Validation(
            "at least one model must be requested".to_string(),
        ));
    }
    if job.template_codes.is_empty() {
        return Err(EngineError::Validation(format!(
            "modeling job for '{}' names no template",
            job.target_code
        )));
    }

    reporter.phase_start("Building Models");
    info!(
        engine = engine.name(),
        target = %job.target_code,
        templates = job.template_codes.len(),
        models = job.num_models,
        "Starting comparative modeling."
    );
    let outputs = engine
        .build_models(job, restraints)
        .map_err(|source| EngineError::External {
            engine: engine.name().to_string(),
            source,
        })?;
    reporter.phase_finish();

    reporter.phase_start("Scoring Models");
    reporter.report(Progress::TaskStart {
        total_steps: outputs.len() as u64,
    });
    let mut scored = Vec::with_capacity(outputs.len());
    for output in outputs {
        let score = match &output.score_file {
            Some(path) => match read_score(path, score_line) {
                Ok(score) => score,
                Err(e) => {
                    warn!("Could not read score for {}: {}", output.coordinates.display(), e);
                    None
                }
            },
            None => None,
        };
        scored.push(ScoredModel { output, score });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.phase_finish();

    let ranked = rank_models(scored);
    if let Some(best) = best_model(&ranked) {
        info!(
            "Best model: {} (score {:?}).",
            best.output.coordinates.display(),
            best.score
        );
    }
    Ok(ranked)
}
