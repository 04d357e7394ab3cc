//! Synchronous phase pipeline

use crate::error::Result;
use crate::job::{PhaseId, PhaseOutcome, PhaseStatus};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use throwgraph_ir::features::assembly::CallGraph;
use throwgraph_ir::features::fragments::{load_dir, ClassRecord};
use throwgraph_ir::features::polymorph::PolymorphTable;
use throwgraph_ir::features::profiling::{profile_contexts, ContextProfile, SiteUniverse};
use throwgraph_ir::features::propagation::{propagate, reconcile_expansion};
use throwgraph_ir::features::storage::{
    dump_call_graph, dump_polymorph, dump_profiles, OverviewReport,
};
use throwgraph_ir::{AnalysisConfig, Function};
use tracing::info;
use uuid::Uuid;

/// Everything the analysis accumulates, passed explicitly between phases.
/// No phase keeps hidden state.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub polymorph: PolymorphTable,
    pub graph: CallGraph,
    pub profiles: Vec<ContextProfile>,
    pub universe_sites: usize,
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct PipelineRun {
    pub context: AnalysisContext,
    pub report: OverviewReport,
    pub cancelled: bool,
}

/// Runs the six phases in order against one context value.
///
/// The cancellation flag is shared with the propagator; between phases a
/// raised flag skips the remaining work, and because export runs last, an
/// interrupted run never leaves partial artifacts behind.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    cancel: Arc<AtomicBool>,
}

/// Per-run transient state threaded through the phase loop
#[derive(Default)]
struct RunState {
    ipm_records: Vec<ClassRecord>,
    icg_records: Vec<Function>,
    context: AnalysisContext,
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag an embedder may raise to stop the run between units of work
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn run(&self) -> Result<PipelineRun> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(%run_id, out = %self.config.output_dir.display(), "pipeline starting");

        let mut state = RunState::default();
        let mut outcomes: Vec<PhaseOutcome> = Vec::with_capacity(PhaseId::ALL.len());

        for phase in PhaseId::ALL {
            if self.cancelled() {
                outcomes.push(PhaseOutcome {
                    id: phase,
                    status: PhaseStatus::Skipped,
                    duration_ms: 0,
                });
                continue;
            }
            let phase_started = Instant::now();
            match self.run_phase(phase, &mut state) {
                Ok(()) => outcomes.push(PhaseOutcome {
                    id: phase,
                    status: PhaseStatus::Completed,
                    duration_ms: phase_started.elapsed().as_millis() as u64,
                }),
                Err(e) => {
                    outcomes.push(PhaseOutcome {
                        id: phase,
                        status: PhaseStatus::Failed,
                        duration_ms: phase_started.elapsed().as_millis() as u64,
                    });
                    info!(%phase, "pipeline failed");
                    return Err(e);
                }
            }
        }

        let cancelled = self.cancelled();
        let report = self.build_report(run_id, started, &state, &outcomes);
        if !cancelled {
            report.write_to(&self.config.output_dir)?;
        }
        info!(%run_id, cancelled, elapsed_ms = report.elapsed_ms, "pipeline finished");
        Ok(PipelineRun {
            context: state.context,
            report,
            cancelled,
        })
    }

    fn run_phase(&self, phase: PhaseId, state: &mut RunState) -> Result<()> {
        match phase {
            PhaseId::LoadFragments => {
                let ipm = load_dir::<ClassRecord>(
                    &self.config.ipm_dir(),
                    self.config.jobs,
                    self.config.strict,
                )?;
                let icg = load_dir::<Function>(
                    &self.config.icg_dir(),
                    self.config.jobs,
                    self.config.strict,
                )?;
                info!(
                    ipm_records = ipm.records.len(),
                    icg_records = icg.records.len(),
                    failed_files = ipm.files_failed + icg.files_failed,
                    "fragments loaded"
                );
                state.ipm_records = ipm.records;
                state.icg_records = icg.records;
            }
            PhaseId::MergePolymorph => {
                for record in &state.ipm_records {
                    state.context.polymorph.absorb(record);
                }
                state.ipm_records.clear();
                info!(entries = state.context.polymorph.len(), "polymorph table merged");
            }
            PhaseId::AssembleGraph => {
                for function in state.icg_records.drain(..) {
                    state.context.graph.install(function);
                }
                if self.config.expand_virtual_calls {
                    state.context.graph.expand_virtual_calls(&state.context.polymorph);
                }
                state.context.graph.populate_callers();
                info!(
                    functions = state.context.graph.len(),
                    call_sites = state.context.graph.total_call_sites(),
                    "graph assembled"
                );
            }
            PhaseId::Propagate => {
                let stats = propagate(&mut state.context.graph, Some(&self.cancel));
                let reconciled = reconcile_expansion(&mut state.context.graph);
                info!(
                    visits = stats.visits,
                    enqueues = stats.enqueues,
                    reconciled,
                    "throw sets propagated"
                );
            }
            PhaseId::Profile => {
                let universe = SiteUniverse::build(&state.context.graph);
                state.context.universe_sites = universe.len();
                state.context.profiles = profile_contexts(&universe);
                info!(sites = universe.len(), "contexts profiled");
            }
            PhaseId::Export => {
                let out = &self.config.output_dir;
                dump_polymorph(out, &state.context.polymorph)?;
                dump_call_graph(out, &state.context.graph)?;
                dump_profiles(out, &state.context.profiles)?;
            }
        }
        Ok(())
    }

    fn build_report(
        &self,
        run_id: Uuid,
        started: Instant,
        state: &RunState,
        outcomes: &[PhaseOutcome],
    ) -> OverviewReport {
        OverviewReport {
            run_id: run_id.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            functions: state.context.graph.len(),
            call_sites: state.context.graph.total_call_sites(),
            polymorph_entries: state.context.polymorph.len(),
            universe_sites: state.context.universe_sites,
            phases: outcomes.iter().map(PhaseOutcome::to_row).collect(),
        }
    }
}
