//! Experiment Store - in-memory storage for experiments and analyses
//!
//! Holds the records a dashboard browses: experiments (newest first) and the
//! analyses attached to each experiment. Lookup maps use `FxHashMap` for
//! cheap string-key hashing.

use rustc_hash::FxHashMap;

use super::{AnalysisRecord, ExperimentRecord};

/// In-memory store for experiments and their analyses.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    experiments: FxHashMap<String, ExperimentRecord>,
    analyses: FxHashMap<String, AnalysisRecord>,
}

impl ExperimentStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds no experiments and no analyses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty() && self.analyses.is_empty()
    }

    /// Get the number of experiments in the store.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Get the number of analyses in the store.
    #[must_use]
    pub fn analysis_count(&self) -> usize {
        self.analyses.len()
    }

    /// Add an experiment to the store.
    pub fn add_experiment(&mut self, experiment: ExperimentRecord) {
        self.experiments
            .insert(experiment.experiment_id().to_string(), experiment);
    }

    /// Get an experiment by ID.
    #[must_use]
    pub fn get_experiment(&self, experiment_id: &str) -> Option<&ExperimentRecord> {
        self.experiments.get(experiment_id)
    }

    /// Remove an experiment and all analyses attached to it.
    pub fn remove_experiment(&mut self, experiment_id: &str) -> Option<ExperimentRecord> {
        self.analyses
            .retain(|_, analysis| analysis.experiment_id() != experiment_id);
        self.experiments.remove(experiment_id)
    }

    /// List all experiments, most recently started first.
    #[must_use]
    pub fn experiments(&self) -> Vec<&ExperimentRecord> {
        let mut experiments: Vec<&ExperimentRecord> = self.experiments.values().collect();
        experiments.sort_by(|a, b| b.started_at().cmp(&a.started_at()));
        experiments
    }

    /// Add an analysis to the store.
    pub fn add_analysis(&mut self, analysis: AnalysisRecord) {
        self.analyses
            .insert(analysis.analysis_id().to_string(), analysis);
    }

    /// Get an analysis by ID.
    #[must_use]
    pub fn get_analysis(&self, analysis_id: &str) -> Option<&AnalysisRecord> {
        self.analyses.get(analysis_id)
    }

    /// Get all analyses for an experiment, most recently created first.
    #[must_use]
    pub fn analyses_for_experiment(&self, experiment_id: &str) -> Vec<&AnalysisRecord> {
        let mut analyses: Vec<&AnalysisRecord> = self
            .analyses
            .values()
            .filter(|analysis| analysis.experiment_id() == experiment_id)
            .collect();
        analyses.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        analyses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::AnalysisSpec;

    #[test]
    fn test_store_default() {
        let store = ExperimentStore::new();
        assert!(store.is_empty());
        assert_eq!(store.experiment_count(), 0);
        assert_eq!(store.analysis_count(), 0);
    }

    #[test]
    fn test_store_add_and_get() {
        let mut store = ExperimentStore::new();
        store.add_experiment(ExperimentRecord::new("exp-1", "sweep"));
        store.add_analysis(AnalysisRecord::new(
            "an-1",
            "exp-1",
            AnalysisSpec::new("loss", "line.points", "line.data"),
        ));

        assert!(!store.is_empty());
        assert!(store.get_experiment("exp-1").is_some());
        assert!(store.get_analysis("an-1").is_some());
        assert_eq!(store.analyses_for_experiment("exp-1").len(), 1);
        assert!(store.analyses_for_experiment("exp-2").is_empty());
    }

    #[test]
    fn test_remove_experiment_drops_its_analyses() {
        let mut store = ExperimentStore::new();
        store.add_experiment(ExperimentRecord::new("exp-1", "sweep"));
        store.add_analysis(AnalysisRecord::new(
            "an-1",
            "exp-1",
            AnalysisSpec::new("loss", "x", "y"),
        ));
        store.add_analysis(AnalysisRecord::new(
            "an-2",
            "exp-2",
            AnalysisSpec::new("acc", "x", "y"),
        ));

        assert!(store.remove_experiment("exp-1").is_some());
        assert!(store.get_analysis("an-1").is_none());
        assert!(store.get_analysis("an-2").is_some());
    }
}
