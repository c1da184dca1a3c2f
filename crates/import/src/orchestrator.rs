//! # Import Orchestrator
//!
//! Drives one import pass over a [`ModelStore`].
//!
//! ## States
//!
//! ```text
//! Start -> RootProcessed -> ClassesProcessed -> EnumerationsProcessed -> Done
//!   \____________\_________________\____________________\_____________-> Failed
//! ```
//!
//! [`AssemblyImporter`] adds the external tool step in front: it tries each
//! configured parser in order until one accepts the assembly, then merges the
//! document that parser wrote. The parser output file is removed when the pass
//! ends, whatever the outcome.
//!
//! A pass is not atomic. Elements merged before a failure stay in the store.

use crate::config::ImportConfig;
use crate::document::ParsedModel;
use crate::feedback::ImportFeedback;
use crate::merge::{MergeReport, ModelMerger};
use crate::tool::{
    ProcessToolRunner, ToolExit, ToolInvocation, ToolRunner, invoke_parser, read_artifact,
};
use efdesign_core::{EngineError, EngineResult, Validatable};
use efdesign_ir::ModelStore;
use std::fmt;
use std::path::Path;

/// Status shown before the parsers are tried
pub const DETECTING_STATUS: &str = "Detecting .NET and EF versions";

// ============================================================================
// ImportState / ImportOutcome
// ============================================================================

/// Progress of an import pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportState {
    #[default]
    Start,
    RootProcessed,
    ClassesProcessed,
    EnumerationsProcessed,
    Done,
    Failed,
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportState::Start => "start",
            ImportState::RootProcessed => "root processed",
            ImportState::ClassesProcessed => "classes processed",
            ImportState::EnumerationsProcessed => "enumerations processed",
            ImportState::Done => "done",
            ImportState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The document was merged
    Imported(MergeReport),
    /// The user cancelled; nothing was merged
    Cancelled,
    /// An error was reported to the feedback sink
    Failed,
}

impl ImportOutcome {
    /// A cancelled pass counts as handled
    pub fn is_success(&self) -> bool {
        !matches!(self, ImportOutcome::Failed)
    }

    /// Merge counts, if a document was merged
    pub fn report(&self) -> Option<&MergeReport> {
        match self {
            ImportOutcome::Imported(report) => Some(report),
            _ => None,
        }
    }
}

// ============================================================================
// ModelImporter
// ============================================================================

/// Merges a parsed document into a store
pub struct ModelImporter<'a> {
    store: &'a mut ModelStore,
    feedback: &'a mut dyn ImportFeedback,
    state: ImportState,
}

impl<'a> ModelImporter<'a> {
    /// Create an importer for one pass
    pub fn new(store: &'a mut ModelStore, feedback: &'a mut dyn ImportFeedback) -> Self {
        Self {
            store,
            feedback,
            state: ImportState::Start,
        }
    }

    /// Current state of the pass
    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Merge a document: root metadata, then classes and their properties,
    /// then the association records of every class, then enumerations.
    ///
    /// Associations are merged once all classes of the document exist, not
    /// right after the properties of the class that carries them. A record
    /// may therefore point at a class that appears later in the batch and
    /// still resolve on the first pass. Errors leave the pass in
    /// [`ImportState::Failed`].
    pub fn import(&mut self, document: &ParsedModel) -> EngineResult<MergeReport> {
        match merge_document(&mut *self.store, &mut *self.feedback, &mut self.state, document) {
            Ok(report) => Ok(report),
            Err(e) => {
                self.state = ImportState::Failed;
                Err(e)
            }
        }
    }

    /// Read a document file and merge it.
    ///
    /// A document that cannot be read or parsed is reported to the error
    /// sink and yields [`ImportOutcome::Failed`].
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> EngineResult<ImportOutcome> {
        self.import_file_as(path.as_ref(), "document")
    }

    fn import_file_as(&mut self, path: &Path, subject: &str) -> EngineResult<ImportOutcome> {
        let document = match ParsedModel::from_file(path) {
            Ok(document) => document,
            Err(e) => {
                self.feedback
                    .show_error(&format!("Error processing {}: {}", subject, e));
                self.state = ImportState::Failed;
                return Ok(ImportOutcome::Failed);
            }
        };

        Ok(ImportOutcome::Imported(self.import(&document)?))
    }
}

fn merge_document(
    store: &mut ModelStore,
    feedback: &mut dyn ImportFeedback,
    state: &mut ImportState,
    document: &ParsedModel,
) -> EngineResult<MergeReport> {
    let mut merger = ModelMerger::new(store);

    merger.merge_root(document);
    *state = ImportState::RootProcessed;

    for class in &document.classes {
        feedback.show_status(&format!("Processing {}", class.full_name()));
        merger.merge_class(class)?;
    }
    for class in &document.classes {
        merger.merge_unidirectional_associations(&class.unidirectional_associations)?;
        merger.merge_bidirectional_associations(&class.bidirectional_associations)?;
    }
    *state = ImportState::ClassesProcessed;

    for model_enum in &document.enumerations {
        feedback.show_status(&format!("Processing {}", model_enum.full_name()));
        merger.merge_enum(model_enum)?;
    }
    *state = ImportState::EnumerationsProcessed;

    let report = merger.into_report();
    *state = ImportState::Done;
    if report.is_empty() {
        tracing::info!("Merged {}: nothing to do", document.entity_container_name);
    } else {
        tracing::info!(
            "Merged {}: {} created, {} updated, {} association records skipped",
            document.entity_container_name,
            report.created(),
            report.updated(),
            report.skipped()
        );
    }
    tracing::debug!("{}", report);
    Ok(report)
}

// ============================================================================
// AssemblyImporter
// ============================================================================

/// Imports a compiled assembly through the external parser tools
pub struct AssemblyImporter<R: ToolRunner> {
    config: ImportConfig,
    runner: R,
}

impl AssemblyImporter<ProcessToolRunner> {
    /// Importer running the configured parsers as child processes
    pub fn with_config(config: ImportConfig) -> Self {
        Self::new(config, ProcessToolRunner)
    }
}

impl<R: ToolRunner> AssemblyImporter<R> {
    /// Create an importer with a custom tool runner
    pub fn new(config: ImportConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Get the configuration
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Get the tool runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run one import pass for `input`.
    ///
    /// Parsers are tried in configured order. The first one that does not
    /// answer "not applicable" decides the pass: its description goes to the
    /// info sink, then its document is merged, or its error is reported, or
    /// the pass ends as cancelled. Tool failures never touch the store.
    pub fn process(
        &mut self,
        store: &mut ModelStore,
        feedback: &mut dyn ImportFeedback,
        input: &str,
    ) -> EngineResult<ImportOutcome> {
        self.config.validate()?;

        let artifact = tempfile::Builder::new()
            .prefix("efdesign-")
            .suffix(".json")
            .tempfile_in(self.config.artifact_dir())
            .map_err(|e| EngineError::FileWrite {
                path: self.config.artifact_dir(),
                message: e.to_string(),
            })?
            .into_temp_path();

        feedback.show_status(DETECTING_STATUS);

        for tool in &self.config.parsers {
            let invocation = ToolInvocation::new(self.config.resolve_tool(tool), input, &*artifact);

            let exit = match invoke_parser(&mut self.runner, &mut *feedback, &invocation) {
                Ok(exit) => exit,
                Err(e) if e.is_tool() || e.is_io() => {
                    tracing::warn!("{}", e);
                    feedback.show_error(&e.to_string());
                    return Ok(ImportOutcome::Failed);
                }
                Err(e) => return Err(e),
            };

            if !exit.is_applicable() {
                tracing::debug!("{} cannot process {}", invocation.tool.display(), invocation.input);
                continue;
            }

            tracing::info!("Using parser {}", invocation.tool.display());
            feedback.show_info(&tool.description);

            return match exit {
                ToolExit::Cancelled => Ok(ImportOutcome::Cancelled),
                ToolExit::Success => {
                    ModelImporter::new(store, feedback).import_file_as(&artifact, "assembly")
                }
                failure => {
                    tracing::warn!("{} exited with {}", invocation.tool.display(), failure);
                    let message = failure.error_message().unwrap_or("Unexpected error");
                    let detail = read_artifact(&artifact).unwrap_or_default();
                    feedback.show_error(&format!("{}\n{}", message, detail));
                    Ok(ImportOutcome::Failed)
                }
            };
        }

        feedback.show_error(&format!("No parser could process {}", input.trim_matches('"')));
        Ok(ImportOutcome::Failed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        ParsedBidirectionalAssociation, ParsedClass, ParsedEnum, ParsedEnumValue, ParsedProperty,
        ParsedUnidirectionalAssociation,
    };
    use crate::multiplicity::ParsedMultiplicity;
    use crate::testing::{RecordingFeedback, ScriptedRunner};
    use crate::tool::AMBIGUITY_PROMPT;
    use efdesign_core::{Multiplicity, Named};
    use tempfile::TempDir;

    fn ab_document() -> ParsedModel {
        let mut a = ParsedClass::new("A", "N");
        a.properties = vec![ParsedProperty::new("Id", "Int32")];
        a.bidirectional_associations = vec![ParsedBidirectionalAssociation {
            source_class_name: "A".to_string(),
            source_class_namespace: "N".to_string(),
            target_class_name: "B".to_string(),
            target_class_namespace: "N".to_string(),
            source_multiplicity: ParsedMultiplicity::One,
            target_multiplicity: ParsedMultiplicity::ZeroMany,
            source_property_name: "Bs".to_string(),
            target_property_name: "A".to_string(),
            ..Default::default()
        }];
        let b = ParsedClass::new("B", "N");

        let mut status = ParsedEnum::new("Status", "N");
        status.values = vec![ParsedEnumValue::new("Open", "0")];

        ParsedModel {
            entity_container_name: "Context".to_string(),
            namespace: "N".to_string(),
            classes: vec![a, b],
            enumerations: vec![status],
        }
    }

    fn config_in(dir: &TempDir) -> ImportConfig {
        ImportConfig::new()
            .with_parser_dir("/opt/efdesigner")
            .with_temp_dir(dir.path())
    }

    fn leftover_artifacts(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    // ------------------------------------------------------------------------
    // ModelImporter
    // ------------------------------------------------------------------------

    #[test]
    fn test_ab_scenario() {
        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let mut importer = ModelImporter::new(&mut store, &mut feedback);

        let report = importer.import(&ab_document()).unwrap();
        assert_eq!(importer.state(), ImportState::Done);
        assert_eq!(report.classes_created, 2);
        assert_eq!(report.associations_created, 1);

        let a = store.find_class("N.A").unwrap().id;
        let b = store.find_class("N.B").unwrap().id;
        let edge = store.associations().next().unwrap();
        assert!(edge.is_bidirectional());
        assert_eq!((edge.source, edge.target), (a, b));
        assert_eq!(edge.source_multiplicity, Multiplicity::One);
        assert_eq!(store.root.entity_container_name, "Context");

        assert_eq!(
            feedback.statuses,
            vec!["Processing N.A", "Processing N.B", "Processing N.Status"]
        );
        assert!(feedback.errors.is_empty());
    }

    #[test]
    fn test_rerun_with_changed_abstract_flag() {
        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        ModelImporter::new(&mut store, &mut feedback)
            .import(&ab_document())
            .unwrap();
        let a = store.find_class("N.A").unwrap().id;

        let mut document = ab_document();
        document.classes[0].is_abstract = true;
        let report = ModelImporter::new(&mut store, &mut feedback)
            .import(&document)
            .unwrap();

        assert_eq!(store.class_count(), 2);
        assert_eq!(store.find_class("N.A").unwrap().id, a);
        assert!(store.class(a).unwrap().is_abstract);
        assert_eq!(store.association_count(), 1);
        assert_eq!(report.classes_created, 0);
        assert_eq!(report.duplicate_associations, 1);
    }

    #[test]
    fn test_import_is_idempotent() {
        let mut document = ab_document();
        document.classes[1].unidirectional_associations = vec![ParsedUnidirectionalAssociation {
            source_class_name: "B".to_string(),
            source_class_namespace: "N".to_string(),
            target_class_name: "A".to_string(),
            target_class_namespace: "N".to_string(),
            target_property_name: "Owner".to_string(),
            ..Default::default()
        }];

        let mut once = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        ModelImporter::new(&mut once, &mut feedback).import(&document).unwrap();

        let mut twice = ModelStore::new();
        ModelImporter::new(&mut twice, &mut feedback).import(&document).unwrap();
        ModelImporter::new(&mut twice, &mut feedback).import(&document).unwrap();

        assert_eq!(shape(&once), shape(&twice));
        assert_eq!(twice.association_count(), 2);
        assert!(twice.validate().is_ok());
    }

    /// Everything but the generated ids and timestamps
    fn shape(store: &ModelStore) -> serde_json::Value {
        let classes: Vec<_> = store
            .classes()
            .map(|c| {
                let attributes: Vec<_> = c
                    .attributes()
                    .map(|a| (a.name.clone(), a.type_name.clone(), a.required))
                    .collect();
                serde_json::json!([c.full_name(), c.is_abstract, c.table_name, attributes])
            })
            .collect();
        let enums: Vec<_> = store
            .enums()
            .map(|e| {
                let values: Vec<_> = e.values().map(|v| (v.name.clone(), v.value.clone())).collect();
                serde_json::json!([e.full_name(), e.is_flags, values])
            })
            .collect();
        let associations: Vec<_> = store
            .associations()
            .map(|a| {
                serde_json::json!([
                    store.class(a.source).map(|c| c.full_name()),
                    store.class(a.target).map(|c| c.full_name()),
                    a.source_property_name(),
                    a.target_property_name,
                    a.source_multiplicity.notation(),
                    a.target_multiplicity.notation()
                ])
            })
            .collect();
        serde_json::json!({
            "root": [store.root.entity_container_name, store.root.namespace],
            "classes": classes,
            "enums": enums,
            "associations": associations,
        })
    }

    #[test]
    fn test_forward_reference_to_missing_class() {
        let mut document = ab_document();
        document.classes[0]
            .bidirectional_associations
            .push(ParsedBidirectionalAssociation {
                source_class_name: "A".to_string(),
                source_class_namespace: "N".to_string(),
                target_class_name: "Ghost".to_string(),
                target_class_namespace: "N".to_string(),
                source_property_name: "Owner".to_string(),
                target_property_name: "Ghosts".to_string(),
                ..Default::default()
            });

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let report = ModelImporter::new(&mut store, &mut feedback)
            .import(&document)
            .unwrap();

        assert_eq!(store.association_count(), 1);
        assert_eq!(report.unresolved_associations, 1);
        assert!(feedback.errors.is_empty());
    }

    #[test]
    fn test_import_file_with_malformed_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ \"Classes\": [").unwrap();

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let mut importer = ModelImporter::new(&mut store, &mut feedback);

        let outcome = importer.import_file(&path).unwrap();
        assert_eq!(outcome, ImportOutcome::Failed);
        assert_eq!(importer.state(), ImportState::Failed);
        assert!(feedback.errors[0].starts_with("Error processing document:"));
        assert!(store.is_empty());
        assert!(path.exists());
    }

    // ------------------------------------------------------------------------
    // AssemblyImporter
    // ------------------------------------------------------------------------

    #[test]
    fn test_third_parser_processed_after_two_not_applicable() {
        let dir = TempDir::new().unwrap();
        let document = serde_json::to_string(&ab_document()).unwrap();
        let runner = ScriptedRunner::new()
            .then(2, "")
            .then(2, "")
            .then(0, &document);
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let outcome = importer
            .process(&mut store, &mut feedback, "\"/data/Sales.dll\"")
            .unwrap();

        assert!(matches!(outcome, ImportOutcome::Imported(_)));
        assert_eq!(store.class_count(), 2);
        assert!(feedback.errors.is_empty());
        assert_eq!(feedback.statuses[0], DETECTING_STATUS);
        assert_eq!(
            feedback.infos,
            vec!["Assembly is .NET Core, DbContext is Entity Framework Core"]
        );

        let invocations = &importer.runner().invocations;
        assert_eq!(invocations.len(), 3);
        assert!(invocations[2].tool.ends_with("Parsers/EFCoreParser.exe"));
        assert_eq!(invocations[0].input, "/data/Sales.dll");
        assert_eq!(leftover_artifacts(&dir), 0);
    }

    #[test]
    fn test_ambiguous_request_cancelled() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new().then(6, "Sales.SalesContext\nSales.AuditContext\n");
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let outcome = importer
            .process(&mut store, &mut feedback, "Sales.dll")
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Cancelled);
        assert!(outcome.is_success());
        assert!(store.is_empty());
        assert!(feedback.errors.is_empty());
        assert_eq!(feedback.choices[0].0, AMBIGUITY_PROMPT);
        assert_eq!(feedback.choices[0].1.len(), 2);
        assert_eq!(leftover_artifacts(&dir), 0);
    }

    #[test]
    fn test_ambiguous_request_with_choice() {
        let dir = TempDir::new().unwrap();
        let document = serde_json::to_string(&ab_document()).unwrap();
        let runner = ScriptedRunner::new()
            .then(6, "Sales.SalesContext\nSales.AuditContext\n")
            .then(0, &document);
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::choosing("Sales.SalesContext");
        let outcome = importer
            .process(&mut store, &mut feedback, "Sales.dll")
            .unwrap();

        assert!(matches!(outcome, ImportOutcome::Imported(_)));
        assert_eq!(store.class_count(), 2);
        let invocations = &importer.runner().invocations;
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[1].tool, invocations[0].tool);
    }

    #[test]
    fn test_tool_error_reports_artifact_text() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new().then(4, "No parameterless constructor");
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let outcome = importer
            .process(&mut store, &mut feedback, "Sales.dll")
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Failed);
        assert_eq!(
            feedback.errors,
            vec!["Cannot create DbContext object\nNo parameterless constructor"]
        );
        assert_eq!(feedback.infos.len(), 1);
        assert!(store.is_empty());
        assert_eq!(leftover_artifacts(&dir), 0);
    }

    #[test]
    fn test_unparseable_output_fails_pass() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new().then(0, "not json");
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let outcome = importer
            .process(&mut store, &mut feedback, "Sales.dll")
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Failed);
        assert!(feedback.errors[0].starts_with("Error processing assembly:"));
        assert_eq!(leftover_artifacts(&dir), 0);
    }

    #[test]
    fn test_no_applicable_parser() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new().then(2, "").then(2, "").then(2, "");
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let outcome = importer
            .process(&mut store, &mut feedback, "Sales.dll")
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Failed);
        assert_eq!(feedback.errors, vec!["No parser could process Sales.dll"]);
        assert!(feedback.infos.is_empty());
    }

    #[test]
    fn test_launch_failure_reported() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new().then_launch_failure();
        let mut importer = AssemblyImporter::new(config_in(&dir), runner);

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let outcome = importer
            .process(&mut store, &mut feedback, "Sales.dll")
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Failed);
        assert!(feedback.errors[0].contains("Failed to launch parser"));
        assert_eq!(leftover_artifacts(&dir), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_parsers(Vec::new());
        let mut importer = AssemblyImporter::new(config, ScriptedRunner::new());

        let mut store = ModelStore::new();
        let mut feedback = RecordingFeedback::new();
        let result = importer.process(&mut store, &mut feedback, "Sales.dll");
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
