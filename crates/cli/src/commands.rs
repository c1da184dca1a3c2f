//! Command implementations
//!
//! Each command returns `Ok(false)` when the pass failed after reporting its
//! own error, and `Err` for everything the user has not been told about yet.

use crate::console::ConsoleFeedback;
use anyhow::{Context, Result};
use colored::Colorize;
use efdesign_import::{AssemblyImporter, ImportConfig, ImportFeedback, ImportOutcome, ModelImporter};
use efdesign_ir::serialization::ensure_extension;
use efdesign_ir::{ModelStore, Named, load_model, load_or_create_model, save_model};
use std::path::Path;
use tracing::debug;

/// `efdesign import`
pub fn import(assembly: &str, model: &Path, config: Option<&Path>) -> Result<bool> {
    let config = match config {
        Some(path) => ImportConfig::load(path)
            .with_context(|| format!("Cannot load import configuration {}", path.display()))?,
        None => ImportConfig::default(),
    };

    let model = ensure_extension(model);
    let mut store = open_model(&model)?;
    let mut feedback = ConsoleFeedback::stdio();

    let outcome = AssemblyImporter::with_config(config).process(&mut store, &mut feedback, assembly)?;
    finish(outcome, &store, &model, &mut feedback)
}

/// `efdesign merge`
pub fn merge(document: &Path, model: &Path) -> Result<bool> {
    let model = ensure_extension(model);
    let mut store = open_model(&model)?;
    let mut feedback = ConsoleFeedback::stdio();

    let outcome = ModelImporter::new(&mut store, &mut feedback).import_file(document)?;
    finish(outcome, &store, &model, &mut feedback)
}

fn open_model(model: &Path) -> Result<ModelStore> {
    let store = load_or_create_model(model)?;
    debug!(
        "Model {}: {} classes, {} enumerations, {} associations",
        model.display(),
        store.class_count(),
        store.enum_count(),
        store.association_count()
    );
    Ok(store)
}

fn finish(
    outcome: ImportOutcome,
    store: &ModelStore,
    model: &Path,
    feedback: &mut dyn ImportFeedback,
) -> Result<bool> {
    match outcome {
        ImportOutcome::Imported(report) => {
            save_model(store, model)?;
            feedback.show_info(&format!("Saved {}: {}", model.display(), report));
        }
        ImportOutcome::Cancelled => feedback.show_info("Import cancelled"),
        ImportOutcome::Failed => {}
    }
    Ok(outcome.is_success())
}

/// `efdesign info`
pub fn info(model: &Path) -> Result<()> {
    let store = load_model(ensure_extension(model))?;
    print!("{}", describe(&store));
    Ok(())
}

/// Human-readable summary of a model
pub fn describe(store: &ModelStore) -> String {
    let mut out = String::new();
    let root = &store.root;

    out.push_str(&format!(
        "{} {} ({})\n",
        "Context".bold(),
        root.entity_container_name,
        if root.namespace.is_empty() { "-" } else { root.namespace.as_str() }
    ));

    out.push_str(&format!("\n{} ({})\n", "Classes".bold(), store.class_count()));
    for class in store.classes() {
        let marker = if class.is_abstract { " abstract" } else { "" };
        out.push_str(&format!(
            "  {}{} - {} attributes\n",
            class.full_name(),
            marker,
            class.attribute_count()
        ));
    }

    out.push_str(&format!("\n{} ({})\n", "Enumerations".bold(), store.enum_count()));
    for model_enum in store.enums() {
        let values: Vec<&str> = model_enum.values().map(|v| v.name.as_str()).collect();
        out.push_str(&format!(
            "  {} : {} [{}]\n",
            model_enum.full_name(),
            model_enum.value_type,
            values.join(", ")
        ));
    }

    out.push_str(&format!(
        "\n{} ({})\n",
        "Associations".bold(),
        store.association_count()
    ));
    for association in store.associations() {
        let endpoint = |id| {
            store
                .class(id)
                .map(|c| c.full_name())
                .unwrap_or_else(|| "?".to_string())
        };
        let fields = store
            .presentation(association.id)
            .map(|p| p.visible_fields().into_iter().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();

        out.push_str(&format!(
            "  {} -> {}: {}\n      fields: {}\n",
            endpoint(association.source),
            endpoint(association.target),
            association.display_label(),
            if fields.is_empty() { "-" } else { fields.as_str() }
        ));
    }

    out
}
