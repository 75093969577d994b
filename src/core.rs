/*
 * This module consolidates the core, platform-agnostic logic of the tool:
 * loading the extraction-pattern catalog and the sample ID allow-list,
 * resolving sample eligibility from LocalApp sample sheets and TSOPPI
 * patient manifests, snapshotting directory trees, classifying paths into
 * export/skip/ignore dispositions, and turning the result into the flat
 * output lists and the packaging script (including the abstraction
 * `ScriptRunnerOperations` for launching it).
 */
pub mod catalog;
pub mod classifier;
pub mod discovery;
pub mod export_plan;
pub mod export_script;
pub mod id_list;
pub mod localapp_logs;
pub mod patient_manifest;
pub mod path_view;
pub mod sample_sheet;
pub mod snapshot;

// Re-export catalog related items
pub use catalog::{InputType, PatternCatalog, PatternCategory};

// Re-export classification related items
pub use classifier::{
    DispositionMap, MatchShortfall, PathDisposition, PatternJob, classify, localapp_jobs,
    patient_jobs,
};

// Re-export eligibility related items
pub use id_list::IdAllowList;
pub use patient_manifest::PatientManifest;
pub use sample_sheet::SheetSamples;

// Re-export plan and packaging related items
pub use export_plan::ExportPlan;
pub use export_script::{CoreScriptRunner, ScriptRunnerOperations, ScriptSettings};

pub use path_view::MountMapping;
pub use snapshot::DirectorySnapshot;
