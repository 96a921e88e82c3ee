//! Golden tests for the module bundler.
//!
//! These tests pin down merge semantics end to end through the public API.

use module_bundler::{
    AlwaysUseSource, BundleError, BundleOptions, ConflictError, FnPrompt, InMemoryProjectStore,
    InteractiveResolver, Module, ModuleBundler, ModuleConflict, ModuleReconciler, Project,
    Reference, Resolution,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn options() -> BundleOptions {
    BundleOptions {
        recurse_references: true,
        always_use_source: false,
        only_merge_used: false,
        detect_cycles: true,
    }
}

fn regex_lib() -> Reference {
    Reference::new("VBScript_RegExp_55", "*\\G{3F4DACA7-160D-11D2-A8E9-00104B365C9F}#5.5#0")
}

fn dictionary_lib() -> Reference {
    Reference::new("Scripting", "*\\G{420B2830-E718-11CF-893D-00A0C9054228}#1.0#0")
}

/// Diamond: Root -> {Left, Right} -> Base.
fn diamond_store() -> InMemoryProjectStore {
    InMemoryProjectStore::new()
        .with_project(
            "left.json",
            Project::new("Left")
                .with_module(Module::standard("LeftOps", "Base.Shared.Run"))
                .with_reference(regex_lib())
                .with_reference(Reference::project("Base", "base.json")),
        )
        .with_project(
            "right.json",
            Project::new("Right")
                .with_module(Module::class("RightWidget", "Shared.Run"))
                .with_reference(dictionary_lib())
                .with_reference(Reference::project("Base", "base.json")),
        )
        .with_project(
            "base.json",
            Project::new("Base")
                .with_module(Module::standard("Shared", "Sub Run()"))
                .with_module(Module::form("BaseForm", "never merged"))
                .with_reference(dictionary_lib()),
        )
}

fn diamond_root() -> Project {
    Project::new("Root")
        .with_module(Module::standard("Main", "Left.LeftOps.Go: Right.RightWidget.Go"))
        .with_module(Module::form("RootForm", "Private Sub UserForm_Click()"))
        .with_reference(Reference::project("Left", "left.json"))
        .with_reference(dictionary_lib())
        .with_reference(Reference::project("Right", "right.json"))
}

// ─────────────────────────────────────────────────────────────────────────────
// RESOLUTION TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_diamond_resolves_to_single_copy() {
    let mut project = diamond_root();
    let mut bundler = ModuleBundler::new(diamond_store(), options())
        .with_resolver(InteractiveResolver::without_channel());

    let manifest = bundler.bundle(&mut project).unwrap();

    let names: Vec<_> = project.modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "RootForm", "LeftOps", "Shared", "RightWidget"]);

    // Base's Shared arrives twice with identical code and is elided, not a conflict.
    assert_eq!(manifest.conflicts().count(), 0);
    assert!(project.module("BaseForm").is_none());
    assert!(!project.has_project_references());
    assert_eq!(project.references(), &[dictionary_lib(), regex_lib()]);
    assert_eq!(
        manifest.merged_locators(),
        vec!["base.json", "left.json", "base.json", "right.json"]
    );
}

#[test]
fn test_qualifiers_stripped_everywhere() {
    let mut project = diamond_root();
    let mut bundler = ModuleBundler::new(diamond_store(), options())
        .with_resolver(AlwaysUseSource);

    bundler.resolve(&mut project).unwrap();

    let main = project.module("Main").unwrap();
    assert_eq!(main.code, "LeftOps.Go: RightWidget.Go");
    assert_eq!(project.module("LeftOps").unwrap().code, "Shared.Run");
}

#[test]
fn test_scenario_helper_main() {
    let target = Project::new("T").with_module(Module::standard("Main", "T.Helper.DoWork"));
    let source = Project::new("S").with_module(Module::standard("Helper", "Sub DoWork()"));

    let outcome = ModuleReconciler::new(false)
        .reconcile(&source, &target, &mut AlwaysUseSource)
        .unwrap();

    let main = outcome.modules.iter().find(|m| m.name == "Main").unwrap();
    assert!(!main.code.contains("T."));
    assert!(!main.code.contains("S."));
    assert!(outcome.modules.iter().any(|m| m.name == "Helper"));
}

// ─────────────────────────────────────────────────────────────────────────────
// CONFLICT TESTS
// ─────────────────────────────────────────────────────────────────────────────

fn conflicting_store() -> InMemoryProjectStore {
    InMemoryProjectStore::new().with_project(
        "log.json",
        Project::new("LogLib").with_module(Module::class("Logger", "Public Sub Write(): Debug.Print 1")),
    )
}

fn conflicting_root() -> Project {
    Project::new("App")
        .with_module(Module::class("Logger", "Public Sub Write(): MsgBox 1"))
        .with_reference(Reference::project("LogLib", "log.json"))
}

#[test]
fn test_always_use_source_replaces_target() {
    let mut project = conflicting_root();
    let mut bundler = ModuleBundler::new(
        conflicting_store(),
        BundleOptions {
            always_use_source: true,
            ..options()
        },
    );

    let manifest = bundler.bundle(&mut project).unwrap();

    assert_eq!(project.num_modules(), 1);
    assert_eq!(project.module("Logger").unwrap().code, "Public Sub Write(): Debug.Print 1");
    let decided: Vec<_> = manifest.conflicts().collect();
    assert_eq!(decided.len(), 1);
    assert_eq!(decided[0].resolution, Resolution::PreferSource);
    assert_eq!(manifest.resolver, "always_use_source");
}

#[test]
fn test_interactive_decision_is_applied() {
    let mut seen: Vec<ModuleConflict> = Vec::new();
    let mut project = conflicting_root();
    let mut bundler = ModuleBundler::new(conflicting_store(), options()).with_resolver(
        InteractiveResolver::new(FnPrompt(move |c: &ModuleConflict| {
            seen.push(c.clone());
            assert_eq!(c.target_project, "App");
            assert_eq!(c.source_project, "LogLib");
            Resolution::PreferTarget
        })),
    );

    bundler.resolve(&mut project).unwrap();

    assert_eq!(project.module("Logger").unwrap().code, "Public Sub Write(): MsgBox 1");
    assert!(!project.has_project_references());
}

#[test]
fn test_no_channel_fails_and_preserves_project() {
    let mut project = conflicting_root();
    let before = project.clone();
    let mut bundler = ModuleBundler::new(conflicting_store(), options())
        .with_resolver(InteractiveResolver::without_channel());

    let err = bundler.resolve(&mut project).unwrap_err();

    match &err {
        BundleError::Conflict(ConflictError::Unresolvable(c)) => {
            assert_eq!(c.module, "Logger");
        }
        other => panic!("expected unresolvable conflict, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("\"LogLib\"") && msg.contains("\"App\"") && msg.contains("class module"));
    assert_eq!(project, before);
}

// ─────────────────────────────────────────────────────────────────────────────
// PRUNING TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_only_merge_used_drops_unmentioned_modules() {
    let store = InMemoryProjectStore::new().with_project(
        "lib.json",
        Project::new("Lib")
            .with_module(Module::standard("Parser", "x = Tokenizer_Next()"))
            .with_module(Module::standard("Tokenizer", "Function Tokenizer_Next()"))
            .with_module(Module::standard("Unused", "y = 1")),
    );
    let mut project = Project::new("App")
        .with_module(Module::standard("Main", "Lib.Parser.Parse"))
        .with_reference(Reference::project("Lib", "lib.json"));
    let mut bundler = ModuleBundler::new(
        store,
        BundleOptions {
            only_merge_used: true,
            ..options()
        },
    )
    .with_resolver(InteractiveResolver::without_channel());

    let manifest = bundler.bundle(&mut project).unwrap();

    let names: Vec<_> = project.modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "Parser", "Tokenizer"]);
    assert_eq!(manifest.pruned_count(), 1);
    assert_eq!(manifest.steps[0].pruned, vec!["Unused".to_string()]);
}

#[test]
fn test_manifest_fingerprint_is_reproducible() {
    let run = || {
        let mut project = diamond_root();
        let mut bundler = ModuleBundler::new(diamond_store(), options())
            .with_resolver(AlwaysUseSource);
        bundler.bundle(&mut project).unwrap().fingerprint
    };

    let first = run();
    for _ in 0..10 {
        assert_eq!(run(), first);
    }
}
