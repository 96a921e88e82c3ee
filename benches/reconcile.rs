//! Performance benchmarks for module reconciliation.
//!
//! Run with: `cargo bench --bench reconcile`
//!
//! Pruning and qualifier stripping are substring scans over every module's
//! code, so cost grows with module count times code size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use module_bundler::{AlwaysUseSource, Module, ModuleReconciler, Project};

/// Create a project whose modules each call the next one by qualified name.
fn make_project(name: &str, dep: &str, module_count: usize) -> Project {
    (0..module_count).fold(Project::new(name), |project, i| {
        let code = format!(
            "Sub Run{i}()\n    Call {dep}.{name}Mod{next}.Run{next}\n    Dim x As Long\n    x = {i}\nEnd Sub\n",
            next = (i + 1) % module_count,
        );
        project.with_module(Module::standard(format!("{name}Mod{i}"), code))
    })
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for module_count in [10, 50, 200] {
        let target = make_project("App", "Lib", module_count);
        let source = make_project("Lib", "Lib", module_count);

        group.throughput(Throughput::Elements(module_count as u64));
        for only_merge_used in [false, true] {
            let reconciler = ModuleReconciler::new(only_merge_used);
            let label = if only_merge_used { "pruning" } else { "all" };
            group.bench_with_input(
                BenchmarkId::new(label, module_count),
                &(source.clone(), target.clone()),
                |b, (source, target)| {
                    b.iter(|| {
                        reconciler
                            .reconcile(black_box(source), black_box(target), &mut AlwaysUseSource)
                            .map(|outcome| outcome.modules.len())
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
