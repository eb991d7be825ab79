//! Fix pipeline benchmark
//!
//! Measures parse + fix + print throughput on generated untyped modules.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tyg_checker::{FixOptions, FixerSet, InferenceSession, fix_module, infer_and_annotate};
use tyg_common::Diagnostic;
use tyg_emitter::print_module;
use tyg_parser::parse_module;

// =============================================================================
// Sources
// =============================================================================

const SERVICE_SOURCE: &str = r#"
import json


class UserService:
    def __init__(self, path):
        self.path = path
        self.users = []

    def load(self, strict=False):
        with open(self.path) as handle:
            raw = json.load(handle)
        for entry in raw:
            self.users.append(entry)
        return len(self.users)

    def find(self, name):
        for user in self.users:
            if user.name == name.lower():
                return user
        return None


def email_of(user):
    return user.email


def ratio(done, total):
    if total == 0:
        return 0
    return done / total
"#;

/// Lines (1-based) of the definitions in `SERVICE_SOURCE` and the
/// attribute access in `email_of`.
fn service_diagnostics() -> Vec<Diagnostic> {
    vec![
        Diagnostic::new("bench.py", 10, 5, "Function is missing a type annotation"),
        Diagnostic::new("bench.py", 17, 5, "Function is missing a type annotation"),
        Diagnostic::new("bench.py", 24, 1, "Function is missing a return type annotation"),
        Diagnostic::new("bench.py", 25, 12, "Item \"None\" of \"Optional[User]\" has no attribute \"email\""),
        Diagnostic::new("bench.py", 28, 1, "Function is missing a type annotation"),
    ]
}

/// `functions` untyped functions with `statements` statements each.
fn generate_untyped_source(functions: usize, statements: usize) -> String {
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!("def handler_{i}(name, count=0, items=None):\n"));
        source.push_str("    total = 0.0\n");
        for j in 0..statements {
            source.push_str(&format!("    total = total + count * {j}\n"));
        }
        source.push_str("    if items is None:\n        return name.upper()\n");
        source.push_str("    return str(total)\n\n\n");
    }
    source
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_fix_service(c: &mut Criterion) {
    let diagnostics = service_diagnostics();
    let fixers = FixerSet::default();
    c.bench_function("fix_service", |b| {
        b.iter(|| {
            let Ok(mut module) = parse_module("bench.py", SERVICE_SOURCE) else {
                return;
            };
            let report = fix_module(&mut module, &diagnostics, &fixers, FixOptions::default());
            black_box(report.counters.total());
            black_box(print_module(&module.arena, module.root));
        })
    });
}

fn bench_annotate_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate_throughput");

    for (functions, statements) in [(10, 5), (50, 5), (100, 10)] {
        let source = generate_untyped_source(functions, statements);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("annotate", format!("{functions}fn_{statements}stmt")),
            &source,
            |b, source| {
                b.iter(|| {
                    let Ok(mut module) = parse_module("bench.py", source) else {
                        return;
                    };
                    let mut session = InferenceSession::new(false);
                    black_box(infer_and_annotate(&mut module, &mut session));
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fix_service, bench_annotate_throughput);
criterion_main!(benches);
