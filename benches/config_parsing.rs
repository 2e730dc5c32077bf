//! Benchmarks for configuration parsing and package resolution.
//!
//! These benchmarks measure parsing `.devroute` sources of various sizes,
//! applying them to a registry, and resolving packages against the result.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use devroute::config::{self, ParseOptions};
use devroute::filesystem::MemoryFS;
use devroute::registry::Registry;
use devroute::resolver::{self, Layout};

/// A single search path, everything enabled.
const MINIMAL_CONFIG: &str = "~/src\n!enable\n";

/// A typical personal configuration.
const SMALL_CONFIG: &str = "\
# checkouts
+code ~/Projects
+rp @code/rp
=web rack,
     sinatra
@code web
@rp persistence, module/cluster
~/src
!enable web
!enable persistence
";

/// Generate a configuration with `directories` named directories, each with
/// a group of `packages` packages bound to it.
fn generate_large_config(directories: usize, packages: usize) -> String {
    let mut config = String::from("+root ~/Projects\n");
    for d in 0..directories {
        config.push_str(&format!("+dir{d} @root/dir{d}\n"));
        let members: Vec<String> = (0..packages).map(|p| format!("pkg{d}_{p}")).collect();
        config.push_str(&format!("=group{d} {}\n", members.join(",\n    ")));
        config.push_str(&format!("@dir{d} group{d}\n"));
        config.push_str(&format!("!enable group{d}\n"));
    }
    config
}

fn bench_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");

    group.bench_function("minimal", |b| {
        b.iter(|| config::parse(black_box(MINIMAL_CONFIG)))
    });

    group.bench_function("small", |b| {
        b.iter(|| config::parse(black_box(SMALL_CONFIG)))
    });

    group.bench_function("small_load", |b| {
        let fs = MemoryFS::new();
        b.iter(|| {
            let mut registry = Registry::new();
            config::load(
                &mut registry,
                &fs,
                black_box(SMALL_CONFIG),
                ParseOptions::default(),
            )
        })
    });

    group.finish();
}

fn bench_config_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_scaling");
    let fs = MemoryFS::new();

    for directories in [5, 10, 20, 50] {
        let config = generate_large_config(directories, 10);
        group.bench_with_input(
            BenchmarkId::new("directories", directories),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut registry = Registry::new();
                    config::load(&mut registry, &fs, black_box(config), ParseOptions::default())
                })
            },
        );
    }

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let layout = Layout::default();

    for directories in [5, 50] {
        let mut fs = MemoryFS::new();
        let last = directories - 1;
        fs.touch(format!(
            "/home/dev/Projects/dir{last}/pkg{last}_9/lib/pkg{last}_9.rb"
        ))
        .unwrap();
        let mut registry = Registry::new();
        config::load(
            &mut registry,
            &fs,
            &generate_large_config(directories, 10),
            ParseOptions::default(),
        )
        .unwrap();
        let name = format!("pkg{last}_9");

        group.bench_with_input(BenchmarkId::new("bound", directories), &name, |b, name| {
            b.iter(|| resolver::try_resolve(&registry, &fs, &layout, black_box(name)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_config_parsing,
    bench_config_scaling,
    bench_resolution
);
criterion_main!(benches);
