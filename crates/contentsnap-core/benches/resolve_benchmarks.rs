use contentsnap_core::{resolve, run_resolve, ResolvePaths};
use contentsnap_schema::{parse_catalogue_str, parse_manifest_str};
use criterion::{criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use std::fs;

fn catalogue_toml(n: usize) -> String {
    let mut out = String::from("[libraries]\n");
    for i in 0..n {
        writeln!(
            out,
            "lib-{i} = {{ group = \"org.example\", name = \"lib-{i}\", version = \"1.{i}.0\" }}"
        )
        .unwrap();
    }
    out
}

fn manifest_yaml(n: usize) -> String {
    let mut out = String::from("content-snaps:\n");
    for i in 0..n {
        writeln!(
            out,
            "  content-for-lib-{i}:\n    version: lib-{i}\n    name: content-for-lib-{i}\n    license: Apache-2.0"
        )
        .unwrap();
    }
    out
}

fn bench_resolve_in_memory(c: &mut Criterion) {
    let catalogue = parse_catalogue_str(&catalogue_toml(500)).unwrap();
    let manifest = parse_manifest_str(&manifest_yaml(500)).unwrap();
    c.bench_function("resolve_500_snaps", |b| {
        b.iter(|| resolve(&manifest, &catalogue).unwrap());
    });
}

fn bench_run_resolve(c: &mut Criterion) {
    c.bench_function("run_resolve_100_snaps", |b| {
        b.iter_with_setup(
            || {
                let dir = tempfile::tempdir().unwrap();
                let paths = ResolvePaths {
                    manifest: dir.path().join("supported.yaml"),
                    catalogue: dir.path().join("supported.versions.toml"),
                    output: dir.path().join("transformed.yaml"),
                };
                fs::write(&paths.manifest, manifest_yaml(100)).unwrap();
                fs::write(&paths.catalogue, catalogue_toml(100)).unwrap();
                (dir, paths)
            },
            |(_dir, paths)| {
                run_resolve(&paths).unwrap();
            },
        );
    });
}

criterion_group!(benches, bench_resolve_in_memory, bench_run_resolve);
criterion_main!(benches);
