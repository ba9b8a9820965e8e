use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use goast::archive::{self, SaveOptions};
use goast::codec;
use goast::{format_tree, parse_file, ParseMode};
use std::hint::black_box as bb;

// =============================================================================
// Inputs
// =============================================================================

const SMALL: &str = r#"
package main

import "fmt"

func main() {
    fmt.Println("Hello, World!")
}
"#;

const MEDIUM: &str = r#"
package geometry

import "math"

// Point is a location in the plane.
type Point struct {
    X, Y float64
}

func (p Point) Abs() float64 {
    return math.Sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

type Rectangle struct {
    Min, Max Point
}

func (r Rectangle) Area() float64 {
    w := r.Max.X - r.Min.X
    h := r.Max.Y - r.Min.Y
    if w < 0 || h < 0 {
        return 0
    }
    return w * h
}

func Largest[S ~[]E, E interface{ Area() float64 }](shapes S) (best E) {
    for _, s := range shapes {
        if s.Area() > best.Area() {
            best = s
        }
    }
    return
}
"#;

/// `MEDIUM` followed by `n` generated functions.
fn large(n: usize) -> String {
    let mut src = String::from(MEDIUM);
    for i in 0..n {
        src.push_str(&format!(
            "\nfunc helper{i}(xs []int) (sum int) {{\n    for i := 0; i < len(xs); i++ {{\n        if xs[i] % {m} == 0 {{\n            sum += xs[i]\n        }}\n    }}\n    return\n}}\n",
            m = i % 7 + 2
        ));
    }
    src
}

fn inputs() -> Vec<(&'static str, String)> {
    vec![
        ("small", SMALL.to_string()),
        ("medium", MEDIUM.to_string()),
        ("large", large(200)),
    ]
}

// =============================================================================
// Parse and format
// =============================================================================

fn bench_parse_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("syntax");
    for (name, src) in inputs() {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), &src, |b, src| {
            b.iter(|| parse_file("bench.go", bb(src), ParseMode::default()).expect("parse"));
        });
        group.bench_with_input(BenchmarkId::new("parse_unresolved", name), &src, |b, src| {
            let mode = ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION;
            b.iter(|| parse_file("bench.go", bb(src), mode).expect("parse"));
        });
        let tree = parse_file("bench.go", &src, ParseMode::default()).expect("parse");
        group.bench_function(BenchmarkId::new("format", name), |b| {
            b.iter(|| format_tree(bb(&tree)).expect("format"));
        });
    }
    group.finish();
}

// =============================================================================
// Archive encode / decode / save / load
// =============================================================================

fn bench_archive(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive");
    let dir = tempfile::tempdir().expect("tempdir");

    for (name, src) in inputs() {
        let tree = parse_file("bench.go", &src, ParseMode::default()).expect("parse");
        let path = dir.path().join(format!("{name}.asta"));
        archive::save(&tree, "bench.go", &path, &SaveOptions::default()).expect("save");
        let bytes = std::fs::read(&path).expect("read");
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode", name), &bytes, |b, bytes| {
            b.iter(|| codec::decode(bb(bytes)).expect("decode"));
        });
        group.bench_function(BenchmarkId::new("save", name), |b| {
            b.iter_batched(
                || dir.path().join(format!("{name}-save.asta")),
                |out| archive::save(&tree, "bench.go", &out, &SaveOptions::default()).expect("save"),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(BenchmarkId::new("load", name), |b| {
            b.iter(|| archive::load(bb(&path)).expect("load"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_format, bench_archive);
criterion_main!(benches);
