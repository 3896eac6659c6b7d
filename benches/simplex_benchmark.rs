use criterion::{criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use tableaurs::{solve, Method, Mode, SimplexSettings, Tableau};

/// Klee-Minty cube of dimension `n`: maximize sum 2^(n-j) x_j s.t.
/// 2 sum_{j<i} 2^(i-j) x_j + x_i <= 5^i.
fn klee_minty(n: usize) -> Tableau {
    let mut rows = Vec::with_capacity(n + 1);
    let mut objective: Vec<f64> = (1..=n).map(|j| 2f64.powi((n - j) as i32)).collect();
    objective.push(0.0);
    rows.push(objective);
    for i in 1..=n {
        let mut row: Vec<f64> = (1..=n)
            .map(|j| if j < i { 2f64.powi((i - j + 1) as i32) } else if j == i { 1.0 } else { 0.0 })
            .collect();
        row.push(5f64.powi(i as i32));
        rows.push(row);
    }
    Tableau::from_rows(&rows).expect("well-formed")
}

fn criterion_benchmark(c: &mut Criterion) {
    let settings = SimplexSettings::default();
    let mut group = c.benchmark_group("klee_minty");
    for n in 2..9 {
        let lp = klee_minty(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("two_phase", n), &lp, |b, lp| {
            b.iter(|| solve(lp.clone(), Mode::TwoPhase, &settings))
        });
        group.bench_with_input(BenchmarkId::new("primal", n), &lp, |b, lp| {
            b.iter(|| solve(lp.clone(), Mode::Explicit(Method::Primal), &settings))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
