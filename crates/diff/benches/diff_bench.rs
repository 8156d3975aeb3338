use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use textdiff::{find_differences, DiffConfig};

fn bench_find_differences(c: &mut Criterion) {
    let config = DiffConfig::default();
    let mut group = c.benchmark_group("find_differences");

    for size in [64, 512, 4096].iter() {
        let old = "lorem ipsum dolor ".repeat(*size / 18);
        let new = old.replacen("ipsum", "ipsam", 3).replacen("dolor ", "", 2);
        group.throughput(Throughput::Bytes(old.len() as u64));
        group.bench_function(format!("bytes_{size}"), |b| {
            b.iter(|| find_differences(black_box(&old), black_box(&new), black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_differences);
criterion_main!(benches);
