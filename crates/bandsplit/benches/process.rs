//! Engine benchmarks

use bandsplit::prelude::*;
use bandsplit::CrossoverFilterBank;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f64 = 48000.0;

fn signal(len: usize, hz: f64) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * hz * i as f64 / SAMPLE_RATE).sin() as f32)
        .collect()
}

fn bench_process_stereo(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_stereo");
    for block in [64usize, 256, 512, 2048] {
        let mut processor = BandSplitDelay::new()
            .prepare(AudioSetup::stereo(SAMPLE_RATE, block))
            .expect("valid setup");
        let left_in = signal(block, 220.0);
        let right_in = signal(block, 330.0);
        let mut left_out = vec![0.0f32; block];
        let mut right_out = vec![0.0f32; block];
        let context = ProcessContext::new(SAMPLE_RATE, block, Transport::with_tempo(120.0));

        group.bench_with_input(BenchmarkId::from_parameter(block), &block, |b, &n| {
            b.iter(|| {
                let mut buffer = Buffer::new(
                    [black_box(&left_in[..]), black_box(&right_in[..])],
                    [&mut left_out[..], &mut right_out[..]],
                    n,
                );
                processor.process(&mut buffer, &context);
            })
        });
    }
    group.finish();
}

fn bench_crossover_split(c: &mut Criterion) {
    let mut bank = CrossoverFilterBank::new(1, SAMPLE_RATE, &EngineConfig::DEFAULT, 500.0, 7000.0);
    let input = signal(1024, 1000.0);
    let mut low = vec![0.0f32; 1024];
    let mut mid = vec![0.0f32; 1024];
    let mut high = vec![0.0f32; 1024];

    c.bench_function("crossover_split_1024", |b| {
        b.iter(|| {
            bank.split_channel(0, black_box(&input), &mut low, &mut mid, &mut high);
        })
    });
}

criterion_group!(benches, bench_process_stereo, bench_crossover_split);
criterion_main!(benches);
