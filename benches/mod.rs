use criterion::{criterion_group, criterion_main};

mod config;
mod system;

criterion_group!(
    benches,
    config::codec::bench_save,
    config::codec::bench_load,
    config::codec::bench_save_versioned,
    system::shell::bench_assignment,
    system::shell::bench_show
);
criterion_main!(benches);
