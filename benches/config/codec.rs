use confshell::config::{Entry, Layout, MAX_ENTRIES, Registry, codec};
use confshell::storage::ram::RamStorage;
use criterion::{Criterion, Throughput};
use rand::Rng;
use std::hint::black_box;

const HOSTNAMES: [&str; 4] = ["node", "gateway-01", "sensor-7", "pump-controller-east"];

/// A registry filled to capacity with a mix of every kind.
fn full_registry() -> Registry {
    const NAMES: [&str; MAX_ENTRIES] = [
        "e0", "e1", "e2", "e3", "e4", "e5", "e6", "e7", "e8", "e9", "e10", "e11", "e12", "e13",
        "e14", "e15",
    ];

    let mut rng = rand::thread_rng();
    let mut registry = Registry::new();
    for (i, name) in NAMES.into_iter().enumerate() {
        let entry = match i % 5 {
            0 => Entry::string(name, HOSTNAMES[rng.gen_range(0..HOSTNAMES.len())], ""),
            1 => Entry::boolean(name, "true", ""),
            2 => Entry::integer(name, "4000000000", ""),
            3 => Entry::address4(name, "192.168.100.200", ""),
            _ => Entry::address6(name, "de:ad:be:ef:00:01", ""),
        };
        registry.register(entry).unwrap();
    }
    codec::load_default(&mut registry);
    registry
}

pub fn bench_save(c: &mut Criterion) {
    let registry = full_registry();
    let mut storage: RamStorage<1024> = RamStorage::new();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(registry.encoded_len() as u64));
    group.bench_function("save_plain", |b| {
        b.iter(|| codec::save(black_box(&registry), &mut storage, Layout::Plain).unwrap())
    });
    group.finish();
}

pub fn bench_load(c: &mut Criterion) {
    let mut registry = full_registry();
    let mut storage: RamStorage<1024> = RamStorage::new();
    codec::save(&registry, &mut storage, Layout::Plain).unwrap();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(registry.encoded_len() as u64));
    group.bench_function("load_plain", |b| {
        b.iter(|| codec::load(black_box(&mut registry), &mut storage, Layout::Plain).unwrap())
    });
    group.finish();
}

pub fn bench_save_versioned(c: &mut Criterion) {
    let registry = full_registry();
    let mut storage: RamStorage<1024> = RamStorage::new();

    c.bench_function("codec/save_versioned", |b| {
        b.iter(|| codec::save(black_box(&registry), &mut storage, Layout::Versioned(1)).unwrap())
    });
}
