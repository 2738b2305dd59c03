use confshell::config::{Entry, codec};
use confshell::storage::ram::RamStorage;
use confshell::system::platform::NoReboot;
use confshell::system::shell::Shell;
use confshell::system::transport::Transport;
use criterion::{Criterion, Throughput};
use std::collections::VecDeque;
use std::hint::black_box;

/// Transport that replays queued input and throws output away.
#[derive(Default)]
struct Replay {
    rx: VecDeque<u8>,
    written: usize,
}

impl Transport for Replay {
    type Error = ();

    fn available(&mut self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.written += bytes.len();
        Ok(())
    }
}

fn setup_shell() -> Shell<Replay, RamStorage<256>, NoReboot> {
    let mut shell = Shell::new(Replay::default(), RamStorage::new(), NoReboot);
    shell.add_entry(Entry::string("hostname", "node", "device name"));
    shell.add_entry(Entry::boolean("dhcp", "true", "use DHCP"));
    shell.add_entry(Entry::address4("ip", "192.168.0.10", "static address"));
    shell.add_entry(Entry::address6("mac", "00:11:22:33:44:55", "hardware address"));
    shell.add_entry(Entry::integer("timeout", "30", "seconds"));
    codec::load_default(shell.registry_mut());
    shell.execute("conf").unwrap();
    shell
}

pub fn bench_assignment(c: &mut Criterion) {
    const SCRIPT: &[u8] = b"ip=10.0.0.42\r\nmac=02:00:5e:10:00:01\r\ntimeout=3600\r\n";

    let mut shell = setup_shell();
    let mut group = c.benchmark_group("shell");
    group.throughput(Throughput::Bytes(SCRIPT.len() as u64));
    group.bench_function("poll_assignments", |b| {
        b.iter(|| {
            shell.transport_mut().rx.extend(black_box(SCRIPT).iter().copied());
            shell.poll().unwrap();
        })
    });
    group.finish();
}

pub fn bench_show(c: &mut Criterion) {
    let mut shell = setup_shell();
    c.bench_function("shell/show", |b| {
        b.iter(|| shell.execute(black_box("show")).unwrap())
    });
}
