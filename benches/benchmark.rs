use criterion::{criterion_group, criterion_main, Criterion};

fn trinucleotide(seq: &[u8], pos: usize) -> Option<[u8; 3]> {
    if pos == 0 || pos + 1 >= seq.len() {
        return None;
    }
    let mut context = [0; 3];
    context.copy_from_slice(&seq[pos - 1..pos + 2]);
    Some(context)
}

fn criterion_benchmark(c: &mut Criterion) {
    let seq = b"TACGTACGTACGTACGTACG";
    c.bench_function("trinucleotide middle", |b| b.iter(|| trinucleotide(seq, 7)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
