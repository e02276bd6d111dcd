use bytes::BytesMut;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use telchat_proto::{CrlfTranslator, LineEditor};

fn line_editing_benchmark(c: &mut Criterion) {
    let typed: Vec<u8> = b"shall we play a game?\x08\x08\x08\x08\x08game?\r\n"
        .iter()
        .copied()
        .cycle()
        .take(4096)
        .collect();

    let mut group = c.benchmark_group("line_editor");
    group.throughput(Throughput::Bytes(typed.len() as u64));
    group.bench_function("consume_mixed_input", |b| {
        b.iter(|| {
            let mut editor = LineEditor::new();
            let mut echo = BytesMut::with_capacity(8192);
            for &byte in &typed {
                black_box(editor.consume(byte, &mut echo));
            }
            echo
        })
    });
    group.finish();
}

fn crlf_benchmark(c: &mut Criterion) {
    let fragments: Vec<String> = (0..64)
        .map(|i| format!("fragment {i}\nwith a newline and some text "))
        .collect();

    let mut group = c.benchmark_group("crlf");
    group.throughput(Throughput::Elements(fragments.len() as u64));
    group.bench_function("translate_fragments", |b| {
        b.iter(|| {
            let mut t = CrlfTranslator::new();
            for f in &fragments {
                black_box(t.translate(f));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, line_editing_benchmark, crlf_benchmark);
criterion_main!(benches);
