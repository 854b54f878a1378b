use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use utf_scalar::{
    classify, decode_utf8, decode_utf16, encode_utf8, switch_utf16_to_8, utf8_len_of_utf16,
};

struct Case {
    name: &'static str,
    text: String,
}

fn build_cases() -> Vec<Case> {
    vec![
        Case {
            name: "ascii",
            text: "Hello &<>\"' World".repeat(64),
        },
        Case {
            name: "mixed",
            text: "Hello \u{20AC} \u{00E9} \u{1F600} World".repeat(64),
        },
        Case {
            name: "cjk",
            text: "\u{4E16}\u{754C}\u{3053}\u{3093}\u{306B}\u{3061}\u{306F}".repeat(128),
        },
    ]
}

fn bench_transcode(c: &mut Criterion) {
    let cases = build_cases();
    let mut group = c.benchmark_group("transcode");

    for case in &cases {
        let bytes = case.text.as_bytes();
        let units: Vec<u16> = case.text.encode_utf16().collect();
        let scalars = decode_utf8(bytes);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode_utf8", case.name), bytes, |b, input| {
            b.iter(|| black_box(decode_utf8(black_box(input))))
        });

        group.bench_with_input(
            BenchmarkId::new("decode_utf16", case.name),
            &units,
            |b, input| b.iter(|| black_box(decode_utf16(black_box(input)))),
        );

        group.bench_with_input(
            BenchmarkId::new("encode_utf8", case.name),
            &scalars,
            |b, input| b.iter(|| black_box(encode_utf8(black_box(input).iter().copied()))),
        );

        let mut dst = vec![0u8; utf8_len_of_utf16(&units)];
        group.bench_with_input(
            BenchmarkId::new("switch_utf16_to_8", case.name),
            &units,
            |b, input| b.iter(|| black_box(switch_utf16_to_8(black_box(input), &mut dst))),
        );

        group.bench_with_input(BenchmarkId::new("classify", case.name), &scalars, |b, input| {
            b.iter(|| {
                input
                    .iter()
                    .map(|&cp| classify(i64::from(cp)).bits())
                    .fold(0u32, |acc, bits| acc ^ bits)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transcode);
criterion_main!(benches);
