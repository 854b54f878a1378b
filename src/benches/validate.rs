use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use htmlsafe::{
    Attribute, AttributeName, AttributeValue, Element, ElementName, HtmlWriter, Script, Text,
    WriterSettings,
};

fn bench_validators(c: &mut Criterion) {
    let cases: Vec<(&'static str, String)> = vec![
        ("ascii", "Hello World 1234567890".repeat(32)),
        ("escapes", "a<b & \"c\" = 'd'".repeat(64)),
        ("mixed", "caf\u{E9} \u{20AC} \u{1F600} <ok>".repeat(64)),
    ];

    let mut group = c.benchmark_group("validate");
    for (name, text) in &cases {
        let units: Vec<u16> = text.encode_utf16().collect();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("text", name), text, |b, input| {
            b.iter(|| black_box(Text::new(black_box(input.as_str()))))
        });
        group.bench_with_input(BenchmarkId::new("text_utf16", name), &units, |b, input| {
            b.iter(|| black_box(Text::new(black_box(input.as_slice()))))
        });
        group.bench_with_input(BenchmarkId::new("attr_value", name), text, |b, input| {
            b.iter(|| black_box(AttributeValue::new(black_box(input.as_str()))))
        });
        group.bench_with_input(BenchmarkId::new("script", name), text, |b, input| {
            b.iter(|| black_box(Script::inline(black_box(input.as_str()), &[])))
        });
    }

    group.bench_function("element_name", |b| {
        b.iter(|| black_box(ElementName::new(black_box("blockquote"))))
    });
    group.bench_function("attribute_name", |b| {
        b.iter(|| black_box(AttributeName::new(black_box("data-tracking-id"))))
    });
    group.finish();
}

fn bench_writer(c: &mut Criterion) {
    let li = Element::parse("li", &[Attribute::parse("class", "item").unwrap()]).unwrap();
    let ul = Element::parse("ul", &[]).unwrap();
    let items: Vec<Text> = (0..256).map(|i| Text::new(format!("item {i} & more").as_str())).collect();

    let mut group = c.benchmark_group("writer");
    group.bench_function("list_256", |b| {
        b.iter_batched(
            || Vec::with_capacity(16 * 1024),
            |out| {
                let mut writer = HtmlWriter::with_settings(out, WriterSettings::new());
                writer.start_document().unwrap();
                writer.open(&ul).unwrap();
                for item in &items {
                    writer.element(&li, item).unwrap();
                }
                writer.close().unwrap();
                black_box(writer.finish().unwrap())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_validators, bench_writer);
criterion_main!(benches);
